// User entity module
// A user is a flat record: generated id, names, unique email, password digest

#![allow(clippy::module_inception)]

pub mod user;
pub mod value_objects;

pub use user::{NewUser, User, UserChanges};
pub use value_objects::{Email, HashedPassword, ValidationError};
