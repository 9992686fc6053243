// Repository ports
// Infrastructure adapters implement these traits

pub mod user_repository;

pub use user_repository::{UserKey, UserRepository, UserStoreError};
