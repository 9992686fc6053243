//! Roommate API user store
//!
//! This library provides the `User` entity, the `UserRepository` contract
//! that owns identifier generation and email uniqueness, and its PostgreSQL
//! and in-process implementations.

pub mod config;
pub mod domain;
pub mod infrastructure;
