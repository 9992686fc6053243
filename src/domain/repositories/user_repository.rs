use async_trait::async_trait;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::user::{Email, NewUser, User, UserChanges, ValidationError};

/// The key a lookup was made with, reported back in [`UserStoreError::NotFound`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserKey {
    Id(Uuid),
    Email(String),
}

impl fmt::Display for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            UserKey::Id(id) => write!(f, "id {}", id),
            UserKey::Email(email) => write!(f, "email {}", email),
        }
    }
}

impl From<Uuid> for UserKey {
    fn from(id: Uuid) -> Self {
        UserKey::Id(id)
    }
}

impl From<&Email> for UserKey {
    fn from(email: &Email) -> Self {
        UserKey::Email(email.as_str().to_string())
    }
}

/// Failures reported by a [`UserRepository`]
#[derive(Debug, Error)]
pub enum UserStoreError {
    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    #[error("No user with {0}")]
    NotFound(UserKey),

    #[error("Invalid user: {0}")]
    Validation(String),

    #[error("Storage failure: {0}")]
    Storage(#[from] sqlx::Error),
}

impl From<ValidationError> for UserStoreError {
    fn from(err: ValidationError) -> Self {
        UserStoreError::Validation(err.message().to_string())
    }
}

impl UserStoreError {
    pub fn is_duplicate_email(&self) -> bool {
        matches!(self, UserStoreError::DuplicateEmail(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, UserStoreError::NotFound(_))
    }
}

/// Repository trait for the User entity
///
/// Implementations own identifier generation and must keep `email` unique
/// even when several callers write at once.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new user and return it with its generated id
    ///
    /// Fails with `Validation` if no password digest was set and with
    /// `DuplicateEmail` if the address is taken.
    async fn create(&self, user: NewUser) -> Result<User, UserStoreError>;

    /// Find a user by ID
    async fn get_by_id(&self, user_id: Uuid) -> Result<User, UserStoreError>;

    /// Find a user by email address
    async fn get_by_email(&self, email: &Email) -> Result<User, UserStoreError>;

    /// Apply a partial update and return the stored result
    async fn update(&self, user_id: Uuid, changes: UserChanges) -> Result<User, UserStoreError>;

    /// Delete a user by ID
    async fn delete(&self, user_id: Uuid) -> Result<(), UserStoreError>;

    /// All users, in no particular order
    async fn list(&self) -> Result<Vec<User>, UserStoreError>;

    /// Number of stored users
    async fn count(&self) -> Result<u64, UserStoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_the_key() {
        let id = Uuid::nil();
        let err = UserStoreError::NotFound(id.into());
        assert_eq!(
            err.to_string(),
            "No user with id 00000000-0000-0000-0000-000000000000"
        );

        let email = Email::new("ann@x.com").unwrap();
        let err = UserStoreError::NotFound((&email).into());
        assert_eq!(err.to_string(), "No user with email ann@x.com");
    }

    #[test]
    fn storage_message_includes_cause() {
        let err = UserStoreError::Storage(sqlx::Error::RowNotFound);
        assert_eq!(
            err.to_string(),
            format!("Storage failure: {}", sqlx::Error::RowNotFound)
        );
    }

    #[test]
    fn validation_error_converts() {
        let err: UserStoreError = Email::new("bad").unwrap_err().into();
        assert!(matches!(err, UserStoreError::Validation(_)));
    }
}
