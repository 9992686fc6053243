use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Raised when a value object or entity is built from invalid input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(String);

impl ValidationError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    /// Returns the human readable reason
    pub fn message(&self) -> &str {
        &self.0
    }
}

/// Email value object representing a valid email address
///
/// # Invariants
/// - Must contain '@' character
/// - Must be at least 3 characters long
/// - Is immutable after construction
///
/// The address is kept verbatim. Uniqueness in the store is checked against
/// this exact string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Creates a new Email value object
    ///
    /// # Example
    /// ```
    /// use roommate_api::domain::user::value_objects::Email;
    ///
    /// let email = Email::new("ann@x.com").expect("valid email");
    /// assert_eq!(email.as_str(), "ann@x.com");
    /// ```
    pub fn new(email: impl Into<String>) -> Result<Self, ValidationError> {
        let email = email.into();
        if Self::is_valid(&email) {
            Ok(Email(email))
        } else {
            Err(ValidationError::new(format!("Invalid email: {:?}", email)))
        }
    }

    fn is_valid(email: &str) -> bool {
        email.contains('@') && email.len() >= 3
    }

    /// Returns the email as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Email::new(value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

/// A password digest produced by whatever hasher the caller uses.
///
/// The store never sees plaintext and never inspects the digest format; it
/// only requires it to be non-empty. `Debug` is redacted so digests do not
/// leak into logs.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword(String);

impl HashedPassword {
    pub fn new(digest: impl Into<String>) -> Result<Self, ValidationError> {
        let digest = digest.into();
        if digest.trim().is_empty() {
            return Err(ValidationError::new("Hashed password cannot be empty"));
        }
        Ok(HashedPassword(digest))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("HashedPassword(***)")
    }
}

/// Checks a required name field, returning it unchanged when present
pub(crate) fn required_name(field: &str, value: String) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new(format!("{} cannot be empty", field)))
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_email() {
        assert!(Email::new("test@example.com").is_ok());
    }

    #[test]
    fn valid_email_minimum_length() {
        assert!(Email::new("a@b").is_ok());
    }

    #[test]
    fn invalid_email_no_at_symbol() {
        assert!(Email::new("invalid").is_err());
    }

    #[test]
    fn invalid_email_too_short() {
        assert!(Email::new("a@").is_err());
    }

    #[test]
    fn invalid_email_empty() {
        let err = Email::new("").unwrap_err();
        assert!(err.message().contains("Invalid email"));
    }

    #[test]
    fn email_is_not_normalized() {
        let upper = Email::new("Ann@X.com").unwrap();
        let lower = Email::new("ann@x.com").unwrap();
        assert_ne!(upper, lower);
        assert_eq!(upper.to_string(), "Ann@X.com");
    }

    #[test]
    fn email_deserialize_rejects_invalid() {
        let err = serde_json::from_str::<Email>("\"nope\"");
        assert!(err.is_err());

        let email: Email = serde_json::from_str("\"ann@x.com\"").unwrap();
        assert_eq!(email.as_str(), "ann@x.com");
    }

    #[test]
    fn hashed_password_rejects_blank() {
        assert!(HashedPassword::new("").is_err());
        assert!(HashedPassword::new("   ").is_err());
        assert_eq!(HashedPassword::new("h1").unwrap().as_str(), "h1");
    }

    #[test]
    fn hashed_password_debug_is_redacted() {
        let digest = HashedPassword::new("$argon2id$secret").unwrap();
        let rendered = format!("{:?}", digest);
        assert!(!rendered.contains("secret"));
    }

    #[test]
    fn required_name_rejects_whitespace() {
        assert!(required_name("firstname", " ".to_string()).is_err());
        assert_eq!(required_name("firstname", "Ann".to_string()).unwrap(), "Ann");
    }
}
