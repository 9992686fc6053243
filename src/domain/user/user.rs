use serde::Serialize;
use uuid::Uuid;

use super::value_objects::{required_name, Email, HashedPassword, ValidationError};

/// A user that has not been persisted yet
///
/// Built in two phases: [`NewUser::new`] takes the name and email, then the
/// caller attaches a digest with [`NewUser::set_hashed_password`]. The
/// identifier is never part of this type; only a store hands out ids.
///
/// # Example
/// ```
/// use roommate_api::domain::user::{NewUser, HashedPassword, Email};
///
/// let mut user = NewUser::new("Ann", "Lee", Email::new("ann@x.com").unwrap())
///     .expect("valid user");
/// assert!(!user.has_credentials());
///
/// user.set_hashed_password(HashedPassword::new("h1").unwrap());
/// assert!(user.has_credentials());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    firstname: String,
    lastname: String,
    email: Email,
    hashed_password: Option<HashedPassword>,
}

impl NewUser {
    /// Creates an incomplete user record
    ///
    /// # Returns
    /// * `Err(ValidationError)` - If either name is empty
    pub fn new(
        firstname: impl Into<String>,
        lastname: impl Into<String>,
        email: Email,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            firstname: required_name("firstname", firstname.into())?,
            lastname: required_name("lastname", lastname.into())?,
            email,
            hashed_password: None,
        })
    }

    pub fn set_hashed_password(&mut self, hashed_password: HashedPassword) {
        self.hashed_password = Some(hashed_password);
    }

    /// True once a password digest has been attached
    pub fn has_credentials(&self) -> bool {
        self.hashed_password.is_some()
    }

    pub fn firstname(&self) -> &str {
        &self.firstname
    }

    pub fn lastname(&self) -> &str {
        &self.lastname
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Assigns an identifier, completing the record.
    ///
    /// Only stores call this, and only once per record.
    pub(crate) fn into_user(self, user_id: Uuid) -> Result<User, ValidationError> {
        let hashed_password = self.hashed_password.ok_or_else(|| {
            ValidationError::new("Hashed password must be set before the user is stored")
        })?;

        Ok(User {
            user_id,
            firstname: self.firstname,
            lastname: self.lastname,
            email: self.email,
            hashed_password,
        })
    }
}

/// A persisted user account
///
/// # Invariants
/// - `user_id` was generated by a store and never changes
/// - Every field is populated, including the password digest
///
/// Serializing a `User` omits the password digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    user_id: Uuid,
    firstname: String,
    lastname: String,
    email: Email,
    #[serde(skip_serializing)]
    hashed_password: HashedPassword,
}

impl User {
    /// Rebuilds a stored record. Backends use this when loading rows.
    pub(crate) fn from_parts(
        user_id: Uuid,
        firstname: String,
        lastname: String,
        email: Email,
        hashed_password: HashedPassword,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            user_id,
            firstname: required_name("firstname", firstname)?,
            lastname: required_name("lastname", lastname)?,
            email,
            hashed_password,
        })
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn firstname(&self) -> &str {
        &self.firstname
    }

    pub fn lastname(&self) -> &str {
        &self.lastname
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn hashed_password(&self) -> &HashedPassword {
        &self.hashed_password
    }

    /// Replaces an id that collided before the record was ever stored
    pub(crate) fn reassign_id(&mut self, user_id: Uuid) {
        self.user_id = user_id;
    }

    /// Applies a change set in place. The identifier is untouched.
    pub(crate) fn apply(&mut self, changes: UserChanges) {
        if let Some(firstname) = changes.firstname {
            self.firstname = firstname;
        }
        if let Some(lastname) = changes.lastname {
            self.lastname = lastname;
        }
        if let Some(email) = changes.email {
            self.email = email;
        }
        if let Some(hashed_password) = changes.hashed_password {
            self.hashed_password = hashed_password;
        }
    }
}

/// A partial update for a stored user
///
/// Unset fields keep their current value. Names are validated by the
/// setters, so an accepted change set never empties a required field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub(crate) firstname: Option<String>,
    pub(crate) lastname: Option<String>,
    pub(crate) email: Option<Email>,
    pub(crate) hashed_password: Option<HashedPassword>,
}

impl UserChanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn firstname(mut self, firstname: impl Into<String>) -> Result<Self, ValidationError> {
        self.firstname = Some(required_name("firstname", firstname.into())?);
        Ok(self)
    }

    pub fn lastname(mut self, lastname: impl Into<String>) -> Result<Self, ValidationError> {
        self.lastname = Some(required_name("lastname", lastname.into())?);
        Ok(self)
    }

    pub fn email(mut self, email: Email) -> Self {
        self.email = Some(email);
        self
    }

    pub fn hashed_password(mut self, hashed_password: HashedPassword) -> Self {
        self.hashed_password = Some(hashed_password);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.firstname.is_none()
            && self.lastname.is_none()
            && self.email.is_none()
            && self.hashed_password.is_none()
    }

    /// The email this change set would write, if any
    pub fn new_email(&self) -> Option<&Email> {
        self.email.as_ref()
    }
}
