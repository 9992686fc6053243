use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::repositories::{UserKey, UserRepository, UserStoreError};
use crate::domain::user::{Email, NewUser, User, UserChanges};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    // email -> user_id; mirrors the unique index on users.email
    by_email: HashMap<Email, Uuid>,
}

/// In-process implementation of UserRepository
///
/// Records and the email index sit behind one lock. Every write checks
/// uniqueness and mutates under the same write guard, so concurrent callers
/// racing on an address see exactly one winner.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    tables: RwLock<Tables>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserStoreError> {
        // Incomplete records are rejected before any lookup, as in PostgreSQL
        let mut user = user.into_user(Uuid::new_v4())?;
        let mut tables = self.tables.write().await;

        if tables.by_email.contains_key(user.email()) {
            return Err(UserStoreError::DuplicateEmail(user.email().to_string()));
        }

        while tables.users.contains_key(&user.user_id()) {
            user.reassign_id(Uuid::new_v4());
        }

        let user_id = user.user_id();
        tables.by_email.insert(user.email().clone(), user_id);
        tables.users.insert(user_id, user.clone());

        info!(user_id = %user_id, "created user");
        Ok(user)
    }

    async fn get_by_id(&self, user_id: Uuid) -> Result<User, UserStoreError> {
        let tables = self.tables.read().await;
        tables
            .users
            .get(&user_id)
            .cloned()
            .ok_or(UserStoreError::NotFound(UserKey::Id(user_id)))
    }

    async fn get_by_email(&self, email: &Email) -> Result<User, UserStoreError> {
        let tables = self.tables.read().await;
        tables
            .by_email
            .get(email)
            .and_then(|id| tables.users.get(id))
            .cloned()
            .ok_or_else(|| UserStoreError::NotFound(email.into()))
    }

    async fn update(&self, user_id: Uuid, changes: UserChanges) -> Result<User, UserStoreError> {
        let mut tables = self.tables.write().await;

        let current_email = tables
            .users
            .get(&user_id)
            .map(|u| u.email().clone())
            .ok_or(UserStoreError::NotFound(UserKey::Id(user_id)))?;

        if let Some(email) = changes.new_email() {
            match tables.by_email.get(email) {
                Some(owner) if *owner != user_id => {
                    return Err(UserStoreError::DuplicateEmail(email.to_string()));
                }
                _ => {}
            }
        }

        let Tables { users, by_email } = &mut *tables;
        let user = users
            .get_mut(&user_id)
            .ok_or(UserStoreError::NotFound(UserKey::Id(user_id)))?;
        user.apply(changes);

        if *user.email() != current_email {
            by_email.remove(&current_email);
            by_email.insert(user.email().clone(), user_id);
        }

        debug!(user_id = %user_id, "updated user");
        Ok(user.clone())
    }

    async fn delete(&self, user_id: Uuid) -> Result<(), UserStoreError> {
        let mut tables = self.tables.write().await;

        let user = tables
            .users
            .remove(&user_id)
            .ok_or(UserStoreError::NotFound(UserKey::Id(user_id)))?;
        tables.by_email.remove(user.email());

        info!(user_id = %user_id, "deleted user");
        Ok(())
    }

    async fn list(&self) -> Result<Vec<User>, UserStoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().cloned().collect())
    }

    async fn count(&self) -> Result<u64, UserStoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.len() as u64)
    }
}
