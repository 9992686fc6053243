use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::repositories::{UserKey, UserRepository, UserStoreError};
use crate::domain::user::{Email, HashedPassword, NewUser, User, UserChanges};

/// SQLSTATE for unique_violation
const UNIQUE_VIOLATION: &str = "23505";

/// Name of the unique constraint on `users.email` (see migrations/)
const EMAIL_CONSTRAINT: &str = "users_email_key";

/// PostgreSQL implementation of UserRepository
///
/// Email uniqueness is enforced by the `users_email_key` constraint, so two
/// writers racing on the same address cannot both commit.
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a new PostgresUserRepository
    ///
    /// # Arguments
    /// * `pool` - SQLx connection pool for PostgreSQL
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    firstname: String,
    lastname: String,
    email: String,
    hashed_password: String,
}

impl TryFrom<UserRow> for User {
    type Error = UserStoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User::from_parts(
            row.user_id,
            row.firstname,
            row.lastname,
            Email::new(row.email)?,
            HashedPassword::new(row.hashed_password)?,
        )?)
    }
}

/// True when the error is a unique violation on the email constraint
fn is_email_conflict(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some(UNIQUE_VIOLATION)
                && db_err.constraint() == Some(EMAIL_CONSTRAINT)
        }
        _ => false,
    }
}

/// Maps an email conflict to `DuplicateEmail`; everything else, including a
/// primary key collision, is a storage failure
fn map_write_error(err: sqlx::Error, email: &str) -> UserStoreError {
    if is_email_conflict(&err) {
        return UserStoreError::DuplicateEmail(email.to_string());
    }
    UserStoreError::Storage(err)
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserStoreError> {
        let user = user.into_user(Uuid::new_v4())?;

        sqlx::query(
            r#"
            INSERT INTO users (user_id, firstname, lastname, email, hashed_password)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user.user_id())
        .bind(user.firstname())
        .bind(user.lastname())
        .bind(user.email().as_str())
        .bind(user.hashed_password().as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, user.email().as_str()))?;

        info!(user_id = %user.user_id(), "created user");
        Ok(user)
    }

    async fn get_by_id(&self, user_id: Uuid) -> Result<User, UserStoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, firstname, lastname, email, hashed_password
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or(UserStoreError::NotFound(UserKey::Id(user_id)))?
            .try_into()
    }

    async fn get_by_email(&self, email: &Email) -> Result<User, UserStoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, firstname, lastname, email, hashed_password
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or_else(|| UserStoreError::NotFound(email.into()))?
            .try_into()
    }

    async fn update(&self, user_id: Uuid, changes: UserChanges) -> Result<User, UserStoreError> {
        let new_email = changes.new_email().map(|e| e.as_str().to_string());

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET firstname = COALESCE($2, firstname),
                lastname = COALESCE($3, lastname),
                email = COALESCE($4, email),
                hashed_password = COALESCE($5, hashed_password)
            WHERE user_id = $1
            RETURNING user_id, firstname, lastname, email, hashed_password
            "#,
        )
        .bind(user_id)
        .bind(changes.firstname.as_deref())
        .bind(changes.lastname.as_deref())
        .bind(new_email.as_deref())
        .bind(changes.hashed_password.as_ref().map(|p| p.as_str()))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, new_email.as_deref().unwrap_or_default()))?;

        let user: User = row
            .ok_or(UserStoreError::NotFound(UserKey::Id(user_id)))?
            .try_into()?;

        debug!(user_id = %user_id, "updated user");
        Ok(user)
    }

    async fn delete(&self, user_id: Uuid) -> Result<(), UserStoreError> {
        let result = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(UserStoreError::NotFound(UserKey::Id(user_id)));
        }

        info!(user_id = %user_id, "deleted user");
        Ok(())
    }

    async fn list(&self) -> Result<Vec<User>, UserStoreError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, firstname, lastname, email, hashed_password
            FROM users
            ORDER BY email
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn count(&self) -> Result<u64, UserStoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(u64::try_from(count).unwrap_or_default())
    }
}
