use roommate_api::config::{Config, ConfigError};
use roommate_api::domain::repositories::{UserRepository, UserStoreError};
use roommate_api::infrastructure::database;
use roommate_api::infrastructure::repositories::PostgresUserRepository;
use thiserror::Error;

#[derive(Debug, Error)]
enum StartupError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to connect to database: {0}")]
    Connect(#[from] sqlx::Error),

    #[error("failed to apply migrations: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("user store unavailable: {0}")]
    Store(#[from] UserStoreError),
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    tracing::debug!(?config, "Loaded configuration");

    let pool = database::connect(&config).await?;

    if config.run_migrations {
        database::run_migrations(&pool).await?;
    } else {
        tracing::info!("Skipping migrations");
    }

    let users = PostgresUserRepository::new(pool.clone());
    let count = users.count().await?;
    tracing::info!(count, "User store ready");

    pool.close().await;
    Ok(())
}
