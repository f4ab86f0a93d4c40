//! Connection settings and pool wiring shared by the server and the tests.

use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

/// Shared sea-orm pool alias.
pub type DbPool = DatabaseConnection;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://hr-tracker.db?mode=rwc";

#[derive(Debug, Error)]
pub enum DbError {
    #[error("invalid {key}: {value}")]
    InvalidSetting { key: &'static str, value: String },
    #[error(transparent)]
    Db(#[from] DbErr),
}

pub type DbResult<T> = Result<T, DbError>;

/// Environment-driven settings for the connection pool.
#[derive(Clone, Debug, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_url() -> String {
    DEFAULT_DATABASE_URL.to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_connect_timeout_secs() -> u64 {
    8
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: default_url(),
            max_connections: default_max_connections(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl DatabaseSettings {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Reads `DATABASE_URL` and `DB_MAX_CONNECTIONS`, falling back to a local
    /// SQLite file.
    pub fn from_env() -> DbResult<Self> {
        let mut settings = Self::default();
        if let Ok(url) = std::env::var("DATABASE_URL") {
            if !url.trim().is_empty() {
                settings.url = url.trim().to_string();
            }
        }
        if let Ok(raw) = std::env::var("DB_MAX_CONNECTIONS") {
            settings.max_connections = parse_max_connections(&raw)?;
        }
        Ok(settings)
    }

    /// An in-memory SQLite database. Pinned to one connection so every query
    /// sees the same database.
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }

    pub fn database_url(&self) -> &str {
        &self.url
    }

    fn connect_options(&self) -> ConnectOptions {
        let mut opts = ConnectOptions::new(self.url.clone());
        opts.max_connections(self.max_connections)
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .sqlx_logging(false);
        if self.url.starts_with("sqlite::memory:") {
            opts.min_connections(1);
        }
        opts
    }
}

fn parse_max_connections(raw: &str) -> DbResult<u32> {
    match raw.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(DbError::InvalidSetting {
            key: "DB_MAX_CONNECTIONS",
            value: raw.to_string(),
        }),
    }
}

pub async fn connect(settings: &DatabaseSettings) -> DbResult<DbPool> {
    debug!(max_connections = settings.max_connections, "opening database pool");
    let pool = Database::connect(settings.connect_options()).await?;
    info!(backend = ?pool.get_database_backend(), "database connected");
    Ok(pool)
}

/// Round-trips a trivial query; used by the health endpoint.
pub async fn ping(pool: &DbPool) -> bool {
    let backend = pool.get_database_backend();
    pool.execute(Statement::from_string(backend, "SELECT 1".to_owned()))
        .await
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_connections_must_be_positive() {
        assert_eq!(parse_max_connections(" 4 ").unwrap(), 4);
        assert!(matches!(
            parse_max_connections("0"),
            Err(DbError::InvalidSetting { .. })
        ));
        assert!(parse_max_connections("many").is_err());
    }

    #[test]
    fn defaults_point_at_local_sqlite_file() {
        let settings = DatabaseSettings::default();
        assert_eq!(settings.database_url(), DEFAULT_DATABASE_URL);
        assert_eq!(settings.max_connections, 10);
    }

    #[tokio::test]
    async fn in_memory_pool_answers_ping() {
        let pool = connect(&DatabaseSettings::in_memory()).await.unwrap();
        assert!(ping(&pool).await);
    }
}
