//! SQLite connection pool and schema bootstrap.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::ConnectOptions;

use crate::repository::RepoResult;

/// Default pool size for file-backed databases.
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Connection settings for the persistent store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    /// e.g. `sqlite://./dev.db` or `sqlite::memory:`.
    pub url: String,
    /// Log every statement at `info` instead of `debug`.
    pub echo: bool,
}

impl DbConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            echo: false,
        }
    }

    /// In-memory SQLite databases live and die with their connection.
    pub fn is_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

/// Open the pool, creating the database file when missing.
///
/// Memory databases are pinned to a single connection that never expires so
/// every session sees the same data.
pub async fn connect(config: &DbConfig) -> RepoResult<SqlitePool> {
    let level = if config.echo {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Debug
    };
    let options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .log_statements(level);

    let pool_options = if config.is_memory() {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(DEFAULT_MAX_CONNECTIONS)
    };

    let pool = pool_options.connect_with(options).await?;
    tracing::info!(url = %config.url, memory = config.is_memory(), "sqlite pool ready");
    Ok(pool)
}

/// Create the `products` table and its name index when absent.
pub async fn init_schema(pool: &SqlitePool) -> RepoResult<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS products (
            id         VARCHAR(36)  PRIMARY KEY NOT NULL,
            name       VARCHAR(200) NOT NULL,
            price      REAL         NOT NULL,
            stock      INTEGER      NOT NULL,
            created_at TEXT         NOT NULL,
            updated_at TEXT         NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS ix_products_name ON products (name)")
        .execute(pool)
        .await?;

    Ok(())
}
