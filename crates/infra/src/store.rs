//! Backend selection and per-request session provisioning.

use sqlx::SqlitePool;

use crate::db::{self, DbConfig};
use crate::repository::{
    InMemoryProductRepository, ProductRepository, RepoResult, SqlProductRepository,
};

/// The configured product backend.
///
/// Cheap to clone; shared by every request.
#[derive(Debug, Clone)]
pub enum ProductStore {
    InMemory(InMemoryProductRepository),
    Sqlite(SqlitePool),
}

impl ProductStore {
    pub fn in_memory() -> Self {
        Self::InMemory(InMemoryProductRepository::new())
    }

    /// Open the SQLite pool and make sure the schema exists.
    pub async fn connect(config: &DbConfig) -> RepoResult<Self> {
        let pool = db::connect(config).await?;
        db::init_schema(&pool).await?;
        Ok(Self::Sqlite(pool))
    }

    pub fn backend(&self) -> &'static str {
        match self {
            ProductStore::InMemory(_) => "memory",
            ProductStore::Sqlite(_) => "sqlite",
        }
    }

    /// Open a repository session scoped to one request.
    ///
    /// For SQLite this checks a connection out of the pool; it is returned when
    /// the session is dropped.
    pub async fn session(&self) -> RepoResult<Box<dyn ProductRepository>> {
        match self {
            ProductStore::InMemory(repo) => Ok(Box::new(repo.clone())),
            ProductStore::Sqlite(pool) => {
                let conn = pool.acquire().await?;
                Ok(Box::new(SqlProductRepository::new(conn)))
            }
        }
    }

    /// Close the pool (no-op in memory).
    pub async fn close(&self) {
        if let ProductStore::Sqlite(pool) = self {
            pool.close().await;
        }
    }
}
