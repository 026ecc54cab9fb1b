//! Product repository abstraction.
//!
//! One capability set, two backing stores:
//! - [`InMemoryProductRepository`]: a shared map, gone on restart.
//! - [`SqlProductRepository`]: the `products` table, one pooled connection per session.
//!
//! A repository value is a *session*: it is obtained per request from
//! [`crate::ProductStore::session`] and dropped when the request ends.

use async_trait::async_trait;
use thiserror::Error;

use catalog_core::{DomainError, ProductId};
use catalog_products::{Product, ProductPatch};

pub mod in_memory;
pub mod sqlite;

pub use in_memory::InMemoryProductRepository;
pub use sqlite::SqlProductRepository;

pub type RepoResult<T> = Result<T, RepositoryError>;

/// Storage-level failure.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Primary key collision on insert (only the SQL backend detects this).
    #[error("product {0} already exists")]
    Duplicate(ProductId),

    /// A stored row no longer maps onto a valid `Product`.
    #[error("corrupt product row: {0}")]
    Corrupt(String),

    /// A writer panicked while holding the in-memory map.
    #[error("in-memory store lock poisoned")]
    Poisoned,

    /// The domain refused the requested change.
    #[error(transparent)]
    Rejected(#[from] DomainError),
}

/// Filtering and paging for [`ProductRepository::list`].
///
/// Filtering happens first, then ordering, then `offset`/`limit` slicing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Maximum number of records; `None` means unbounded.
    pub limit: Option<u32>,
    pub offset: u64,
    /// Case-insensitive substring match on `name`.
    pub q: Option<String>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    pub fn search(mut self, q: impl Into<String>) -> Self {
        self.q = Some(q.into());
        self
    }
}

/// CRUD capability over products.
///
/// `add` does not check for an existing id: callers look the id up first.
/// The in-memory store overwrites silently, the SQL store reports
/// [`RepositoryError::Duplicate`].
#[async_trait]
pub trait ProductRepository: Send {
    async fn add(&mut self, product: &Product) -> RepoResult<()>;

    /// `None` means not found; that is not an error.
    async fn get(&mut self, id: ProductId) -> RepoResult<Option<Product>>;

    /// Ordering differs per backend: by `name` ascending in memory, newest
    /// first in SQL.
    async fn list(&mut self, query: &ListQuery) -> RepoResult<Vec<Product>>;

    /// Apply the set fields of `patch`; `None` means no such product.
    async fn update_partial(
        &mut self,
        id: ProductId,
        patch: &ProductPatch,
    ) -> RepoResult<Option<Product>>;

    /// `true` if a record existed and was removed.
    async fn delete(&mut self, id: ProductId) -> RepoResult<bool>;
}
