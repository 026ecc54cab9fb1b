//! Infrastructure layer: product repositories, database wiring, per-request sessions.

pub mod db;
pub mod repository;
pub mod store;

mod integration_tests;

pub use repository::{
    InMemoryProductRepository, ListQuery, ProductRepository, RepoResult, RepositoryError,
    SqlProductRepository,
};
pub use store::ProductStore;
