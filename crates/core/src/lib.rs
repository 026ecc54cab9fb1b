//! `catalog-core`: shared building blocks for the product catalog.
//!
//! Pure primitives only (identifiers, error model). No IO lives here.

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult, Violations};
pub use id::ProductId;
