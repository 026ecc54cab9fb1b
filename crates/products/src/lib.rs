//! Products domain module.
//!
//! The `Product` record plus its create and patch shapes, implemented as pure
//! validation and merge logic (no IO, no HTTP, no storage).

pub mod product;

pub use product::{NewProduct, Product, ProductPatch, NAME_MAX_CHARS};
