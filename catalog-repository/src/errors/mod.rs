//! Error types for the catalog repository.

mod catalog_error;

pub use catalog_error::CatalogError;
