//! # Catalog Repository
//!
//! This crate provides the traits through which providers and the
//! processing engine talk to the catalog, and an in-memory implementation
//! of them.

pub mod config;
pub mod errors;
pub mod interfaces;
pub mod memory;
pub mod types;

pub use config::CatalogConfig;
pub use errors::CatalogError;
pub use interfaces::{EntityProviderConnection, MutationChannel, ProcessingStore};
pub use memory::{InMemoryCatalog, ProviderConnection};
pub use types::{PendingEntity, ProcessingResult, StoredEntity};
