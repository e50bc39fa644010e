//! Interface definitions for the catalog.
//!
//! Providers only ever see an [`EntityProviderConnection`]. The catalog
//! implements [`MutationChannel`] for all providers at once and
//! [`ProcessingStore`] for the processing engine.

mod mutation_channel;
mod processing_store;

pub use mutation_channel::{EntityProviderConnection, MutationChannel};
pub use processing_store::ProcessingStore;
