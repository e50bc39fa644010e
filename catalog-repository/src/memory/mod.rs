//! In-memory implementation of the catalog interfaces.

mod catalog;
mod connection;

pub use catalog::InMemoryCatalog;
pub use connection::ProviderConnection;
