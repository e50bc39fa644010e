//! Provider module for the catalog ingest.
//!
//! Providers build entity batches and push them to the catalog through the
//! connection they were given at connect time.

mod fixture;
mod router;

use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::ProviderError;
use catalog_repository::EntityProviderConnection;

pub use fixture::{FixtureEntityProvider, FIXTURE_LOCATION, FIXTURE_PROVIDER_NAME};
pub use router::MessageResponse;

/// A source of entities for the catalog.
#[async_trait]
pub trait EntityProvider: Send + Sync {
    /// Stable identifier, used for attribution in the catalog and in logs.
    fn provider_name(&self) -> &str;

    /// Store the connection used for every later sync.
    ///
    /// Must be called exactly once, before any sync.
    async fn connect(
        &self,
        connection: Arc<dyn EntityProviderConnection>,
    ) -> Result<(), ProviderError>;
}
