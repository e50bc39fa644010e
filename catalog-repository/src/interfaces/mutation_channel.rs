//! Mutation channel trait definitions.

use async_trait::async_trait;

use crate::errors::CatalogError;
use catalog_shared::Mutation;

/// The catalog side of the provider boundary.
///
/// Implementations must apply at most one mutation at a time per
/// `provider_name`, and may return before the change is visible to readers.
#[async_trait]
pub trait MutationChannel: Send + Sync {
    /// Queue a mutation on behalf of `provider_name`.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Once the change is queued for processing
    /// * `Err(CatalogError)` - If the mutation is rejected; nothing is applied
    async fn apply_mutation(
        &self,
        provider_name: &str,
        mutation: Mutation,
    ) -> Result<(), CatalogError>;
}

/// A handle bound to a single provider identity.
///
/// Handed to a provider once, at connect time.
#[async_trait]
pub trait EntityProviderConnection: Send + Sync {
    /// Push a mutation for the provider this connection belongs to.
    async fn apply_mutation(&self, mutation: Mutation) -> Result<(), CatalogError>;
}
