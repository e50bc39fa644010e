//! Provider-bound connection.

use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::CatalogError;
use crate::interfaces::{EntityProviderConnection, MutationChannel};
use catalog_shared::Mutation;

/// Binds a [`MutationChannel`] to one provider identity.
#[derive(Clone)]
pub struct ProviderConnection {
    provider_name: String,
    channel: Arc<dyn MutationChannel>,
}

impl ProviderConnection {
    pub fn new(provider_name: impl Into<String>, channel: Arc<dyn MutationChannel>) -> Self {
        Self {
            provider_name: provider_name.into(),
            channel,
        }
    }

    pub fn provider_name(&self) -> &str {
        &self.provider_name
    }
}

#[async_trait]
impl EntityProviderConnection for ProviderConnection {
    async fn apply_mutation(&self, mutation: Mutation) -> Result<(), CatalogError> {
        self.channel
            .apply_mutation(&self.provider_name, mutation)
            .await
    }
}
