//! Fixture entity provider.
//!
//! Supplies a fixed owner group and three components so the catalog
//! pipeline can be exercised end to end.

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tracing::{info, info_span, instrument, Instrument, Span};

use crate::errors::ProviderError;
use crate::provider::EntityProvider;
use catalog_repository::EntityProviderConnection;
use catalog_shared::{DeferredEntity, Entity, Mutation};

/// Name the fixture provider registers under.
pub const FIXTURE_PROVIDER_NAME: &str = "test-provider";

/// Location every fixture entity is attributed to.
pub const FIXTURE_LOCATION: &str = "http://fake.com";

const API_VERSION: &str = "backstage.io/v1alpha1";

/// Provider producing a fixed set of fixture entities.
///
/// `full_sync` pushes the whole set; `delta_sync` pushes an update in
/// which `component-a` depends on `component-c` instead of `component-b`.
pub struct FixtureEntityProvider {
    connection: OnceLock<Arc<dyn EntityProviderConnection>>,
    sync_lock: Mutex<()>,
    span: Span,
}

impl FixtureEntityProvider {
    /// Create a new, unconnected provider.
    pub fn new() -> Self {
        Self {
            connection: OnceLock::new(),
            sync_lock: Mutex::new(()),
            span: info_span!("entity_provider", provider = FIXTURE_PROVIDER_NAME),
        }
    }

    /// Whether `connect` has completed.
    pub fn is_connected(&self) -> bool {
        self.connection.get().is_some()
    }

    /// Push the full fixture set.
    pub async fn full_sync(&self) -> Result<(), ProviderError> {
        async {
            info!("Running full import from fixture provider");
            self.push(Self::full_mutation()).await
        }
        .instrument(self.span.clone())
        .await
    }

    /// Push the updated dependency fixture.
    pub async fn delta_sync(&self) -> Result<(), ProviderError> {
        async {
            info!("Running delta import from fixture provider");
            self.push(Self::delta_mutation()).await
        }
        .instrument(self.span.clone())
        .await
    }

    /// The mutation pushed by `full_sync`.
    pub fn full_mutation() -> Mutation {
        let owner = Self::owner();
        let entities = vec![
            Self::component("component-a", &owner, &["component-b"]),
            Self::component("component-b", &owner, &[]),
            Self::component("component-c", &owner, &[]),
        ];

        Mutation::Full {
            entities: std::iter::once(owner)
                .chain(entities)
                .map(|e| DeferredEntity::new(e, FIXTURE_LOCATION))
                .collect(),
        }
    }

    /// The mutation pushed by `delta_sync`.
    pub fn delta_mutation() -> Mutation {
        let owner = Self::owner();
        let added = [
            Self::component("component-a", &owner, &["component-c"]),
            Self::component("component-b", &owner, &[]),
            Self::component("component-c", &owner, &[]),
        ]
        .into_iter()
        .map(|e| DeferredEntity::new(e, FIXTURE_LOCATION))
        .collect();

        Mutation::Delta {
            added,
            removed: Vec::new(),
        }
    }

    /// The group owning every fixture component.
    pub fn owner() -> Entity {
        Entity::new(API_VERSION, "Group", "group-1")
            .with_title("Group 1")
            .with_managed_location(&format!("url:{}", FIXTURE_LOCATION))
            .with_spec_field("type", "team")
            .with_spec_field("children", json!([]))
    }

    /// A raw component owned by `owner`.
    pub fn component(name: &str, owner: &Entity, depends_on: &[&str]) -> Entity {
        let depends_on: Vec<Value> = depends_on.iter().map(|d| json!(d)).collect();

        Entity::new(API_VERSION, "rawComponent", name)
            .with_managed_location(&format!("url:{}", FIXTURE_LOCATION))
            .with_spec_field("type", "service")
            .with_spec_field("lifecycle", "production")
            .with_spec_field("owner", owner.entity_ref().to_string())
            .with_spec_field("dependsOn", depends_on)
    }

    #[instrument(skip(self, mutation), fields(kind = mutation.kind(), count = mutation.len()))]
    async fn push(&self, mutation: Mutation) -> Result<(), ProviderError> {
        let connection = self
            .connection
            .get()
            .ok_or_else(|| ProviderError::NotInitialized(FIXTURE_PROVIDER_NAME.to_string()))?;

        let _guard = self.sync_lock.lock().await;
        connection.apply_mutation(mutation).await?;

        info!("Mutation applied");
        Ok(())
    }
}

impl Default for FixtureEntityProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EntityProvider for FixtureEntityProvider {
    fn provider_name(&self) -> &str {
        FIXTURE_PROVIDER_NAME
    }

    async fn connect(
        &self,
        connection: Arc<dyn EntityProviderConnection>,
    ) -> Result<(), ProviderError> {
        self.connection
            .set(connection)
            .map_err(|_| ProviderError::AlreadyConnected(FIXTURE_PROVIDER_NAME.to_string()))?;

        info!(provider = FIXTURE_PROVIDER_NAME, "Provider connected");
        Ok(())
    }
}
