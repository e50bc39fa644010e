//! Dependency initialization and wiring for the catalog module.

use std::sync::Arc;

use axum::{extract::State, response::Json, routing::get, Router};
use serde_json::{json, Value};
use tracing::info;

use crate::config::ModuleConfig;
use crate::ModuleError;
use catalog_ingest::engine::{EngineConfig, ProcessingEngine};
use catalog_ingest::processor::{BuiltinKindsProcessor, FixtureEntityProcessor};
use catalog_ingest::provider::{EntityProvider, FixtureEntityProvider};
use catalog_repository::{CatalogConfig, InMemoryCatalog};

/// Container for all initialized dependencies.
pub struct Dependencies {
    pub catalog: Arc<InMemoryCatalog>,
    pub provider: Arc<FixtureEntityProvider>,
    pub engine: Arc<ProcessingEngine>,
    /// Every route, already mounted under the plugin namespace.
    pub router: Router,
}

impl Dependencies {
    /// Build the catalog, register the provider and processors, and mount
    /// the routes.
    ///
    /// The provider is connected before its routes exist, so no request
    /// can reach an uninitialized provider through this router.
    pub async fn new(config: &ModuleConfig) -> Result<Self, ModuleError> {
        info!(
            http_addr = %config.http_addr,
            plugin_id = %config.plugin_id,
            "Initializing dependencies"
        );

        let catalog = Arc::new(InMemoryCatalog::with_config(
            CatalogConfig::with_max_mutation_size(config.max_mutation_size),
        ));

        // Initialize provider
        let provider = Arc::new(FixtureEntityProvider::new());
        provider
            .connect(Arc::new(catalog.connection(provider.provider_name())))
            .await?;

        // Initialize engine with processors
        let mut engine = ProcessingEngine::with_config(
            catalog.clone(),
            EngineConfig {
                interval: config.processing_interval,
                ..EngineConfig::default()
            },
        );
        engine.add_processor(Arc::new(FixtureEntityProcessor::new()));
        engine.add_processor(Arc::new(BuiltinKindsProcessor::new()));

        let router = Self::build_router(config, &catalog, &provider);

        info!(prefix = %config.route_prefix(), "Module routes mounted");

        Ok(Self {
            catalog,
            provider,
            engine: Arc::new(engine),
            router,
        })
    }

    fn build_router(
        config: &ModuleConfig,
        catalog: &Arc<InMemoryCatalog>,
        provider: &Arc<FixtureEntityProvider>,
    ) -> Router {
        let plugin_routes = Router::new()
            .route("/health", get(health_handler))
            .with_state(catalog.clone())
            .merge(provider.router());

        Router::new().nest(&config.route_prefix(), plugin_routes)
    }
}

async fn health_handler(State(catalog): State<Arc<InMemoryCatalog>>) -> Json<Value> {
    let pending = catalog.pending_count().await;
    Json(json!({
        "status": "ok",
        "pendingEntities": pending,
    }))
}
