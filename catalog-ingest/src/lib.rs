//! # Catalog Ingest
//!
//! This crate provides the ingestion side of the catalog: providers that
//! push entity batches, processors that rewrite entities and derive
//! relations, and the engine that runs queued entities through them.
//!
//! ## Architecture
//!
//! The ingest follows a Provider-Channel-Processor pattern:
//!
//! 1. **Provider**: Builds entity batches and pushes them as mutations
//! 2. **Channel**: The catalog queues every mutated entity
//! 3. **Processor**: Claims entities by kind, transforms them, emits
//!    relations and further entities
//! 4. **Engine**: Drains the queue through the processors and commits the
//!    results

pub mod engine;
pub mod errors;
pub mod processor;
pub mod provider;

pub use engine::{EngineConfig, ProcessingEngine, ProcessingReport};
pub use errors::{IngestError, ProcessorError, ProviderError};
pub use processor::{
    BuiltinKindsProcessor, EmittedItem, EntityProcessor, FixtureEntityProcessor, ProcessedEntity,
    ProcessorCache,
};
pub use provider::{EntityProvider, FixtureEntityProvider};
