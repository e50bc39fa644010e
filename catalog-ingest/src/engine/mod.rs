//! Processing engine for the catalog ingest.
//!
//! Drains queued entities from the catalog, runs them through the
//! registered processors and commits what each ingestion pass produced.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tracing::{debug, error, info, instrument, warn};

use crate::errors::{IngestError, ProcessorError};
use crate::processor::{EmittedItem, EntityProcessor, ProcessorCache};
use catalog_repository::{PendingEntity, ProcessingResult, ProcessingStore};
use catalog_shared::{Entity, LocationSpec};

/// Configuration for the processing engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum number of queued entities taken per `process_pending` call.
    pub batch_size: usize,
    /// Maximum number of entities a single ingestion pass may emit.
    pub max_emitted_per_entity: usize,
    /// Time between `process_pending` calls in `run`.
    pub interval: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            batch_size: 500,
            max_emitted_per_entity: 100,
            interval: Duration::from_millis(1000),
        }
    }
}

/// Counts from one `process_pending` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessingReport {
    /// Origins whose results were committed.
    pub processed: usize,
    /// Origins rejected by the processors.
    pub failed: usize,
    /// Origins removed by their provider before the commit.
    pub dropped: usize,
    /// Origins whose results the store refused.
    pub commit_failed: usize,
}

impl ProcessingReport {
    pub fn total(&self) -> usize {
        self.processed + self.failed + self.dropped + self.commit_failed
    }
}

/// Engine that coordinates the catalog queue and the processors.
pub struct ProcessingEngine {
    store: Arc<dyn ProcessingStore>,
    processors: Vec<Arc<dyn EntityProcessor>>,
    config: EngineConfig,
    shutdown_tx: broadcast::Sender<()>,
}

impl ProcessingEngine {
    /// Create a new engine with no processors.
    pub fn new(store: Arc<dyn ProcessingStore>) -> Self {
        Self::with_config(store, EngineConfig::default())
    }

    /// Create a new engine with custom configuration.
    pub fn with_config(store: Arc<dyn ProcessingStore>, config: EngineConfig) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            store,
            processors: Vec::new(),
            config,
            shutdown_tx,
        }
    }

    /// Register a processor. Processors run in registration order.
    pub fn add_processor(&mut self, processor: Arc<dyn EntityProcessor>) {
        info!(processor = processor.processor_name(), "Registered processor");
        self.processors.push(processor);
    }

    /// Names of the registered processors, in order.
    pub fn processor_names(&self) -> Vec<&str> {
        self.processors.iter().map(|p| p.processor_name()).collect()
    }

    /// Process one batch of queued entities.
    ///
    /// A failure on one entity, in a processor or in the commit, is logged
    /// and counted; the rest of the batch still runs.
    #[instrument(skip(self))]
    pub async fn process_pending(&self) -> Result<ProcessingReport, IngestError> {
        let pending = self.store.take_pending(self.config.batch_size).await;
        let mut report = ProcessingReport::default();

        if pending.is_empty() {
            return Ok(report);
        }

        debug!(count = pending.len(), "Processing queued entities");

        for item in pending {
            let origin = item.origin();
            match self.process_entity(&item) {
                Ok(result) => match self.store.commit_processed(result).await {
                    Ok(true) => report.processed += 1,
                    Ok(false) => report.dropped += 1,
                    Err(e) => {
                        warn!(
                            provider = %item.provider_name,
                            entity_ref = %origin,
                            error = %e,
                            "Failed to commit processed entity"
                        );
                        report.commit_failed += 1;
                    }
                },
                Err(e) => {
                    warn!(
                        provider = %item.provider_name,
                        entity_ref = %origin,
                        error = %e,
                        "Failed to process entity"
                    );
                    report.failed += 1;
                }
            }
        }

        info!(
            processed = report.processed,
            failed = report.failed,
            dropped = report.dropped,
            commit_failed = report.commit_failed,
            "Processed entity batch"
        );
        Ok(report)
    }

    /// Run one ingestion pass for a queued entity.
    ///
    /// Emitted entities join the same pass, breadth first. Every entity in
    /// the pass must be claimed by at least one processor.
    pub fn process_entity(&self, pending: &PendingEntity) -> Result<ProcessingResult, ProcessorError> {
        let origin = pending.origin();
        let mut queue: VecDeque<(Entity, LocationSpec)> =
            VecDeque::from([(pending.deferred.entity.clone(), pending.deferred.location())]);
        let mut entities = Vec::new();
        let mut relations = Vec::new();
        let mut emitted_entities = 0;

        while let Some((entity, location)) = queue.pop_front() {
            let claiming: Vec<&Arc<dyn EntityProcessor>> = self
                .processors
                .iter()
                .filter(|p| p.validate_entity_kind(&entity))
                .collect();

            if claiming.is_empty() {
                return Err(ProcessorError::UnclaimedKind {
                    entity_ref: entity.entity_ref().to_string(),
                    kind: entity.kind.clone(),
                });
            }

            let mut current = entity;
            for processor in claiming {
                let mut cache = ProcessorCache::new();
                let processed = processor.post_process_entity(&current, &location, &mut cache)?;
                current = processed.entity;

                for item in processed.emitted {
                    match item {
                        EmittedItem::Entity { entity, location } => {
                            emitted_entities += 1;
                            if emitted_entities > self.config.max_emitted_per_entity {
                                return Err(ProcessorError::EmissionLimit {
                                    origin: origin.to_string(),
                                    limit: self.config.max_emitted_per_entity,
                                });
                            }
                            queue.push_back((entity, location));
                        }
                        EmittedItem::Relation(relation) => relations.push(relation),
                    }
                }
            }

            entities.push(current);
        }

        Ok(ProcessingResult {
            provider_name: pending.provider_name.clone(),
            origin,
            entities,
            relations,
        })
    }

    /// Run the engine.
    ///
    /// Processes the queue on every tick until `shutdown` is called or a
    /// ctrl-c is received.
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<(), IngestError> {
        info!(
            interval_ms = self.config.interval.as_millis() as u64,
            processors = ?self.processor_names(),
            "Starting processing engine"
        );

        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let mut ticker = tokio::time::interval(self.config.interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.process_pending().await {
                        error!(error = %e, "Failed to process pending entities");
                    }
                }
                _ = shutdown_rx.recv() => {
                    info!("Received shutdown request");
                    break;
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    break;
                }
            }
        }

        info!("Processing engine shutdown complete");
        Ok(())
    }

    /// Trigger a graceful shutdown.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }
}
