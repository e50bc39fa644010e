//! Types stored and exchanged by the catalog.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use catalog_shared::{DeferredEntity, Entity, EntityRef, EntityRelation};

/// An entity queued for processing.
#[derive(Debug, Clone)]
pub struct PendingEntity {
    /// The provider that supplied the entity.
    pub provider_name: String,
    pub deferred: DeferredEntity,
}

impl PendingEntity {
    pub fn origin(&self) -> EntityRef {
        self.deferred.entity.entity_ref()
    }
}

/// What one ingestion pass produced for an origin entity.
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    pub provider_name: String,
    pub origin: EntityRef,
    /// Final entities, in the order they were produced.
    pub entities: Vec<Entity>,
    pub relations: Vec<EntityRelation>,
}

/// A processed entity as kept by the catalog.
#[derive(Debug, Clone, Serialize)]
pub struct StoredEntity {
    /// Stable across re-processing of the same ref.
    pub uid: Uuid,
    pub entity: Entity,
    pub origin: EntityRef,
    pub processed_at: DateTime<Utc>,
}
