//! Processor module for the catalog ingest.
//!
//! Processors claim entities by kind, rewrite them and emit whatever they
//! discover along the way. Emission is returned rather than called back,
//! so a processor is a plain function of its input.

mod builtin;
mod fixture;

use std::collections::HashMap;

use serde_json::Value;

use crate::errors::ProcessorError;
use catalog_shared::{Entity, EntityRelation, LocationSpec};

pub use builtin::{BuiltinKindsProcessor, BUILTIN_KINDS};
pub use fixture::{FixtureEntityProcessor, FIXTURE_PROCESSOR_NAME, RAW_COMPONENT_KIND};

/// Something a processor discovered while transforming an entity.
#[derive(Debug, Clone, PartialEq)]
pub enum EmittedItem {
    /// A further entity, processed in the same ingestion pass.
    Entity { entity: Entity, location: LocationSpec },
    /// A relation between two entities.
    Relation(EntityRelation),
}

/// The outcome of [`EntityProcessor::post_process_entity`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedEntity {
    /// The entity handed on to the next processor in the pass.
    pub entity: Entity,
    /// Emitted items, in emission order.
    pub emitted: Vec<EmittedItem>,
}

impl ProcessedEntity {
    /// Pass an entity through with nothing emitted.
    pub fn unchanged(entity: Entity) -> Self {
        Self {
            entity,
            emitted: Vec::new(),
        }
    }

    pub fn emit_entity(&mut self, entity: Entity, location: LocationSpec) {
        self.emitted.push(EmittedItem::Entity { entity, location });
    }

    pub fn emit_relation(&mut self, relation: EntityRelation) {
        self.emitted.push(EmittedItem::Relation(relation));
    }

    /// Emitted entities, in order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.emitted.iter().filter_map(|item| match item {
            EmittedItem::Entity { entity, .. } => Some(entity),
            EmittedItem::Relation(_) => None,
        })
    }

    /// Emitted relations, in order.
    pub fn relations(&self) -> impl Iterator<Item = &EntityRelation> {
        self.emitted.iter().filter_map(|item| match item {
            EmittedItem::Relation(relation) => Some(relation),
            EmittedItem::Entity { .. } => None,
        })
    }
}

/// Scratch space scoped to one `post_process_entity` call.
///
/// Nothing written here outlives the call, so a processor must produce the
/// same output whether or not it finds a value.
#[derive(Debug, Default)]
pub struct ProcessorCache {
    values: HashMap<String, Value>,
}

impl ProcessorCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }
}

/// An ingestion-time transform for entities of matching kinds.
///
/// Implementations must be stateless: the engine may call them for
/// different entities at the same time.
pub trait EntityProcessor: Send + Sync {
    /// Stable identifier, used in logs.
    fn processor_name(&self) -> &str;

    /// Whether this processor claims the entity.
    fn validate_entity_kind(&self, entity: &Entity) -> bool;

    /// Transform a claimed entity.
    ///
    /// # Returns
    ///
    /// * `Ok(ProcessedEntity)` - The entity to hand on, plus emitted items
    /// * `Err(ProcessorError)` - Aborts processing of this entity only
    fn post_process_entity(
        &self,
        entity: &Entity,
        location: &LocationSpec,
        cache: &mut ProcessorCache,
    ) -> Result<ProcessedEntity, ProcessorError>;
}
