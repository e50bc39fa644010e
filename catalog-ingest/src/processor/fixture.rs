//! Fixture entity processor.
//!
//! Rewrites `rawComponent` entities into `Component` and turns their
//! `dependsOn` list into `testDependsOn`/`testDependencyOf` relation pairs.

use tracing::debug;

use crate::errors::ProcessorError;
use crate::processor::{EntityProcessor, ProcessedEntity, ProcessorCache};
use crate::provider::FIXTURE_LOCATION;
use catalog_shared::{relation_types, Entity, EntityRef, EntityRelation, LocationSpec};

/// Name the fixture processor registers under.
pub const FIXTURE_PROCESSOR_NAME: &str = "test-processor";

/// The only kind the fixture processor claims.
pub const RAW_COMPONENT_KIND: &str = "rawComponent";

const CANONICAL_KIND: &str = "Component";
const API_VERSION: &str = "backstage.io/v1alpha1";

/// Processor turning raw fixture components into canonical components.
///
/// The canonical entity carries no `dependsOn`, so the standard dependency
/// relations are never derived for it; only the custom pair is emitted.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureEntityProcessor;

impl FixtureEntityProcessor {
    pub fn new() -> Self {
        Self
    }

    fn canonical(entity: &Entity) -> Entity {
        let mut canonical = Entity::new(API_VERSION, CANONICAL_KIND, &entity.metadata.name)
            .with_managed_location(&format!("url:{}", FIXTURE_LOCATION))
            .with_spec_field("type", "service")
            .with_spec_field("lifecycle", "production");

        if let Some(owner) = entity.spec.get("owner") {
            canonical = canonical.with_spec_field("owner", owner.clone());
        }
        canonical
    }
}

impl EntityProcessor for FixtureEntityProcessor {
    fn processor_name(&self) -> &str {
        FIXTURE_PROCESSOR_NAME
    }

    fn validate_entity_kind(&self, entity: &Entity) -> bool {
        entity.kind == RAW_COMPONENT_KIND
    }

    fn post_process_entity(
        &self,
        entity: &Entity,
        location: &LocationSpec,
        _cache: &mut ProcessorCache,
    ) -> Result<ProcessedEntity, ProcessorError> {
        if !self.validate_entity_kind(entity) {
            return Ok(ProcessedEntity::unchanged(entity.clone()));
        }

        let mut processed = ProcessedEntity::unchanged(entity.clone());
        processed.emit_entity(Self::canonical(entity), location.clone());

        let this = EntityRef::in_default(CANONICAL_KIND, &entity.metadata.name);
        let depends_on = entity.spec_string_list("dependsOn");
        for dependency in &depends_on {
            let [forward, inverse] = EntityRelation::pair(
                relation_types::TEST_DEPENDS_ON,
                relation_types::TEST_DEPENDENCY_OF,
                this.clone(),
                EntityRef::in_default(CANONICAL_KIND, dependency),
            );
            processed.emit_relation(forward);
            processed.emit_relation(inverse);
        }

        debug!(
            entity = %entity.entity_ref(),
            dependencies = depends_on.len(),
            "Processed raw component"
        );
        Ok(processed)
    }
}
