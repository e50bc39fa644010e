//! Processor for the standard entity kinds.
//!
//! Claims the well-known kinds and derives ownership and group hierarchy
//! relations from their spec.

use crate::errors::ProcessorError;
use crate::processor::{EntityProcessor, ProcessedEntity, ProcessorCache};
use catalog_shared::{relation_types, Entity, EntityRef, EntityRelation, LocationSpec};

/// Kinds claimed by [`BuiltinKindsProcessor`].
pub const BUILTIN_KINDS: &[&str] = &[
    "Component",
    "API",
    "System",
    "Domain",
    "Resource",
    "Group",
    "User",
    "Location",
];

const PROCESSOR_NAME: &str = "builtin-kinds";

/// Processor for the standard kinds.
///
/// `spec.owner` yields an `ownedBy`/`ownerOf` pair. On groups,
/// `spec.parent` and `spec.children` yield `childOf`/`parentOf` pairs.
/// Refs without a kind are taken to be groups.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinKindsProcessor;

impl BuiltinKindsProcessor {
    pub fn new() -> Self {
        Self
    }

    fn group_ref(entity: &Entity, raw: &str) -> Result<EntityRef, ProcessorError> {
        EntityRef::parse(raw, Some("Group"))
            .map_err(|e| ProcessorError::invalid_entity(entity.entity_ref(), e.to_string()))
    }
}

impl EntityProcessor for BuiltinKindsProcessor {
    fn processor_name(&self) -> &str {
        PROCESSOR_NAME
    }

    fn validate_entity_kind(&self, entity: &Entity) -> bool {
        BUILTIN_KINDS.contains(&entity.kind.as_str())
    }

    fn post_process_entity(
        &self,
        entity: &Entity,
        _location: &LocationSpec,
        _cache: &mut ProcessorCache,
    ) -> Result<ProcessedEntity, ProcessorError> {
        let this = entity.entity_ref();
        let mut processed = ProcessedEntity::unchanged(entity.clone());

        if let Some(owner) = entity.spec_str("owner") {
            let owner = Self::group_ref(entity, owner)?;
            for relation in EntityRelation::pair(
                relation_types::OWNED_BY,
                relation_types::OWNER_OF,
                this.clone(),
                owner,
            ) {
                processed.emit_relation(relation);
            }
        }

        if entity.kind == "Group" {
            if let Some(parent) = entity.spec_str("parent") {
                let parent = Self::group_ref(entity, parent)?;
                for relation in EntityRelation::pair(
                    relation_types::CHILD_OF,
                    relation_types::PARENT_OF,
                    this.clone(),
                    parent,
                ) {
                    processed.emit_relation(relation);
                }
            }

            for child in entity.spec_string_list("children") {
                let child = Self::group_ref(entity, &child)?;
                for relation in EntityRelation::pair(
                    relation_types::PARENT_OF,
                    relation_types::CHILD_OF,
                    this.clone(),
                    child,
                ) {
                    processed.emit_relation(relation);
                }
            }
        }

        Ok(processed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(entity: &Entity) -> Result<ProcessedEntity, ProcessorError> {
        BuiltinKindsProcessor::new().post_process_entity(
            entity,
            &LocationSpec::url("http://fake.com"),
            &mut ProcessorCache::new(),
        )
    }

    #[test]
    fn test_claims_only_builtin_kinds() {
        let processor = BuiltinKindsProcessor::new();
        assert!(processor.validate_entity_kind(&Entity::new("v1", "Component", "a")));
        assert!(processor.validate_entity_kind(&Entity::new("v1", "Group", "g")));
        assert!(!processor.validate_entity_kind(&Entity::new("v1", "rawComponent", "a")));
        assert!(!processor.validate_entity_kind(&Entity::new("v1", "component", "a")));
    }

    #[test]
    fn test_owner_yields_ownership_pair() {
        let entity =
            Entity::new("v1", "Component", "a").with_spec_field("owner", "group:default/group-1");

        let processed = run(&entity).unwrap();
        let relations: Vec<&EntityRelation> = processed.relations().collect();

        let a = EntityRef::in_default("Component", "a");
        let owner = EntityRef::in_default("group", "group-1");
        assert_eq!(
            relations,
            vec![
                &EntityRelation::new("ownedBy", a.clone(), owner.clone()),
                &EntityRelation::new("ownerOf", owner, a),
            ]
        );
    }

    #[test]
    fn test_owner_without_kind_defaults_to_group() {
        let entity = Entity::new("v1", "Component", "a").with_spec_field("owner", "team-x");
        let processed = run(&entity).unwrap();
        let target = &processed.relations().next().unwrap().target;
        assert_eq!(target, &EntityRef::in_default("Group", "team-x"));
    }

    #[test]
    fn test_group_hierarchy() {
        let entity = Entity::new("v1", "Group", "parent")
            .with_spec_field("parent", "root")
            .with_spec_field("children", json!(["child-1", "child-2"]));

        let processed = run(&entity).unwrap();
        let types: Vec<&str> = processed
            .relations()
            .map(|r| r.relation_type.as_str())
            .collect();
        assert_eq!(
            types,
            vec!["childOf", "parentOf", "parentOf", "childOf", "parentOf", "childOf"]
        );
    }

    #[test]
    fn test_malformed_owner_is_rejected() {
        let entity = Entity::new("v1", "Component", "a").with_spec_field("owner", "group:/x");
        assert!(matches!(
            run(&entity),
            Err(ProcessorError::InvalidEntity { .. })
        ));
    }

    #[test]
    fn test_fixture_group_has_no_relations() {
        let entity = Entity::new("v1", "Group", "group-1")
            .with_spec_field("type", "team")
            .with_spec_field("children", json!([]));
        assert_eq!(run(&entity).unwrap().emitted.len(), 0);
    }
}
