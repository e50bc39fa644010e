//! Relation types.

use serde::{Deserialize, Serialize};

use crate::entity_ref::EntityRef;

/// Relation type names.
pub mod relation_types {
    pub const OWNED_BY: &str = "ownedBy";
    pub const OWNER_OF: &str = "ownerOf";
    pub const CHILD_OF: &str = "childOf";
    pub const PARENT_OF: &str = "parentOf";
    pub const TEST_DEPENDS_ON: &str = "testDependsOn";
    pub const TEST_DEPENDENCY_OF: &str = "testDependencyOf";
}

/// A typed, directed edge between two entities.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityRelation {
    #[serde(rename = "type")]
    pub relation_type: String,
    pub source: EntityRef,
    pub target: EntityRef,
}

impl EntityRelation {
    pub fn new(relation_type: impl Into<String>, source: EntityRef, target: EntityRef) -> Self {
        Self {
            relation_type: relation_type.into(),
            source,
            target,
        }
    }

    /// Build a relation and its inverse.
    ///
    /// The first element runs `source -> target` with `forward`, the second
    /// `target -> source` with `inverse`.
    pub fn pair(
        forward: &str,
        inverse: &str,
        source: EntityRef,
        target: EntityRef,
    ) -> [EntityRelation; 2] {
        [
            EntityRelation::new(forward, source.clone(), target.clone()),
            EntityRelation::new(inverse, target, source),
        ]
    }

    /// Whether either end is the given entity.
    pub fn touches(&self, entity: &EntityRef) -> bool {
        self.source.same_entity(entity) || self.target.same_entity(entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_is_inverse() {
        let a = EntityRef::in_default("Component", "a");
        let b = EntityRef::in_default("Component", "b");

        let [fwd, inv] = EntityRelation::pair(
            relation_types::TEST_DEPENDS_ON,
            relation_types::TEST_DEPENDENCY_OF,
            a.clone(),
            b.clone(),
        );

        assert_eq!(fwd.relation_type, "testDependsOn");
        assert_eq!((&fwd.source, &fwd.target), (&a, &b));
        assert_eq!(inv.relation_type, "testDependencyOf");
        assert_eq!((&inv.source, &inv.target), (&b, &a));
    }

    #[test]
    fn test_serializes_type_field() {
        let rel = EntityRelation::new(
            relation_types::OWNED_BY,
            EntityRef::in_default("Component", "a"),
            EntityRef::in_default("Group", "g"),
        );
        let value = serde_json::to_value(&rel).unwrap();
        assert_eq!(value["type"], "ownedBy");
        assert_eq!(value["target"]["kind"], "Group");
    }
}
