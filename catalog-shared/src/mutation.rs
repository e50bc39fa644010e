//! Mutation types pushed from providers to the catalog.

use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::location::LocationSpec;

/// An entity together with the location it was read from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeferredEntity {
    pub entity: Entity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_key: Option<String>,
}

impl DeferredEntity {
    pub fn new(entity: Entity, location_key: impl Into<String>) -> Self {
        Self {
            entity,
            location_key: Some(location_key.into()),
        }
    }

    /// The location handed to processors.
    ///
    /// Falls back to the managed-by-location annotation, then to an empty
    /// URL location.
    pub fn location(&self) -> LocationSpec {
        if let Some(key) = &self.location_key {
            return LocationSpec::from_key(key);
        }
        self.entity
            .metadata
            .annotations
            .get(crate::entity::annotations::MANAGED_BY_LOCATION)
            .map(|key| LocationSpec::from_key(key))
            .unwrap_or_else(|| LocationSpec::url(""))
    }
}

/// A batch of changes from a single provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Mutation {
    /// Replaces every entity previously supplied by the provider.
    Full { entities: Vec<DeferredEntity> },
    /// Adds or replaces `added` and drops `removed`; anything else is
    /// left as it is.
    Delta {
        added: Vec<DeferredEntity>,
        removed: Vec<DeferredEntity>,
    },
}

impl Mutation {
    /// Number of entities carried by the mutation.
    pub fn len(&self) -> usize {
        match self {
            Mutation::Full { entities } => entities.len(),
            Mutation::Delta { added, removed } => added.len() + removed.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `"full"` or `"delta"`, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Mutation::Full { .. } => "full",
            Mutation::Delta { .. } => "delta",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_format() {
        let mutation = Mutation::Delta {
            added: vec![DeferredEntity::new(
                Entity::new("v1", "Component", "a"),
                "http://fake.com",
            )],
            removed: vec![],
        };

        let value = serde_json::to_value(&mutation).unwrap();
        assert_eq!(value["type"], "delta");
        assert_eq!(value["added"][0]["locationKey"], "http://fake.com");
        assert_eq!(value["removed"], json!([]));
        assert_eq!(mutation.len(), 1);
        assert_eq!(mutation.kind(), "delta");
    }

    #[test]
    fn test_location_falls_back_to_annotation() {
        let entity = Entity::new("v1", "Component", "a").with_managed_location("url:http://x");
        let deferred = DeferredEntity {
            entity,
            location_key: None,
        };
        assert_eq!(deferred.location(), LocationSpec::url("http://x"));
    }
}
