//! Entity types.
//!
//! An entity is an immutable snapshot: pipeline stages build new values
//! from their input rather than editing in place.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::entity_ref::EntityRef;

/// Namespace used when an entity or reference doesn't name one.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Well-known annotation keys.
pub mod annotations {
    /// The location that manages this entity.
    pub const MANAGED_BY_LOCATION: &str = "backstage.io/managed-by-location";
    /// The location this entity was originally discovered through.
    pub const MANAGED_BY_ORIGIN_LOCATION: &str = "backstage.io/managed-by-origin-location";
}

/// Metadata common to every entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityMetadata {
    /// The entity's name, unique within its kind and namespace.
    pub name: String,
    /// Optional namespace. `None` means [`DEFAULT_NAMESPACE`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Optional display title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// String annotations, ordered by key.
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
}

impl EntityMetadata {
    /// Create metadata with just a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            title: None,
            annotations: BTreeMap::new(),
        }
    }
}

/// A catalog entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub api_version: String,
    pub kind: String,
    pub metadata: EntityMetadata,
    #[serde(default)]
    pub spec: Map<String, Value>,
}

impl Entity {
    /// Create an entity with empty spec and annotations.
    pub fn new(
        api_version: impl Into<String>,
        kind: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            api_version: api_version.into(),
            kind: kind.into(),
            metadata: EntityMetadata::new(name),
            spec: Map::new(),
        }
    }

    /// Set the display title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.metadata.title = Some(title.into());
        self
    }

    /// Set the namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.metadata.namespace = Some(namespace.into());
        self
    }

    /// Add an annotation.
    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.annotations.insert(key.into(), value.into());
        self
    }

    /// Set both provenance annotations to the same location.
    pub fn with_managed_location(self, location: &str) -> Self {
        self.with_annotation(annotations::MANAGED_BY_LOCATION, location)
            .with_annotation(annotations::MANAGED_BY_ORIGIN_LOCATION, location)
    }

    /// Set a spec field.
    pub fn with_spec_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.spec.insert(key.into(), value.into());
        self
    }

    /// The effective namespace.
    pub fn namespace(&self) -> &str {
        self.metadata
            .namespace
            .as_deref()
            .unwrap_or(DEFAULT_NAMESPACE)
    }

    /// The identity of this entity.
    pub fn entity_ref(&self) -> EntityRef {
        EntityRef::new(&self.kind, self.namespace(), &self.metadata.name)
    }

    /// Read a string spec field.
    pub fn spec_str(&self, key: &str) -> Option<&str> {
        self.spec.get(key).and_then(Value::as_str)
    }

    /// Read a spec field as a list of strings.
    ///
    /// A missing field is an empty list. Non-string items are skipped.
    pub fn spec_string_list(&self, key: &str) -> Vec<String> {
        match self.spec.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Check both provenance annotations are present.
    pub fn has_provenance(&self) -> bool {
        let a = &self.metadata.annotations;
        a.contains_key(annotations::MANAGED_BY_LOCATION)
            && a.contains_key(annotations::MANAGED_BY_ORIGIN_LOCATION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_namespace_defaults() {
        let entity = Entity::new("backstage.io/v1alpha1", "Component", "a");
        assert_eq!(entity.namespace(), "default");

        let entity = entity.with_namespace("ops");
        assert_eq!(entity.namespace(), "ops");
    }

    #[test]
    fn test_serializes_camel_case() {
        let entity = Entity::new("backstage.io/v1alpha1", "Group", "group-1")
            .with_title("Group 1")
            .with_managed_location("url:http://fake.com")
            .with_spec_field("type", "team");

        let value = serde_json::to_value(&entity).unwrap();
        assert_eq!(
            value,
            json!({
                "apiVersion": "backstage.io/v1alpha1",
                "kind": "Group",
                "metadata": {
                    "name": "group-1",
                    "title": "Group 1",
                    "annotations": {
                        "backstage.io/managed-by-location": "url:http://fake.com",
                        "backstage.io/managed-by-origin-location": "url:http://fake.com"
                    }
                },
                "spec": { "type": "team" }
            })
        );
    }

    #[test]
    fn test_spec_string_list() {
        let entity = Entity::new("v1", "rawComponent", "a")
            .with_spec_field("dependsOn", json!(["b", 3, "c"]));

        assert_eq!(entity.spec_string_list("dependsOn"), vec!["b", "c"]);
        assert!(entity.spec_string_list("missing").is_empty());
    }

    #[test]
    fn test_has_provenance() {
        let entity = Entity::new("v1", "Component", "a");
        assert!(!entity.has_provenance());
        assert!(entity.with_managed_location("url:x").has_provenance());
    }
}
