//! Entity references.
//!
//! The string form is `<kind>:<namespace>/<name>`, with kind and namespace
//! lowercased. Two refs that print the same identify the same entity.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entity::DEFAULT_NAMESPACE;

/// Errors that can occur while parsing an entity reference.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EntityRefError {
    /// The reference string was empty.
    #[error("Entity reference is empty")]
    Empty,

    /// No kind in the string and no default supplied.
    #[error("Entity reference '{0}' has no kind")]
    MissingKind(String),

    /// One of the parts was empty.
    #[error("Entity reference '{0}' is malformed")]
    Malformed(String),
}

/// The identity of an entity.
///
/// Equality, ordering and hashing follow the printed form, so kind and
/// namespace compare case-insensitively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRef {
    pub kind: String,
    pub namespace: String,
    pub name: String,
}

impl EntityRef {
    /// Create a new reference.
    pub fn new(
        kind: impl Into<String>,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Create a reference in the default namespace.
    pub fn in_default(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(kind, DEFAULT_NAMESPACE, name)
    }

    /// Parse a reference string.
    ///
    /// Accepts `kind:namespace/name`, `kind:name`, `namespace/name` and
    /// `name`. The last two need `default_kind`.
    pub fn parse(input: &str, default_kind: Option<&str>) -> Result<Self, EntityRefError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(EntityRefError::Empty);
        }

        let (kind, rest) = match input.split_once(':') {
            Some((kind, rest)) => (kind, rest),
            None => match default_kind {
                Some(kind) => (kind, input),
                None => return Err(EntityRefError::MissingKind(input.to_string())),
            },
        };

        let (namespace, name) = match rest.split_once('/') {
            Some((namespace, name)) => (namespace, name),
            None => (DEFAULT_NAMESPACE, rest),
        };

        if kind.is_empty() || namespace.is_empty() || name.is_empty() {
            return Err(EntityRefError::Malformed(input.to_string()));
        }

        Ok(Self::new(kind, namespace, name))
    }

    /// Compare by printed form.
    pub fn same_entity(&self, other: &EntityRef) -> bool {
        self == other
    }

    fn identity(&self) -> (String, String, &str) {
        (
            self.kind.to_lowercase(),
            self.namespace.to_lowercase(),
            &self.name,
        )
    }
}

impl PartialEq for EntityRef {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for EntityRef {}

impl PartialOrd for EntityRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EntityRef {
    fn cmp(&self, other: &Self) -> Ordering {
        self.identity().cmp(&other.identity())
    }
}

impl Hash for EntityRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}/{}",
            self.kind.to_lowercase(),
            self.namespace.to_lowercase(),
            self.name
        )
    }
}
