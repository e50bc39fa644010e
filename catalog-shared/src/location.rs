//! Location types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where an entity was read from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationSpec {
    /// Location type, e.g. `url` or `file`.
    #[serde(rename = "type")]
    pub location_type: String,
    /// Type-specific target, e.g. a URL.
    pub target: String,
}

impl LocationSpec {
    pub fn new(location_type: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            location_type: location_type.into(),
            target: target.into(),
        }
    }

    /// A `url` location.
    pub fn url(target: impl Into<String>) -> Self {
        Self::new("url", target)
    }

    /// Parse a `type:target` string, treating a bare string as a URL.
    ///
    /// `http://` and `https://` prefixes are bare URLs, not a `http` type.
    pub fn from_key(key: &str) -> Self {
        if key.starts_with("http://") || key.starts_with("https://") {
            return Self::url(key);
        }
        match key.split_once(':') {
            Some((location_type, target)) if !location_type.is_empty() => {
                Self::new(location_type, target)
            }
            _ => Self::url(key),
        }
    }
}

/// Prints the annotation form, `type:target`.
impl fmt::Display for LocationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.location_type, self.target)
    }
}
