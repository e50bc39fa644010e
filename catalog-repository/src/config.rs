//! Configuration types for the catalog.

/// Default upper bound on entities carried by a single mutation.
pub const DEFAULT_MAX_MUTATION_SIZE: usize = 10_000;

/// Configuration for the in-memory catalog.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Maximum number of entities allowed in a single mutation.
    /// Set to None to disable the limit.
    pub max_mutation_size: Option<usize>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            max_mutation_size: Some(DEFAULT_MAX_MUTATION_SIZE),
        }
    }
}

impl CatalogConfig {
    /// Create a config with no mutation size limit.
    pub fn unlimited() -> Self {
        Self {
            max_mutation_size: None,
        }
    }

    /// Create a config with a custom mutation size limit.
    pub fn with_max_mutation_size(max_mutation_size: usize) -> Self {
        Self {
            max_mutation_size: Some(max_mutation_size),
        }
    }
}
