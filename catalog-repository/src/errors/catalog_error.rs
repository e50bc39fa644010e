//! Catalog error types.

use thiserror::Error;

/// Errors that can occur while applying mutations or storing results.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Mutation carries more entities than the configured maximum.
    #[error("Mutation size {provided} exceeds maximum {max}")]
    MutationTooLarge { provided: usize, max: usize },

    /// An entity in the mutation can't be stored.
    #[error("Invalid entity: {0}")]
    InvalidEntity(String),

    /// The catalog can't accept the change right now.
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),

    /// A processing result can't be stored.
    #[error("Failed to store processing result for '{origin}': {reason}")]
    Processing { origin: String, reason: String },
}

impl CatalogError {
    /// Create a mutation too large error.
    pub fn mutation_too_large(provided: usize, max: usize) -> Self {
        Self::MutationTooLarge { provided, max }
    }

    /// Create an invalid entity error.
    pub fn invalid_entity(msg: impl Into<String>) -> Self {
        Self::InvalidEntity(msg.into())
    }

    /// Create an unavailable error.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create a processing error.
    pub fn processing(origin: impl ToString, reason: impl Into<String>) -> Self {
        Self::Processing {
            origin: origin.to_string(),
            reason: reason.into(),
        }
    }
}
