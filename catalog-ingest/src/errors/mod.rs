//! Error types for the catalog ingest.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use catalog_repository::CatalogError;
use serde_json::json;
use thiserror::Error;

/// Errors raised by entity providers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// A sync was attempted before `connect`.
    #[error("Provider '{0}' is not initialized")]
    NotInitialized(String),

    /// `connect` was called a second time.
    #[error("Provider '{0}' is already connected")]
    AlreadyConnected(String),

    /// The catalog rejected the mutation.
    #[error("Mutation rejected: {0}")]
    Mutation(#[from] CatalogError),
}

/// Errors raised while processing a single entity.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProcessorError {
    /// The entity can't be processed as it is.
    #[error("Invalid entity {entity_ref}: {reason}")]
    InvalidEntity { entity_ref: String, reason: String },

    /// No registered processor claims the entity's kind.
    #[error("No processor claims kind '{kind}' of {entity_ref}")]
    UnclaimedKind { entity_ref: String, kind: String },

    /// An ingestion pass emitted more entities than allowed.
    #[error("Processing {origin} emitted more than {limit} entities")]
    EmissionLimit { origin: String, limit: usize },
}

impl ProcessorError {
    /// Create an invalid entity error.
    pub fn invalid_entity(entity_ref: impl ToString, reason: impl Into<String>) -> Self {
        Self::InvalidEntity {
            entity_ref: entity_ref.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors that can occur in the catalog ingest.
#[derive(Error, Debug)]
pub enum IngestError {
    /// Error from a provider.
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from a processor.
    #[error("Processor error: {0}")]
    Processor(#[from] ProcessorError),

    /// Error from the catalog.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

impl IntoResponse for IngestError {
    fn into_response(self) -> Response {
        let status = match &self {
            IngestError::Provider(ProviderError::Mutation(CatalogError::Unavailable(_)))
            | IngestError::Catalog(CatalogError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
