//! HTTP routes that trigger fixture syncs.

use std::sync::Arc;

use axum::{extract::State, response::Json, routing::post, Router};
use serde::{Deserialize, Serialize};

use crate::errors::IngestError;
use crate::provider::FixtureEntityProvider;

/// Body returned by a successful sync.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn ok() -> Self {
        Self {
            message: "OK".to_string(),
        }
    }
}

async fn full_handler(
    State(provider): State<Arc<FixtureEntityProvider>>,
) -> Result<Json<MessageResponse>, IngestError> {
    provider.full_sync().await?;
    Ok(Json(MessageResponse::ok()))
}

async fn delta_handler(
    State(provider): State<Arc<FixtureEntityProvider>>,
) -> Result<Json<MessageResponse>, IngestError> {
    provider.delta_sync().await?;
    Ok(Json(MessageResponse::ok()))
}

impl FixtureEntityProvider {
    /// Build the router exposing `POST /full` and `POST /delta`.
    pub fn router(self: &Arc<Self>) -> Router {
        Router::new()
            .route("/full", post(full_handler))
            .route("/delta", post(delta_handler))
            .with_state(self.clone())
    }
}
