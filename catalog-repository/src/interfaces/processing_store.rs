//! Processing store trait definition.

use async_trait::async_trait;

use crate::errors::CatalogError;
use crate::types::{PendingEntity, ProcessingResult};

/// The catalog side of the processing engine boundary.
#[async_trait]
pub trait ProcessingStore: Send + Sync {
    /// Remove and return up to `limit` queued entities, oldest first.
    async fn take_pending(&self, limit: usize) -> Vec<PendingEntity>;

    /// Store the outcome of one ingestion pass.
    ///
    /// Replaces any earlier result for the same origin.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The result was stored
    /// * `Ok(false)` - The origin was removed by its provider meanwhile; the
    ///   result was dropped
    /// * `Err(CatalogError)` - If the result can't be stored
    async fn commit_processed(&self, result: ProcessingResult) -> Result<bool, CatalogError>;
}
