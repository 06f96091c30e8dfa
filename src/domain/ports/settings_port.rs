//! Destination settings store port definition.

use async_trait::async_trait;

use crate::domain::entities::{DestinationId, DestinationSettings};
use crate::domain::errors::StoreError;

/// Port for per-destination settings persistence. Last write wins.
#[async_trait]
pub trait SettingsPort: Send + Sync {
    /// Returns the settings of a destination, storing the defaults on first read.
    async fn get(&self, destination: DestinationId) -> Result<DestinationSettings, StoreError>;

    /// Replaces the settings of a destination.
    async fn put(
        &self,
        destination: DestinationId,
        settings: DestinationSettings,
    ) -> Result<(), StoreError>;
}
