//! Typed access to per-destination settings.

use std::sync::Arc;

use tracing::info;

use crate::domain::entities::{DestinationId, DestinationSettings, SettingsPairing};
use crate::domain::errors::StoreError;
use crate::domain::ports::SettingsPort;

/// Reads and changes destination settings, applying the pairing policy.
#[derive(Clone)]
pub struct SettingsService {
    store: Arc<dyn SettingsPort>,
    pairing: SettingsPairing,
}

impl SettingsService {
    /// Creates new service.
    #[must_use]
    pub fn new(store: Arc<dyn SettingsPort>, pairing: SettingsPairing) -> Self {
        Self { store, pairing }
    }

    /// Returns the settings of a destination.
    ///
    /// # Errors
    /// Returns error if the store cannot be read.
    pub async fn get(&self, destination: DestinationId) -> Result<DestinationSettings, StoreError> {
        self.store.get(destination).await
    }

    /// Turns the summary card on or off.
    ///
    /// # Errors
    /// Returns error if the store cannot be read or written.
    pub async fn set_send_summary(
        &self,
        destination: DestinationId,
        enabled: bool,
    ) -> Result<DestinationSettings, StoreError> {
        let pairing = self.pairing;
        self.update(destination, |s| s.with_send_summary(enabled, pairing))
            .await
    }

    /// Turns the comment section on or off.
    ///
    /// # Errors
    /// Returns error if the store cannot be read or written.
    pub async fn set_include_comments(
        &self,
        destination: DestinationId,
        enabled: bool,
    ) -> Result<DestinationSettings, StoreError> {
        self.update(destination, |s| s.with_include_comments(enabled))
            .await
    }

    /// Turns preview suppression on or off.
    ///
    /// # Errors
    /// Returns error if the store cannot be read or written.
    pub async fn set_suppress_preview(
        &self,
        destination: DestinationId,
        enabled: bool,
    ) -> Result<DestinationSettings, StoreError> {
        let pairing = self.pairing;
        self.update(destination, |s| s.with_suppress_preview(enabled, pairing))
            .await
    }

    /// Turns preview suppression off without touching anything else.
    ///
    /// # Errors
    /// Returns error if the store cannot be read or written.
    pub async fn disable_preview_suppression(
        &self,
        destination: DestinationId,
    ) -> Result<DestinationSettings, StoreError> {
        info!(destination = %destination, "Disabling preview suppression, bot cannot manage messages");
        self.update(destination, DestinationSettings::without_preview_suppression)
            .await
    }

    async fn update(
        &self,
        destination: DestinationId,
        change: impl FnOnce(DestinationSettings) -> DestinationSettings + Send,
    ) -> Result<DestinationSettings, StoreError> {
        let settings = change(self.store.get(destination).await?);
        self.store.put(destination, settings).await?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::mocks::MemorySettingsStore;

    fn service(pairing: SettingsPairing) -> (SettingsService, Arc<MemorySettingsStore>) {
        let store = Arc::new(MemorySettingsStore::new());
        (SettingsService::new(store.clone(), pairing), store)
    }

    #[tokio::test]
    async fn test_first_read_persists_defaults() {
        let (service, store) = service(SettingsPairing::Complementary);
        let destination = DestinationId::from(crate::domain::entities::GuildId::from(7));

        assert!(store.peek(destination).is_none());
        let settings = service.get(destination).await.unwrap();
        assert_eq!(settings, DestinationSettings::default());
        assert_eq!(store.peek(destination), Some(DestinationSettings::default()));
    }

    #[tokio::test]
    async fn test_set_then_get_reflects_pairing() {
        let (service, _) = service(SettingsPairing::Complementary);
        let destination = DestinationId::from(crate::domain::entities::GuildId::from(7));

        service.set_send_summary(destination, false).await.unwrap();
        let settings = service.get(destination).await.unwrap();
        assert!(!settings.send_summary);
        assert!(settings.suppress_preview);

        service.set_suppress_preview(destination, false).await.unwrap();
        let settings = service.get(destination).await.unwrap();
        assert!(!settings.suppress_preview);
        assert!(settings.send_summary);

        service.set_include_comments(destination, true).await.unwrap();
        assert!(service.get(destination).await.unwrap().include_comments);
    }

    #[tokio::test]
    async fn test_independent_pairing_leaves_other_field() {
        let (service, _) = service(SettingsPairing::Independent);
        let destination = DestinationId::from(crate::domain::entities::GuildId::from(7));

        service.set_send_summary(destination, false).await.unwrap();
        service.set_suppress_preview(destination, false).await.unwrap();
        let settings = service.get(destination).await.unwrap();
        assert!(!settings.send_summary);
        assert!(!settings.suppress_preview);
    }

    #[tokio::test]
    async fn test_disable_preview_suppression_keeps_summary() {
        let (service, _) = service(SettingsPairing::Complementary);
        let destination = DestinationId::from(crate::domain::entities::GuildId::from(7));

        let settings = service
            .disable_preview_suppression(destination)
            .await
            .unwrap();
        assert!(settings.send_summary);
        assert!(!settings.suppress_preview);
    }
}
