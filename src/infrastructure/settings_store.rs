//! TOML file backed settings store.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::config::storage::write_atomically;
use crate::domain::entities::{DestinationId, DestinationSettings};
use crate::domain::errors::StoreError;
use crate::domain::ports::SettingsPort;

/// On-disk layout: one table per destination, keyed by its id.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    destinations: BTreeMap<String, DestinationSettings>,
}

/// Settings store that keeps every record in memory and rewrites the file on change.
pub struct FileSettingsStore {
    path: PathBuf,
    records: Mutex<BTreeMap<DestinationId, DestinationSettings>>,
}

impl FileSettingsStore {
    /// Opens the store at `path`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let records = match tokio::fs::read_to_string(&path).await {
            Ok(content) => parse(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        info!(path = %path.display(), destinations = records.len(), "Loaded settings");

        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(
        &self,
        records: &BTreeMap<DestinationId, DestinationSettings>,
    ) -> Result<(), StoreError> {
        let file = SettingsFile {
            destinations: records
                .iter()
                .map(|(id, settings)| (id.to_string(), *settings))
                .collect(),
        };
        let content =
            toml::to_string_pretty(&file).map_err(|e| StoreError::Serialize(e.to_string()))?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_atomically(&path, &content))
            .await
            .map_err(|e| StoreError::Io(std::io::Error::other(e)))??;
        Ok(())
    }
}

fn parse(content: &str) -> Result<BTreeMap<DestinationId, DestinationSettings>, StoreError> {
    let file: SettingsFile =
        toml::from_str(content).map_err(|e| StoreError::Deserialize(e.to_string()))?;
    file.destinations
        .into_iter()
        .map(|(key, settings)| {
            DestinationId::parse(&key)
                .map(|id| (id, settings))
                .ok_or_else(|| StoreError::Deserialize(format!("invalid destination id {key:?}")))
        })
        .collect()
}

#[async_trait]
impl SettingsPort for FileSettingsStore {
    async fn get(&self, destination: DestinationId) -> Result<DestinationSettings, StoreError> {
        let mut records = self.records.lock().await;
        if let Some(settings) = records.get(&destination) {
            return Ok(*settings);
        }

        let settings = DestinationSettings::default();
        records.insert(destination, settings);
        debug!(destination = %destination, "Created default settings");
        self.persist(&records).await?;
        Ok(settings)
    }

    async fn put(
        &self,
        destination: DestinationId,
        settings: DestinationSettings,
    ) -> Result<(), StoreError> {
        let mut records = self.records.lock().await;
        records.insert(destination, settings);
        self.persist(&records).await
    }
}
