//! Snapshot persistence.
//!
//! The whole dataset is read and written as one document. Two backends are available: a JSON
//! file and a single-row SQLite table.

mod file;
mod sqlite;

pub use file::FileSnapshotStore;
pub use sqlite::SqliteSnapshotStore;

use std::future::Future;

use crate::config::{Config, StorageKind};
use crate::errors::RsvpResult;
use crate::models::{Collections, Snapshot};

/// Loads and saves the full dataset.
pub trait SnapshotStore: Send + Sync {
    /// Read the snapshot. A missing snapshot yields empty collections.
    fn load(&self) -> impl Future<Output = RsvpResult<Collections>> + Send;

    /// Overwrite the snapshot.
    fn save(&self, snapshot: &Snapshot) -> impl Future<Output = RsvpResult<()>> + Send;
}

/// Backend chosen at runtime from configuration.
#[derive(Debug, Clone)]
pub enum Storage {
    File(FileSnapshotStore),
    Sqlite(SqliteSnapshotStore),
}

impl Storage {
    /// Open the backend named by the configuration.
    pub async fn from_config(config: &Config) -> RsvpResult<Self> {
        match config.storage {
            StorageKind::Json => Ok(Storage::File(FileSnapshotStore::new(&config.data_path))),
            StorageKind::Sqlite => Ok(Storage::Sqlite(
                SqliteSnapshotStore::open(&config.data_path).await?,
            )),
        }
    }
}

impl SnapshotStore for Storage {
    async fn load(&self) -> RsvpResult<Collections> {
        match self {
            Storage::File(store) => store.load().await,
            Storage::Sqlite(store) => store.load().await,
        }
    }

    async fn save(&self, snapshot: &Snapshot) -> RsvpResult<()> {
        match self {
            Storage::File(store) => store.save(snapshot).await,
            Storage::Sqlite(store) => store.save(snapshot).await,
        }
    }
}
