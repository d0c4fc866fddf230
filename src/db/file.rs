//! JSON file backend.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::SnapshotStore;
use crate::errors::RsvpResult;
use crate::models::{Collections, Snapshot};

/// Stores the snapshot as one pretty-printed JSON document.
///
/// Writes go to a sibling `.tmp` file which is synced and then renamed over the target, so a
/// crash mid-write leaves the previous snapshot intact.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for FileSnapshotStore {
    async fn load(&self) -> RsvpResult<Collections> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!("No snapshot at {:?}, starting empty", self.path);
                return Ok(Collections::default());
            }
            Err(err) => return Err(err.into()),
        };

        let snapshot: Snapshot = serde_json::from_str(&content)?;
        tracing::debug!(
            "Loaded snapshot from {:?} ({} events, {} rsvps)",
            self.path,
            snapshot.events.len(),
            snapshot.rsvps.len()
        );
        Ok(snapshot.into())
    }

    async fn save(&self, snapshot: &Snapshot) -> RsvpResult<()> {
        let content = serde_json::to_string_pretty(snapshot)?;
        let temp_path = self.path.with_extension("tmp");

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(content.as_bytes()).await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&temp_path, &self.path).await?;
        tracing::debug!("Saved snapshot to {:?}", self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Event, Player, RsvpEntry, RsvpStatus, WaitlistEntry};
    use crate::models::{EventReminder, RsvpKey};
    use chrono::{Duration, Utc};
    use tempfile::TempDir;

    fn populated() -> Collections {
        let now = Utc::now();
        let event = Event {
            id: "1".to_string(),
            name: "Quiz night".to_string(),
            description: "Teams of four".to_string(),
            date: now + Duration::days(3),
            location: "Pub".to_string(),
            max_players: 8,
            archived: false,
        };
        let player = Player::new("p1", "Ana", "ana@example.com");

        let mut collections = Collections::default();
        collections.events.insert(event.id.clone(), event);
        collections.rsvps.insert(
            RsvpKey::new("1", "p1"),
            RsvpEntry {
                event_id: "1".to_string(),
                player: player.clone(),
                status: RsvpStatus::Maybe,
                updated_at: now,
                notes: Some("Might be late".to_string()),
            },
        );
        collections.waitlists.insert(
            "1".to_string(),
            vec![WaitlistEntry {
                event_id: "1".to_string(),
                player,
                joined_at: now,
                notified_at: Some(now + Duration::milliseconds(1500)),
            }],
        );
        collections
            .reminders
            .insert("1".to_string(), EventReminder::starting_at("1", now, 2).unwrap());
        collections
    }

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSnapshotStore::new(temp_dir.path().join("none.json"));

        let collections = store.load().await.unwrap();
        assert_eq!(collections, Collections::default());
    }

    #[tokio::test]
    async fn test_save_then_load_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("rsvps.json");
        let store = FileSnapshotStore::new(&path);
        let collections = populated();

        store.save(&Snapshot::from(&collections)).await.unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, collections);
    }

    #[tokio::test]
    async fn test_malformed_file_is_a_storage_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("rsvps.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = FileSnapshotStore::new(&path).load().await.unwrap_err();
        assert_eq!(err.error_code(), "STORAGE_ERROR");
    }
}
