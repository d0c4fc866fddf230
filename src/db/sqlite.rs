//! SQLite backend.

use std::path::Path;
use std::str::FromStr;

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;

use super::SnapshotStore;
use crate::errors::RsvpResult;
use crate::models::{Collections, Snapshot};

/// Stores the snapshot as a JSON document in a single-row table.
#[derive(Debug, Clone)]
pub struct SqliteSnapshotStore {
    pool: SqlitePool,
}

impl SqliteSnapshotStore {
    /// Open (creating if needed) the database at `db_path` and prepare the schema.
    pub async fn open(db_path: &Path) -> RsvpResult<Self> {
        // Ensure the parent directory exists
        if let Some(parent) = db_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

        let options = SqliteConnectOptions::from_str(&db_url)?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .busy_timeout(std::time::Duration::from_secs(30));

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        run_migrations(&pool).await?;

        Ok(Self { pool })
    }
}

async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS snapshot (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            document TEXT NOT NULL,
            generated_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

impl SnapshotStore for SqliteSnapshotStore {
    async fn load(&self) -> RsvpResult<Collections> {
        let row = sqlx::query("SELECT document FROM snapshot WHERE id = 1")
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            tracing::debug!("No snapshot row, starting empty");
            return Ok(Collections::default());
        };

        let document: String = row.get("document");
        let snapshot: Snapshot = serde_json::from_str(&document)?;
        Ok(snapshot.into())
    }

    async fn save(&self, snapshot: &Snapshot) -> RsvpResult<()> {
        let document = serde_json::to_string(snapshot)?;
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"INSERT INTO snapshot (id, document, generated_at) VALUES (1, ?, ?)
               ON CONFLICT(id) DO UPDATE SET
                   document = excluded.document,
                   generated_at = excluded.generated_at"#,
        )
        .bind(&document)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        tracing::debug!("Saved snapshot row ({} bytes)", document.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::RsvpError;
    use crate::models::{Event, Player, RsvpEntry, RsvpKey, RsvpStatus};
    use chrono::Duration;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_empty_database_loads_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = SqliteSnapshotStore::open(&temp_dir.path().join("rsvps.sqlite"))
            .await
            .unwrap();

        assert_eq!(store.load().await.unwrap(), Collections::default());
    }

    #[tokio::test]
    async fn test_open_creates_missing_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("nested").join("data").join("rsvps.sqlite");

        SqliteSnapshotStore::open(&db_path).await.unwrap();
        assert!(db_path.exists());
    }

    #[tokio::test]
    async fn test_open_fails_when_parent_is_a_file() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let result = SqliteSnapshotStore::open(&blocker.join("data").join("rsvps.sqlite")).await;
        assert!(matches!(result, Err(RsvpError::Storage(_))));
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("rsvps.sqlite");
        let store = SqliteSnapshotStore::open(&db_path).await.unwrap();

        let now = Utc::now();
        let mut collections = Collections::default();
        collections.events.insert(
            "1".to_string(),
            Event {
                id: "1".to_string(),
                name: "Five-a-side".to_string(),
                description: "Indoor pitch".to_string(),
                date: now + Duration::days(2),
                location: "Sports hall".to_string(),
                max_players: 10,
                archived: false,
            },
        );
        store.save(&Snapshot::from(&collections)).await.unwrap();

        collections.rsvps.insert(
            RsvpKey::new("1", "p1"),
            RsvpEntry {
                event_id: "1".to_string(),
                player: Player::new("p1", "Ana", "ana@example.com"),
                status: RsvpStatus::Yes,
                updated_at: now,
                notes: None,
            },
        );
        store.save(&Snapshot::from(&collections)).await.unwrap();

        // A fresh pool sees the latest row
        let reopened = SqliteSnapshotStore::open(&db_path).await.unwrap();
        assert_eq!(reopened.load().await.unwrap(), collections);
    }
}
