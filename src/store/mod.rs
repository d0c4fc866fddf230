//! The RSVP record store.
//!
//! `RsvpStore` owns the events, RSVP entries, waitlists and reminders in memory and writes the
//! full snapshot back through a [`SnapshotStore`] after every mutation. Every call holds one
//! async mutex for its whole duration, so concurrent callers are applied one at a time.

mod operations;

use tokio::sync::Mutex;

use crate::config::{CapacityScope, StoreOptions};
use crate::db::SnapshotStore;
use crate::errors::{RsvpError, RsvpResult};
use crate::models::{Collections, Event, Player, RsvpEntry, Snapshot};

/// Load state of the in-memory collections.
#[derive(Debug)]
enum LoadState {
    Unloaded,
    Ready(Collections),
    /// The initial load failed; the instance will not retry
    Failed,
}

/// Event RSVP store backed by a snapshot.
#[derive(Debug)]
pub struct RsvpStore<S> {
    storage: S,
    options: StoreOptions,
    state: Mutex<LoadState>,
}

impl<S: SnapshotStore> RsvpStore<S> {
    /// Create a store that loads its snapshot on the first call.
    pub fn new(storage: S, options: StoreOptions) -> Self {
        Self {
            storage,
            options,
            state: Mutex::new(LoadState::Unloaded),
        }
    }

    /// Create a store and load its snapshot immediately.
    pub async fn open(storage: S, options: StoreOptions) -> RsvpResult<Self> {
        let store = Self::new(storage, options);
        {
            let mut state = store.state.lock().await;
            store.loaded(&mut state).await?;
        }
        Ok(store)
    }

    pub fn options(&self) -> StoreOptions {
        self.options
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Return the collections, loading them on first use.
    async fn loaded<'a>(&self, state: &'a mut LoadState) -> RsvpResult<&'a mut Collections> {
        if let LoadState::Unloaded = state {
            match self.storage.load().await {
                Ok(collections) => {
                    tracing::debug!(
                        "Store initialized with {} events and {} rsvps",
                        collections.events.len(),
                        collections.rsvps.len()
                    );
                    *state = LoadState::Ready(collections);
                }
                Err(err) => {
                    tracing::error!("Failed to load snapshot: {}", err);
                    *state = LoadState::Failed;
                }
            }
        }

        match state {
            LoadState::Ready(collections) => Ok(collections),
            _ => Err(RsvpError::operation_failed("initialize store")),
        }
    }

    /// Write the full snapshot. The in-memory change is kept even if this fails.
    async fn persist(&self, collections: &Collections, operation: &str) -> RsvpResult<()> {
        let snapshot = Snapshot::from(collections);
        self.storage.save(&snapshot).await.map_err(|err| {
            tracing::error!("Failed to {}: {}", operation, err);
            RsvpError::operation_failed(operation)
        })
    }

    fn confirmed_count(&self, collections: &Collections, event_id: &str) -> usize {
        counted_entries(collections, event_id, self.options.capacity_scope)
            .filter(|entry| entry.is_confirmed())
            .count()
    }
}

/// Entries that count against `event_id`'s capacity under `scope`.
fn counted_entries<'a>(
    collections: &'a Collections,
    event_id: &'a str,
    scope: CapacityScope,
) -> impl Iterator<Item = &'a RsvpEntry> + 'a {
    collections
        .rsvps
        .values()
        .filter(move |entry| scope == CapacityScope::Global || entry.event_id == event_id)
}

fn find_event<'a>(collections: &'a Collections, event_id: &str) -> RsvpResult<&'a Event> {
    collections
        .events
        .get(event_id)
        .ok_or_else(|| RsvpError::validation(format!("Event {} not found", event_id)))
}

/// Players are only known through the entries that embed them.
fn find_player(collections: &Collections, player_id: &str) -> RsvpResult<Player> {
    collections
        .rsvps
        .values()
        .find(|entry| entry.player.id == player_id)
        .map(|entry| entry.player.clone())
        .ok_or_else(|| RsvpError::validation(format!("Player {} not found", player_id)))
}

fn sorted_by_update<'a>(entries: impl Iterator<Item = &'a RsvpEntry>) -> Vec<RsvpEntry> {
    let mut entries: Vec<RsvpEntry> = entries.cloned().collect();
    entries.sort_by_key(|entry| entry.updated_at);
    entries
}
