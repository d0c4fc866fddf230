//! Public store operations.
//!
//! Mutations follow the same sequence: load, look up referenced records, validate, change the
//! in-memory collections, save the snapshot, log.

use chrono::{Duration, Utc};

use super::{counted_entries, find_event, find_player, sorted_by_update, RsvpStore};
use crate::db::SnapshotStore;
use crate::errors::{RsvpError, RsvpResult};
use crate::models::{
    BatchRsvpUpdate, CleanupOptions, CleanupReport, Collections, Event, EventReminder,
    EventStats, EventUpdate, Player, PlayerUpdate, RsvpEntry, RsvpKey, RsvpStats, RsvpStatus,
    SearchOptions, WaitlistEntry,
};
use crate::validation::{validate_event, validate_player, validate_rsvp_status};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

impl<S: SnapshotStore> RsvpStore<S> {
    // ==================== EVENT OPERATIONS ====================

    /// Create an event. An existing event with the same id is replaced.
    pub async fn create_event(&self, event: Event) -> RsvpResult<Event> {
        let mut state = self.state.lock().await;
        let data = self.loaded(&mut state).await?;

        validate_event(&event, Utc::now())?;
        if event.max_players <= 0 {
            return Err(RsvpError::validation("Max players must be greater than zero"));
        }

        data.events.insert(event.id.clone(), event.clone());
        self.persist(data, "create event").await?;

        tracing::info!("Created event {} ({})", event.id, event.name);
        Ok(event)
    }

    /// Get an event by ID.
    pub async fn get_event(&self, event_id: &str) -> RsvpResult<Option<Event>> {
        let mut state = self.state.lock().await;
        let data = self.loaded(&mut state).await?;
        Ok(data.events.get(event_id).cloned())
    }

    /// List all events, earliest first.
    pub async fn list_events(&self) -> RsvpResult<Vec<Event>> {
        let mut state = self.state.lock().await;
        let data = self.loaded(&mut state).await?;

        let mut events: Vec<Event> = data.events.values().cloned().collect();
        events.sort_by_key(|event| event.date);
        Ok(events)
    }

    /// Merge the provided fields onto an event and re-validate the result.
    pub async fn update_event(&self, event_id: &str, update: &EventUpdate) -> RsvpResult<Event> {
        let mut state = self.state.lock().await;
        let data = self.loaded(&mut state).await?;

        let merged = find_event(data, event_id)?.merged(update);
        validate_event(&merged, Utc::now())?;

        data.events.insert(merged.id.clone(), merged.clone());
        self.persist(data, "update event").await?;

        tracing::info!("Updated event {}", event_id);
        Ok(merged)
    }

    /// Delete an event together with its RSVP entries.
    ///
    /// Waitlist and reminder records for the event are left untouched.
    pub async fn delete_event(&self, event_id: &str) -> RsvpResult<()> {
        let mut state = self.state.lock().await;
        let data = self.loaded(&mut state).await?;

        find_event(data, event_id)?;

        data.events.remove(event_id);
        let before = data.rsvps.len();
        data.rsvps.retain(|key, _| key.event_id != event_id);
        let removed = before - data.rsvps.len();

        self.persist(data, "delete event").await?;

        tracing::info!("Deleted event {} and {} rsvps", event_id, removed);
        Ok(())
    }

    // ==================== RSVP OPERATIONS ====================

    /// Record or overwrite a player's response to an event.
    pub async fn update_rsvp(
        &self,
        event_id: &str,
        player: Player,
        status: RsvpStatus,
        notes: Option<String>,
    ) -> RsvpResult<RsvpEntry> {
        let mut state = self.state.lock().await;
        let data = self.loaded(&mut state).await?;

        let entry = self.apply_rsvp(data, event_id, player, status, notes)?;
        self.persist(data, "update rsvp").await?;

        tracing::info!(
            "Player {} responded {} to event {}",
            entry.player.id,
            entry.status,
            event_id
        );
        Ok(entry)
    }

    /// Apply several updates in order, stopping at the first invalid one.
    ///
    /// Updates applied before the failing item are kept and saved.
    pub async fn batch_update_rsvps(
        &self,
        updates: &[BatchRsvpUpdate],
    ) -> RsvpResult<Vec<RsvpEntry>> {
        let mut state = self.state.lock().await;
        let data = self.loaded(&mut state).await?;

        let mut results = Vec::with_capacity(updates.len());
        for update in updates {
            match self.apply_batch_item(data, update) {
                Ok(entry) => results.push(entry),
                Err(err) => {
                    if !results.is_empty() {
                        self.persist(data, "batch update rsvps").await?;
                        tracing::info!(
                            "Batch update stopped after {} of {} rsvps",
                            results.len(),
                            updates.len()
                        );
                    }
                    return Err(err);
                }
            }
        }

        self.persist(data, "batch update rsvps").await?;

        tracing::info!("Batch updated {} rsvps", results.len());
        Ok(results)
    }

    /// Delete a single RSVP entry.
    pub async fn cancel_rsvp(&self, event_id: &str, player_id: &str) -> RsvpResult<()> {
        let mut state = self.state.lock().await;
        let data = self.loaded(&mut state).await?;

        let key = RsvpKey::new(event_id, player_id);
        if data.rsvps.remove(&key).is_none() {
            return Err(RsvpError::validation(format!(
                "RSVP for player {} at event {} not found",
                player_id, event_id
            )));
        }

        self.persist(data, "cancel rsvp").await?;

        tracing::info!("Cancelled rsvp of player {} for event {}", player_id, event_id);
        Ok(())
    }

    /// Entries for one event, oldest update first.
    pub async fn get_event_rsvps(&self, event_id: &str) -> RsvpResult<Vec<RsvpEntry>> {
        let mut state = self.state.lock().await;
        let data = self.loaded(&mut state).await?;

        find_event(data, event_id)?;
        Ok(sorted_by_update(
            data.rsvps.values().filter(|entry| entry.event_id == event_id),
        ))
    }

    /// Every confirmed entry across all events, oldest update first.
    pub async fn get_confirmed_attendees(&self) -> RsvpResult<Vec<RsvpEntry>> {
        let mut state = self.state.lock().await;
        let data = self.loaded(&mut state).await?;

        Ok(sorted_by_update(
            data.rsvps.values().filter(|entry| entry.is_confirmed()),
        ))
    }

    /// Filter entries. Date bounds only apply when an event id is given and are compared against
    /// that event's date.
    pub async fn search_rsvps(&self, options: &SearchOptions) -> RsvpResult<Vec<RsvpEntry>> {
        let mut state = self.state.lock().await;
        let data = self.loaded(&mut state).await?;

        let needle = options.player_name.as_ref().map(|name| name.to_lowercase());
        let event_date = options
            .event_id
            .as_ref()
            .and_then(|id| data.events.get(id))
            .map(|event| event.date);

        let matches = |entry: &RsvpEntry| {
            if let Some(event_id) = &options.event_id {
                if &entry.event_id != event_id {
                    return false;
                }
                if let Some(start) = options.start_date {
                    if !event_date.is_some_and(|date| date >= start) {
                        return false;
                    }
                }
                if let Some(end) = options.end_date {
                    if !event_date.is_some_and(|date| date <= end) {
                        return false;
                    }
                }
            }
            if let Some(needle) = &needle {
                if !entry.player.name.to_lowercase().contains(needle.as_str()) {
                    return false;
                }
            }
            options.status.map_or(true, |status| entry.status == status)
        };

        let results = sorted_by_update(data.rsvps.values().filter(|entry| matches(entry)));
        tracing::debug!("Search matched {} rsvps", results.len());
        Ok(results)
    }

    // ==================== PLAYER OPERATIONS ====================

    /// Update a player's profile in every entry that embeds it.
    pub async fn update_player(
        &self,
        player_id: &str,
        update: &PlayerUpdate,
    ) -> RsvpResult<Player> {
        let mut state = self.state.lock().await;
        let data = self.loaded(&mut state).await?;

        let merged = find_player(data, player_id)?.merged(update);
        validate_player(&merged)?;

        let mut rewritten = 0;
        for entry in data
            .rsvps
            .values_mut()
            .filter(|entry| entry.player.id == player_id)
        {
            entry.player = merged.clone();
            rewritten += 1;
        }

        self.persist(data, "update player").await?;

        tracing::info!("Updated player {} in {} rsvps", player_id, rewritten);
        Ok(merged)
    }

    /// Delete every entry of a player. Returns how many were removed.
    pub async fn remove_player(&self, player_id: &str) -> RsvpResult<usize> {
        let mut state = self.state.lock().await;
        let data = self.loaded(&mut state).await?;

        find_player(data, player_id)?;

        let before = data.rsvps.len();
        data.rsvps.retain(|key, _| key.player_id != player_id);
        let removed = before - data.rsvps.len();

        self.persist(data, "remove player").await?;

        tracing::info!("Removed player {} ({} rsvps)", player_id, removed);
        Ok(removed)
    }

    // ==================== WAITLIST OPERATIONS ====================

    /// Queue a player who has not responded to the event.
    pub async fn add_to_waitlist(
        &self,
        event_id: &str,
        player: Player,
    ) -> RsvpResult<WaitlistEntry> {
        let mut state = self.state.lock().await;
        let data = self.loaded(&mut state).await?;

        find_event(data, event_id)?;
        validate_player(&player)?;
        if data
            .rsvps
            .contains_key(&RsvpKey::new(event_id, player.id.as_str()))
        {
            return Err(RsvpError::validation(format!(
                "Player {} already has an RSVP for event {}",
                player.id, event_id
            )));
        }

        let entry = WaitlistEntry {
            event_id: event_id.to_string(),
            player,
            joined_at: Utc::now(),
            notified_at: None,
        };
        let queue = data.waitlists.entry(event_id.to_string()).or_default();
        queue.push(entry.clone());
        let position = queue.len();

        self.persist(data, "add to waitlist").await?;

        tracing::info!(
            "Player {} joined waitlist for event {} at position {}",
            entry.player.id,
            event_id,
            position
        );
        Ok(entry)
    }

    /// Waitlist of an event in joining order.
    pub async fn get_waitlist(&self, event_id: &str) -> RsvpResult<Vec<WaitlistEntry>> {
        let mut state = self.state.lock().await;
        let data = self.loaded(&mut state).await?;

        find_event(data, event_id)?;
        Ok(data.waitlists.get(event_id).cloned().unwrap_or_default())
    }

    /// Mark as many waiting players as there are open spots, first come first served.
    ///
    /// Notified players stay on the waitlist and get no RSVP entry.
    pub async fn notify_waitlist(&self, event_id: &str) -> RsvpResult<Vec<Player>> {
        let mut state = self.state.lock().await;
        let data = self.loaded(&mut state).await?;

        let max_players = find_event(data, event_id)?.max_players;
        let confirmed = i64::try_from(self.confirmed_count(data, event_id)).unwrap_or(i64::MAX);
        let available = max_players.saturating_sub(confirmed);
        if available <= 0 {
            tracing::debug!("No spots available for event {}", event_id);
            return Ok(Vec::new());
        }

        let now = Utc::now();
        let spots = usize::try_from(available).unwrap_or(usize::MAX);
        let notified: Vec<Player> = data
            .waitlists
            .get_mut(event_id)
            .map(|queue| {
                queue
                    .iter_mut()
                    .take(spots)
                    .map(|entry| {
                        entry.notified_at = Some(now);
                        entry.player.clone()
                    })
                    .collect()
            })
            .unwrap_or_default();

        if notified.is_empty() {
            return Ok(notified);
        }

        self.persist(data, "notify waitlist").await?;

        tracing::info!(
            "Notified {} waitlisted players for event {}",
            notified.len(),
            event_id
        );
        Ok(notified)
    }

    // ==================== REMINDER OPERATIONS ====================

    /// Schedule reminders for an event, replacing any existing schedule.
    pub async fn setup_reminders(
        &self,
        event_id: &str,
        interval_days: u32,
    ) -> RsvpResult<EventReminder> {
        let mut state = self.state.lock().await;
        let data = self.loaded(&mut state).await?;

        find_event(data, event_id)?;

        let reminder = EventReminder::starting_at(event_id, Utc::now(), interval_days)?;
        data.reminders.insert(event_id.to_string(), reminder.clone());

        self.persist(data, "set up reminders").await?;

        tracing::info!("Reminders for event {} every {} days", event_id, interval_days);
        Ok(reminder)
    }

    /// Reminder schedule of an event, if any.
    pub async fn get_reminder(&self, event_id: &str) -> RsvpResult<Option<EventReminder>> {
        let mut state = self.state.lock().await;
        let data = self.loaded(&mut state).await?;
        Ok(data.reminders.get(event_id).cloned())
    }

    /// Advance every due reminder and return the events they belong to.
    ///
    /// Reminders whose event no longer exists are skipped and left as they are.
    pub async fn send_reminders(&self) -> RsvpResult<Vec<Event>> {
        let mut state = self.state.lock().await;
        let data = self.loaded(&mut state).await?;

        let now = Utc::now();
        let Collections {
            events, reminders, ..
        } = &mut *data;

        let mut due = Vec::new();
        for reminder in reminders.values_mut().filter(|r| r.is_due(now)) {
            let Some(event) = events.get(&reminder.event_id) else {
                continue;
            };
            if let Err(err) = reminder.advance(now) {
                tracing::warn!("Skipping reminder for event {}: {}", reminder.event_id, err);
                continue;
            }
            due.push(event.clone());
        }

        if due.is_empty() {
            return Ok(due);
        }

        self.persist(data, "send reminders").await?;

        tracing::info!("Sent reminders for {} events", due.len());
        Ok(due)
    }

    // ==================== STATISTICS ====================

    /// Counts over every entry in the store.
    pub async fn get_rsvp_stats(&self) -> RsvpResult<RsvpStats> {
        let mut state = self.state.lock().await;
        let data = self.loaded(&mut state).await?;
        Ok(RsvpStats::from_entries(data.rsvps.values()))
    }

    /// Statistics for one event, counted under the configured capacity scope.
    pub async fn get_event_stats(&self, event_id: &str) -> RsvpResult<EventStats> {
        let mut state = self.state.lock().await;
        let data = self.loaded(&mut state).await?;

        let event = find_event(data, event_id)?.clone();
        let stats = RsvpStats::from_entries(counted_entries(
            data,
            event_id,
            self.options.capacity_scope,
        ));
        let millis = (event.date - Utc::now()).num_milliseconds();
        let days_until_event = (millis as f64 / MILLIS_PER_DAY).ceil() as i64;

        Ok(EventStats {
            confirmed_count: stats.confirmed,
            stats,
            days_until_event,
            max_players: event.max_players,
            event,
        })
    }

    // ==================== MAINTENANCE ====================

    /// Archive or delete events older than `max_age` days, optionally with their RSVPs.
    pub async fn cleanup_data(&self, options: &CleanupOptions) -> RsvpResult<CleanupReport> {
        let mut state = self.state.lock().await;
        let data = self.loaded(&mut state).await?;

        let cutoff = Duration::try_days(options.max_age_days())
            .and_then(|max_age| Utc::now().checked_sub_signed(max_age))
            .ok_or_else(|| RsvpError::validation("Max age out of range"))?;

        // Archived events only come back when they still hold entries to remove
        let stale: Vec<String> = data
            .events
            .values()
            .filter(|event| event.date < cutoff)
            .filter(|event| {
                !(options.archive && event.archived)
                    || (options.include_rsvps
                        && data.rsvps.keys().any(|key| key.event_id == event.id))
            })
            .map(|event| event.id.clone())
            .collect();

        let mut report = CleanupReport::default();
        for event_id in &stale {
            if options.archive {
                if let Some(event) = data.events.get_mut(event_id) {
                    event.archived = true;
                }
            } else {
                data.events.remove(event_id);
                report.events += 1;
            }

            if options.include_rsvps {
                let before = data.rsvps.len();
                data.rsvps.retain(|key, _| &key.event_id != event_id);
                report.rsvps += before - data.rsvps.len();
            }
        }

        if stale.is_empty() {
            tracing::debug!("Cleanup found nothing older than {}", cutoff);
            return Ok(report);
        }

        self.persist(data, "clean up data").await?;

        tracing::info!(
            "Cleanup processed {} events: {} deleted, {} rsvps removed",
            stale.len(),
            report.events,
            report.rsvps
        );
        Ok(report)
    }

    fn apply_batch_item(
        &self,
        data: &mut Collections,
        update: &BatchRsvpUpdate,
    ) -> RsvpResult<RsvpEntry> {
        find_event(data, &update.event_id)?;
        let player = find_player(data, &update.player_id)?;
        let status = validate_rsvp_status(&update.status)?;
        self.apply_rsvp(data, &update.event_id, player, status, update.notes.clone())
    }

    /// Capacity-checked write of a single entry. Does not persist.
    fn apply_rsvp(
        &self,
        data: &mut Collections,
        event_id: &str,
        player: Player,
        status: RsvpStatus,
        notes: Option<String>,
    ) -> RsvpResult<RsvpEntry> {
        let max_players = find_event(data, event_id)?.max_players;
        validate_player(&player)?;

        let key = RsvpKey::new(event_id, player.id.as_str());
        if status == RsvpStatus::Yes {
            let already_confirmed = data.rsvps.get(&key).is_some_and(RsvpEntry::is_confirmed);
            let confirmed = self.confirmed_count(data, event_id);
            if !already_confirmed && i64::try_from(confirmed).unwrap_or(i64::MAX) >= max_players {
                return Err(RsvpError::validation(format!(
                    "Event {} is full ({} of {} spots taken)",
                    event_id, confirmed, max_players
                )));
            }
        }

        let entry = RsvpEntry {
            event_id: event_id.to_string(),
            player,
            status,
            updated_at: Utc::now(),
            notes,
        };
        data.rsvps.insert(key, entry.clone());
        Ok(entry)
    }
}
