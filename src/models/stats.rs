//! Statistics and maintenance records.

use serde::{Deserialize, Serialize};

use super::{Event, RsvpEntry, RsvpStatus};

/// Aggregate counts over a set of RSVP entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpStats {
    pub total: usize,
    pub confirmed: usize,
    pub declined: usize,
    pub maybe: usize,
    /// Percentage of entries that are confirmed
    pub attendance_rate: f64,
    /// Percentage of entries carrying a recognised response
    pub response_rate: f64,
}

impl RsvpStats {
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a RsvpEntry>) -> Self {
        let (mut total, mut confirmed, mut declined, mut maybe) = (0, 0, 0, 0);
        for entry in entries {
            total += 1;
            match entry.status {
                RsvpStatus::Yes => confirmed += 1,
                RsvpStatus::No => declined += 1,
                RsvpStatus::Maybe => maybe += 1,
            }
        }

        Self {
            total,
            confirmed,
            declined,
            maybe,
            attendance_rate: percentage(confirmed, total),
            response_rate: percentage(confirmed + declined + maybe, total),
        }
    }
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

/// Statistics for a single event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventStats {
    #[serde(flatten)]
    pub stats: RsvpStats,
    pub event: Event,
    /// Whole days until the event, rounded up; negative once it has passed
    pub days_until_event: i64,
    pub max_players: i64,
    pub confirmed_count: usize,
}

/// Options for [`crate::store::RsvpStore::cleanup_data`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupOptions {
    /// Age in days past which an event is stale. Defaults to 30.
    #[serde(default)]
    pub max_age: Option<i64>,
    /// Archive stale events instead of deleting them
    #[serde(default)]
    pub archive: bool,
    /// Also delete the RSVP entries of stale events
    #[serde(default, rename = "includeRSVPs")]
    pub include_rsvps: bool,
}

impl CleanupOptions {
    pub const DEFAULT_MAX_AGE_DAYS: i64 = 30;

    pub fn max_age_days(&self) -> i64 {
        self.max_age.unwrap_or(Self::DEFAULT_MAX_AGE_DAYS)
    }
}

/// What a cleanup pass removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupReport {
    pub events: usize,
    pub rsvps: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Player;
    use chrono::Utc;

    fn entry(player_id: &str, status: RsvpStatus) -> RsvpEntry {
        RsvpEntry {
            event_id: "1".to_string(),
            player: Player::new(player_id, "Name", "name@example.com"),
            status,
            updated_at: Utc::now(),
            notes: None,
        }
    }

    #[test]
    fn test_empty_stats_have_zero_rates() {
        let stats = RsvpStats::from_entries(std::iter::empty());
        assert_eq!(stats.total, 0);
        assert_eq!(stats.attendance_rate, 0.0);
        assert_eq!(stats.response_rate, 0.0);
    }

    #[test]
    fn test_rates() {
        let entries = vec![
            entry("a", RsvpStatus::Yes),
            entry("b", RsvpStatus::No),
            entry("c", RsvpStatus::Maybe),
            entry("d", RsvpStatus::Yes),
        ];
        let stats = RsvpStats::from_entries(&entries);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.confirmed, 2);
        assert_eq!(stats.declined, 1);
        assert_eq!(stats.maybe, 1);
        assert_eq!(stats.attendance_rate, 50.0);
        assert_eq!(stats.response_rate, 100.0);
    }

    #[test]
    fn test_cleanup_options_default_max_age() {
        let options: CleanupOptions =
            serde_json::from_str(r#"{"archive": true, "includeRSVPs": true}"#).unwrap();
        assert_eq!(options.max_age_days(), 30);
        assert!(options.include_rsvps);
    }
}
