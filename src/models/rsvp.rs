//! RSVP entry model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Player;

/// A player's response to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RsvpStatus {
    Yes,
    No,
    Maybe,
}

impl RsvpStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RsvpStatus::Yes => "Yes",
            RsvpStatus::No => "No",
            RsvpStatus::Maybe => "Maybe",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Yes" => Some(RsvpStatus::Yes),
            "No" => Some(RsvpStatus::No),
            "Maybe" => Some(RsvpStatus::Maybe),
            _ => None,
        }
    }
}

impl std::fmt::Display for RsvpStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Composite key of an RSVP entry: one entry per player per event.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpKey {
    pub event_id: String,
    pub player_id: String,
}

impl RsvpKey {
    pub fn new(event_id: impl Into<String>, player_id: impl Into<String>) -> Self {
        Self {
            event_id: event_id.into(),
            player_id: player_id.into(),
        }
    }
}

/// A recorded response. The embedded player is a snapshot, not a live reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpEntry {
    pub event_id: String,
    pub player: Player,
    pub status: RsvpStatus,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl RsvpEntry {
    pub fn key(&self) -> RsvpKey {
        RsvpKey::new(self.event_id.clone(), self.player.id.clone())
    }

    pub fn is_confirmed(&self) -> bool {
        self.status == RsvpStatus::Yes
    }
}

/// Single item of a batch RSVP update. The player is looked up by id among existing entries.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRsvpUpdate {
    pub event_id: String,
    pub player_id: String,
    pub status: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Filters for [`crate::store::RsvpStore::search_rsvps`]. Unset fields match everything.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOptions {
    #[serde(default)]
    pub event_id: Option<String>,
    #[serde(default)]
    pub player_name: Option<String>,
    #[serde(default)]
    pub status: Option<RsvpStatus>,
    /// Only applied together with `event_id`; compared against the event's date
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    /// Only applied together with `event_id`; compared against the event's date
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_names_are_case_sensitive() {
        assert_eq!(RsvpStatus::from_str("Maybe"), Some(RsvpStatus::Maybe));
        assert_eq!(RsvpStatus::from_str("yes"), None);
        assert_eq!(
            serde_json::to_string(&RsvpStatus::Yes).unwrap(),
            "\"Yes\""
        );
    }

    #[test]
    fn test_keys_order_by_event_then_player() {
        let mut keys = vec![
            RsvpKey::new("2", "a"),
            RsvpKey::new("1", "b"),
            RsvpKey::new("1", "a"),
        ];
        keys.sort();
        assert_eq!(keys[0], RsvpKey::new("1", "a"));
        assert_eq!(keys[2], RsvpKey::new("2", "a"));
    }
}
