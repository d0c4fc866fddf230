//! Event model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A scheduled event with bounded capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub name: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub max_players: i64,
    #[serde(default)]
    pub archived: bool,
}

impl Event {
    /// Build an unarchived event with a freshly generated id.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        date: DateTime<Utc>,
        location: impl Into<String>,
        max_players: i64,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            description: description.into(),
            date,
            location: location.into(),
            max_players,
            archived: false,
        }
    }

    /// Shallow-merge the provided fields onto a copy of this event.
    pub fn merged(&self, update: &EventUpdate) -> Self {
        Self {
            id: self.id.clone(),
            name: update.name.clone().unwrap_or_else(|| self.name.clone()),
            description: update
                .description
                .clone()
                .unwrap_or_else(|| self.description.clone()),
            date: update.date.unwrap_or(self.date),
            location: update
                .location
                .clone()
                .unwrap_or_else(|| self.location.clone()),
            max_players: update.max_players.unwrap_or(self.max_players),
            archived: update.archived.unwrap_or(self.archived),
        }
    }
}

/// Partial update for an existing event.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub max_players: Option<i64>,
    #[serde(default)]
    pub archived: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    #[test]
    fn test_fractional_capacity_is_rejected() {
        let value = json!({
            "id": "1",
            "name": "Friday game",
            "description": "Weekly",
            "date": "2030-01-01T18:00:00Z",
            "location": "Club",
            "maxPlayers": 1.5
        });
        assert!(serde_json::from_value::<Event>(value).is_err());
    }

    #[test]
    fn test_archived_defaults_to_false() {
        let value = json!({
            "id": "1",
            "name": "Friday game",
            "description": "Weekly",
            "date": "2030-01-01T18:00:00Z",
            "location": "Club",
            "maxPlayers": 4
        });
        let event: Event = serde_json::from_value(value).unwrap();
        assert!(!event.archived);
        assert_eq!(event.max_players, 4);
    }

    #[test]
    fn test_merge_keeps_unset_fields() {
        let event = Event::new("Game", "Weekly", Utc::now() + Duration::days(1), "Club", 4);
        let update = EventUpdate {
            location: Some("Library".to_string()),
            max_players: Some(6),
            ..Default::default()
        };
        let merged = event.merged(&update);
        assert_eq!(merged.id, event.id);
        assert_eq!(merged.name, "Game");
        assert_eq!(merged.location, "Library");
        assert_eq!(merged.max_players, 6);
        assert_eq!(merged.date, event.date);
    }
}
