//! Player model.

use serde::{Deserialize, Serialize};

/// A participant who responds to events.
///
/// Players have no registry of their own; each RSVP entry embeds a copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl Player {
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
        }
    }

    /// Apply a partial update, keeping the identity.
    pub fn merged(&self, update: &PlayerUpdate) -> Self {
        Self {
            id: self.id.clone(),
            name: update.name.clone().unwrap_or_else(|| self.name.clone()),
            email: update.email.clone().unwrap_or_else(|| self.email.clone()),
        }
    }
}

/// Partial update for a player's profile.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}
