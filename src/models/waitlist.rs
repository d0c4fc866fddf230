//! Waitlist model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Player;

/// A player waiting for a spot on a full event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistEntry {
    pub event_id: String,
    pub player: Player,
    pub joined_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notified_at: Option<DateTime<Utc>>,
}
