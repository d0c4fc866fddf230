//! Persisted snapshot of the whole dataset.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Event, EventReminder, RsvpEntry, RsvpKey, WaitlistEntry};

pub const SCHEMA_VERSION: i32 = 1;

/// The four in-memory collections owned by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collections {
    pub events: BTreeMap<String, Event>,
    pub rsvps: BTreeMap<RsvpKey, RsvpEntry>,
    pub waitlists: BTreeMap<String, Vec<WaitlistEntry>>,
    pub reminders: BTreeMap<String, EventReminder>,
}

/// On-disk form: each collection as an ordered list of key/value pairs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub schema_version: i32,
    pub generated_at: DateTime<Utc>,
    #[serde(default)]
    pub events: Vec<(String, Event)>,
    #[serde(default)]
    pub rsvps: Vec<(RsvpKey, RsvpEntry)>,
    #[serde(default)]
    pub waitlist: Vec<(String, Vec<WaitlistEntry>)>,
    #[serde(default)]
    pub reminders: Vec<(String, EventReminder)>,
}

impl From<&Collections> for Snapshot {
    fn from(collections: &Collections) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            generated_at: Utc::now(),
            events: pairs(&collections.events),
            rsvps: pairs(&collections.rsvps),
            waitlist: pairs(&collections.waitlists),
            reminders: pairs(&collections.reminders),
        }
    }
}

impl From<Snapshot> for Collections {
    fn from(snapshot: Snapshot) -> Self {
        Self {
            events: snapshot.events.into_iter().collect(),
            rsvps: snapshot.rsvps.into_iter().collect(),
            waitlists: snapshot.waitlist.into_iter().collect(),
            reminders: snapshot.reminders.into_iter().collect(),
        }
    }
}

fn pairs<K: Clone, V: Clone>(map: &BTreeMap<K, V>) -> Vec<(K, V)> {
    map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
}
