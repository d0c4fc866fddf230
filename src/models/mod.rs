//! Data models for the RSVP store.
//!
//! All models serialize with camelCase field names so snapshots stay readable by other tooling.

mod event;
mod player;
mod reminder;
mod rsvp;
mod snapshot;
mod stats;
mod waitlist;

pub use event::*;
pub use player::*;
pub use reminder::*;
pub use rsvp::*;
pub use snapshot::*;
pub use stats::*;
pub use waitlist::*;
