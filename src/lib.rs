//! Event RSVP store.
//!
//! Tracks responses to capacity-limited events, with waitlist and reminder bookkeeping. The whole
//! dataset is kept in memory and written back as one snapshot after every change.

pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod store;
pub mod validation;

pub use config::{CapacityScope, Config, StorageKind, StoreOptions};
pub use db::{FileSnapshotStore, SnapshotStore, SqliteSnapshotStore, Storage};
pub use errors::{ErrorKind, RsvpError, RsvpResult};
pub use store::RsvpStore;
