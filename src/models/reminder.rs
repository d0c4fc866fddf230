//! Reminder schedule model.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{RsvpError, RsvpResult};

/// Reminder schedule for one event. Sending only advances the timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventReminder {
    pub event_id: String,
    pub last_sent_at: DateTime<Utc>,
    pub next_send_at: DateTime<Utc>,
    /// Interval in days
    pub reminder_interval: u32,
}

impl EventReminder {
    pub fn starting_at(
        event_id: impl Into<String>,
        now: DateTime<Utc>,
        interval_days: u32,
    ) -> RsvpResult<Self> {
        Ok(Self {
            event_id: event_id.into(),
            last_sent_at: now,
            next_send_at: next_send(now, interval_days)?,
            reminder_interval: interval_days,
        })
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_send_at <= now
    }

    /// Record a send at `now` and schedule the next one. Left unchanged on error.
    pub fn advance(&mut self, now: DateTime<Utc>) -> RsvpResult<()> {
        self.next_send_at = next_send(now, self.reminder_interval)?;
        self.last_sent_at = now;
        Ok(())
    }
}

fn next_send(now: DateTime<Utc>, interval_days: u32) -> RsvpResult<DateTime<Utc>> {
    Duration::try_days(i64::from(interval_days))
        .and_then(|interval| now.checked_add_signed(interval))
        .ok_or_else(|| RsvpError::validation("Reminder interval out of range"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_moves_next_send_by_interval() {
        let start = Utc::now();
        let mut reminder = EventReminder::starting_at("1", start, 3).unwrap();
        assert!(!reminder.is_due(start + Duration::days(2)));
        assert!(reminder.is_due(start + Duration::days(3)));

        let later = start + Duration::days(4);
        reminder.advance(later).unwrap();
        assert_eq!(reminder.last_sent_at, later);
        assert_eq!(reminder.next_send_at, later + Duration::days(3));
    }

    #[test]
    fn test_zero_interval_is_due_immediately() {
        let now = Utc::now();
        assert!(EventReminder::starting_at("1", now, 0).unwrap().is_due(now));
    }

    #[test]
    fn test_interval_past_representable_dates_is_rejected() {
        let err = EventReminder::starting_at("1", Utc::now(), u32::MAX).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.message(), "Reminder interval out of range");

        let now = Utc::now();
        let mut reminder = EventReminder::starting_at("1", now, 1).unwrap();
        reminder.reminder_interval = u32::MAX;
        assert!(reminder.advance(now + Duration::days(2)).is_err());
        assert_eq!(reminder.last_sent_at, now);
    }
}
