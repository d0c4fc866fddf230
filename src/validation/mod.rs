//! Input validation for players, events and RSVP statuses.
//!
//! Each check stops at the first violated rule. Nothing here touches store state.

use chrono::{DateTime, Utc};

use crate::models::{Event, Player, RsvpStatus};

/// A single violated rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    reason: String,
}

impl ValidationError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.reason)
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult<T> = Result<T, ValidationError>;

fn require(condition: bool, reason: &str) -> ValidationResult<()> {
    if condition {
        Ok(())
    } else {
        Err(ValidationError::new(reason))
    }
}

/// Conservative `local@domain.tld` check: no whitespace, one `@`, a dot inside the domain.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let last = domain.len().saturating_sub(1);
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i < last)
}

pub fn validate_player(player: &Player) -> ValidationResult<()> {
    require(!player.id.is_empty(), "Player id is required")?;
    require(!player.name.trim().is_empty(), "Player name is required")?;
    require(!player.email.is_empty(), "Player email is required")?;
    require(is_valid_email(&player.email), "Invalid email format")?;
    Ok(())
}

pub fn validate_rsvp_status(status: &str) -> ValidationResult<RsvpStatus> {
    RsvpStatus::from_str(status).ok_or_else(|| {
        ValidationError::new(format!(
            "Invalid RSVP status '{}': must be one of Yes, No, Maybe",
            status
        ))
    })
}

/// Validate a whole event against the clock reading `now`.
pub fn validate_event(event: &Event, now: DateTime<Utc>) -> ValidationResult<()> {
    require(!event.id.is_empty(), "Event id is required")?;
    require(!event.name.trim().is_empty(), "Event name is required")?;
    require(
        !event.description.trim().is_empty(),
        "Event description is required",
    )?;
    require(!event.location.trim().is_empty(), "Event location is required")?;
    require(event.date >= now, "Event date must be in the future")?;
    require(
        event.max_players >= 1,
        "Max players must be a positive integer",
    )?;
    Ok(())
}

/// Parse a caller-supplied RFC 3339 date.
pub fn parse_event_date(date: &str) -> ValidationResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(date)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|_| ValidationError::new(format!("Invalid event date '{}'", date)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn event() -> Event {
        Event {
            id: "1".to_string(),
            name: "Board games".to_string(),
            description: "Monthly meetup".to_string(),
            date: Utc::now() + Duration::days(1),
            location: "Cafe".to_string(),
            max_players: 4,
            archived: false,
        }
    }

    #[test]
    fn test_email_pattern() {
        assert!(is_valid_email("ana@example.com"));
        assert!(is_valid_email("a.b+c@sub.example.org"));
        assert!(!is_valid_email("ana@example"));
        assert!(!is_valid_email("ana@.com"));
        assert!(!is_valid_email("ana@example."));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ana@@example.com"));
        assert!(!is_valid_email("ana @example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_validate_player() {
        assert!(validate_player(&Player::new("p1", "Ana", "ana@example.com")).is_ok());

        let err = validate_player(&Player::new("", "Ana", "ana@example.com")).unwrap_err();
        assert_eq!(err.reason(), "Player id is required");

        let err = validate_player(&Player::new("p1", "   ", "ana@example.com")).unwrap_err();
        assert_eq!(err.reason(), "Player name is required");

        let err = validate_player(&Player::new("p1", "Ana", "")).unwrap_err();
        assert_eq!(err.reason(), "Player email is required");

        let err = validate_player(&Player::new("p1", "Ana", "not-an-email")).unwrap_err();
        assert_eq!(err.reason(), "Invalid email format");
    }

    #[test]
    fn test_validate_rsvp_status() {
        assert_eq!(validate_rsvp_status("Yes").unwrap(), RsvpStatus::Yes);
        assert_eq!(validate_rsvp_status("No").unwrap(), RsvpStatus::No);
        assert_eq!(validate_rsvp_status("Maybe").unwrap(), RsvpStatus::Maybe);
        assert!(validate_rsvp_status("YES").is_err());
        assert!(validate_rsvp_status("").is_err());
    }

    #[test]
    fn test_validate_event() {
        let now = Utc::now();
        assert!(validate_event(&event(), now).is_ok());

        let mut past = event();
        past.date = now - Duration::days(1);
        assert_eq!(
            validate_event(&past, now).unwrap_err().reason(),
            "Event date must be in the future"
        );

        let mut empty_name = event();
        empty_name.name = " ".to_string();
        assert_eq!(
            validate_event(&empty_name, now).unwrap_err().reason(),
            "Event name is required"
        );

        let mut no_location = event();
        no_location.location = String::new();
        assert!(validate_event(&no_location, now).is_err());

        let mut zero = event();
        zero.max_players = 0;
        assert_eq!(
            validate_event(&zero, now).unwrap_err().reason(),
            "Max players must be a positive integer"
        );
    }

    #[test]
    fn test_parse_event_date() {
        let parsed = parse_event_date("2030-05-01T10:00:00+02:00").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2030-05-01T08:00:00+00:00");
        assert!(parse_event_date("next tuesday").is_err());
    }
}
