//! Core booking data types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a ticket.
///
/// Tickets move through a linear progression: a purchase starts out
/// `Scheduled`, goes `Live` when the show starts, and ends up `Finished`.
/// `Finished` is terminal; transitions never skip a step and never reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Scheduled,
    Live,
    Finished,
}

impl TicketStatus {
    /// The next status in the progression, or `None` from the terminal state.
    pub fn next(&self) -> Option<TicketStatus> {
        match self {
            TicketStatus::Scheduled => Some(TicketStatus::Live),
            TicketStatus::Live => Some(TicketStatus::Finished),
            TicketStatus::Finished => None,
        }
    }

    /// Returns true if no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TicketStatus::Finished)
    }

    /// The status as the string stored in the `tickets.status` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Scheduled => "scheduled",
            TicketStatus::Live => "live",
            TicketStatus::Finished => "finished",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(TicketStatus::Scheduled),
            "live" => Ok(TicketStatus::Live),
            "finished" => Ok(TicketStatus::Finished),
            other => Err(format!("unknown ticket status: {}", other)),
        }
    }
}

/// A registered user. Insert-only; never mutated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub full_name: String,
}

/// A scheduled movie showing. Insert-only; never mutated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    pub movie_id: i64,
    pub title: String,
    pub description: String,
    pub duration_minutes: i64,
    /// Showtime; always in the future at generation time.
    pub start_date: DateTime<Utc>,
}

/// A ticket purchase joining a user to a movie.
///
/// Only `status` is ever mutated after insertion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub ticket_id: i64,
    pub movie_id: i64,
    pub user_id: i64,
    pub cost: f64,
    pub status: TicketStatus,
    pub purchased_at: DateTime<Utc>,
}

/// Request to insert a new user. The identifier is caller-assigned.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub full_name: String,
}

/// Request to insert a new movie. The identifier is caller-assigned.
#[derive(Debug, Clone)]
pub struct NewMovie {
    pub movie_id: i64,
    pub title: String,
    pub description: String,
    pub duration_minutes: i64,
    pub start_date: DateTime<Utc>,
}

/// Request to insert a new ticket.
///
/// `movie_id` and `user_id` must reference rows that exist at insertion time.
#[derive(Debug, Clone)]
pub struct NewTicket {
    pub ticket_id: i64,
    pub movie_id: i64,
    pub user_id: i64,
    pub cost: f64,
    pub status: TicketStatus,
    pub purchased_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_progression_is_linear() {
        assert_eq!(TicketStatus::Scheduled.next(), Some(TicketStatus::Live));
        assert_eq!(TicketStatus::Live.next(), Some(TicketStatus::Finished));
        assert_eq!(TicketStatus::Finished.next(), None);
    }

    #[test]
    fn test_only_finished_is_terminal() {
        assert!(!TicketStatus::Scheduled.is_terminal());
        assert!(!TicketStatus::Live.is_terminal());
        assert!(TicketStatus::Finished.is_terminal());
    }

    #[test]
    fn test_status_string_round_trip() {
        for status in [
            TicketStatus::Scheduled,
            TicketStatus::Live,
            TicketStatus::Finished,
        ] {
            assert_eq!(status.as_str().parse::<TicketStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_status_rejects_unknown_string() {
        assert!("cancelled".parse::<TicketStatus>().is_err());
    }

    #[test]
    fn test_status_serde_uses_snake_case() {
        let json = serde_json::to_string(&TicketStatus::Scheduled).unwrap();
        assert_eq!(json, "\"scheduled\"");
        let parsed: TicketStatus = serde_json::from_str("\"live\"").unwrap();
        assert_eq!(parsed, TicketStatus::Live);
    }
}
