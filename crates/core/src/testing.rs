//! Testing utilities shared by unit and integration tests.

/// Test fixtures and helper functions.
pub mod fixtures {
    use chrono::{Duration, Utc};

    use crate::booking::{BookingStore, NewMovie, NewTicket, NewUser, TicketStatus};

    /// A user insert request with derived email and display name.
    pub fn user(user_id: i64, username: &str) -> NewUser {
        NewUser {
            user_id,
            username: username.to_string(),
            email: format!("{}@example.com", username),
            full_name: format!("{} Tester", username),
        }
    }

    /// A movie insert request with a showtime one week out.
    pub fn movie(movie_id: i64) -> NewMovie {
        NewMovie {
            movie_id,
            title: format!("Test Feature {}", movie_id),
            description: "A 120-minute test feature".to_string(),
            duration_minutes: 120,
            start_date: Utc::now() + Duration::days(7),
        }
    }

    /// A ticket insert request referencing the given rows.
    pub fn ticket(ticket_id: i64, movie_id: i64, user_id: i64, status: TicketStatus) -> NewTicket {
        NewTicket {
            ticket_id,
            movie_id,
            user_id,
            cost: 12.50,
            status,
            purchased_at: Utc::now(),
        }
    }

    /// Insert `count` users with identifiers 1..=count.
    pub fn seed_users(store: &dyn BookingStore, count: i64) {
        for id in 1..=count {
            store
                .insert_user(&user(id, &format!("user{}", id)))
                .expect("seed user insert failed");
        }
    }

    /// Insert `count` movies with identifiers 1..=count.
    pub fn seed_movies(store: &dyn BookingStore, count: i64) {
        for id in 1..=count {
            store.insert_movie(&movie(id)).expect("seed movie insert failed");
        }
    }

    /// Insert `count` tickets with identifiers 1..=count, all referencing
    /// user 1 and movie 1, all in the given status.
    pub fn seed_tickets(store: &dyn BookingStore, count: i64, status: TicketStatus) {
        for id in 1..=count {
            store
                .insert_ticket(&ticket(id, 1, 1, status))
                .expect("seed ticket insert failed");
        }
    }
}
