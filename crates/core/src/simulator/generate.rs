//! Single-iteration generation operations.
//!
//! Each function here is one iteration of a worker loop, free-standing so
//! tests can drive them directly without spawning tasks. All randomness is
//! drawn fresh per call; nothing is cached between iterations, so every
//! iteration sees the store's current contents.

use chrono::{DateTime, TimeZone, Utc};
use rand::Rng;
use tracing::debug;

use crate::booking::{
    BookingStore, NewMovie, NewTicket, NewUser, StoreError, TicketStatus,
};
use crate::metrics;
use crate::sequencer::{IdSequencer, Sequencers};

const FIRST_NAMES: &[&str] = &[
    "ada", "bruno", "carla", "dmitri", "elena", "farid", "greta", "hugo", "ines", "jonas",
    "kaori", "luca", "mira", "nadia", "otto", "priya", "quinn", "rosa", "sven", "tara",
];

const LAST_NAMES: &[&str] = &[
    "Abbot", "Brandt", "Costa", "Dubois", "Eriksen", "Fischer", "Garcia", "Hoffman",
    "Ivanov", "Jensen", "Keller", "Lindqvist", "Moreau", "Novak", "Okafor", "Petrov",
    "Quiroga", "Rossi", "Sato", "Tanaka",
];

const MOVIE_TITLES: &[&str] = &[
    "Midnight Express", "Silent Harbor", "The Last Reel", "Neon Alley", "Paper Moons",
    "Glass Mountain", "Red Horizon", "The Velvet Hour", "Static Drift", "Winter Arcade",
    "Copper Sky", "The Long Intermission",
];

const GENRES: &[&str] = &[
    "thriller", "drama", "comedy", "documentary", "science fiction", "noir", "western",
];

fn pick<'a>(rng: &mut impl Rng, items: &'a [&'a str]) -> &'a str {
    items[rng.gen_range(0..items.len())]
}

fn round_cents(cost: f64) -> f64 {
    (cost * 100.0).round() / 100.0
}

/// Weighted initial status for a fresh ticket: 70% scheduled, 20% live,
/// 10% finished. Letting some tickets start mid-progression simulates a
/// system with backlog instead of only cold-start tickets.
fn initial_status(rng: &mut impl Rng) -> TicketStatus {
    match rng.gen_range(0..100) {
        0..=69 => TicketStatus::Scheduled,
        70..=89 => TicketStatus::Live,
        _ => TicketStatus::Finished,
    }
}

/// A showtime uniformly spread over the next 30 days, at day/hour
/// granularity with the minute snapped to :00 or :30. Always in the future.
fn random_showtime(rng: &mut impl Rng) -> DateTime<Utc> {
    let days = rng.gen_range(1..=30);
    let hour = rng.gen_range(0..24);
    let minute = if rng.gen_bool(0.5) { 0 } else { 30 };

    let fallback = Utc::now() + chrono::Duration::days(days);
    let date = fallback.date_naive();
    date.and_hms_opt(hour, minute, 0)
        .map(|naive| Utc.from_utc_datetime(&naive))
        .unwrap_or(fallback)
}

/// One user-generator iteration: insert a pseudo-random account.
///
/// Returns whether a row was written; a duplicate username is skipped
/// silently and the issued identifier is wasted, which is accepted.
pub fn generate_user(
    store: &dyn BookingStore,
    sequencer: &IdSequencer,
) -> Result<bool, StoreError> {
    let mut rng = rand::thread_rng();

    let first = pick(&mut rng, FIRST_NAMES);
    let last = pick(&mut rng, LAST_NAMES);
    let username = format!("{}{}", first, rng.gen_range(100..100_000));

    let user = NewUser {
        user_id: sequencer.next(),
        email: format!("{}@example.com", username),
        full_name: format!(
            "{}{} {}",
            first[..1].to_uppercase(),
            &first[1..],
            last
        ),
        username,
    };

    let inserted = store.insert_user(&user)?;
    if inserted {
        metrics::ROWS_INSERTED.with_label_values(&["user"]).inc();
        debug!("Inserted user {} ({})", user.user_id, user.username);
    } else {
        metrics::USERNAME_CONFLICTS.inc();
        debug!("Username {} already taken, insert skipped", user.username);
    }
    Ok(inserted)
}

/// One movie-generator iteration: insert a showing with a randomized
/// future showtime.
pub fn generate_movie(
    store: &dyn BookingStore,
    sequencer: &IdSequencer,
) -> Result<i64, StoreError> {
    let mut rng = rand::thread_rng();

    let duration_minutes = rng.gen_range(90..=180);
    let genre = pick(&mut rng, GENRES);
    let movie = NewMovie {
        movie_id: sequencer.next(),
        title: format!("{} {}", pick(&mut rng, MOVIE_TITLES), rng.gen_range(1..10_000)),
        description: format!("A {}-minute {} feature", duration_minutes, genre),
        duration_minutes,
        start_date: random_showtime(&mut rng),
    };

    store.insert_movie(&movie)?;
    metrics::ROWS_INSERTED.with_label_values(&["movie"]).inc();
    debug!(
        "Inserted movie {} ({:?}, starts {})",
        movie.movie_id, movie.title, movie.start_date
    );
    Ok(movie.movie_id)
}

/// One ticket-generator iteration: join a random existing user and movie
/// into a purchase.
///
/// When either reference table is still empty the iteration is skipped
/// without consuming a ticket identifier; returns the inserted ticket id
/// otherwise.
pub fn generate_ticket(
    store: &dyn BookingStore,
    sequencers: &Sequencers,
) -> Result<Option<i64>, StoreError> {
    let Some(user_id) = store.random_user_id()? else {
        metrics::TICKET_SKIPS.inc();
        debug!("No users yet, skipping ticket iteration");
        return Ok(None);
    };
    let Some(movie_id) = store.random_movie_id()? else {
        metrics::TICKET_SKIPS.inc();
        debug!("No movies yet, skipping ticket iteration");
        return Ok(None);
    };

    let mut rng = rand::thread_rng();
    let ticket = NewTicket {
        ticket_id: sequencers.tickets.next(),
        movie_id,
        user_id,
        cost: round_cents(rng.gen_range(8.50..=25.00)),
        status: initial_status(&mut rng),
        purchased_at: Utc::now(),
    };

    store.insert_ticket(&ticket)?;
    metrics::ROWS_INSERTED.with_label_values(&["ticket"]).inc();
    debug!(
        "Inserted ticket {} (user {}, movie {}, {} at {:.2})",
        ticket.ticket_id, user_id, movie_id, ticket.status, ticket.cost
    );
    Ok(Some(ticket.ticket_id))
}

/// One status-updater pass: two independent bounded batch promotions.
///
/// Promotes a random 1..=3 of currently scheduled tickets to live and,
/// independently, a random 1..=2 of currently live tickets to finished.
/// The finished batch runs first so both draws sample the state as it was
/// at the start of the pass; a ticket never advances two steps in one
/// pass. Fewer qualifying rows than requested means all of them are taken.
/// Returns the (to-live, to-finished) affected-row counts.
pub fn advance_statuses(store: &dyn BookingStore) -> Result<(u64, u64), StoreError> {
    let mut rng = rand::thread_rng();

    let to_finished = store.promote_tickets(
        TicketStatus::Live,
        TicketStatus::Finished,
        rng.gen_range(1..=2),
    )?;
    metrics::STATUS_PROMOTIONS
        .with_label_values(&["live_to_finished"])
        .inc_by(to_finished);

    let to_live = store.promote_tickets(
        TicketStatus::Scheduled,
        TicketStatus::Live,
        rng.gen_range(1..=3),
    )?;
    metrics::STATUS_PROMOTIONS
        .with_label_values(&["scheduled_to_live"])
        .inc_by(to_live);

    if to_live > 0 || to_finished > 0 {
        debug!(
            "Promoted {} tickets to live, {} to finished",
            to_live, to_finished
        );
    }
    Ok((to_live, to_finished))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_cents() {
        assert_eq!(round_cents(12.3456), 12.35);
        assert_eq!(round_cents(24.999), 25.0);
        assert_eq!(round_cents(10.0), 10.0);
    }

    #[test]
    fn test_initial_status_covers_all_variants() {
        let mut rng = rand::thread_rng();
        let mut seen = [false; 3];
        for _ in 0..2_000 {
            match initial_status(&mut rng) {
                TicketStatus::Scheduled => seen[0] = true,
                TicketStatus::Live => seen[1] = true,
                TicketStatus::Finished => seen[2] = true,
            }
        }
        assert_eq!(seen, [true, true, true]);
    }

    #[test]
    fn test_initial_status_is_mostly_scheduled() {
        let mut rng = rand::thread_rng();
        let draws = 10_000;
        let scheduled = (0..draws)
            .filter(|_| initial_status(&mut rng) == TicketStatus::Scheduled)
            .count();
        // 70% nominal; allow generous slack for randomness.
        assert!(scheduled > draws * 6 / 10);
        assert!(scheduled < draws * 8 / 10);
    }

    #[test]
    fn test_random_showtime_is_future_and_half_hour_aligned() {
        let mut rng = rand::thread_rng();
        for _ in 0..200 {
            let showtime = random_showtime(&mut rng);
            assert!(showtime > Utc::now());
            assert!(showtime <= Utc::now() + chrono::Duration::days(31));
            let minute = showtime.format("%M").to_string();
            assert!(minute == "00" || minute == "30");
        }
    }
}
