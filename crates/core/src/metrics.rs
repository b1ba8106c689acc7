//! Prometheus metrics for the generation loops.
//!
//! Counters only; this process logs rather than exporting, so the counters
//! live in statics and scraping is left to whoever embeds the core.

use once_cell::sync::Lazy;
use prometheus::{IntCounter, IntCounterVec, Opts};

/// Rows inserted per entity type ("user", "movie", "ticket").
pub static ROWS_INSERTED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("seatfill_rows_inserted_total", "Total rows inserted"),
        &["entity"],
    )
    .unwrap()
});

/// User inserts skipped because the randomized username already existed.
pub static USERNAME_CONFLICTS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "seatfill_username_conflicts_total",
        "User inserts skipped on duplicate username",
    )
    .unwrap()
});

/// Ticket iterations skipped because users or movies were still empty.
pub static TICKET_SKIPS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "seatfill_ticket_skips_total",
        "Ticket iterations skipped for lack of reference rows",
    )
    .unwrap()
});

/// Status promotions by transition ("scheduled_to_live", "live_to_finished").
pub static STATUS_PROMOTIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "seatfill_status_promotions_total",
            "Ticket status promotions",
        ),
        &["transition"],
    )
    .unwrap()
});

/// Iterations that failed with a store error, per worker.
pub static ITERATION_ERRORS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "seatfill_iteration_errors_total",
            "Generation iterations that failed and were skipped",
        ),
        &["worker"],
    )
    .unwrap()
});
