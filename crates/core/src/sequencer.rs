//! Process-local identifier sequencing.
//!
//! Each entity type gets its own monotonic counter, seeded once at startup
//! from the store's current maximum so a restarted generator resumes without
//! colliding with rows it wrote earlier. This only holds for a single writer;
//! running several generator processes against the same store is a known
//! limitation, not something this module tries to paper over.

use std::sync::atomic::{AtomicI64, Ordering};

use crate::booking::{BookingStore, StoreError};

/// Issues strictly-increasing identifiers for one entity type.
#[derive(Debug)]
pub struct IdSequencer {
    next: AtomicI64,
}

impl IdSequencer {
    /// A sequencer whose first issued identifier is `max + 1`.
    pub fn starting_after(max: i64) -> Self {
        Self {
            next: AtomicI64::new(max + 1),
        }
    }

    /// Issue the next identifier. Every call consumes it, even if the caller
    /// later skips the insert.
    pub fn next(&self) -> i64 {
        self.next.fetch_add(1, Ordering::SeqCst)
    }
}

/// One sequencer per entity type, seeded from the store.
#[derive(Debug)]
pub struct Sequencers {
    pub users: IdSequencer,
    pub movies: IdSequencer,
    pub tickets: IdSequencer,
}

impl Sequencers {
    /// Read the current maxima from the store and seed all three sequencers.
    pub fn from_store(store: &dyn BookingStore) -> Result<Self, StoreError> {
        Ok(Self {
            users: IdSequencer::starting_after(store.max_user_id()?),
            movies: IdSequencer::starting_after(store.max_movie_id()?),
            tickets: IdSequencer::starting_after(store.max_ticket_id()?),
        })
    }
}
