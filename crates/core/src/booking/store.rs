//! Booking storage trait and error type.

use thiserror::Error;

use super::{NewMovie, NewTicket, NewUser, Ticket, TicketStatus};

/// Error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying database error.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A stored value could not be mapped back to a domain type.
    #[error("corrupt row: {0}")]
    CorruptRow(String),
}

/// Trait for booking storage backends.
///
/// The generator treats the datastore as an external collaborator: all it
/// needs is parameterized insert/update/select with transactional commit.
/// Random row sampling is delegated to the store so workers never cache
/// identifier sets in memory.
pub trait BookingStore: Send + Sync {
    /// Current maximum user identifier, or 0 when the table is empty.
    fn max_user_id(&self) -> Result<i64, StoreError>;

    /// Current maximum movie identifier, or 0 when the table is empty.
    fn max_movie_id(&self) -> Result<i64, StoreError>;

    /// Current maximum ticket identifier, or 0 when the table is empty.
    fn max_ticket_id(&self) -> Result<i64, StoreError>;

    /// Number of rows in the users table.
    fn count_users(&self) -> Result<i64, StoreError>;

    /// Number of rows in the movies table.
    fn count_movies(&self) -> Result<i64, StoreError>;

    /// Insert a user. Returns false when a duplicate username caused the
    /// insert to be skipped (the conflict is silently ignored, not an error).
    fn insert_user(&self, user: &NewUser) -> Result<bool, StoreError>;

    /// Insert a movie unconditionally.
    fn insert_movie(&self, movie: &NewMovie) -> Result<(), StoreError>;

    /// Insert a ticket. Both references must exist at insertion time.
    fn insert_ticket(&self, ticket: &NewTicket) -> Result<(), StoreError>;

    /// One user identifier sampled uniformly at random, or `None` when the
    /// table is empty.
    fn random_user_id(&self) -> Result<Option<i64>, StoreError>;

    /// One movie identifier sampled uniformly at random, or `None` when the
    /// table is empty.
    fn random_movie_id(&self) -> Result<Option<i64>, StoreError>;

    /// Promote up to `limit` uniformly-sampled tickets currently in `from`
    /// to `to`, returning the number of rows changed. When fewer qualifying
    /// rows exist than requested, all of them are taken.
    fn promote_tickets(
        &self,
        from: TicketStatus,
        to: TicketStatus,
        limit: u32,
    ) -> Result<u64, StoreError>;

    /// Count tickets, optionally restricted to one status.
    fn count_tickets(&self, status: Option<TicketStatus>) -> Result<i64, StoreError>;

    /// All tickets, ordered by identifier. Intended for tests and status
    /// reporting; the generation loops never call this.
    fn list_tickets(&self) -> Result<Vec<Ticket>, StoreError>;

    /// Whether a user with this identifier exists.
    fn user_exists(&self, user_id: i64) -> Result<bool, StoreError>;

    /// Whether a movie with this identifier exists.
    fn movie_exists(&self, movie_id: i64) -> Result<bool, StoreError>;
}
