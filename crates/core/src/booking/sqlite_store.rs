//! SQLite-backed booking store implementation.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::{
    BookingStore, NewMovie, NewTicket, NewUser, StoreError, Ticket, TicketStatus,
};

/// SQLite-backed booking store.
///
/// The upstream Postgres deployment keeps these tables under an `osb`
/// schema; SQLite is single-schema, so the tables live unqualified here.
pub struct SqliteBookingStore {
    conn: Mutex<Connection>,
}

impl SqliteBookingStore {
    /// Open (or create) the database file and bootstrap the tables.
    pub fn new(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory booking store (useful for testing).
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            r#"
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS users (
                user_id INTEGER PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                email TEXT NOT NULL,
                full_name TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS movies (
                movie_id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                duration_minutes INTEGER NOT NULL,
                start_date TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS tickets (
                ticket_id INTEGER PRIMARY KEY,
                movie_id INTEGER NOT NULL REFERENCES movies(movie_id),
                user_id INTEGER NOT NULL REFERENCES users(user_id),
                cost REAL NOT NULL,
                status TEXT NOT NULL,
                purchased_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_tickets_status ON tickets(status);
            "#,
        )?;

        Ok(())
    }

    fn row_to_ticket(row: &rusqlite::Row) -> rusqlite::Result<(Ticket, String)> {
        let ticket_id: i64 = row.get(0)?;
        let movie_id: i64 = row.get(1)?;
        let user_id: i64 = row.get(2)?;
        let cost: f64 = row.get(3)?;
        let status_str: String = row.get(4)?;
        let purchased_at_str: String = row.get(5)?;

        let purchased_at = DateTime::parse_from_rfc3339(&purchased_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        let ticket = Ticket {
            ticket_id,
            movie_id,
            user_id,
            cost,
            // Placeholder; replaced by the caller after status parsing.
            status: TicketStatus::Scheduled,
            purchased_at,
        };

        Ok((ticket, status_str))
    }
}

impl BookingStore for SqliteBookingStore {
    fn max_user_id(&self) -> Result<i64, StoreError> {
        let conn = self.conn.lock().unwrap();
        let max = conn.query_row("SELECT COALESCE(MAX(user_id), 0) FROM users", [], |row| {
            row.get(0)
        })?;
        Ok(max)
    }

    fn max_movie_id(&self) -> Result<i64, StoreError> {
        let conn = self.conn.lock().unwrap();
        let max = conn.query_row(
            "SELECT COALESCE(MAX(movie_id), 0) FROM movies",
            [],
            |row| row.get(0),
        )?;
        Ok(max)
    }

    fn max_ticket_id(&self) -> Result<i64, StoreError> {
        let conn = self.conn.lock().unwrap();
        let max = conn.query_row(
            "SELECT COALESCE(MAX(ticket_id), 0) FROM tickets",
            [],
            |row| row.get(0),
        )?;
        Ok(max)
    }

    fn count_users(&self) -> Result<i64, StoreError> {
        let conn = self.conn.lock().unwrap();
        let count = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count)
    }

    fn count_movies(&self) -> Result<i64, StoreError> {
        let conn = self.conn.lock().unwrap();
        let count = conn.query_row("SELECT COUNT(*) FROM movies", [], |row| row.get(0))?;
        Ok(count)
    }

    fn insert_user(&self, user: &NewUser) -> Result<bool, StoreError> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            "INSERT INTO users (user_id, username, email, full_name) VALUES (?, ?, ?, ?) \
             ON CONFLICT(username) DO NOTHING",
            params![user.user_id, user.username, user.email, user.full_name],
        )?;
        Ok(changed > 0)
    }

    fn insert_movie(&self, movie: &NewMovie) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO movies (movie_id, title, description, duration_minutes, start_date) \
             VALUES (?, ?, ?, ?, ?)",
            params![
                movie.movie_id,
                movie.title,
                movie.description,
                movie.duration_minutes,
                movie.start_date.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn insert_ticket(&self, ticket: &NewTicket) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO tickets (ticket_id, movie_id, user_id, cost, status, purchased_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                ticket.ticket_id,
                ticket.movie_id,
                ticket.user_id,
                ticket.cost,
                ticket.status.as_str(),
                ticket.purchased_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn random_user_id(&self) -> Result<Option<i64>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let id = conn
            .query_row(
                "SELECT user_id FROM users ORDER BY RANDOM() LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    fn random_movie_id(&self) -> Result<Option<i64>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let id = conn
            .query_row(
                "SELECT movie_id FROM movies ORDER BY RANDOM() LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    fn promote_tickets(
        &self,
        from: TicketStatus,
        to: TicketStatus,
        limit: u32,
    ) -> Result<u64, StoreError> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            "UPDATE tickets SET status = ?1 WHERE ticket_id IN \
             (SELECT ticket_id FROM tickets WHERE status = ?2 ORDER BY RANDOM() LIMIT ?3)",
            params![to.as_str(), from.as_str(), limit],
        )?;
        Ok(changed as u64)
    }

    fn count_tickets(&self, status: Option<TicketStatus>) -> Result<i64, StoreError> {
        let conn = self.conn.lock().unwrap();
        let count = match status {
            Some(status) => conn.query_row(
                "SELECT COUNT(*) FROM tickets WHERE status = ?",
                params![status.as_str()],
                |row| row.get(0),
            )?,
            None => conn.query_row("SELECT COUNT(*) FROM tickets", [], |row| row.get(0))?,
        };
        Ok(count)
    }

    fn list_tickets(&self) -> Result<Vec<Ticket>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT ticket_id, movie_id, user_id, cost, status, purchased_at \
             FROM tickets ORDER BY ticket_id",
        )?;
        let rows = stmt.query_map([], Self::row_to_ticket)?;

        let mut tickets = Vec::new();
        for row in rows {
            let (mut ticket, status_str) = row?;
            ticket.status = status_str
                .parse()
                .map_err(|e: String| StoreError::CorruptRow(e))?;
            tickets.push(ticket);
        }
        Ok(tickets)
    }

    fn user_exists(&self, user_id: i64) -> Result<bool, StoreError> {
        let conn = self.conn.lock().unwrap();
        let found: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM users WHERE user_id = ?",
                params![user_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn movie_exists(&self, movie_id: i64) -> Result<bool, StoreError> {
        let conn = self.conn.lock().unwrap();
        let found: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM movies WHERE movie_id = ?",
                params![movie_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[test]
    fn test_max_ids_start_at_zero() {
        let store = SqliteBookingStore::in_memory().unwrap();
        assert_eq!(store.max_user_id().unwrap(), 0);
        assert_eq!(store.max_movie_id().unwrap(), 0);
        assert_eq!(store.max_ticket_id().unwrap(), 0);
    }

    #[test]
    fn test_insert_user_and_read_back_max() {
        let store = SqliteBookingStore::in_memory().unwrap();
        assert!(store.insert_user(&fixtures::user(7, "alice")).unwrap());
        assert_eq!(store.max_user_id().unwrap(), 7);
        assert_eq!(store.count_users().unwrap(), 1);
    }

    #[test]
    fn test_duplicate_username_is_skipped_not_error() {
        let store = SqliteBookingStore::in_memory().unwrap();
        assert!(store.insert_user(&fixtures::user(1, "alice")).unwrap());
        assert!(!store.insert_user(&fixtures::user(2, "alice")).unwrap());
        assert_eq!(store.count_users().unwrap(), 1);
    }

    #[test]
    fn test_random_ids_empty_tables_yield_none() {
        let store = SqliteBookingStore::in_memory().unwrap();
        assert_eq!(store.random_user_id().unwrap(), None);
        assert_eq!(store.random_movie_id().unwrap(), None);
    }

    #[test]
    fn test_random_ids_come_from_existing_rows() {
        let store = SqliteBookingStore::in_memory().unwrap();
        fixtures::seed_users(&store, 3);
        fixtures::seed_movies(&store, 2);

        for _ in 0..20 {
            let user_id = store.random_user_id().unwrap().unwrap();
            assert!((1..=3).contains(&user_id));
            let movie_id = store.random_movie_id().unwrap().unwrap();
            assert!((1..=2).contains(&movie_id));
        }
    }

    #[test]
    fn test_ticket_insert_requires_existing_references() {
        let store = SqliteBookingStore::in_memory().unwrap();
        let result = store.insert_ticket(&fixtures::ticket(1, 1, 1, TicketStatus::Scheduled));
        assert!(result.is_err());

        fixtures::seed_users(&store, 1);
        fixtures::seed_movies(&store, 1);
        store
            .insert_ticket(&fixtures::ticket(1, 1, 1, TicketStatus::Scheduled))
            .unwrap();
        assert_eq!(store.count_tickets(None).unwrap(), 1);
    }

    #[test]
    fn test_promote_respects_limit() {
        let store = SqliteBookingStore::in_memory().unwrap();
        fixtures::seed_users(&store, 1);
        fixtures::seed_movies(&store, 1);
        for id in 1..=5 {
            store
                .insert_ticket(&fixtures::ticket(id, 1, 1, TicketStatus::Scheduled))
                .unwrap();
        }

        let changed = store
            .promote_tickets(TicketStatus::Scheduled, TicketStatus::Live, 3)
            .unwrap();
        assert_eq!(changed, 3);
        assert_eq!(
            store.count_tickets(Some(TicketStatus::Live)).unwrap(),
            3
        );
        assert_eq!(
            store.count_tickets(Some(TicketStatus::Scheduled)).unwrap(),
            2
        );
    }

    #[test]
    fn test_promote_takes_all_when_fewer_qualify() {
        let store = SqliteBookingStore::in_memory().unwrap();
        fixtures::seed_users(&store, 1);
        fixtures::seed_movies(&store, 1);
        store
            .insert_ticket(&fixtures::ticket(1, 1, 1, TicketStatus::Live))
            .unwrap();

        let changed = store
            .promote_tickets(TicketStatus::Live, TicketStatus::Finished, 2)
            .unwrap();
        assert_eq!(changed, 1);
        assert_eq!(
            store.count_tickets(Some(TicketStatus::Finished)).unwrap(),
            1
        );
    }

    #[test]
    fn test_promote_with_no_qualifying_rows_is_noop() {
        let store = SqliteBookingStore::in_memory().unwrap();
        let changed = store
            .promote_tickets(TicketStatus::Scheduled, TicketStatus::Live, 3)
            .unwrap();
        assert_eq!(changed, 0);
    }

    #[test]
    fn test_list_tickets_round_trips_status() {
        let store = SqliteBookingStore::in_memory().unwrap();
        fixtures::seed_users(&store, 1);
        fixtures::seed_movies(&store, 1);
        store
            .insert_ticket(&fixtures::ticket(1, 1, 1, TicketStatus::Live))
            .unwrap();

        let tickets = store.list_tickets().unwrap();
        assert_eq!(tickets.len(), 1);
        assert_eq!(tickets[0].status, TicketStatus::Live);
        assert_eq!(tickets[0].ticket_id, 1);
    }

    #[test]
    fn test_on_disk_store_survives_reopen() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("seatfill.db");

        {
            let store = SqliteBookingStore::new(&path).unwrap();
            fixtures::seed_users(&store, 2);
        }

        let store = SqliteBookingStore::new(&path).unwrap();
        assert_eq!(store.max_user_id().unwrap(), 2);
    }
}
