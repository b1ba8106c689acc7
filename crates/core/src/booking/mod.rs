//! Booking data model and storage for the workload generator.

mod sqlite_store;
mod store;
mod types;

pub use sqlite_store::SqliteBookingStore;
pub use store::{BookingStore, StoreError};
pub use types::{Movie, NewMovie, NewTicket, NewUser, Ticket, TicketStatus, User};
