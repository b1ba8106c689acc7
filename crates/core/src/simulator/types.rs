//! Types for the workload simulator.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while setting up or running the simulator.
#[derive(Debug, Error)]
pub enum SimulatorError {
    /// Store error.
    #[error("store error: {0}")]
    Store(#[from] crate::booking::StoreError),

    /// Tickets-only mode requires pre-existing reference data.
    #[error("tickets-only mode needs existing reference data (users: {users}, movies: {movies})")]
    NoReferenceData { users: i64, movies: i64 },
}

/// Current status of the simulator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulatorStatus {
    /// Whether the worker loops are running.
    pub running: bool,
    /// Rows in the users table.
    pub users: i64,
    /// Rows in the movies table.
    pub movies: i64,
    /// Tickets currently "scheduled".
    pub scheduled_tickets: i64,
    /// Tickets currently "live".
    pub live_tickets: i64,
    /// Tickets currently "finished".
    pub finished_tickets: i64,
}
