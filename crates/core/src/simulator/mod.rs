//! Workload simulator driving the four generation loops.
//!
//! Each loop runs on its own cadence, scaled by a global speed factor:
//! - **Users** (slow): new accounts
//! - **Movies** (medium): new showings with randomized future showtimes
//! - **Tickets** (fast): purchases joining random existing users and movies
//! - **Status updater**: advances random tickets through scheduled -> live -> finished
//!
//! The loops share no in-memory state; they coordinate only through the
//! store's current contents.

mod config;
mod generate;
mod runner;
mod types;

pub use config::{SimulatorConfig, SimulatorMode};
pub use generate::{advance_statuses, generate_movie, generate_ticket, generate_user};
pub use runner::Simulator;
pub use types::{SimulatorError, SimulatorStatus};
