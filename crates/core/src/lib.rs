pub mod booking;
pub mod config;
pub mod metrics;
pub mod sequencer;
pub mod simulator;
pub mod testing;

pub use booking::{
    BookingStore, Movie, NewMovie, NewTicket, NewUser, SqliteBookingStore, StoreError, Ticket,
    TicketStatus, User,
};
pub use config::{load_config, load_config_from_str, validate_config, Config, ConfigError};
pub use sequencer::{IdSequencer, Sequencers};
pub use simulator::{
    advance_statuses, generate_movie, generate_ticket, generate_user, Simulator, SimulatorConfig,
    SimulatorError, SimulatorMode, SimulatorStatus,
};
