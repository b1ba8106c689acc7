//! Workload simulator implementation.
//!
//! Spawns one background task per generation loop:
//! - Users: slow cadence, insert-only
//! - Movies: medium cadence, insert-only
//! - Tickets: fast cadence, joins random existing users and movies
//! - Status updater: bounded random batch promotions
//!
//! Loops never terminate on a store error; the failure is logged and the
//! loop sleeps through its normal interval before trying again.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::booking::{BookingStore, StoreError, TicketStatus};
use crate::metrics;
use crate::sequencer::Sequencers;

use super::config::{SimulatorConfig, SimulatorMode};
use super::generate;
use super::types::{SimulatorError, SimulatorStatus};

/// The workload simulator - owns and supervises the generation loops.
pub struct Simulator {
    config: SimulatorConfig,
    store: Arc<dyn BookingStore>,
    sequencers: Arc<Sequencers>,

    // Runtime state
    running: Arc<AtomicBool>,
    shutdown_tx: broadcast::Sender<()>,
}

impl Simulator {
    /// Create a new simulator over an already-opened store.
    ///
    /// Seeds the identifier sequencers from the store's current maxima, so
    /// a restarted process resumes without colliding with earlier rows.
    pub fn new(
        config: SimulatorConfig,
        store: Arc<dyn BookingStore>,
    ) -> Result<Self, SimulatorError> {
        let sequencers = Arc::new(Sequencers::from_store(store.as_ref())?);
        let (shutdown_tx, _) = broadcast::channel(1);

        Ok(Self {
            config,
            store,
            sequencers,
            running: Arc::new(AtomicBool::new(false)),
            shutdown_tx,
        })
    }

    /// Tickets-only precondition: the store must already hold users and
    /// movies, otherwise ticket generation would run degenerate against an
    /// empty reference set. Checked once; concurrent writers racing this
    /// check are tolerated as eventual consistency.
    pub fn check_reference_data(store: &dyn BookingStore) -> Result<(), SimulatorError> {
        let users = store.count_users()?;
        let movies = store.count_movies()?;
        if users == 0 || movies == 0 {
            return Err(SimulatorError::NoReferenceData { users, movies });
        }
        Ok(())
    }

    /// Start the simulator (spawns background tasks).
    pub async fn start(&self) {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("Simulator already running");
            return;
        }

        info!(
            "Starting workload simulator (mode: {:?}, speed factor: {})",
            self.config.mode, self.config.speed_factor
        );

        if self.config.mode == SimulatorMode::Full {
            self.spawn_user_loop();
            self.spawn_movie_loop();
        }
        self.spawn_ticket_loop();
        self.spawn_status_loop();

        info!("Workload simulator started");
    }

    /// Stop the simulator gracefully.
    pub async fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            warn!("Simulator not running");
            return;
        }

        info!("Stopping workload simulator");

        // Signal shutdown to all workers
        let _ = self.shutdown_tx.send(());

        // Give workers a moment to finish current work
        tokio::time::sleep(Duration::from_millis(100)).await;

        info!("Workload simulator stopped");
    }

    /// Current status: running flag plus row counts per table and status.
    pub fn status(&self) -> Result<SimulatorStatus, StoreError> {
        Ok(SimulatorStatus {
            running: self.running.load(Ordering::Relaxed),
            users: self.store.count_users()?,
            movies: self.store.count_movies()?,
            scheduled_tickets: self.store.count_tickets(Some(TicketStatus::Scheduled))?,
            live_tickets: self.store.count_tickets(Some(TicketStatus::Live))?,
            finished_tickets: self.store.count_tickets(Some(TicketStatus::Finished))?,
        })
    }

    fn spawn_user_loop(&self) {
        let store = Arc::clone(&self.store);
        let sequencers = Arc::clone(&self.sequencers);
        self.spawn_loop("user generator", self.config.user_period(), move || {
            generate::generate_user(store.as_ref(), &sequencers.users).map(|_| ())
        });
    }

    fn spawn_movie_loop(&self) {
        let store = Arc::clone(&self.store);
        let sequencers = Arc::clone(&self.sequencers);
        self.spawn_loop("movie generator", self.config.movie_period(), move || {
            generate::generate_movie(store.as_ref(), &sequencers.movies).map(|_| ())
        });
    }

    fn spawn_ticket_loop(&self) {
        let store = Arc::clone(&self.store);
        let sequencers = Arc::clone(&self.sequencers);
        self.spawn_loop("ticket generator", self.config.ticket_period(), move || {
            generate::generate_ticket(store.as_ref(), &sequencers).map(|_| ())
        });
    }

    fn spawn_status_loop(&self) {
        let store = Arc::clone(&self.store);
        self.spawn_loop("status updater", self.config.status_period(), move || {
            generate::advance_statuses(store.as_ref()).map(|_| ())
        });
    }

    /// Spawn one supervised worker loop. The iteration closure runs after
    /// every sleep; a failed iteration is logged and counted, never fatal.
    fn spawn_loop<F>(&self, name: &'static str, period: Duration, iteration: F)
    where
        F: Fn() -> Result<(), StoreError> + Send + 'static,
    {
        let running = Arc::clone(&self.running);
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        tokio::spawn(async move {
            info!("{} loop started (period {:?})", name, period);
            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        info!("{} loop received shutdown signal", name);
                        break;
                    }
                    _ = tokio::time::sleep(period) => {
                        if !running.load(Ordering::Relaxed) {
                            break;
                        }
                        if let Err(e) = iteration() {
                            metrics::ITERATION_ERRORS.with_label_values(&[name]).inc();
                            warn!("{} iteration failed: {}", name, e);
                        }
                    }
                }
            }
            info!("{} loop stopped", name);
        });
    }
}
