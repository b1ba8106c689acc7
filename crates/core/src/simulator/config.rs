//! Simulator configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Operating mode of the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SimulatorMode {
    /// All four loops run.
    #[default]
    Full,
    /// Only ticket generation and status updates; requires pre-existing
    /// users and movies in the store.
    TicketsOnly,
}

/// Configuration for the workload simulator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Global divisor applied to every cadence. 10.0 makes the simulation
    /// run ten times faster than the nominal intervals below.
    #[serde(default = "default_speed_factor")]
    pub speed_factor: f64,

    /// Operating mode.
    #[serde(default)]
    pub mode: SimulatorMode,

    /// Nominal milliseconds between user inserts.
    #[serde(default = "default_user_interval")]
    pub user_interval_ms: u64,

    /// Nominal milliseconds between movie inserts.
    #[serde(default = "default_movie_interval")]
    pub movie_interval_ms: u64,

    /// Nominal milliseconds between ticket inserts.
    #[serde(default = "default_ticket_interval")]
    pub ticket_interval_ms: u64,

    /// Nominal milliseconds between status-updater passes.
    #[serde(default = "default_status_interval")]
    pub status_interval_ms: u64,
}

fn default_speed_factor() -> f64 {
    10.0
}

fn default_user_interval() -> u64 {
    30_000
}

fn default_movie_interval() -> u64 {
    10_000
}

fn default_ticket_interval() -> u64 {
    2_000
}

fn default_status_interval() -> u64 {
    5_000
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            speed_factor: default_speed_factor(),
            mode: SimulatorMode::default(),
            user_interval_ms: default_user_interval(),
            movie_interval_ms: default_movie_interval(),
            ticket_interval_ms: default_ticket_interval(),
            status_interval_ms: default_status_interval(),
        }
    }
}

impl SimulatorConfig {
    /// Effective sleep between iterations for a nominal cadence.
    fn period(&self, cadence_ms: u64) -> Duration {
        Duration::from_secs_f64(cadence_ms as f64 / 1000.0 / self.speed_factor)
    }

    pub fn user_period(&self) -> Duration {
        self.period(self.user_interval_ms)
    }

    pub fn movie_period(&self) -> Duration {
        self.period(self.movie_interval_ms)
    }

    pub fn ticket_period(&self) -> Duration {
        self.period(self.ticket_interval_ms)
    }

    pub fn status_period(&self) -> Duration {
        self.period(self.status_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SimulatorConfig::default();
        assert_eq!(config.speed_factor, 10.0);
        assert_eq!(config.mode, SimulatorMode::Full);
        assert_eq!(config.user_interval_ms, 30_000);
        assert_eq!(config.movie_interval_ms, 10_000);
        assert_eq!(config.ticket_interval_ms, 2_000);
        assert_eq!(config.status_interval_ms, 5_000);
    }

    #[test]
    fn test_speed_factor_divides_cadence() {
        let config = SimulatorConfig {
            speed_factor: 1.0,
            ..Default::default()
        };
        assert_eq!(config.ticket_period(), Duration::from_secs(2));

        let fast = SimulatorConfig {
            speed_factor: 10.0,
            ..Default::default()
        };
        assert_eq!(fast.ticket_period(), Duration::from_millis(200));
        assert_eq!(fast.user_period(), Duration::from_secs(3));
    }

    #[test]
    fn test_deserialize_minimal() {
        let toml = r#"
            speed_factor = 4.0
        "#;
        let config: SimulatorConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.speed_factor, 4.0);
        assert_eq!(config.mode, SimulatorMode::Full);
        assert_eq!(config.ticket_interval_ms, 2_000);
    }

    #[test]
    fn test_deserialize_full() {
        let toml = r#"
            speed_factor = 1.0
            mode = "tickets_only"
            user_interval_ms = 60000
            movie_interval_ms = 20000
            ticket_interval_ms = 1000
            status_interval_ms = 2500
        "#;
        let config: SimulatorConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.speed_factor, 1.0);
        assert_eq!(config.mode, SimulatorMode::TicketsOnly);
        assert_eq!(config.user_interval_ms, 60_000);
        assert_eq!(config.movie_interval_ms, 20_000);
        assert_eq!(config.ticket_interval_ms, 1_000);
        assert_eq!(config.status_interval_ms, 2_500);
    }
}
