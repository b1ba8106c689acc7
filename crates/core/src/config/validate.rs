use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Speed factor is positive and finite
/// - Worker cadences are non-zero
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let sim = &config.simulator;

    if !sim.speed_factor.is_finite() || sim.speed_factor <= 0.0 {
        return Err(ConfigError::ValidationError(format!(
            "simulator.speed_factor must be positive, got {}",
            sim.speed_factor
        )));
    }

    for (name, interval) in [
        ("simulator.user_interval_ms", sim.user_interval_ms),
        ("simulator.movie_interval_ms", sim.movie_interval_ms),
        ("simulator.ticket_interval_ms", sim.ticket_interval_ms),
        ("simulator.status_interval_ms", sim.status_interval_ms),
    ] {
        if interval == 0 {
            return Err(ConfigError::ValidationError(format!(
                "{} cannot be 0",
                name
            )));
        }
    }

    Ok(())
}
