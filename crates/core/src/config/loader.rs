use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed("SEATFILL_").split("_"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulator::SimulatorMode;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[database]
path = "/tmp/loadgen.db"

[simulator]
speed_factor = 2.5
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.database.path, PathBuf::from("/tmp/loadgen.db"));
        assert_eq!(config.simulator.speed_factor, 2.5);
    }

    #[test]
    fn test_load_config_from_str_empty_uses_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.database.path, PathBuf::from("seatfill.db"));
        assert_eq!(config.simulator.speed_factor, 10.0);
        assert_eq!(config.simulator.mode, SimulatorMode::Full);
    }

    #[test]
    fn test_load_config_from_str_bad_mode_fails() {
        let toml = r#"
[simulator]
mode = "users_only"
"#;
        let result = load_config_from_str(toml);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[database]
path = "workload.db"

[simulator]
mode = "tickets_only"
ticket_interval_ms = 500
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.database.path, PathBuf::from("workload.db"));
        assert_eq!(config.simulator.mode, SimulatorMode::TicketsOnly);
        assert_eq!(config.simulator.ticket_interval_ms, 500);
    }
}
