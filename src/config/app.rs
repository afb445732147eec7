//! Main application configuration
//!
//! This module defines the primary configuration structures for the
//! activity roster service, including file and environment loading and
//! validation.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub http: HttpSettings,
    pub roster: RosterSettings,
}

/// Service-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging and health reports
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout_seconds: u64,
    /// Interval of the background uptime/health refresh in seconds
    pub maintenance_interval_seconds: u64,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
}

/// Roster settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterSettings {
    /// TOML seed file; the built-in activities are used when unset
    pub seed_file: Option<PathBuf>,
    /// Reject signups once an activity reaches `max_participants`
    pub enforce_capacity: bool,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "activity-roster".to_string(),
            log_level: "info".to_string(),
            shutdown_timeout_seconds: 30,
            maintenance_interval_seconds: 30,
        }
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            static_dir: PathBuf::from("static"),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file; missing keys fall back to defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_toml(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            config.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            config.service.log_level = log_level;
        }
        if let Ok(timeout) = env::var("SHUTDOWN_TIMEOUT_SECONDS") {
            config.service.shutdown_timeout_seconds = timeout
                .parse()
                .map_err(|_| anyhow!("Invalid SHUTDOWN_TIMEOUT_SECONDS value: {}", timeout))?;
        }
        if let Ok(interval) = env::var("MAINTENANCE_INTERVAL_SECONDS") {
            config.service.maintenance_interval_seconds = interval
                .parse()
                .map_err(|_| anyhow!("Invalid MAINTENANCE_INTERVAL_SECONDS value: {}", interval))?;
        }

        // HTTP settings
        if let Ok(host) = env::var("HTTP_HOST") {
            config.http.host = host;
        }
        if let Ok(port) = env::var("HTTP_PORT") {
            config.http.port = port
                .parse()
                .map_err(|_| anyhow!("Invalid HTTP_PORT value: {}", port))?;
        }
        if let Ok(dir) = env::var("STATIC_DIR") {
            config.http.static_dir = PathBuf::from(dir);
        }

        // Roster settings
        if let Ok(seed_file) = env::var("SEED_FILE") {
            config.roster.seed_file = Some(PathBuf::from(seed_file));
        }
        if let Ok(enforce) = env::var("ENFORCE_CAPACITY") {
            config.roster.enforce_capacity = enforce
                .parse()
                .map_err(|_| anyhow!("Invalid ENFORCE_CAPACITY value: {}", enforce))?;
        }

        validate_config(&config)?;
        Ok(config)
    }

    /// Get shutdown timeout as Duration
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.service.shutdown_timeout_seconds)
    }

    /// Get maintenance interval as Duration
    pub fn maintenance_interval(&self) -> Duration {
        Duration::from_secs(self.service.maintenance_interval_seconds)
    }

    /// Address the HTTP server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.http.host, self.http.port)
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    // Validate timeouts
    if config.service.shutdown_timeout_seconds == 0 {
        return Err(anyhow!("Shutdown timeout must be greater than 0"));
    }
    if config.service.maintenance_interval_seconds == 0 {
        return Err(anyhow!("Maintenance interval must be greater than 0"));
    }

    // Validate HTTP settings
    if config.http.host.is_empty() {
        return Err(anyhow!("HTTP host cannot be empty"));
    }
    if config.http.port == 0 {
        return Err(anyhow!("HTTP port cannot be 0"));
    }
    if config.http.static_dir.as_os_str().is_empty() {
        return Err(anyhow!("Static directory cannot be empty"));
    }

    // Validate roster settings
    if let Some(seed_file) = &config.roster.seed_file {
        if seed_file.as_os_str().is_empty() {
            return Err(anyhow!("Seed file path cannot be empty"));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.http.port, 8000);
        assert_eq!(config.bind_address(), "0.0.0.0:8000");
        assert!(!config.roster.enforce_capacity);
        assert!(config.roster.seed_file.is_none());
    }

    #[test]
    fn test_from_toml_partial_overrides() {
        let config = AppConfig::from_toml(
            r#"
[http]
port = 9000

[roster]
enforce_capacity = true
"#,
        )
        .unwrap();

        assert_eq!(config.http.port, 9000);
        assert_eq!(config.http.host, "0.0.0.0");
        assert!(config.roster.enforce_capacity);
        assert_eq!(config.service.name, "activity-roster");
    }

    #[test]
    fn test_from_toml_rejects_invalid_values() {
        assert!(AppConfig::from_toml("[service]\nlog_level = \"loud\"").is_err());
        assert!(AppConfig::from_toml("[http]\nport = 0").is_err());
        assert!(AppConfig::from_toml("[http]\nport = \"eighty\"").is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[service]\nname = \"roster-test\"\nlog_level = \"debug\"").unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.service.name, "roster-test");
        assert_eq!(config.service.log_level, "debug");

        assert!(AppConfig::from_file(Path::new("/nonexistent/config.toml")).is_err());
    }

    #[test]
    fn test_validate_config_rejects_zero_timeouts() {
        let mut config = AppConfig::default();
        config.service.shutdown_timeout_seconds = 0;
        assert!(validate_config(&config).is_err());

        let mut config = AppConfig::default();
        config.service.maintenance_interval_seconds = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_durations() {
        let config = AppConfig::default();
        assert_eq!(config.shutdown_timeout(), Duration::from_secs(30));
        assert_eq!(config.maintenance_interval(), Duration::from_secs(30));
    }
}
