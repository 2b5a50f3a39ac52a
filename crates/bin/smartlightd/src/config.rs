//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `smartlight.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::collections::HashSet;
use std::time::Duration;

use serde::Deserialize;

use smartlight_adapter_scene::schedule::Schedule;
use smartlight_adapter_scene::surface::Scene;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Local HTTP server settings.
    pub server: ServerConfig,
    /// Reconciliation core tuning.
    pub core: CoreConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Cloud surface settings.
    pub cloud: CloudConfig,
    /// Simulated hardware settings.
    pub hardware: HardwareConfig,
    /// Named power presets.
    pub scenes: Vec<Scene>,
    /// Periodic scene activations.
    pub schedules: Vec<Schedule>,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// Reconciler configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Bounded wait for exclusive write access, in milliseconds.
    pub lock_timeout_ms: u64,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Cloud surface configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CloudConfig {
    /// Report state changes to the cloud agent.
    pub enabled: bool,
}

/// Simulated hardware configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct HardwareConfig {
    /// Treat each line on stdin as a push-button press.
    pub stdin_button: bool,
}

impl Config {
    /// Load configuration from `smartlight.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("smartlight.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("SMARTLIGHT_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("SMARTLIGHT_PORT")
            && let Ok(port) = val.parse()
        {
            self.server.port = port;
        }
        if let Ok(val) = std::env::var("SMARTLIGHT_BIND")
            && let Some((host, port)) = val.rsplit_once(':')
        {
            self.server.host = host.to_string();
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("SMARTLIGHT_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.core.lock_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "core.lock_timeout_ms must be non-zero".to_string(),
            ));
        }
        let scenes: HashSet<&str> = self.scenes.iter().map(|s| s.name.as_str()).collect();
        for schedule in &self.schedules {
            if !scenes.contains(schedule.scene.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "schedule `{}` references unknown scene `{}`",
                    schedule.name, schedule.scene
                )));
            }
            if schedule.interval_secs == 0 {
                return Err(ConfigError::Validation(format!(
                    "schedule `{}` must have a non-zero interval",
                    schedule.name
                )));
            }
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Bounded wait for exclusive write access.
    #[must_use]
    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.core.lock_timeout_ms)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            lock_timeout_ms: 5000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "smartlightd=info,smartlight=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
