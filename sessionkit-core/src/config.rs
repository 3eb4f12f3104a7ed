//! Configuration management

use crate::error::{ErrorContext, SessionError, SessionResult};
use crate::logging::LoggingConfig;
use crate::types::{default_lifetime_secs, default_path, SessionConfig, SessionKitConfig};

use std::path::Path;

impl SessionConfig {
    /// Create a config with the default path (`/`), a 300 second lifetime
    /// and the secure flag off
    pub fn new(name: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            domain: domain.into(),
            path: default_path(),
            lifetime_secs: default_lifetime_secs(),
            secure: false,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_lifetime(mut self, lifetime_secs: u64) -> Self {
        self.lifetime_secs = lifetime_secs;
        self
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Reject empty required fields
    pub fn validate(&self) -> SessionResult<()> {
        if self.name.is_empty() {
            return Err(SessionError::invalid_argument(
                "name",
                "Session name required",
            ));
        }

        if self.domain.is_empty() {
            return Err(SessionError::invalid_argument(
                "domain",
                "Cookie domain required",
            ));
        }

        Ok(())
    }
}

impl Default for SessionKitConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig::new("sessionkit", "localhost"),
            logging: LoggingConfig::default(),
        }
    }
}

impl SessionKitConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> SessionResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| SessionError::Config {
            message: format!("Failed to read config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("read_file")
                .with_suggestion("Check if the config file exists and is readable"),
        })?;

        let config: SessionKitConfig =
            toml::from_str(&content).map_err(|e| SessionError::Config {
                message: format!("Failed to parse config: {}", e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("config")
                    .with_operation("parse_toml")
                    .with_suggestion("Check TOML syntax in config file"),
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> SessionResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| SessionError::Config {
            message: format!("Failed to serialize config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config").with_operation("serialize_toml"),
        })?;

        std::fs::write(path, content).map_err(|e| SessionError::Config {
            message: format!("Failed to write config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("write_file")
                .with_suggestion("Check if the directory exists and is writable"),
        })?;

        Ok(())
    }

    /// Same rules as [`Session::configure`](crate::Session::configure); a zero
    /// lifetime is a browser-session cookie
    pub fn validate(&self) -> SessionResult<()> {
        self.session.validate()
    }
}
