//! Core data type definitions

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Session variables exchanged between a session and its backend
pub type SessionData = HashMap<String, serde_json::Value>;

/// Top-level configuration file layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionKitConfig {
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Session name and cookie settings, applied by `Session::configure`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session (cookie) name
    pub name: String,
    /// Cookie domain
    pub domain: String,
    /// Cookie path
    #[serde(default = "default_path")]
    pub path: String,
    /// Cookie lifetime in seconds
    #[serde(default = "default_lifetime_secs")]
    pub lifetime_secs: u64,
    /// Only send the cookie over HTTPS
    #[serde(default)]
    pub secure: bool,
}

pub(crate) fn default_path() -> String {
    "/".to_string()
}

pub(crate) fn default_lifetime_secs() -> u64 {
    300
}

/// Parameters handed to `SessionBackend::start_session`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieParams {
    pub name: String,
    pub lifetime_secs: u64,
    pub path: String,
    pub domain: String,
    pub secure: bool,
}

impl From<&SessionConfig> for CookieParams {
    fn from(config: &SessionConfig) -> Self {
        Self {
            name: config.name.clone(),
            lifetime_secs: config.lifetime_secs,
            path: config.path.clone(),
            domain: config.domain.clone(),
            secure: config.secure,
        }
    }
}
