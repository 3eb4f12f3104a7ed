//! Session lifecycle
//!
//! `Session` owns one backend and walks it through
//! configure → start → (get/set)* → commit/destroy. Variables live in memory
//! between `start()` and `commit()`; nothing reaches the backend until then.

use crate::error::{SessionError, SessionResult, StateViolation};
use crate::traits::SessionBackend;
use crate::types::{CookieParams, SessionConfig, SessionData};
use serde_json::Value;
use tracing::{debug, info, warn};

pub struct Session<B: SessionBackend> {
    backend: B,
    config: Option<SessionConfig>,
    data: SessionData,
    started: bool,
}

impl<B: SessionBackend> Session<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            config: None,
            data: SessionData::new(),
            started: false,
        }
    }

    /// Set the session name and cookie parameters.
    ///
    /// May be called again until the session is started; fields are only
    /// replaced once the new config validates.
    pub fn configure(&mut self, config: SessionConfig) -> SessionResult<()> {
        if self.started {
            return Err(SessionError::invalid_state(
                StateViolation::AlreadyStarted,
                "configure",
            ));
        }

        config.validate()?;
        debug!(
            session = %config.name,
            domain = %config.domain,
            path = %config.path,
            lifetime_secs = config.lifetime_secs,
            secure = config.secure,
            "Session configured"
        );
        self.config = Some(config);
        Ok(())
    }

    /// Start the backend session and load its variables.
    ///
    /// If the initial read fails the backend session is destroyed again, so a
    /// failed start never leaves a live session behind.
    pub fn start(&mut self) -> SessionResult<()> {
        if self.started {
            return Err(SessionError::invalid_state(
                StateViolation::AlreadyStarted,
                "start",
            ));
        }

        let params = match &self.config {
            Some(config) => CookieParams::from(config),
            None => {
                return Err(SessionError::invalid_state(
                    StateViolation::NotConfigured,
                    "start",
                ))
            }
        };

        self.backend.start_session(&params)?;
        self.data = match self.backend.read() {
            Ok(data) => data,
            Err(e) => {
                // Leave nothing behind that a later start would trip over
                if let Err(cleanup) = self.backend.destroy() {
                    warn!(error = %cleanup, "Failed to discard session after read error");
                }
                return Err(e);
            }
        };
        self.started = true;

        info!(
            session = %params.name,
            backend = self.backend.name(),
            variables = self.data.len(),
            "Session started"
        );
        Ok(())
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    /// Session name, empty until configured
    pub fn name(&self) -> &str {
        self.config.as_ref().map(|c| c.name.as_str()).unwrap_or("")
    }

    pub fn config(&self) -> Option<&SessionConfig> {
        self.config.as_ref()
    }

    /// Current session identifier as reported by the backend
    pub fn id(&self) -> SessionResult<String> {
        self.ensure_started("id")?;
        self.backend
            .session_id()
            .ok_or_else(|| SessionError::invalid_state(StateViolation::NoIdentifier, "id"))
    }

    /// Swap the identifier for a fresh one (session fixation defence) and
    /// return the new value
    pub fn regenerate_id(&mut self) -> SessionResult<String> {
        self.ensure_started("regenerate_id")?;
        self.backend.regenerate_session_id()?;
        let id = self.id()?;
        debug!(session = %self.name(), "Session id regenerated");
        Ok(id)
    }

    /// Write all in-memory variables to the backend
    pub fn commit(&mut self) -> SessionResult<()> {
        self.ensure_started("commit")?;
        self.backend.write(&self.data)?;
        debug!(
            session = %self.name(),
            variables = self.data.len(),
            "Session committed"
        );
        Ok(())
    }

    /// Tell the backend to discard the session. The object stays "started";
    /// callers are expected to drop it afterwards.
    pub fn destroy(&mut self) -> SessionResult<()> {
        self.ensure_started("destroy")?;
        self.backend.destroy()?;
        info!(session = %self.name(), backend = self.backend.name(), "Session destroyed");
        Ok(())
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> SessionResult<()> {
        self.ensure_started("set")?;
        self.data.insert(key.into(), value.into());
        Ok(())
    }

    pub fn get(&self, key: &str) -> SessionResult<&Value> {
        self.ensure_started("get")?;
        self.data
            .get(key)
            .ok_or_else(|| SessionError::unknown_key(key))
    }

    pub fn has(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> SessionResult<Option<Value>> {
        self.ensure_started("remove")?;
        Ok(self.data.remove(key))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    fn ensure_started(&self, operation: &str) -> SessionResult<()> {
        if !self.started {
            return Err(SessionError::invalid_state(
                StateViolation::NotStarted,
                operation,
            ));
        }
        Ok(())
    }
}
