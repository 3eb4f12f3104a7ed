//! In-memory backend for tests
//!
//! Never touches shared process state: the identifier is generated locally
//! and the data lives in the struct.

use crate::error::SessionResult;
use crate::traits::SessionBackend;
use crate::types::{CookieParams, SessionData};

#[derive(Debug, Default)]
pub struct SessionBackendStub {
    session_id: Option<String>,
    data: SessionData,
    params: Option<CookieParams>,
}

impl SessionBackendStub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stub pre-loaded with data, as if a previous request had written it
    pub fn with_data(data: SessionData) -> Self {
        Self {
            data,
            ..Self::default()
        }
    }

    /// Parameters of the last `start_session` call
    pub fn params(&self) -> Option<&CookieParams> {
        self.params.as_ref()
    }

    /// Currently persisted data
    pub fn data(&self) -> &SessionData {
        &self.data
    }

    fn random_id() -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }
}

impl SessionBackend for SessionBackendStub {
    fn start_session(&mut self, params: &CookieParams) -> SessionResult<()> {
        self.session_id = Some(Self::random_id());
        self.params = Some(params.clone());
        Ok(())
    }

    fn session_id(&self) -> Option<String> {
        self.session_id.clone()
    }

    fn regenerate_session_id(&mut self) -> SessionResult<()> {
        self.session_id = Some(Self::random_id());
        Ok(())
    }

    fn read(&self) -> SessionResult<SessionData> {
        Ok(self.data.clone())
    }

    fn write(&mut self, data: &SessionData) -> SessionResult<()> {
        self.data = data.clone();
        Ok(())
    }

    fn destroy(&mut self) -> SessionResult<()> {
        self.session_id = None;
        self.data.clear();
        Ok(())
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}
