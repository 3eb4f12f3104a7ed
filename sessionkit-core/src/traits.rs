//! Core trait definitions

use crate::error::SessionResult;
use crate::types::{CookieParams, SessionData};

/// Storage backend for a single active session
///
/// Every call after `start_session` refers to the session that call began.
/// Implementations:
/// - `SessionBackendStub` keeps everything in memory for tests
/// - `sessionkit_http::CookieSessionBackend` uses request/response cookies
///   and a shared server-side store
pub trait SessionBackend {
    /// Begin a fresh session context for the given cookie parameters
    fn start_session(&mut self, params: &CookieParams) -> SessionResult<()>;

    /// Identifier of the current session, `None` before start or after destroy
    fn session_id(&self) -> Option<String>;

    /// Replace the identifier with a newly generated one, invalidating the old one
    fn regenerate_session_id(&mut self) -> SessionResult<()>;

    /// All persisted variables of the current session
    fn read(&self) -> SessionResult<SessionData>;

    /// Replace all persisted variables of the current session
    fn write(&mut self, data: &SessionData) -> SessionResult<()>;

    /// Discard the current identifier and its persisted variables
    fn destroy(&mut self) -> SessionResult<()>;

    /// Backend label used in logs and errors
    fn name(&self) -> &'static str;
}
