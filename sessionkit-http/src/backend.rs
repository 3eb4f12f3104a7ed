//! Cookie-based session backend
//!
//! The session identifier travels in a cookie named after the session; the
//! variables stay server-side in a [`SessionStore`]. All request/response
//! state goes through an explicit [`HttpContext`] instead of process globals.

use crate::context::HttpContext;
use crate::store::SessionStore;
use cookie::Cookie;
use sessionkit_core::{CookieParams, SessionBackend, SessionData, SessionError, SessionResult};
use tracing::{debug, info};

const BACKEND_NAME: &str = "cookie";

#[derive(Debug)]
struct ActiveSession {
    id: String,
    params: CookieParams,
}

#[derive(Debug)]
pub struct CookieSessionBackend {
    store: SessionStore,
    context: HttpContext,
    active: Option<ActiveSession>,
}

impl CookieSessionBackend {
    pub fn new(store: SessionStore, context: HttpContext) -> Self {
        Self {
            store,
            context,
            active: None,
        }
    }

    pub fn context(&self) -> &HttpContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut HttpContext {
        &mut self.context
    }

    /// Hand the context back so the host can write the response cookies
    pub fn into_context(self) -> HttpContext {
        self.context
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    fn active(&self, operation: &str) -> SessionResult<&ActiveSession> {
        self.active.as_ref().ok_or_else(|| no_active_session(operation))
    }

    fn new_id() -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }
}

fn no_active_session(operation: &str) -> SessionError {
    SessionError::backend(
        BACKEND_NAME,
        format!("{} called without an active session", operation),
    )
}

/// Lifetime in signed seconds, saturating at `i64::MAX`
fn lifetime_secs(params: &CookieParams) -> i64 {
    i64::try_from(params.lifetime_secs).unwrap_or(i64::MAX)
}

/// Store lifetime; a zero cookie lifetime means "until the browser closes",
/// so the server keeps the entry until it is destroyed
fn ttl(params: &CookieParams) -> Option<chrono::Duration> {
    (params.lifetime_secs > 0).then(|| {
        chrono::Duration::try_seconds(lifetime_secs(params)).unwrap_or(chrono::Duration::MAX)
    })
}

fn session_cookie(params: &CookieParams, value: String) -> Cookie<'static> {
    let mut builder = Cookie::build((params.name.clone(), value))
        .path(params.path.clone())
        .domain(params.domain.clone())
        .secure(params.secure)
        .http_only(true);

    if params.lifetime_secs > 0 {
        builder = builder.max_age(cookie::time::Duration::seconds(lifetime_secs(params)));
    }

    builder.build()
}

impl SessionBackend for CookieSessionBackend {
    fn start_session(&mut self, params: &CookieParams) -> SessionResult<()> {
        let resumed = self
            .context
            .request_cookie(&params.name)
            .filter(|id| self.store.contains(id))
            .map(str::to_string);

        let id = match resumed {
            Some(id) => {
                debug!(session = %params.name, "Resumed session from request cookie");
                id
            }
            None => {
                let id = Self::new_id();
                self.store.save(&id, SessionData::new(), ttl(params));
                self.context.queue_cookie(session_cookie(params, id.clone()));
                info!(session = %params.name, "Created new session");
                id
            }
        };

        self.active = Some(ActiveSession {
            id,
            params: params.clone(),
        });
        Ok(())
    }

    fn session_id(&self) -> Option<String> {
        self.active.as_ref().map(|active| active.id.clone())
    }

    fn regenerate_session_id(&mut self) -> SessionResult<()> {
        let active = self
            .active
            .as_mut()
            .ok_or_else(|| no_active_session("regenerate_session_id"))?;

        let new_id = Self::new_id();
        let data = self.store.take(&active.id).unwrap_or_default();
        self.store.save(&new_id, data, ttl(&active.params));
        self.context
            .queue_cookie(session_cookie(&active.params, new_id.clone()));
        active.id = new_id;

        debug!(session = %active.params.name, "Regenerated session id");
        Ok(())
    }

    fn read(&self) -> SessionResult<SessionData> {
        let active = self.active("read")?;
        Ok(self.store.load(&active.id).unwrap_or_default())
    }

    fn write(&mut self, data: &SessionData) -> SessionResult<()> {
        let active = self.active("write")?;
        self.store.save(&active.id, data.clone(), ttl(&active.params));
        Ok(())
    }

    fn destroy(&mut self) -> SessionResult<()> {
        let active = self.active.take().ok_or_else(|| no_active_session("destroy"))?;

        let mut removal = session_cookie(&active.params, String::new());
        removal.make_removal();
        self.context.queue_cookie(removal);
        self.store.remove(&active.id);

        info!(session = %active.params.name, "Destroyed session");
        Ok(())
    }

    fn name(&self) -> &'static str {
        BACKEND_NAME
    }
}
