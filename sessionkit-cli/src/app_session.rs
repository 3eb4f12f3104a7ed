//! Application-specific session accessors
//!
//! Wraps a generic `Session` with named, typed accessors for the variables
//! the demo commands use.

use serde::{Deserialize, Serialize};
use sessionkit_core::{Session, SessionBackend, SessionKey, SessionResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
}

const USER: SessionKey<User> = SessionKey::new("user");
const COUNTER: SessionKey<u64> = SessionKey::new("counter");

pub struct AppSession<B: SessionBackend> {
    inner: Session<B>,
}

impl<B: SessionBackend> AppSession<B> {
    pub fn new(backend: B) -> Self {
        Self {
            inner: Session::new(backend),
        }
    }

    /// Lifecycle calls (configure/start/commit/destroy) go through here
    pub fn session(&mut self) -> &mut Session<B> {
        &mut self.inner
    }

    pub fn into_session(self) -> Session<B> {
        self.inner
    }

    pub fn set_user(&mut self, user: &User) -> SessionResult<()> {
        self.inner.set_value(&USER, user)
    }

    pub fn has_user(&self) -> bool {
        self.inner.has_value(&USER)
    }

    pub fn user(&self) -> SessionResult<User> {
        self.inner.get_value(&USER)
    }

    pub fn counter(&self) -> SessionResult<u64> {
        self.inner.get_value(&COUNTER)
    }

    pub fn increment_counter(&mut self) -> SessionResult<u64> {
        if !self.inner.has_value(&COUNTER) {
            self.inner.set_value(&COUNTER, &0)?;
        }

        let next = self.counter()? + 1;
        self.inner.set_value(&COUNTER, &next)?;
        Ok(next)
    }
}
