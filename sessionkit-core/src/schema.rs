//! Typed session keys
//!
//! Applications declare their variables once as constants and build named
//! accessors on top of them:
//!
//! ```
//! use sessionkit_core::{Session, SessionBackend, SessionKey, SessionResult};
//!
//! const COUNTER: SessionKey<u64> = SessionKey::new("counter");
//!
//! fn increment<B: SessionBackend>(session: &mut Session<B>) -> SessionResult<u64> {
//!     let next = if session.has_value(&COUNTER) {
//!         session.get_value(&COUNTER)? + 1
//!     } else {
//!         1
//!     };
//!     session.set_value(&COUNTER, &next)?;
//!     Ok(next)
//! }
//! ```

use crate::error::SessionResult;
use crate::session::Session;
use crate::traits::SessionBackend;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::marker::PhantomData;

/// Name of a session variable together with the type stored under it
pub struct SessionKey<T> {
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> SessionKey<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> Clone for SessionKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SessionKey<T> {}

impl<T> fmt::Debug for SessionKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SessionKey").field(&self.name).finish()
    }
}

impl<B: SessionBackend> Session<B> {
    pub fn set_value<T: Serialize>(&mut self, key: &SessionKey<T>, value: &T) -> SessionResult<()> {
        let value = serde_json::to_value(value)?;
        self.set(key.name(), value)
    }

    pub fn get_value<T: DeserializeOwned>(&self, key: &SessionKey<T>) -> SessionResult<T> {
        let value = self.get(key.name())?;
        Ok(serde_json::from_value(value.clone())?)
    }

    pub fn has_value<T>(&self, key: &SessionKey<T>) -> bool {
        self.has(key.name())
    }

    pub fn remove_value<T: DeserializeOwned>(
        &mut self,
        key: &SessionKey<T>,
    ) -> SessionResult<Option<T>> {
        match self.remove(key.name())? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }
}
