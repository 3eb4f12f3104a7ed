//! Cookie-based session backend for sessionkit
//!
//! ```
//! use http::HeaderMap;
//! use sessionkit_core::{Session, SessionConfig};
//! use sessionkit_http::{CookieSessionBackend, HttpContext, SessionStore};
//!
//! let store = SessionStore::new();
//! let request_headers = HeaderMap::new();
//!
//! let backend = CookieSessionBackend::new(store.clone(), HttpContext::from_headers(&request_headers));
//! let mut session = Session::new(backend);
//! session.configure(SessionConfig::new("sid", "example.com"))?;
//! session.start()?;
//! session.set("visits", 1)?;
//! session.commit()?;
//!
//! let mut response_headers = HeaderMap::new();
//! session.into_backend().into_context().apply_to(&mut response_headers)?;
//! assert!(response_headers.contains_key(http::header::SET_COOKIE));
//! # Ok::<(), sessionkit_core::SessionError>(())
//! ```

pub mod backend;
pub mod context;
pub mod store;

pub use backend::CookieSessionBackend;
pub use context::HttpContext;
pub use store::SessionStore;
