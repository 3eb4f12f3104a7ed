//! sessionkit core - session lifecycle and backend contract
//!
//! Keeps applications independent from the mechanism that actually stores
//! session state. A `Session` is configured, started against a
//! `SessionBackend`, read and mutated in memory, then committed or destroyed.

pub mod config;
pub mod error;
pub mod logging;
pub mod schema;
pub mod session;
pub mod stub;
pub mod traits;
pub mod types;

pub use error::*;
pub use logging::*;
pub use schema::*;
pub use session::*;
pub use stub::*;
pub use traits::*;
pub use types::*;

// Re-export commonly used external types
pub use serde_json::{json, Value};
pub use tracing;
