//! Unified error handling
//!
//! A closed set of error kinds so callers can match on the exact reason a
//! lifecycle call was rejected.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use tracing::{debug, error, warn};

pub type SessionResult<T> = Result<T, SessionError>;

/// Error context providing additional information for debugging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Unique error ID for tracking
    pub error_id: String,
    /// Timestamp when error occurred
    pub timestamp: DateTime<Utc>,
    /// Component where error originated
    pub component: String,
    /// Operation being performed when error occurred
    pub operation: Option<String>,
    /// Additional metadata
    pub metadata: HashMap<String, String>,
    /// Recovery suggestions
    pub recovery_suggestions: Vec<String>,
}

impl ErrorContext {
    pub fn new(component: &str) -> Self {
        Self {
            error_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            component: component.to_string(),
            operation: None,
            metadata: HashMap::new(),
            recovery_suggestions: Vec::new(),
        }
    }

    pub fn with_operation(mut self, operation: &str) -> Self {
        self.operation = Some(operation.to_string());
        self
    }

    pub fn with_metadata(mut self, key: &str, value: &str) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.recovery_suggestions.push(suggestion.to_string());
        self
    }
}

/// The lifecycle rule an `InvalidState` error broke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateViolation {
    /// `start()` or `configure()` on a session that is already running
    AlreadyStarted,
    /// `start()` before `configure()`
    NotConfigured,
    /// Data or identifier access before `start()`
    NotStarted,
    /// The backend no longer holds an identifier (after `destroy()`)
    NoIdentifier,
}

impl fmt::Display for StateViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            StateViolation::AlreadyStarted => "session has already been started",
            StateViolation::NotConfigured => "session has not been configured",
            StateViolation::NotStarted => "session has not been started",
            StateViolation::NoIdentifier => "session has no identifier",
        };
        f.write_str(text)
    }
}

/// Main error type for sessionkit
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Invalid session state: {violation}")]
    InvalidState {
        violation: StateViolation,
        context: ErrorContext,
    },

    #[error("Invalid argument '{field}': {message}")]
    InvalidArgument {
        field: String,
        message: String,
        context: ErrorContext,
    },

    #[error("Unknown session variable \"{key}\"")]
    UnknownKey { key: String, context: ErrorContext },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Backend error ({backend}): {message}")]
    Backend {
        backend: String,
        message: String,
        context: ErrorContext,
    },
}

impl SessionError {
    pub fn invalid_state(violation: StateViolation, operation: &str) -> Self {
        let mut context = ErrorContext::new("session").with_operation(operation);
        context = match violation {
            StateViolation::NotConfigured => {
                context.with_suggestion("Call configure() before start()")
            }
            StateViolation::NotStarted => context.with_suggestion("Call start() first"),
            _ => context,
        };
        SessionError::InvalidState { violation, context }
    }

    pub fn invalid_argument(field: &str, message: impl Into<String>) -> Self {
        SessionError::InvalidArgument {
            field: field.to_string(),
            message: message.into(),
            context: ErrorContext::new("session").with_operation("configure"),
        }
    }

    pub fn unknown_key(key: &str) -> Self {
        SessionError::UnknownKey {
            key: key.to_string(),
            context: ErrorContext::new("session")
                .with_operation("get")
                .with_suggestion("Check has() before reading optional variables"),
        }
    }

    pub fn backend(backend: &str, message: impl Into<String>) -> Self {
        SessionError::Backend {
            backend: backend.to_string(),
            message: message.into(),
            context: ErrorContext::new("backend").with_metadata("backend", backend),
        }
    }

    /// Get the error context
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            SessionError::InvalidState { context, .. } => Some(context),
            SessionError::InvalidArgument { context, .. } => Some(context),
            SessionError::UnknownKey { context, .. } => Some(context),
            SessionError::Config { context, .. } => Some(context),
            SessionError::Backend { context, .. } => Some(context),
            SessionError::Serialization(_) => None,
        }
    }

    /// The lifecycle violation, if this is an `InvalidState` error
    pub fn violation(&self) -> Option<StateViolation> {
        match self {
            SessionError::InvalidState { violation, .. } => Some(*violation),
            _ => None,
        }
    }

    /// Stable numeric code per error kind
    pub fn code(&self) -> u32 {
        match self {
            SessionError::InvalidState { violation, .. } => match violation {
                StateViolation::AlreadyStarted => 1,
                StateViolation::NotConfigured => 2,
                StateViolation::NotStarted => 3,
                StateViolation::NoIdentifier => 4,
            },
            SessionError::InvalidArgument { .. } => 10,
            SessionError::UnknownKey { .. } => 20,
            SessionError::Serialization(_) => 30,
            SessionError::Config { .. } => 40,
            SessionError::Backend { .. } => 50,
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        let error_id = self.context().map(|c| c.error_id.as_str());
        match self {
            SessionError::UnknownKey { .. } => {
                debug!(error_id = ?error_id, error = %self, "Session variable lookup failed");
            }
            SessionError::InvalidState { .. } | SessionError::InvalidArgument { .. } => {
                warn!(error_id = ?error_id, code = self.code(), error = %self, "Session misuse");
            }
            _ => {
                error!(error_id = ?error_id, code = self.code(), error = %self, "Error occurred");
            }
        }
    }
}
