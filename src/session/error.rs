//! Session error types

use super::SessionState;

/// An error reported by a session operation
#[derive(Debug, Clone)]
pub struct SessionError {
    pub kind: ErrorKind,
}

/// The kind of session error
#[derive(Debug, Clone)]
pub enum ErrorKind {
    /// Invalid configuration: bad flag or option name, empty source,
    /// or configuration attempted after the compile transition.
    /// Detected locally, before the backend is ever involved.
    Configuration(String),
    /// The backend rejected the translation unit.
    Compilation(String),
    /// An operation called outside the state that permits it.
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },
    /// The registered diagnostic handler itself failed; supersedes any
    /// pending result.
    Diagnostic(String),
    /// Entry-point invocation reported a failure.
    Execution(String),
}

impl SessionError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Configuration(message.into()),
        }
    }

    pub fn compilation(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Compilation(message.into()),
        }
    }

    pub fn invalid_state(operation: &'static str, state: SessionState) -> Self {
        Self {
            kind: ErrorKind::InvalidState { operation, state },
        }
    }

    pub fn diagnostic(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Diagnostic(message.into()),
        }
    }

    pub fn execution(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Execution(message.into()),
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self.kind, ErrorKind::Configuration(_))
    }

    pub fn is_compilation(&self) -> bool {
        matches!(self.kind, ErrorKind::Compilation(_))
    }

    pub fn is_invalid_state(&self) -> bool {
        matches!(self.kind, ErrorKind::InvalidState { .. })
    }

    pub fn is_diagnostic(&self) -> bool {
        matches!(self.kind, ErrorKind::Diagnostic(_))
    }

    pub fn is_execution(&self) -> bool {
        matches!(self.kind, ErrorKind::Execution(_))
    }
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ErrorKind::Configuration(msg) => write!(f, "configuration error: {}", msg),
            ErrorKind::Compilation(msg) => write!(f, "compilation failed: {}", msg),
            ErrorKind::InvalidState { operation, state } => {
                write!(f, "'{}' is not valid in the {} state", operation, state)
            }
            ErrorKind::Diagnostic(msg) => write!(f, "diagnostic handler failed: {}", msg),
            ErrorKind::Execution(msg) => write!(f, "entry point failed: {}", msg),
        }
    }
}

impl std::error::Error for SessionError {}

pub type SessionResult<T> = Result<T, SessionError>;
