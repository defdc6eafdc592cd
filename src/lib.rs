//! Kiln - an embedding interface for in-process C compilation
//!
//! This crate provides a stateful compilation session over a pluggable
//! compiler backend: configure a session, feed it C source, build an
//! in-memory image, and invoke its entry point, with compiler
//! diagnostics forwarded to a caller-supplied handler.

pub mod backend;
pub mod config;
pub mod diag;
pub mod options;
pub mod session;

// Re-export commonly used types
pub use backend::{Backend, BackendError, Image};
pub use config::ProjectConfig;
pub use diag::DiagnosticSink;
pub use options::{CompilerOptions, Flag, OptionError, OutputMode};
pub use session::{ErrorKind, Session, SessionError, SessionResult, SessionState};
