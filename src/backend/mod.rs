//! Compiler backend boundary
//!
//! A [`Backend`] turns one C translation unit into an [`Image`]: code
//! and data resolved into a runnable in-memory form, or written out to
//! disk for the non-memory output modes. How it gets there (lexing,
//! parsing, codegen, relocation) is entirely its own business; the
//! session only forwards configuration in and diagnostics out.

use std::ffi::c_void;
use std::path::Path;

use crate::options::CompilerOptions;

/// A compiler implementation consumed by [`crate::Session`].
///
/// `emit` receives every diagnostic string produced during the attempt,
/// in emission order, before `compile` returns.
pub trait Backend {
    fn compile(
        &mut self,
        source: &str,
        options: &CompilerOptions,
        emit: &mut dyn FnMut(&str),
    ) -> Result<Box<dyn Image>, BackendError>;
}

/// A built compilation image, exclusively owned by its session.
pub trait Image {
    /// Invoke the designated entry point on the calling thread and
    /// return its exit-style integer result verbatim.
    fn invoke(&self, args: &[String]) -> Result<i32, BackendError>;

    /// Write the image to disk for the non-memory output modes.
    fn write_to(&self, _path: &Path) -> Result<(), BackendError> {
        Err(BackendError::new("backend does not support file output"))
    }

    /// Resolve a symbol in the relocated image to a raw pointer.
    fn symbol(&self, _name: &str) -> Option<*const c_void> {
        None
    }
}

/// A failure reported by the backend
#[derive(Debug, Clone)]
pub struct BackendError {
    pub message: String,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for BackendError {}
