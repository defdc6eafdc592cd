//! Backend double and session helpers
//!
//! `TestBackend` stands in for a real compiler: it recognizes
//! translation units whose entry point returns an integer literal,
//! records the options it was handed, and can script diagnostics or a
//! forced failure.

use std::cell::RefCell;
use std::ffi::c_void;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use kiln::{Backend, BackendError, CompilerOptions, Image, OutputMode, Session};

/// Shared view of the options the backend saw at compile time.
pub type SeenOptions = Rc<RefCell<Option<CompilerOptions>>>;

/// Shared record of paths an image was written to.
pub type WrittenFiles = Rc<RefCell<Vec<PathBuf>>>;

/// Shared record of messages a sink received.
pub type Messages = Rc<RefCell<Vec<String>>>;

/// Shared record of argv lists an entry point was invoked with.
pub type SeenArgs = Rc<RefCell<Vec<Vec<String>>>>;

pub struct TestBackend {
    /// Diagnostics emitted before the compile result, in order.
    diagnostics: Vec<String>,
    /// Forced failure message, regardless of source.
    fail_with: Option<String>,
    /// Forced entry-point failure message for produced images.
    invoke_error: Option<String>,
    seen: SeenOptions,
    written: WrittenFiles,
    args: SeenArgs,
}

impl TestBackend {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
            fail_with: None,
            invoke_error: None,
            seen: Rc::new(RefCell::new(None)),
            written: Rc::new(RefCell::new(Vec::new())),
            args: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Backend that emits the given diagnostics before compiling.
    pub fn with_diagnostics(messages: &[&str]) -> Self {
        let mut backend = Self::new();
        backend.diagnostics = messages.iter().map(|m| m.to_string()).collect();
        backend
    }

    /// Backend that always fails, emitting one error diagnostic.
    pub fn failing(message: &str) -> Self {
        let mut backend = Self::new();
        backend.fail_with = Some(message.to_string());
        backend
    }

    /// Backend plus a handle to the options it gets handed.
    pub fn recording() -> (Self, SeenOptions) {
        let backend = Self::new();
        let seen = backend.seen.clone();
        (backend, seen)
    }

    /// Backend plus a handle to the paths its images are written to.
    pub fn writing() -> (Self, WrittenFiles) {
        let backend = Self::new();
        let written = backend.written.clone();
        (backend, written)
    }

    /// Backend whose images compile fine but fail at invocation.
    pub fn failing_entry(message: &str) -> Self {
        let mut backend = Self::new();
        backend.invoke_error = Some(message.to_string());
        backend
    }

    /// Backend plus a handle to the argv lists its images receive.
    pub fn observing_args() -> (Self, SeenArgs) {
        let backend = Self::new();
        let args = backend.args.clone();
        (backend, args)
    }
}

impl Backend for TestBackend {
    fn compile(
        &mut self,
        source: &str,
        options: &CompilerOptions,
        emit: &mut dyn FnMut(&str),
    ) -> Result<Box<dyn Image>, BackendError> {
        *self.seen.borrow_mut() = Some(options.clone());
        for message in &self.diagnostics {
            emit(message);
        }
        if let Some(message) = &self.fail_with {
            emit(&format!("error: {}", message));
            return Err(BackendError::new(message.clone()));
        }
        match entry_return_value(source) {
            Some(value) => Ok(Box::new(TestImage {
                value,
                invoke_error: self.invoke_error.clone(),
                written: self.written.clone(),
                args: self.args.clone(),
            })),
            None => {
                emit("error: expected declaration");
                Err(BackendError::new("parse error"))
            }
        }
    }
}

pub struct TestImage {
    value: i32,
    invoke_error: Option<String>,
    written: WrittenFiles,
    args: SeenArgs,
}

impl Image for TestImage {
    fn invoke(&self, args: &[String]) -> Result<i32, BackendError> {
        self.args.borrow_mut().push(args.to_vec());
        if let Some(message) = &self.invoke_error {
            return Err(BackendError::new(message.clone()));
        }
        Ok(self.value)
    }

    fn write_to(&self, path: &Path) -> Result<(), BackendError> {
        self.written.borrow_mut().push(path.to_path_buf());
        Ok(())
    }

    fn symbol(&self, name: &str) -> Option<*const c_void> {
        (name == "main").then(|| &self.value as *const i32 as *const c_void)
    }
}

/// Extract the integer literal returned from `main`; the only shape of
/// translation unit the double understands.
fn entry_return_value(source: &str) -> Option<i32> {
    let body = source.split("int main").nth(1)?;
    let body = body.split('{').nth(1)?;
    let ret = body.split("return").nth(1)?;
    let literal = ret.trim_start();
    let end = literal.find(';')?;
    literal[..end].trim().parse().ok()
}

/// Fresh session in memory output mode.
pub fn memory_session(backend: TestBackend) -> Session {
    let mut session = Session::new(backend);
    session.set_output_mode(OutputMode::Memory).unwrap();
    session
}

/// Session that has already compiled `source` in memory mode.
pub fn compiled_session(source: &str) -> Session {
    let mut session = memory_session(TestBackend::new());
    session.compile_source(source).unwrap();
    session
}

/// Sink that records every message, plus a handle to the record.
pub fn collecting_sink() -> (impl FnMut(&str) -> Result<(), String>, Messages) {
    let messages: Messages = Rc::new(RefCell::new(Vec::new()));
    let seen = messages.clone();
    let sink = move |message: &str| {
        seen.borrow_mut().push(message.to_string());
        Ok(())
    };
    (sink, messages)
}

/// Sink that converts any message into a failure.
pub fn raising_sink() -> impl FnMut(&str) -> Result<(), String> {
    |message: &str| Err(format!("diagnostic: {}", message))
}
