//! The compilation session
//!
//! A [`Session`] owns one configure-compile-run lifecycle over a
//! [`Backend`]: options accumulate while configuring, a single compile
//! transition builds the image, and `run` invokes its entry point as
//! long as the session lives. Configuration after the compile
//! transition is rejected rather than left undefined; a fresh session
//! is the way to retry.

mod error;

pub use error::{ErrorKind, SessionError, SessionResult};

use std::ffi::c_void;
use std::path::{Path, PathBuf};

use log::debug;

use crate::backend::{Backend, Image};
use crate::config::ProjectConfig;
use crate::diag::DiagnosticSink;
use crate::options::{self, CompilerOptions, Flag, OutputMode};

/// Upper bound on entry-point arguments, matching the classic argv cap.
const MAX_RUN_ARGS: usize = 256;

/// Externally visible lifecycle state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Accepting configuration; no compile attempt yet.
    Configuring,
    /// The compile transition succeeded; the session owns an image.
    Compiled,
    /// The compile transition failed; terminal.
    Failed,
}

impl SessionState {
    pub fn name(self) -> &'static str {
        match self {
            SessionState::Configuring => "configuring",
            SessionState::Compiled => "compiled",
            SessionState::Failed => "failed",
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

enum Stage {
    Configuring,
    Compiled(Box<dyn Image>),
    Failed,
}

/// One compilation lifecycle over a backend
pub struct Session {
    backend: Box<dyn Backend>,
    options: CompilerOptions,
    sink: Option<Box<dyn DiagnosticSink>>,
    /// Every diagnostic line received so far, in emission order.
    transcript: Vec<String>,
    stage: Stage,
}

impl Session {
    /// Create a fresh session in the configuring state. Never fails.
    pub fn new(backend: impl Backend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            options: CompilerOptions::new(),
            sink: None,
            transcript: Vec::new(),
            stage: Stage::Configuring,
        }
    }

    /// Create a session pre-seeded from a project configuration.
    pub fn with_config(backend: impl Backend + 'static, config: &ProjectConfig) -> Self {
        let mut session = Self::new(backend);
        config.apply(&mut session.options);
        session
    }

    // === Configuration ===

    pub fn set_output_mode(&mut self, mode: OutputMode) -> SessionResult<()> {
        self.require_configuring("set_output_mode")?;
        self.options.output_mode = mode;
        Ok(())
    }

    pub fn set_flag(&mut self, flag: Flag, value: bool) -> SessionResult<()> {
        self.require_configuring("set_flag")?;
        self.options.set_flag(flag, value);
        Ok(())
    }

    /// Set a flag by its string name, for binding glue that never sees
    /// the [`Flag`] enum. Unknown names are configuration errors.
    pub fn set_named_flag(&mut self, name: &str, value: bool) -> SessionResult<()> {
        let flag = Flag::from_name(name)
            .ok_or_else(|| SessionError::configuration(format!("unknown flag: {}", name)))?;
        self.set_flag(flag, value)
    }

    /// Register the diagnostic handler, replacing any previous one.
    pub fn set_diagnostic_handler(&mut self, sink: impl DiagnosticSink + 'static) -> SessionResult<()> {
        self.require_configuring("set_diagnostic_handler")?;
        self.sink = Some(Box::new(sink));
        Ok(())
    }

    pub fn add_include_path(&mut self, path: impl Into<PathBuf>) -> SessionResult<()> {
        self.require_configuring("add_include_path")?;
        self.options.include_paths.push(path.into());
        Ok(())
    }

    pub fn add_sysinclude_path(&mut self, path: impl Into<PathBuf>) -> SessionResult<()> {
        self.require_configuring("add_sysinclude_path")?;
        self.options.sysinclude_paths.push(path.into());
        Ok(())
    }

    pub fn add_library_path(&mut self, path: impl Into<PathBuf>) -> SessionResult<()> {
        self.require_configuring("add_library_path")?;
        self.options.library_paths.push(path.into());
        Ok(())
    }

    pub fn add_library(&mut self, name: impl Into<String>) -> SessionResult<()> {
        self.require_configuring("add_library")?;
        self.options.libraries.push(name.into());
        Ok(())
    }

    /// Point the backend at its own runtime support files.
    pub fn set_lib_path(&mut self, path: impl Into<PathBuf>) -> SessionResult<()> {
        self.require_configuring("set_lib_path")?;
        self.options.lib_root = Some(path.into());
        Ok(())
    }

    /// Add a preprocessor define; an empty value defines a bare macro.
    pub fn define(&mut self, name: impl Into<String>, value: impl Into<String>) -> SessionResult<()> {
        self.require_configuring("define")?;
        self.options.define(name, value);
        Ok(())
    }

    pub fn undefine(&mut self, name: &str) -> SessionResult<()> {
        self.require_configuring("undefine")?;
        self.options.undefine(name);
        Ok(())
    }

    /// Expose a host symbol to compiled code under `name`.
    pub fn add_symbol(&mut self, name: impl Into<String>, address: *const c_void) -> SessionResult<()> {
        self.require_configuring("add_symbol")?;
        self.options.host_symbols.push((name.into(), address));
        Ok(())
    }

    /// Fold a tcc-style option string into the accumulated options.
    /// The whole string is validated up front, so a bad option leaves
    /// the session untouched.
    pub fn set_options(&mut self, input: &str) -> SessionResult<()> {
        self.require_configuring("set_options")?;
        options::parse_option_string(&mut self.options, input)
            .map_err(|e| SessionError::configuration(e.message))
    }

    // === The compile transition ===

    /// Compile one translation unit from source text.
    ///
    /// Diagnostics are forwarded to the registered handler
    /// synchronously, in emission order, before this returns. Success
    /// moves the session to the compiled state and takes ownership of
    /// the image; any failure, including a failing handler, moves it to
    /// the failed state. Only one compile attempt is allowed per
    /// session.
    pub fn compile_source(&mut self, source: &str) -> SessionResult<()> {
        self.require_configuring("compile_source")?;
        if source.trim().is_empty() {
            return Err(SessionError::configuration("empty translation unit"));
        }
        debug!("compiling translation unit ({} bytes)", source.len());

        let mut sink_failure: Option<String> = None;
        let transcript = &mut self.transcript;
        let mut sink = self.sink.as_mut();
        let mut emit = |message: &str| {
            transcript.push(message.to_string());
            // The first handler failure wins; later messages are still
            // recorded but no longer forwarded.
            if sink_failure.is_none() {
                if let Some(sink) = sink.as_mut() {
                    if let Err(failure) = sink.receive(message) {
                        sink_failure = Some(failure);
                    }
                }
            }
        };
        let outcome = self.backend.compile(source, &self.options, &mut emit);

        if let Some(failure) = sink_failure {
            self.stage = Stage::Failed;
            return Err(SessionError::diagnostic(failure));
        }

        match outcome {
            Ok(image) => {
                debug!("translation unit compiled");
                self.stage = Stage::Compiled(image);
                Ok(())
            }
            Err(e) => {
                self.stage = Stage::Failed;
                let detail = if self.transcript.is_empty() {
                    e.message
                } else {
                    self.transcript.join("\n")
                };
                Err(SessionError::compilation(detail))
            }
        }
    }

    /// Compile one translation unit read from a file.
    pub fn compile_file(&mut self, path: impl AsRef<Path>) -> SessionResult<()> {
        let path = path.as_ref();
        self.require_configuring("compile_file")?;
        let source = match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) => {
                self.stage = Stage::Failed;
                return Err(SessionError::compilation(format!("{}: {}", path.display(), e)));
            }
        };
        self.compile_source(&source)
    }

    // === Execution ===

    /// Invoke the image's entry point with no arguments and return its
    /// integer result. Valid only for a compiled session in memory
    /// output mode; may be called any number of times.
    pub fn run(&self) -> SessionResult<i32> {
        self.run_with_args(&[])
    }

    /// Invoke the entry point with process-style arguments. The state
    /// check comes first, so an out-of-state call reports invalid
    /// state even when the argv list is also oversized.
    pub fn run_with_args(&self, args: &[&str]) -> SessionResult<i32> {
        let image = self.memory_image("run")?;
        if args.len() > MAX_RUN_ARGS {
            return Err(SessionError::configuration(format!(
                "too many arguments: {}",
                args.len()
            )));
        }
        debug!("invoking entry point with {} argument(s)", args.len());
        let argv: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        image
            .invoke(&argv)
            .map_err(|e| SessionError::execution(e.message))
    }

    /// Write the compiled output to disk. Valid only for a compiled
    /// session in one of the on-disk output modes.
    pub fn write_output(&self, path: impl AsRef<Path>) -> SessionResult<()> {
        let path = path.as_ref();
        match &self.stage {
            Stage::Compiled(image) if self.options.output_mode != OutputMode::Memory => {
                image.write_to(path).map_err(|e| {
                    SessionError::compilation(format!("output to {}: {}", path.display(), e.message))
                })
            }
            _ => Err(SessionError::invalid_state("write_output", self.state())),
        }
    }

    /// Resolve a symbol in the in-memory image to a raw pointer.
    pub fn symbol(&self, name: &str) -> SessionResult<Option<*const c_void>> {
        Ok(self.memory_image("symbol")?.symbol(name))
    }

    // === Accessors ===

    pub fn state(&self) -> SessionState {
        match self.stage {
            Stage::Configuring => SessionState::Configuring,
            Stage::Compiled(_) => SessionState::Compiled,
            Stage::Failed => SessionState::Failed,
        }
    }

    pub fn output_mode(&self) -> OutputMode {
        self.options.output_mode
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Every diagnostic line received so far, in emission order.
    pub fn diagnostics(&self) -> &[String] {
        &self.transcript
    }

    fn require_configuring(&self, operation: &'static str) -> SessionResult<()> {
        match self.stage {
            Stage::Configuring => Ok(()),
            _ => Err(SessionError::configuration(format!(
                "'{}' is only valid while configuring; session is {}",
                operation,
                self.state()
            ))),
        }
    }

    fn memory_image(&self, operation: &'static str) -> SessionResult<&dyn Image> {
        match &self.stage {
            Stage::Compiled(image) if self.options.output_mode == OutputMode::Memory => {
                Ok(image.as_ref())
            }
            _ => Err(SessionError::invalid_state(operation, self.state())),
        }
    }
}
