//! Compiler configuration accumulated by a session
//!
//! Everything here is inert data: the session collects it while
//! configuring and hands it to the backend verbatim at compile time.

mod scan;

pub use scan::parse_option_string;

use std::ffi::c_void;
use std::path::PathBuf;

use rustc_hash::FxHashMap;
use serde::Deserialize;

/// Where compiled code ends up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// Link in-process into a runnable image; the only mode that
    /// enables `run`.
    #[default]
    #[serde(alias = "mem")]
    Memory,
    #[serde(alias = "exe")]
    Executable,
    #[serde(alias = "dll")]
    SharedLibrary,
    #[serde(alias = "obj")]
    Object,
}

impl OutputMode {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "memory" | "mem" => Some(OutputMode::Memory),
            "executable" | "exe" => Some(OutputMode::Executable),
            "shared_library" | "dll" => Some(OutputMode::SharedLibrary),
            "object" | "obj" => Some(OutputMode::Object),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            OutputMode::Memory => "memory",
            OutputMode::Executable => "executable",
            OutputMode::SharedLibrary => "shared_library",
            OutputMode::Object => "object",
        }
    }
}

impl std::fmt::Display for OutputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The named boolean options forwarded to the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    /// Skip the standard include directories.
    NoStdInc,
    /// Skip the standard runtime library.
    NoStdLib,
    /// Verbose backend output.
    Verbose,
}

impl Flag {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "nostdinc" => Some(Flag::NoStdInc),
            "nostdlib" => Some(Flag::NoStdLib),
            "verbose" => Some(Flag::Verbose),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Flag::NoStdInc => "nostdinc",
            Flag::NoStdLib => "nostdlib",
            Flag::Verbose => "verbose",
        }
    }
}

/// Accumulated configuration for one compiler invocation
#[derive(Debug, Clone, Default)]
pub struct CompilerOptions {
    pub output_mode: OutputMode,
    pub nostdinc: bool,
    pub nostdlib: bool,
    pub verbose: bool,
    /// User include search paths, in registration order.
    pub include_paths: Vec<PathBuf>,
    /// System include search paths, in registration order.
    pub sysinclude_paths: Vec<PathBuf>,
    /// Library search paths, in registration order.
    pub library_paths: Vec<PathBuf>,
    /// Libraries to link against, by base name.
    pub libraries: Vec<String>,
    /// Root directory of the backend's own runtime support files.
    pub lib_root: Option<PathBuf>,
    /// Preprocessor defines; an empty value defines a bare macro.
    pub defines: FxHashMap<String, String>,
    /// Host symbols the backend must make visible to compiled code.
    pub host_symbols: Vec<(String, *const c_void)>,
}

impl CompilerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flag(&self, flag: Flag) -> bool {
        match flag {
            Flag::NoStdInc => self.nostdinc,
            Flag::NoStdLib => self.nostdlib,
            Flag::Verbose => self.verbose,
        }
    }

    pub fn set_flag(&mut self, flag: Flag, value: bool) {
        match flag {
            Flag::NoStdInc => self.nostdinc = value,
            Flag::NoStdLib => self.nostdlib = value,
            Flag::Verbose => self.verbose = value,
        }
    }

    pub fn define(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.defines.insert(name.into(), value.into());
    }

    pub fn undefine(&mut self, name: &str) {
        self.defines.remove(name);
    }
}

/// An error produced while scanning an option string
#[derive(Debug, Clone)]
pub struct OptionError {
    pub message: String,
}

impl OptionError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for OptionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for OptionError {}
