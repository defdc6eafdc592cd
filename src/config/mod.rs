//! Project configuration
//!
//! Sessions can be seeded from a `kiln.toml` in the working directory,
//! carrying the flags, search paths, and defines a project wants on
//! every compilation:
//!
//! ```toml
//! output = "memory"
//!
//! [flags]
//! nostdlib = true
//!
//! [paths]
//! include = ["include"]
//!
//! [defines]
//! VERSION = "1"
//! ```

use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::options::{CompilerOptions, OutputMode};
use crate::session::{SessionError, SessionResult};

/// Per-project defaults loaded from `kiln.toml`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// Output mode; `memory` when absent.
    pub output: Option<OutputMode>,
    /// Libraries to link against, by base name.
    pub libraries: Vec<String>,
    pub flags: FlagConfig,
    pub paths: PathConfig,
    pub defines: FxHashMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FlagConfig {
    pub nostdinc: bool,
    pub nostdlib: bool,
    pub verbose: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathConfig {
    pub include: Vec<PathBuf>,
    pub sysinclude: Vec<PathBuf>,
    pub library: Vec<PathBuf>,
    pub lib_root: Option<PathBuf>,
}

impl ProjectConfig {
    /// Default configuration file name.
    pub const FILE_NAME: &'static str = "kiln.toml";

    /// Parse a configuration document.
    pub fn parse(text: &str) -> SessionResult<Self> {
        toml::from_str(text)
            .map_err(|e| SessionError::configuration(format!("invalid {}: {}", Self::FILE_NAME, e)))
    }

    /// Load a configuration file from an explicit path.
    pub fn from_path(path: &Path) -> SessionResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| SessionError::configuration(format!("{}: {}", path.display(), e)))?;
        Self::parse(&text)
    }

    /// Load `kiln.toml` from the current directory, falling back to
    /// defaults when it is absent or malformed.
    pub fn load_or_default() -> Self {
        Self::from_path(Path::new(Self::FILE_NAME)).unwrap_or_default()
    }

    /// Fold this configuration into a fresh set of compiler options.
    pub fn apply(&self, options: &mut CompilerOptions) {
        if let Some(output) = self.output {
            options.output_mode = output;
        }
        options.nostdinc |= self.flags.nostdinc;
        options.nostdlib |= self.flags.nostdlib;
        options.verbose |= self.flags.verbose;
        options.include_paths.extend(self.paths.include.iter().cloned());
        options
            .sysinclude_paths
            .extend(self.paths.sysinclude.iter().cloned());
        options.library_paths.extend(self.paths.library.iter().cloned());
        if let Some(lib_root) = &self.paths.lib_root {
            options.lib_root = Some(lib_root.clone());
        }
        options.libraries.extend(self.libraries.iter().cloned());
        for (name, value) in &self.defines {
            options.define(name.clone(), value.clone());
        }
    }
}
