//! Runtime configuration resolved once from command-line and environment

use std::path::{Path, PathBuf};

use crate::core::paths::{resolve_root, state_dir};
use crate::core::render::{OutputFormat, RenderConfig};
use crate::persist::FileStore;

/// How chatty diagnostics on stderr are
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
}

impl Verbosity {
    pub fn from_flags(quiet: bool, verbose: bool) -> Self {
        match (quiet, verbose) {
            (_, true) => Verbosity::Verbose,
            (true, false) => Verbosity::Quiet,
            (false, false) => Verbosity::Normal,
        }
    }

    /// Filter directive used when `RUST_LOG` is unset
    pub fn default_directive(self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Verbose => "debug",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub root: PathBuf,
    pub state_dir: PathBuf,
    pub render: RenderConfig,
    pub verbosity: Verbosity,
}

impl Config {
    /// Unknown formats fall back to jsonl
    pub fn new(root: &Path, format: &str, pretty: bool, verbosity: Verbosity) -> Self {
        let root = resolve_root(root);
        let format: OutputFormat = format.parse().unwrap_or_default();
        Self {
            state_dir: state_dir(&root),
            root,
            render: RenderConfig::with_pretty(format, pretty),
            verbosity,
        }
    }

    /// File store rooted at the state directory
    pub fn store(&self) -> FileStore {
        FileStore::new(&self.state_dir)
    }
}
