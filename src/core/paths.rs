//! Path helpers

use std::path::{Path, PathBuf};

/// Name of the state directory kept under the root
pub const STATE_DIR_NAME: &str = ".cartledger";

/// Get the state directory for a given root
pub fn state_dir(root: &Path) -> PathBuf {
    root.join(STATE_DIR_NAME)
}

/// Resolve `root` to an absolute path when it exists
pub fn resolve_root(root: &Path) -> PathBuf {
    root.canonicalize().unwrap_or_else(|_| root.to_path_buf())
}
