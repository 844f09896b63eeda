//! Project root configuration.
//!
//! The root is an explicit value threaded into the store constructor; the
//! store never consults environment variables or process-global state.

use std::path::{Path, PathBuf};

/// Directory holding all persisted entities, relative to the project root.
pub const CLAUDE_DIR: &str = ".claude";

/// Where a project's entities live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    root: PathBuf,
}

impl ProjectConfig {
    /// Config rooted at an explicit project directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The `.claude` directory under the root.
    pub fn claude_dir(&self) -> PathBuf {
        self.root.join(CLAUDE_DIR)
    }

    /// Walk up from `start` looking for an existing `.claude` layout.
    ///
    /// Returns `None` when no ancestor has one; callers then fall back to an
    /// explicit root and `init_project`.
    pub fn discover(start: impl AsRef<Path>) -> Option<Self> {
        let mut current = Some(start.as_ref());
        while let Some(dir) = current {
            if dir.join(CLAUDE_DIR).is_dir() {
                return Some(Self::new(dir));
            }
            current = dir.parent();
        }
        None
    }
}
