//! Build configuration.

use std::path::{Path, PathBuf};

/// Controls how `@file` values are resolved during a build.
///
/// The default reads files relative to the process working directory.
#[derive(Debug, Clone)]
pub struct Options {
    /// Directory that relative `@file` paths are resolved against.
    pub base_dir: Option<PathBuf>,
    /// When `false`, every `@file` value fails with a permission error
    /// without touching the filesystem.
    pub allow_files: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            base_dir: None,
            allow_files: true,
        }
    }
}

impl Options {
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    pub fn without_files(mut self) -> Self {
        self.allow_files = false;
        self
    }

    pub(crate) fn resolve_path(&self, name: &str) -> PathBuf {
        let path = Path::new(name);
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}
