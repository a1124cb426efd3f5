//! Controller discovery for auto-routing.
//!
//! Auto-routing walks URI segments and asks a [`ControllerLocator`]
//! whether each one names a controller or a sub-namespace. Paths are
//! slash-separated and relative to the default namespace, e.g.
//! `Admin/Users`.

use std::io;
use std::path::{Path, PathBuf};

/// Answers existence questions about controllers and namespaces.
pub trait ControllerLocator {
    /// Returns `true` if `path` names a controller.
    fn is_controller(&self, path: &str) -> io::Result<bool>;

    /// Returns `true` if `path` names a namespace that may hold controllers.
    fn is_namespace(&self, path: &str) -> io::Result<bool>;
}

/// A locator under which nothing exists.
///
/// With it, auto-routing never descends into namespaces and takes the
/// first segment as the controller.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocator;

impl ControllerLocator for NoLocator {
    fn is_controller(&self, _path: &str) -> io::Result<bool> {
        Ok(false)
    }

    fn is_namespace(&self, _path: &str) -> io::Result<bool> {
        Ok(false)
    }
}

/// Probes a directory tree: namespaces are directories, controllers are
/// files with the configured extension.
#[derive(Debug, Clone)]
pub struct FsLocator {
    root: PathBuf,
    extension: String,
}

impl FsLocator {
    /// Creates a locator rooted at `root`, looking for `.rs` files.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: "rs".to_string(),
        }
    }

    /// Sets the controller file extension (without the dot).
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into().trim_start_matches('.').to_string();
        self
    }

    /// The directory being probed.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        path.split('/')
            .filter(|part| !part.is_empty() && *part != "." && *part != "..")
            .fold(self.root.clone(), |acc, part| acc.join(part))
    }
}

impl ControllerLocator for FsLocator {
    fn is_controller(&self, path: &str) -> io::Result<bool> {
        let file = self.resolve(path).with_extension(&self.extension);
        match std::fs::metadata(file) {
            Ok(meta) => Ok(meta.is_file()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err),
        }
    }

    fn is_namespace(&self, path: &str) -> io::Result<bool> {
        match std::fs::metadata(self.resolve(path)) {
            Ok(meta) => Ok(meta.is_dir()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err),
        }
    }
}
