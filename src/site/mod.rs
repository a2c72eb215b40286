//! Site configuration
//!
//! [`ServerConfig`] gathers everything a dispatch consults: the route table,
//! the docroot and the per-directory index policies. Routes and docroot are
//! set through `&mut self` during start-up; directory policies can be edited
//! through the registry at any time.

mod directory;
mod index;

pub use directory::{DirectoryConfig, DirectoryRegistry};
pub use index::{Header, IndexPolicy};

use crate::error::ConfigureError;
use crate::fs::{EntryKind, Filesystem, OsFs};
use crate::routing::{Handler, RouteTable};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug)]
pub struct ServerConfig {
    fs: Arc<dyn Filesystem>,
    docroot: Option<PathBuf>,
    routes: RouteTable,
    directories: DirectoryRegistry,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerConfig {
    /// Configuration reading from the real filesystem
    pub fn new() -> Self {
        Self::with_filesystem(Arc::new(OsFs))
    }

    pub fn with_filesystem(fs: Arc<dyn Filesystem>) -> Self {
        Self {
            fs,
            docroot: None,
            routes: RouteTable::new(),
            directories: DirectoryRegistry::new(),
        }
    }

    /// Serve files from `path`.
    ///
    /// The path is canonicalized and must name an existing directory, so the
    /// stored docroot is always absolute.
    pub fn set_docroot(&mut self, path: impl AsRef<Path>) -> Result<&Path, ConfigureError> {
        let path = path.as_ref();
        let canonical = self
            .fs
            .canonicalize(path)
            .map_err(|source| ConfigureError::Docroot {
                path: path.to_path_buf(),
                source,
            })?;
        match self.fs.kind(&canonical) {
            Ok(EntryKind::Directory) => {}
            Ok(_) => return Err(ConfigureError::DocrootNotDirectory(canonical)),
            Err(source) => {
                return Err(ConfigureError::Docroot {
                    path: canonical,
                    source,
                })
            }
        }
        Ok(self.docroot.insert(canonical).as_path())
    }

    pub fn docroot(&self) -> Option<&Path> {
        self.docroot.as_deref()
    }

    /// Append a route; see [`RouteTable::register`]
    pub fn register(
        &mut self,
        pattern: &str,
        handler: impl Handler + 'static,
    ) -> Result<(), ConfigureError> {
        self.routes.register(pattern, handler)
    }

    pub const fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Get-or-create the settings of a server-relative directory
    pub fn directory(&self, path: &str) -> Arc<DirectoryConfig> {
        self.directories.get(path)
    }

    pub const fn directories(&self) -> &DirectoryRegistry {
        &self.directories
    }

    pub fn filesystem(&self) -> &dyn Filesystem {
        self.fs.as_ref()
    }
}
