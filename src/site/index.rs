//! Directory index policy
//!
//! Decides how a request for a directory is answered. The three modes are
//! exclusive; a [`Header`] can only exist while the policy is `Auto`.

use crate::error::DispatchError;
use crate::fs::{confine, EntryKind, Filesystem, Unconfined};
use crate::logger;
use crate::response::Response;
use std::path::Path;

/// Content prepended to an auto-generated listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    /// Server path whose route output is included
    pub virtual_path: String,
    /// File, relative to the directory, whose contents are included
    pub file: String,
}

impl Header {
    pub fn is_empty(&self) -> bool {
        self.virtual_path.is_empty() && self.file.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum IndexPolicy {
    /// Answer with the bare entry names
    #[default]
    None,
    /// Generate an HTML listing
    Auto(Header),
    /// Serve this file from the directory
    Named(String),
}

impl IndexPolicy {
    /// Switch to an auto listing with a fresh, empty header
    pub fn set_auto(&mut self) {
        *self = Self::Auto(Header::default());
    }

    /// Switch to serving `name`, dropping any header
    pub fn set_filename(&mut self, name: impl Into<String>) {
        *self = Self::Named(name.into());
    }

    pub const fn is_auto(&self) -> bool {
        matches!(self, Self::Auto(_))
    }

    pub fn filename(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name),
            _ => None,
        }
    }

    pub const fn header(&self) -> Option<&Header> {
        match self {
            Self::Auto(header) => Some(header),
            _ => None,
        }
    }

    pub fn header_mut(&mut self) -> Option<&mut Header> {
        match self {
            Self::Auto(header) => Some(header),
            _ => None,
        }
    }

    /// Read the named index file of `directory`.
    ///
    /// Only meaningful for `Named`; every other mode answers `NotFound`. A
    /// missing, unreadable or non-regular index file is also `NotFound`, and so
    /// is one that resolves outside `root`.
    pub fn render(
        &self,
        fs: &dyn Filesystem,
        root: &Path,
        directory: &Path,
    ) -> Result<Response, DispatchError> {
        let request = directory.display().to_string();
        let Self::Named(filename) = self else {
            return Err(DispatchError::not_found(request));
        };

        let path = match confine(fs, root, &directory.join(filename)) {
            Ok(path) => path,
            Err(Unconfined::Escape(escaped)) => {
                logger::log_escape_blocked(filename, &escaped);
                return Err(DispatchError::not_found(request));
            }
            Err(Unconfined::Missing) => return Err(DispatchError::not_found(request)),
        };
        match fs.kind(&path) {
            Ok(EntryKind::File) => {}
            Ok(_) => return Err(DispatchError::not_found(request)),
            Err(e) => return Err(DispatchError::from_read(&request, path, e)),
        }
        fs.read(&path)
            .map(|data| Response::file(&path, data))
            .map_err(|e| DispatchError::from_read(&request, path, e))
    }
}
