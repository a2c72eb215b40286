//! Per-directory configuration
//!
//! [`DirectoryRegistry::get`] is get-or-create: the first lookup of a path
//! inserts a [`DirectoryConfig`] with the `None` policy, later lookups return
//! that same instance. Entries are never removed.

use super::index::{Header, IndexPolicy};
use dashmap::DashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Settings of one server-relative directory
#[derive(Debug)]
pub struct DirectoryConfig {
    path: String,
    index: RwLock<IndexPolicy>,
}

impl DirectoryConfig {
    fn new(path: String) -> Self {
        Self {
            path,
            index: RwLock::new(IndexPolicy::default()),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Snapshot of the current policy
    pub fn index(&self) -> IndexPolicy {
        self.index
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Apply an edit to the policy under the write lock
    pub fn update_index<R>(&self, edit: impl FnOnce(&mut IndexPolicy) -> R) -> R {
        let mut policy = self.index.write().unwrap_or_else(PoisonError::into_inner);
        edit(&mut policy)
    }

    pub fn set_auto(&self) {
        self.update_index(IndexPolicy::set_auto);
    }

    pub fn set_filename(&self, name: impl Into<String>) {
        let name = name.into();
        self.update_index(|policy| policy.set_filename(name));
    }

    /// Set the header's virtual path. Returns false (and changes nothing)
    /// unless the policy is `Auto`.
    pub fn set_header_virtual(&self, virtual_path: impl Into<String>) -> bool {
        let virtual_path = virtual_path.into();
        self.edit_header(|header| header.virtual_path = virtual_path)
    }

    /// Set the header file. Returns false (and changes nothing) unless the
    /// policy is `Auto`.
    pub fn set_header_file(&self, file: impl Into<String>) -> bool {
        let file = file.into();
        self.edit_header(|header| header.file = file)
    }

    fn edit_header(&self, edit: impl FnOnce(&mut Header)) -> bool {
        self.update_index(|policy| policy.header_mut().map(edit).is_some())
    }
}

/// Mapping from server-relative directory path to its [`DirectoryConfig`]
#[derive(Debug, Default)]
pub struct DirectoryRegistry {
    entries: DashMap<String, Arc<DirectoryConfig>>,
}

impl DirectoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the config for `path`, creating it on first use.
    ///
    /// The entry API holds the shard lock across the lookup and the insert, so
    /// concurrent first lookups of one path create exactly one entry.
    pub fn get(&self, path: &str) -> Arc<DirectoryConfig> {
        let key = normalize_key(path);
        let entry = self
            .entries
            .entry(key.clone())
            .or_insert_with(|| Arc::new(DirectoryConfig::new(key)));
        Arc::clone(entry.value())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// `docs/`, `/docs` and `/docs/` all name `/docs`; the root stays `/`.
fn normalize_key(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    format!("/{trimmed}")
}
