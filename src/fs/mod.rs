//! Filesystem access module
//!
//! Everything the file server reads goes through [`Filesystem`], so the serving
//! logic runs the same against the real disk ([`OsFs`]) and an in-memory tree
//! ([`MemoryFs`]).

mod memory;
mod os;

pub use memory::MemoryFs;
pub use os::OsFs;

use std::fmt;
use std::io;
use std::path::{Component, Path, PathBuf};

/// What a path points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Other,
}

/// Read-only view of a filesystem
pub trait Filesystem: Send + Sync + fmt::Debug {
    /// Absolute path with `.`/`..` and links resolved. Fails if the path does not exist.
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;

    fn kind(&self, path: &Path) -> io::Result<EntryKind>;

    /// Entry names of a directory, in enumeration order
    fn list_dir(&self, path: &Path) -> io::Result<Vec<String>>;

    /// Whole contents of a regular file. Non-files fail with `InvalidInput`.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// Lexically normalize a path: drop `.`, let `..` remove the previous segment.
///
/// `..` never climbs above the root, so `/../../etc` becomes `/etc`. No
/// filesystem access happens here.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                if out.file_name().is_some() {
                    out.pop();
                }
            }
            Component::Normal(part) => out.push(part),
        }
    }
    out
}

/// Whether `target` is `root` itself or lies beneath it.
///
/// Compares whole path segments: `/srv/site` does not contain `/srv/site-other`.
pub fn is_contained(root: &Path, target: &Path) -> bool {
    let mut target_segments = target.components();
    root.components()
        .all(|segment| target_segments.next() == Some(segment))
}

/// Why [`confine`] refused a path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unconfined {
    /// The lexical or the link-resolved path leaves the root
    Escape(PathBuf),
    /// The path cannot be canonicalized: missing, broken link or denied
    Missing,
}

/// Resolve `path` to an existing canonical path inside `root`.
///
/// The path is normalized and checked before the filesystem is touched, then
/// the canonical (link-resolved) path is checked again. Normalization is
/// lexical, so `a/link/../b` names `a/b` even when `link` points elsewhere.
pub fn confine(fs: &dyn Filesystem, root: &Path, path: &Path) -> Result<PathBuf, Unconfined> {
    let lexical = normalize(path);
    if !is_contained(root, &lexical) {
        return Err(Unconfined::Escape(lexical));
    }

    let canonical = fs.canonicalize(&lexical).map_err(|_| Unconfined::Missing)?;
    if !is_contained(root, &canonical) {
        return Err(Unconfined::Escape(canonical));
    }
    Ok(canonical)
}
