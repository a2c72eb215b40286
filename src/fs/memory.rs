//! In-memory filesystem
//!
//! Holds a flat list of files; directories exist implicitly as ancestors of a
//! file. Entries are listed in the order files were added, which makes
//! directory listings deterministic.

use super::{normalize, EntryKind, Filesystem};
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Clone)]
pub struct MemoryFs {
    files: Vec<(PathBuf, Vec<u8>)>,
    denied: Vec<PathBuf>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file; relative paths are taken from `/`
    #[must_use]
    pub fn with_file(mut self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) -> Self {
        self.insert(path, contents);
        self
    }

    /// Make reads of an existing file fail with `PermissionDenied`
    #[must_use]
    pub fn with_denied(mut self, path: impl AsRef<Path>) -> Self {
        self.denied.push(absolute(path.as_ref()));
        self
    }

    pub fn insert(&mut self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) {
        let path = absolute(path.as_ref());
        let contents = contents.into();
        match self.files.iter_mut().find(|(p, _)| *p == path) {
            Some(entry) => entry.1 = contents,
            None => self.files.push((path, contents)),
        }
    }

    fn lookup(&self, path: &Path) -> Option<EntryKind> {
        if self.files.iter().any(|(p, _)| p == path) {
            Some(EntryKind::File)
        } else if self.files.iter().any(|(p, _)| p.starts_with(path)) {
            Some(EntryKind::Directory)
        } else {
            None
        }
    }
}

fn absolute(path: &Path) -> PathBuf {
    normalize(&Path::new("/").join(path))
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("no such entry: {}", path.display()),
    )
}

impl Filesystem for MemoryFs {
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        let path = absolute(path);
        match self.lookup(&path) {
            Some(_) => Ok(path),
            None => Err(not_found(&path)),
        }
    }

    fn kind(&self, path: &Path) -> io::Result<EntryKind> {
        let path = absolute(path);
        self.lookup(&path).ok_or_else(|| not_found(&path))
    }

    fn list_dir(&self, path: &Path) -> io::Result<Vec<String>> {
        let path = absolute(path);
        match self.lookup(&path) {
            Some(EntryKind::Directory) => {}
            Some(_) => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("not a directory: {}", path.display()),
                ))
            }
            None => return Err(not_found(&path)),
        }

        let mut names: Vec<String> = Vec::new();
        for (file, _) in &self.files {
            let Ok(rest) = file.strip_prefix(&path) else {
                continue;
            };
            if let Some(first) = rest.components().next() {
                let name = first.as_os_str().to_string_lossy().into_owned();
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        Ok(names)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        let path = absolute(path);
        if self.denied.contains(&path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("permission denied: {}", path.display()),
            ));
        }
        match self.files.iter().find(|(p, _)| *p == path) {
            Some((_, data)) => Ok(data.clone()),
            None if self.lookup(&path).is_some() => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("not a regular file: {}", path.display()),
            )),
            None => Err(not_found(&path)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MemoryFs {
        MemoryFs::new()
            .with_file("srv/site/index.html", "the index")
            .with_file("srv/site/2010/file.txt", "result 1")
            .with_file("srv/site/2010/other.txt", "result 2")
    }

    #[test]
    fn test_directories_are_implicit() {
        let fs = sample();
        assert_eq!(fs.kind(Path::new("/srv")).unwrap(), EntryKind::Directory);
        assert_eq!(fs.kind(Path::new("/srv/site/2010")).unwrap(), EntryKind::Directory);
        assert_eq!(fs.kind(Path::new("/srv/site/index.html")).unwrap(), EntryKind::File);
        assert!(fs.kind(Path::new("/srv/site/nope")).is_err());
    }

    #[test]
    fn test_listing_keeps_insertion_order() {
        let fs = sample();
        assert_eq!(
            fs.list_dir(Path::new("/srv/site")).unwrap(),
            vec!["index.html".to_string(), "2010".to_string()]
        );
    }

    #[test]
    fn test_prefix_sibling_is_not_a_child() {
        let fs = sample().with_file("srv/site-other/secret", "x");
        assert_eq!(fs.list_dir(Path::new("/srv/site")).unwrap().len(), 2);
        assert_eq!(
            fs.list_dir(Path::new("/srv")).unwrap(),
            vec!["site".to_string(), "site-other".to_string()]
        );
    }

    #[test]
    fn test_read_errors() {
        let fs = sample().with_denied("srv/site/index.html");
        assert_eq!(
            fs.read(Path::new("/srv/site/index.html")).unwrap_err().kind(),
            io::ErrorKind::PermissionDenied
        );
        assert_eq!(
            fs.read(Path::new("/srv/site/2010")).unwrap_err().kind(),
            io::ErrorKind::InvalidInput
        );
        assert_eq!(
            fs.read(Path::new("/srv/site/missing")).unwrap_err().kind(),
            io::ErrorKind::NotFound
        );
    }

    #[test]
    fn test_insert_replaces_contents() {
        let mut fs = sample();
        fs.insert("/srv/site/index.html", "new");
        assert_eq!(fs.read(Path::new("/srv/site/index.html")).unwrap(), b"new");
        assert_eq!(fs.list_dir(Path::new("/srv/site")).unwrap().len(), 2);
    }
}
