//! Static file serving module
//!
//! Resolves request paths below the docroot and answers with file contents or,
//! for directories, whatever the directory's index policy asks for.

use crate::error::DispatchError;
use crate::fs::{self, EntryKind, Unconfined};
use crate::logger;
use crate::response::Response;
use crate::site::{Header, IndexPolicy, ServerConfig};
use std::path::{Path, PathBuf};

/// File server over a configured docroot
#[derive(Debug, Clone, Copy)]
pub struct FileServer<'a> {
    config: &'a ServerConfig,
    docroot: &'a Path,
}

impl<'a> FileServer<'a> {
    /// `None` when no docroot has been set
    pub fn new(config: &'a ServerConfig) -> Option<Self> {
        let docroot = config.docroot()?;
        Some(Self { config, docroot })
    }

    pub fn handle(&self, path: &str) -> Result<Response, DispatchError> {
        self.handle_with(path, |_| None)
    }

    /// Serve `path`; `virtual_header` produces the body of an auto-index
    /// header's virtual path.
    pub fn handle_with(
        &self,
        path: &str,
        virtual_header: impl Fn(&str) -> Option<String>,
    ) -> Result<Response, DispatchError> {
        let target = self.resolve(path)?;
        let fs = self.config.filesystem();

        match fs.kind(&target) {
            Ok(EntryKind::Directory) => self.serve_directory(path, &target, &virtual_header),
            Ok(EntryKind::File) => match fs.read(&target) {
                Ok(data) => Ok(Response::file(&target, data)),
                Err(e) => Err(DispatchError::from_read(path, target, e)),
            },
            Ok(EntryKind::Other) => Err(DispatchError::not_found(path)),
            Err(e) => Err(DispatchError::from_read(path, target, e)),
        }
    }

    /// Map a request path to an existing filesystem path inside the docroot.
    ///
    /// The joined path is normalized and checked before the filesystem is
    /// touched; the canonical (link-resolved) path is checked again. Both an
    /// escape and a missing target are `NotFound`.
    ///
    /// `..` is applied to the request text before links are followed, so
    /// `/a/link/../b` serves `a/b` wherever `link` points.
    pub fn resolve(&self, path: &str) -> Result<PathBuf, DispatchError> {
        self.confine(path, &self.docroot.join(path.trim_matches('/')))
    }

    fn confine(&self, request: &str, path: &Path) -> Result<PathBuf, DispatchError> {
        fs::confine(self.config.filesystem(), self.docroot, path).map_err(|reason| {
            if let Unconfined::Escape(escaped) = &reason {
                logger::log_escape_blocked(request, escaped);
            }
            DispatchError::not_found(request)
        })
    }

    /// Server-relative path of a directory inside the docroot; the docroot itself is `/`
    pub fn server_path(&self, target: &Path) -> String {
        let relative = target.strip_prefix(self.docroot).unwrap_or(Path::new(""));
        let segments: Vec<_> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect();
        format!("/{}", segments.join("/"))
    }

    fn serve_directory(
        &self,
        request: &str,
        target: &Path,
        virtual_header: &dyn Fn(&str) -> Option<String>,
    ) -> Result<Response, DispatchError> {
        let server_path = self.server_path(target);
        let policy = self.config.directory(&server_path).index();
        logger::log_debug(&format!("Directory {server_path} served with {policy:?}"));

        match &policy {
            IndexPolicy::Auto(header) => {
                let entries = self.list(request, target)?;
                let prefix = self.render_header(target, header, virtual_header);
                Ok(Response::Html(render_listing(&prefix, &entries)))
            }
            IndexPolicy::Named(_) => policy
                .render(self.config.filesystem(), self.docroot, target)
                .map_err(|e| match e {
                    DispatchError::NotFound(_) => DispatchError::not_found(request),
                    other => other,
                }),
            IndexPolicy::None => self.list(request, target).map(Response::Listing),
        }
    }

    fn list(&self, request: &str, target: &Path) -> Result<Vec<String>, DispatchError> {
        self.config
            .filesystem()
            .list_dir(target)
            .map_err(|e| DispatchError::from_read(request, target.to_path_buf(), e))
    }

    /// Header file contents, then virtual path output, each followed by a line break.
    /// Parts that cannot be produced are left out.
    fn render_header(
        &self,
        directory: &Path,
        header: &Header,
        virtual_header: &dyn Fn(&str) -> Option<String>,
    ) -> String {
        let mut out = String::new();

        if !header.file.is_empty() {
            match self.read_header_file(directory, &header.file) {
                Some(text) => {
                    out.push_str(&text);
                    out.push_str(LINE_BREAK);
                }
                None => logger::log_warning(&format!(
                    "Index header file '{}' unavailable in {}",
                    header.file,
                    directory.display()
                )),
            }
        }

        if !header.virtual_path.is_empty() {
            match virtual_header(&header.virtual_path) {
                Some(text) => {
                    out.push_str(&text);
                    out.push_str(LINE_BREAK);
                }
                None => logger::log_warning(&format!(
                    "Index header path '{}' produced no content",
                    header.virtual_path
                )),
            }
        }

        out
    }

    fn read_header_file(&self, directory: &Path, file: &str) -> Option<String> {
        let path = self.confine(file, &directory.join(file)).ok()?;
        let data = self.config.filesystem().read(&path).ok()?;
        Some(String::from_utf8_lossy(&data).into_owned())
    }
}

const LINE_BREAK: &str = "<br/>\n";

/// Render an auto index: one link per entry, in the given order
pub fn render_listing(header: &str, entries: &[String]) -> String {
    let links: Vec<String> = entries
        .iter()
        .map(|entry| {
            let name = escape_html(entry);
            format!(r#"<a href="{name}">{name}</a>"#)
        })
        .collect();
    format!("<html><body>{header}{}</body></html>", links.join(LINE_BREAK))
}

pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
