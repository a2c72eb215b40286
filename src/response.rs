//! Dispatch response type
//!
//! A dispatch can produce generated HTML, raw file content or a bare directory
//! listing. The variant is the discriminator the HTTP layer uses to pick a
//! content type.

use std::path::Path;

/// Discriminator for [`Response`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    Html,
    Content,
    Listing,
}

impl ResponseKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Content => "content",
            Self::Listing => "listing",
        }
    }
}

/// Result of a successful dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Generated HTML (handler output, auto index)
    Html(String),
    /// File bytes; `file_name` lets the adapter guess a content type
    Content {
        data: Vec<u8>,
        file_name: Option<String>,
    },
    /// Entry names of a directory without an index policy
    Listing(Vec<String>),
}

impl Response {
    pub fn html(body: impl Into<String>) -> Self {
        Self::Html(body.into())
    }

    /// File content named after the last component of `path`
    pub fn file(path: &Path, data: Vec<u8>) -> Self {
        Self::Content {
            data,
            file_name: path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned()),
        }
    }

    pub const fn kind(&self) -> ResponseKind {
        match self {
            Self::Html(_) => ResponseKind::Html,
            Self::Content { .. } => ResponseKind::Content,
            Self::Listing(_) => ResponseKind::Listing,
        }
    }

    /// Body as text, if this response has a textual body
    pub fn as_text(&self) -> Option<std::borrow::Cow<'_, str>> {
        match self {
            Self::Html(body) => Some(body.as_str().into()),
            Self::Content { data, .. } => Some(String::from_utf8_lossy(data)),
            Self::Listing(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_response_keeps_name() {
        let resp = Response::file(Path::new("/srv/site/a/file.txt"), b"x".to_vec());
        assert_eq!(resp.kind(), ResponseKind::Content);
        assert_eq!(
            resp,
            Response::Content {
                data: b"x".to_vec(),
                file_name: Some("file.txt".to_string()),
            }
        );
    }

    #[test]
    fn test_listing_has_no_text() {
        let resp = Response::Listing(vec!["a".to_string()]);
        assert!(resp.as_text().is_none());
        assert_eq!(Response::html("hi").as_text().as_deref(), Some("hi"));
    }
}
