//! Content-Type lookup
//!
//! Picks a Content-Type from a served file's extension.

use std::path::Path;

/// Content-Type for a file name, by extension
///
/// # Examples
/// ```
/// use docserve::http::mime::content_type_for;
/// assert_eq!(content_type_for(Some("index.html")), "text/html; charset=utf-8");
/// assert_eq!(content_type_for(Some("file.TXT")), "text/plain; charset=utf-8");
/// assert_eq!(content_type_for(None), "application/octet-stream");
/// ```
pub fn content_type_for(file_name: Option<&str>) -> &'static str {
    let extension = file_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("txt" | "log" | "md") => "text/plain; charset=utf-8",
        Some("css") => "text/css",
        Some("csv") => "text/csv",
        Some("xml" | "xsl" | "xslt") => "application/xml",
        Some("js" | "mjs") => "application/javascript",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("pdf") => "application/pdf",
        Some("zip") => "application/zip",
        Some("gz" | "tgz") => "application/gzip",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_types() {
        assert_eq!(content_type_for(Some("index.html")), "text/html; charset=utf-8");
        assert_eq!(content_type_for(Some("summary.xslt")), "application/xml");
        assert_eq!(content_type_for(Some("style.css")), "text/css");
        assert_eq!(content_type_for(Some("logo.PNG")), "image/png");
    }

    #[test]
    fn test_unknown_extension() {
        assert_eq!(content_type_for(Some("20100730")), "application/octet-stream");
        assert_eq!(content_type_for(Some("archive.xyz")), "application/octet-stream");
        assert_eq!(content_type_for(None), "application/octet-stream");
    }
}
