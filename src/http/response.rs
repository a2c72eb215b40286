//! HTTP response building module
//!
//! Turns dispatch results into hyper responses.

use super::mime;
use crate::logger;
use crate::response::Response as DispatchResponse;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

/// Build a 200 response for a dispatch result
///
/// HTML is served as `text/html`, file content by extension and a bare
/// directory listing as a JSON array of names.
pub fn build_dispatch_response(resp: DispatchResponse, is_head: bool) -> Response<Full<Bytes>> {
    match resp {
        DispatchResponse::Html(html) => {
            build_ok_response(Bytes::from(html), "text/html; charset=utf-8", is_head)
        }
        DispatchResponse::Content { data, file_name } => build_ok_response(
            Bytes::from(data),
            mime::content_type_for(file_name.as_deref()),
            is_head,
        ),
        DispatchResponse::Listing(names) => match serde_json::to_vec(&names) {
            Ok(json) => build_ok_response(Bytes::from(json), "application/json", is_head),
            Err(e) => {
                logger::log_error(&format!("Failed to encode directory listing: {e}"));
                build_500_response()
            }
        },
    }
}

/// Build a 200 response; HEAD keeps the headers and drops the body
pub fn build_ok_response(data: Bytes, content_type: &str, is_head: bool) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    Response::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    build_plain_response(404, "404 Not Found")
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<Full<Bytes>> {
    let mut resp = build_plain_response(405, "405 Method Not Allowed");
    resp.headers_mut().insert(
        hyper::header::ALLOW,
        hyper::header::HeaderValue::from_static("GET, HEAD"),
    );
    resp
}

/// Build 500 Internal Server Error response; details stay in the error log
pub fn build_500_response() -> Response<Full<Bytes>> {
    build_plain_response(500, "500 Internal Server Error")
}

fn build_plain_response(status: u16, text: &'static str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "text/plain")
        .header("Content-Length", text.len())
        .body(Full::new(Bytes::from_static(text.as_bytes())))
        .unwrap_or_else(|e| {
            log_build_error(&status.to_string(), &e);
            Response::new(Full::new(Bytes::from_static(text.as_bytes())))
        })
}

fn log_build_error(status: &str, error: &hyper::http::Error) {
    logger::log_error(&format!("Failed to build {status} response: {error}"));
}
