//! HTTP request entry point
//!
//! Maps a hyper request onto [`Dispatcher::dispatch`](super::Dispatcher::dispatch)
//! and the outcome onto a status code. Dispatch reads the filesystem
//! synchronously, so it runs on the blocking pool.

use crate::config::AppState;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{CONTENT_LENGTH, USER_AGENT};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let mut entry = AccessLogEntry::new(peer_addr.ip().to_string(), method.to_string(), path.clone());
    entry.http_version = format!("{:?}", req.version()).trim_start_matches("HTTP/").to_string();
    entry.user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);

    let response = match check_http_method(&method) {
        Some(resp) => resp,
        None => dispatch(&state, path, method == Method::HEAD, &mut entry).await,
    };

    if state.access_log() {
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Only GET and HEAD reach the dispatcher
fn check_http_method(method: &Method) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

async fn dispatch(
    state: &Arc<AppState>,
    path: String,
    is_head: bool,
    entry: &mut AccessLogEntry,
) -> Response<Full<Bytes>> {
    let dispatcher = Arc::clone(&state.dispatcher);
    let outcome = tokio::task::spawn_blocking(move || {
        let result = dispatcher.dispatch(&path);
        (path, result)
    })
    .await;

    match outcome {
        Ok((_, Ok(resp))) => {
            entry.kind = resp.kind().as_str();
            http::build_dispatch_response(resp, is_head)
        }
        Ok((_, Err(e))) if e.is_not_found() => http::build_404_response(),
        Ok((path, Err(e))) => {
            logger::log_error(&format!("Dispatch of {path} failed: {e}"));
            http::build_500_response()
        }
        Err(e) => {
            logger::log_error(&format!("Dispatch task failed: {e}"));
            http::build_500_response()
        }
    }
}
