//! HTTP protocol layer module
//!
//! Content types and response builders used by the request entry point.

pub mod mime;
pub mod response;

// Re-export commonly used builders
pub use response::{
    build_404_response, build_405_response, build_500_response, build_dispatch_response,
    build_ok_response,
};
