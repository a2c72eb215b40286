//! Request handler module
//!
//! Dispatch of request paths to routes and the docroot, plus the HTTP entry
//! point that drives it.

pub mod dispatcher;
pub mod file_server;
pub mod request;
pub mod template;

// Re-export main entry points
pub use dispatcher::Dispatcher;
pub use file_server::FileServer;
pub use request::handle_request;
pub use template::TemplateHandler;
