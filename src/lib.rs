//! docserve
//!
//! Serves request paths from an ordered table of pattern routes, falling back
//! to a docroot with per-directory index policies.
//!
//! ```
//! use docserve::fs::MemoryFs;
//! use docserve::routing::{HandlerResult, Params};
//! use docserve::{Dispatcher, Response, ServerConfig};
//! use std::sync::Arc;
//!
//! let fs = MemoryFs::new().with_file("srv/site/notes/a.txt", "alpha");
//! let mut config = ServerConfig::with_filesystem(Arc::new(fs));
//! config.set_docroot("/srv/site").unwrap();
//! config
//!     .register("/hello/(?P<name>[a-z]+)/$", |p: &Params| -> HandlerResult {
//!         Ok(Response::html(format!("hi {}", p.get("name").unwrap_or_default())))
//!     })
//!     .unwrap();
//!
//! let dispatcher = Dispatcher::new(config);
//! assert_eq!(dispatcher.dispatch("/hello/nic").unwrap(), Response::html("hi nic"));
//! assert_eq!(
//!     dispatcher.dispatch("/notes/").unwrap(),
//!     Response::Listing(vec!["a.txt".to_string()])
//! );
//! assert!(dispatcher.dispatch("/../etc/passwd").unwrap_err().is_not_found());
//! ```

pub mod config;
pub mod error;
pub mod fs;
pub mod handler;
pub mod http;
pub mod logger;
pub mod response;
pub mod routing;
pub mod server;
pub mod site;

pub use error::{ConfigureError, DispatchError};
pub use handler::Dispatcher;
pub use response::Response;
pub use site::ServerConfig;
