// Configuration types module
// Defines the structures read from the configuration file

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerSettings,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub site: SiteConfig,
}

/// Listener settings
#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Tokio worker threads (defaults to CPU cores)
    #[serde(default)]
    pub workers: Option<usize>,
    #[serde(default)]
    pub max_connections: Option<usize>,
    /// Seconds a connection may stay open
    pub request_timeout: u64,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// What is served: routes, docroot and directory policies
#[derive(Debug, Deserialize, Clone, Default)]
pub struct SiteConfig {
    #[serde(default)]
    pub docroot: Option<String>,
    #[serde(default)]
    pub directories: Vec<DirectorySettings>,
    /// Registered in file order, so earlier entries win
    #[serde(default)]
    pub routes: Vec<RouteSettings>,
}

/// Index policy of one server-relative directory
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct DirectorySettings {
    pub path: String,
    #[serde(default)]
    pub index: IndexMode,
    /// Required when `index = "named"`
    #[serde(default)]
    pub filename: Option<String>,
    /// Only used when `index = "auto"`
    #[serde(default)]
    pub header_virtual: Option<String>,
    /// Only used when `index = "auto"`
    #[serde(default)]
    pub header_file: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IndexMode {
    #[default]
    None,
    Auto,
    Named,
}

/// A route answered with a fixed HTML body; `{name}` is replaced by the
/// named capture `name`
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct RouteSettings {
    pub pattern: String,
    pub body: String,
}
