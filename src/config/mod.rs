// Configuration module entry point
// Loads settings and turns the [site] section into a dispatchable ServerConfig

mod state;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

pub use state::AppState;
pub use types::{
    Config, DirectorySettings, IndexMode, LoggingConfig, RouteSettings, ServerSettings,
    SiteConfig,
};

use crate::error::ConfigureError;
use crate::fs::Filesystem;
use crate::handler::TemplateHandler;
use crate::logger;
use crate::site::ServerConfig;

impl Config {
    /// Load configuration from the given file path (extension optional).
    /// A missing file is not an error; defaults and `DOCSERVE__*` variables apply.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("DOCSERVE").separator("__"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.request_timeout", 30)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Build the site: routes in file order, then docroot, then directory policies
    pub fn build_site(&self, fs: Arc<dyn Filesystem>) -> Result<ServerConfig, ConfigureError> {
        let mut site = ServerConfig::with_filesystem(fs);

        for route in &self.site.routes {
            site.register(&route.pattern, TemplateHandler::new(route.body.clone()))?;
        }

        if let Some(docroot) = &self.site.docroot {
            site.set_docroot(docroot)?;
        }

        for settings in &self.site.directories {
            apply_directory(&site, settings)?;
        }

        Ok(site)
    }
}

fn apply_directory(site: &ServerConfig, settings: &DirectorySettings) -> Result<(), ConfigureError> {
    let dir = site.directory(&settings.path);
    match settings.index {
        IndexMode::None => {}
        IndexMode::Auto => {
            dir.set_auto();
            if let Some(virtual_path) = &settings.header_virtual {
                dir.set_header_virtual(virtual_path.clone());
            }
            if let Some(file) = &settings.header_file {
                dir.set_header_file(file.clone());
            }
        }
        IndexMode::Named => {
            let filename = settings
                .filename
                .clone()
                .ok_or_else(|| ConfigureError::MissingIndexFilename(settings.path.clone()))?;
            dir.set_filename(filename);
        }
    }

    if settings.index != IndexMode::Auto
        && (settings.header_virtual.is_some() || settings.header_file.is_some())
    {
        logger::log_warning(&format!(
            "Directory {}: header settings ignored without index = \"auto\"",
            settings.path
        ));
    }
    Ok(())
}
