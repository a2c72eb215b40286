use std::sync::Arc;

use docserve::config::{AppState, Config};
use docserve::fs::OsFs;
use docserve::handler::Dispatcher;
use docserve::{logger, server};

const DEFAULT_CONFIG: &str = "config";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    let cfg = Config::load_from(&config_path)?;
    logger::init(&cfg.logging)?;

    let site = cfg.build_site(Arc::new(OsFs))?;
    let dispatcher = Dispatcher::new(site);

    // Worker count from config, otherwise one per CPU core
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg, dispatcher))
}

async fn async_main(cfg: Config, dispatcher: Dispatcher) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_listener(addr)?;
    logger::log_server_start(&addr, &cfg);

    let state = Arc::new(AppState::new(cfg, dispatcher));
    server::start_server_loop(listener, state).await
}
