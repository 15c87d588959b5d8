use wasm_devserver::config::{self, Config};
use wasm_devserver::{logger, server};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = Config::load_from(&config_path)?;
    logger::init(&cfg.logging)?;

    // Worker threads default to the number of CPU cores
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
        logger::log_debug(&format!("Using {workers} worker threads"));
    }

    let runtime = runtime_builder.build()?;
    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let running = server::start(cfg.to_server_config()).inspect_err(|e| {
        logger::log_error(&format!("Startup failed: {e}"));
    })?;

    logger::log_server_start(&running.local_addr(), running.root());

    let signal_result = server::wait_for_shutdown().await;
    server::stop(running).await;
    logger::log_server_stopped();

    signal_result?;
    Ok(())
}
