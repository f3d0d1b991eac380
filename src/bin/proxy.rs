//! Proxy-only binary entry point
//!
//! Runs the local `/api/response` endpoint without the terminal client.

use clap::Parser;
use feastedchat::config::AppConfig;
use feastedchat::model::Dispatcher;
use feastedchat::{init_tracing, server};
use std::error::Error;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "feastedchat-proxy", about = "FeastedChat LLM proxy server")]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<String>,

    /// Bind address (overrides config if specified)
    #[arg(long)]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    init_tracing("info");
    info!("Starting FeastedChat proxy");

    let config_path = args.config.as_deref().map(Path::new);
    let mut file_config = AppConfig::load(config_path)?;
    if let Some(bind) = args.bind {
        file_config.server.bind = bind;
    }
    debug!(
        bind = %file_config.server.bind,
        origins = file_config.server.allowed_origins.len(),
        "Configuration loaded"
    );

    server::serve(Arc::new(Dispatcher::http()), &file_config.server).await?;
    Ok(())
}
