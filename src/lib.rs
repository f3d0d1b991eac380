pub mod application;
pub mod cli;
pub mod config;
pub mod constants;
pub mod domain;
pub mod infrastructure;

pub use application::{identity, keystore, round, selection, stdio};
pub use domain::types;
pub use infrastructure::{model, server};

use application::identity::StaticIdentity;
use application::keystore::{KeyScope, KeyVault};
use application::round::RoundRunner;
use application::stdio::ChatShell;
use cli::{Cli, RunMode};
use config::AppConfig;
use constants::PROXY_ROUTE;
use model::{CompletionBackend, Dispatcher, ProxyClient};
use std::error::Error;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt};

/// Entry point shared by the `feastedchat` binary.
pub async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    // The terminal client shares stdout with the log output.
    init_tracing(if cli.mode == RunMode::Serve { "info" } else { "warn" });
    info!("Starting feastedchat");
    debug!(mode = ?cli.mode, config = ?cli.config, direct = cli.direct, "CLI arguments parsed");

    let config_path = cli.config.as_deref().map(Path::new);
    let mut file_config = AppConfig::load(config_path)?;
    if let Some(bind) = cli.bind {
        file_config.server.bind = bind;
    }
    let dispatcher = Arc::new(Dispatcher::http());

    info!(mode = ?cli.mode, "Running in selected mode");
    match cli.mode {
        RunMode::Serve => {
            server::serve(dispatcher, &file_config.server).await?;
        }
        RunMode::Chat => {
            if cli.direct {
                chat(dispatcher, &file_config, &cli).await?;
            } else {
                let proxy = ProxyClient::new(file_config.round.proxy_url.clone());
                chat(proxy, &file_config, &cli).await?;
            }
        }
        RunMode::All => {
            let listener = server::bind(&file_config.server).await?;
            let origins = file_config.server.allowed_origins.clone();
            let served = dispatcher.clone();
            tokio::spawn(async move {
                if let Err(error) = server::serve_on(listener, served, &origins).await {
                    error!(%error, "Proxy server stopped");
                }
            });

            if cli.direct {
                chat(dispatcher, &file_config, &cli).await?;
            } else {
                let url = format!("http://{}{}", file_config.server.bind, PROXY_ROUTE);
                chat(ProxyClient::new(url), &file_config, &cli).await?;
            }
        }
    }
    info!("feastedchat finished");
    Ok(())
}

async fn chat<B: CompletionBackend>(
    backend: B,
    file_config: &AppConfig,
    cli: &Cli,
) -> Result<(), Box<dyn Error>> {
    let runner = RoundRunner::new(backend, file_config.round.timeout);
    let vault = KeyVault::new(file_config.keys.path.clone());
    let scope = if cli.session_keys {
        KeyScope::Session
    } else {
        KeyScope::Durable
    };
    let identity = StaticIdentity::anonymous();

    ChatShell::new(runner, vault, &identity, scope).run().await?;
    Ok(())
}

/// Install the global subscriber once. `RUST_LOG` overrides `default_level`.
pub fn init_tracing(default_level: &str) {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_level(true)
            .with_writer(std::io::stderr)
            .init();
    });
}
