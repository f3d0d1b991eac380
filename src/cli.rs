use std::net::SocketAddr;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "feastedchat",
    version,
    about = "Send one prompt to many LLM providers and compare the answers"
)]
pub struct Cli {
    /// Configuration file path
    #[arg(long)]
    pub config: Option<String>,
    #[arg(long, value_enum, default_value_t = RunMode::Chat)]
    pub mode: RunMode,
    /// Proxy bind address (overrides config if specified)
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    /// Call providers in-process instead of through the local proxy
    #[arg(long)]
    pub direct: bool,
    /// Keep saved API keys for this session only unless `--save` is given
    #[arg(long)]
    pub session_keys: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RunMode {
    /// Local proxy server only
    Serve,
    /// Interactive terminal client
    Chat,
    /// Proxy in the background plus the terminal client
    All,
}
