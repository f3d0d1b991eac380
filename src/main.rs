use clap::Parser;
use feastedchat::cli::Cli;
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    feastedchat::run(cli).await
}
