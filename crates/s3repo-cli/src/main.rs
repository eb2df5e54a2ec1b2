//! s3repo - resolve and fetch the current build of a service

use anyhow::Result;
use clap::Parser;

use s3repo_cli::{Cli, Config, logging};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_cli(&cli)?;
    logging::init(config.verbose);

    s3repo_cli::run(&cli.command, &config).await
}
