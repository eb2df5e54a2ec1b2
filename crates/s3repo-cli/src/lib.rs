//! s3repo - resolve the current build of a service in an S3 bucket
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
//!
//! Artifacts live in a flat bucket as `<service>-<version>.<ext>`. A version
//! pattern decides which keys belong to the service line being tracked, and
//! the highest build number among them is the current build.
//!
//! # Commands
//!
//! - `s3repo list` prints every compatible key and marks the current one.
//! - `s3repo update` downloads the current key into a destination directory.
//!
//! # Version patterns
//!
//! ```text
//! %V  single decimal integer version
//! %S  alphanumeric (+period) subversion
//! %G  optional git commit distance (-{NUMBER}-g{HASH})
//! %B  number in the build sequence
//! %W  any text
//! ```

pub mod cmd;
pub mod config;
pub mod logging;
pub mod ui;

pub use crate::config::{Config, NameOutput};

use clap::{Parser, Subcommand};
use s3repo_core::TracingReporter;
use s3repo_core::store::s3::S3Store;
use std::path::PathBuf;

use crate::ui::progress::ConsoleProgress;

#[derive(Debug, Parser)]
#[command(name = "s3repo")]
#[command(author, version, about = "Resolve and fetch the current build of a service from S3")]
pub struct Cli {
    /// AWS region
    #[arg(
        short = 'z',
        long,
        env = "S3REPO_REGION",
        default_value = "us-east-1",
        global = true
    )]
    pub region: String,

    /// Bucket to query
    #[arg(short, long, env = "S3REPO_BUCKET", global = true)]
    pub bucket: Option<String>,

    /// Service component to update
    #[arg(short, long, global = true)]
    pub service: Option<String>,

    /// Version prefix to match (DEPRECATED; ignored when used with -w)
    #[arg(short = 'r', long, default_value = s3repo_core::DEFAULT_PREFIX, global = true)]
    pub prefix: String,

    /// Version pattern to match
    #[arg(short = 'w', long, global = true)]
    pub pattern: Option<String>,

    /// Destination directory
    #[arg(short, long, global = true)]
    pub destination: Option<PathBuf>,

    /// Display the name of the downloaded file
    #[arg(short = 'p', long = "print-name", global = true)]
    pub show_name: bool,

    /// Display progress
    #[arg(short = 'i', long = "progress", global = true)]
    pub show_progress: bool,

    /// Store the name of the downloaded file in the specified location
    #[arg(short = 'n', long = "store-name", global = true)]
    pub store_name: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// S3-compatible endpoint (e.g. `https://<account>.r2.cloudflarestorage.com`)
    #[arg(long, env = "S3REPO_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List compatible artifacts, marking the current one with `*`
    List {
        /// Print the selection as JSON
        #[arg(long)]
        json: bool,
    },
    /// Download the current artifact into the destination directory
    Update,
}

/// Connect to the bucket and run `command` with a validated config.
pub async fn run(command: &Commands, config: &Config) -> anyhow::Result<()> {
    let store = S3Store::new(config.s3_config()).await;
    let observer = TracingReporter;
    let mut stdout = std::io::stdout();

    match command {
        Commands::List { json } => {
            cmd::list::list(config, &store, &observer, *json, &mut stdout).await
        }
        Commands::Update => {
            let progress = ConsoleProgress::new(&config.service, config.show_progress);
            cmd::update::update(config, &store, &observer, &progress, &mut stdout)
                .await
                .map(|_| ())
        }
    }
}
