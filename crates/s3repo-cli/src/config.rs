//! Validated command-line configuration.
//!
//! Clap only parses; everything that needs cross-flag checks lands here so
//! commands receive a `Config` that is known to be consistent.

use std::path::{Path, PathBuf};

use s3repo_core::store::s3::S3Config;
use s3repo_core::{Error, Matcher, legacy_pattern};

use crate::{Cli, Commands};

/// What to do with the path of a downloaded artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameOutput {
    /// Nothing.
    Silent,
    /// Print it on stdout.
    Print,
    /// Write it into this file.
    Store(PathBuf),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub region: String,
    pub bucket: String,
    pub service: String,
    /// Effective version pattern: `-w`, or the one derived from `-r`.
    pub pattern: String,
    pub endpoint: Option<String>,
    pub destination: Option<PathBuf>,
    pub name_output: NameOutput,
    pub show_progress: bool,
    /// Debug logging for the s3repo crates.
    pub verbose: bool,
}

impl Config {
    /// Validate parsed flags.
    pub fn from_cli(cli: &Cli) -> Result<Self, Error> {
        let service = cli
            .service
            .clone()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::Config("No service name provided".to_string()))?;

        let bucket = cli
            .bucket
            .clone()
            .filter(|b| !b.is_empty())
            .ok_or_else(|| Error::Config("No bucket provided".to_string()))?;

        let name_output = match (&cli.store_name, cli.show_name) {
            (Some(_), true) => {
                return Err(Error::Config(
                    "Cannot use both -n and -p options at the same time".to_string(),
                ));
            }
            (Some(path), false) => NameOutput::Store(path.clone()),
            (None, true) => NameOutput::Print,
            (None, false) => NameOutput::Silent,
        };

        if matches!(cli.command, Commands::Update) && cli.destination.is_none() {
            return Err(Error::Config("Destination file not provided".to_string()));
        }

        let pattern = cli
            .pattern
            .clone()
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| legacy_pattern(&cli.prefix));

        // Fail on a bad pattern before any request is made.
        Matcher::compile(&service, &pattern)?;

        Ok(Self {
            region: cli.region.clone(),
            bucket,
            service,
            pattern,
            endpoint: cli.endpoint.clone().filter(|e| !e.is_empty()),
            destination: cli.destination.clone(),
            name_output,
            show_progress: cli.show_progress,
            verbose: cli.verbose,
        })
    }

    /// Connection settings for the S3 client.
    pub fn s3_config(&self) -> S3Config {
        S3Config {
            region: self.region.clone(),
            bucket: self.bucket.clone(),
            endpoint: self.endpoint.clone(),
        }
    }

    /// Destination directory for `update`.
    pub fn destination(&self) -> Result<&Path, Error> {
        self.destination
            .as_deref()
            .ok_or_else(|| Error::Config("Destination file not provided".to_string()))
    }
}
