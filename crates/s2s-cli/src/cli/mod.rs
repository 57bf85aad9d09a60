//! CLI for s2s site-to-site transfers.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use s2s_core::config;
use s2s_core::params::names;
use s2s_core::CurlTransport;
use serde_json::{Map, Value};
use std::path::PathBuf;

use commands::{run_batch_file, run_show_config, run_transfer};

/// Top-level CLI for s2s.
#[derive(Debug, Parser)]
#[command(name = "s2s")]
#[command(about = "s2s: stream a file from one HTTP endpoint to another without storing it", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download a file and upload it to another endpoint in one stream.
    Transfer(TransferArgs),

    /// Run every transfer listed in a JSON file (an array of parameter objects).
    Batch {
        /// Path to the JSON batch file.
        path: PathBuf,
        /// Transfers in flight at once (default from config).
        #[arg(long, value_name = "N")]
        jobs: Option<usize>,
    },

    /// Show the config file location and effective settings.
    Config,
}

#[derive(Debug, Args)]
pub struct TransferArgs {
    /// URL to GET the file from.
    #[arg(long)]
    pub download_url: String,

    /// URL to send the file to. A `bearer` query parameter becomes an Authorization header.
    #[arg(long)]
    pub upload_url: String,

    /// HTTP method for the upload.
    #[arg(long, default_value = "POST")]
    pub method: String,

    /// Content-Length to declare on the upload (default: the download's own).
    #[arg(long, value_name = "BYTES")]
    pub content_length: Option<u64>,

    /// Extra download request headers as a JSON object.
    #[arg(long, default_value = "{}", value_name = "JSON")]
    pub download_headers: String,

    /// Extra upload request headers as a JSON object.
    #[arg(long, default_value = "{}", value_name = "JSON")]
    pub upload_headers: String,

    /// Print an error result instead of failing when a leg returns non-2xx.
    #[arg(long)]
    pub no_throw_on_error: bool,
}

impl TransferArgs {
    /// The flags as host parameters, keyed the way batch files key them.
    pub fn to_params(&self) -> Map<String, Value> {
        let mut p = Map::new();
        p.insert(names::DOWNLOAD_URL.into(), self.download_url.clone().into());
        p.insert(names::UPLOAD_URL.into(), self.upload_url.clone().into());
        p.insert(names::METHOD.into(), self.method.clone().into());
        if let Some(len) = self.content_length {
            p.insert(names::CONTENT_LENGTH.into(), len.into());
        }
        p.insert(
            names::DOWNLOAD_HEADERS.into(),
            self.download_headers.clone().into(),
        );
        p.insert(
            names::UPLOAD_HEADERS.into(),
            self.upload_headers.clone().into(),
        );
        p.insert(names::THROW_ON_ERROR.into(), (!self.no_throw_on_error).into());
        p
    }
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        let transport = CurlTransport::new(cfg.http.clone());

        match cli.command {
            CliCommand::Transfer(args) => run_transfer(&transport, &args).await?,
            CliCommand::Batch { path, jobs } => {
                let jobs = jobs.unwrap_or(cfg.max_concurrent_transfers);
                run_batch_file(transport, &path, jobs).await?;
            }
            CliCommand::Config => run_show_config(&cfg)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
