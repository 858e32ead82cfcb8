//! Command-line entry point for the server binary

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::config::{self, ServerConfig};
use crate::server;
use crate::tracing_config::{TracingConfig, TracingFormat};

/// Background removal web service
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "bgremove-web")]
pub struct Cli {
    /// Address the HTTP server binds to
    #[arg(long, default_value = "127.0.0.1:5000")]
    pub bind: SocketAddr,

    /// Directory holding the processed output image
    #[arg(long, default_value = "./static/images", value_name = "DIR")]
    pub storage_dir: PathBuf,

    /// Pexels search endpoint URL
    #[arg(long, default_value = config::DEFAULT_PEXELS_URL, value_name = "URL")]
    pub pexels_url: String,

    /// Segmentation model URL (downloaded and cached at startup)
    #[arg(long, default_value = config::DEFAULT_MODEL_URL, value_name = "URL")]
    pub model_url: String,

    /// Enable verbose logging (-v: DEBUG, -vv: TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Plain log output without colors (for CI or log files)
    #[arg(long)]
    pub plain_logs: bool,
}

impl Cli {
    /// Resolve CLI flags plus environment into a server configuration.
    ///
    /// # Errors
    /// Returns an error when the `PEXELS_API_KEY` variable is unset or the
    /// resulting configuration is invalid.
    pub fn to_config(&self) -> Result<ServerConfig> {
        let api_key =
            ServerConfig::api_key_from_env().context("cannot start without a search credential")?;

        let config = ServerConfig::builder()
            .bind_addr(self.bind)
            .storage_dir(self.storage_dir.clone())
            .pexels_api_key(api_key)
            .pexels_base_url(self.pexels_url.clone())
            .model_url(self.model_url.clone())
            .build()?;
        Ok(config)
    }
}

/// Parse arguments, initialize tracing, and run the server.
///
/// # Errors
/// Returns any startup or serve-loop error for the binary to report.
pub async fn main() -> Result<()> {
    let cli = Cli::parse();

    let format = if cli.plain_logs {
        TracingFormat::Compact
    } else {
        TracingFormat::Console
    };
    TracingConfig::new()
        .with_verbosity(cli.verbose)
        .with_format(format)
        .init()?;

    let config = cli.to_config()?;
    server::run(config).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["bgremove-web"]);
        assert_eq!(cli.bind.port(), 5000);
        assert_eq!(cli.storage_dir, PathBuf::from("./static/images"));
        assert_eq!(cli.pexels_url, config::DEFAULT_PEXELS_URL);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "bgremove-web",
            "--bind",
            "0.0.0.0:8080",
            "--storage-dir",
            "/tmp/out",
            "-vv",
        ]);
        assert_eq!(cli.bind.port(), 8080);
        assert_eq!(cli.storage_dir, PathBuf::from("/tmp/out"));
        assert_eq!(cli.verbose, 2);
    }
}
