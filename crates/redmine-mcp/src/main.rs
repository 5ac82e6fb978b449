//! Redmine MCP server binary.
//!
//! This binary runs the MCP server using stdio transport.

use anyhow::Context as _;
use clap::Parser;
use redmine::{Config, HttpClient};
use redmine_mcp::RedmineMcpServer;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Serve a Redmine instance's task tracking over MCP (stdio).
#[derive(Parser)]
#[command(name = "redmine-mcp", version, about)]
struct Cli {
    /// Base URL of the Redmine instance
    #[arg(long = "url", env = "REDMINE_URL")]
    url: Option<String>,

    /// Redmine API key
    #[arg(long, env = "REDMINE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the protocol.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config =
        Config::from_parts(cli.url, cli.api_key).context("Invalid Redmine configuration")?;
    let client = HttpClient::new(&config).context("Failed to build Redmine client")?;

    tracing::info!(url = %client.base_url(), "Starting redmine-mcp server");

    let base_url = client.base_url().to_string();
    let server = RedmineMcpServer::new(Arc::new(client), base_url);
    server.run_stdio().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(args: &[&str]) -> redmine::Result<Config> {
        let cli = Cli::try_parse_from(args).unwrap();
        Config::from_parts(cli.url, cli.api_key)
    }

    #[test]
    fn test_flags_build_config() {
        let config = config(&[
            "redmine-mcp",
            "--url",
            "https://redmine.example.com/",
            "--api-key",
            "abc123",
        ])
        .unwrap();

        assert_eq!(config.base_url(), "https://redmine.example.com");
        assert_eq!(config.api_key(), "abc123");
    }

    #[test]
    fn test_blank_flag_is_missing() {
        let err = config(&[
            "redmine-mcp",
            "--url",
            "https://redmine.example.com",
            "--api-key",
            "",
        ])
        .unwrap_err();

        assert!(err.to_string().contains(redmine::config::API_KEY_ENV));
    }
}
