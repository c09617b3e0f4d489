//! modpaths CLI
//!
//! Queries a running modpaths daemon from the command line.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use modpaths_http::{HttpClient, HttpError, Request};

#[derive(Debug, Parser)]
#[command(name = "modpaths")]
#[command(about = "Find Go package directories by path suffix")]
#[command(version)]
struct Cli {
    /// Daemon address
    #[arg(long, default_value = "localhost:6118", global = true)]
    addr: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Import paths ending in PARTIAL, e.g. 'net/http'
    Imports {
        partial: String,
    },

    /// Directories ending in PARTIAL
    Dirs {
        partial: String,
    },

    /// Re-index every root and wait for it to finish
    Update,
}

impl Commands {
    fn request(&self) -> Request {
        match self {
            Commands::Imports { partial } => Request::imports(partial.as_str()),
            Commands::Dirs { partial } => Request::dirs(partial.as_str()),
            Commands::Update => Request::Rebuild,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Simple logging for CLI
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt().with_target(false).init();
    }

    let cli = Cli::parse();
    let client = HttpClient::with_addr(cli.addr.as_str());
    let request = cli.command.request();

    tracing::debug!(addr = %client.addr(), path = %request.to_path(), "Sending request");

    let matches = match client.request(&request).await {
        Ok(matches) => matches,
        Err(HttpError::DaemonNotRunning(addr)) => {
            anyhow::bail!("Daemon not running at {addr}. Start with: modpaths-daemon")
        }
        Err(e) => return Err(e).context("Request failed"),
    };

    for line in matches {
        println!("{line}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("modpaths").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_subcommands_build_requests() {
        assert_eq!(
            parse(&["imports", "net/http"]).command.request(),
            Request::imports("net/http")
        );
        assert_eq!(parse(&["dirs", "os"]).command.request(), Request::dirs("os"));
        assert_eq!(parse(&["update"]).command.request(), Request::Rebuild);
    }

    #[test]
    fn test_addr_flag() {
        assert_eq!(parse(&["update"]).addr, "localhost:6118");
        assert_eq!(
            parse(&["--addr", "127.0.0.1:7000", "dirs", "x"]).addr,
            "127.0.0.1:7000"
        );
        assert_eq!(
            parse(&["dirs", "x", "--addr", "127.0.0.1:7000"]).addr,
            "127.0.0.1:7000"
        );
    }

    #[test]
    fn test_partial_is_required() {
        assert!(Cli::try_parse_from(["modpaths", "imports"]).is_err());
    }
}
