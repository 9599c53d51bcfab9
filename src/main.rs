mod cli;

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Commands};
use vodbridge::config::Config;
use vodbridge::types::Envelope;
use vodbridge::Bridge;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose > 0 {
        "vodbridge=debug,tower_http=debug"
    } else {
        "vodbridge=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            vodbridge::server::serve(&config).await
        }
        Commands::Convert { input, action, pretty } => {
            let body = read_input(&input)?;
            let bridge = Bridge::new(&config)?;
            let envelope = bridge
                .convert(&body, &action)
                .unwrap_or_else(|e| Envelope::from_error(&e));
            let out = if pretty || config.pretty {
                serde_json::to_string_pretty(&envelope)?
            } else {
                serde_json::to_string(&envelope)?
            };
            println!("{}", out);
            Ok(())
        }
    }
}

fn read_input(input: &Path) -> Result<String> {
    if input == Path::new("-") {
        let mut body = String::new();
        std::io::stdin()
            .read_to_string(&mut body)
            .context("reading feed from stdin")?;
        Ok(body)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("reading feed: {}", input.display()))
    }
}
