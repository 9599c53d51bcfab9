use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Republishes XML video CMS feeds as aggregator JSON
#[derive(Parser)]
#[command(name = "vodbridge")]
#[command(about = "Adapter from XML video CMS feeds to aggregator JSON", long_about = None)]
pub struct Cli {
    /// Config file (defaults to config.toml in the user config dir)
    #[arg(short, long, global = true, env = "VODBRIDGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// More log output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP adapter
    Serve {
        /// Listen address, overrides the config file
        #[arg(long)]
        host: Option<String>,
        /// Listen port, overrides the config file
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Map a local XML feed and print the envelope
    Convert {
        /// Feed file, or `-` for stdin
        input: PathBuf,
        /// One of videolist, list, detail
        #[arg(short, long, default_value = "videolist")]
        action: String,
        /// Indent the JSON output
        #[arg(long)]
        pretty: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_serve_overrides() {
        let cli = Cli::parse_from(["vodbridge", "-v", "serve", "--host", "127.0.0.1", "-p", "9000"]);
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Serve { host, port } => {
                assert_eq!(host.as_deref(), Some("127.0.0.1"));
                assert_eq!(port, Some(9000));
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn convert_defaults_to_videolist() {
        let cli = Cli::parse_from(["vodbridge", "convert", "-", "--config", "x.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
        match cli.command {
            Commands::Convert { input, action, pretty } => {
                assert_eq!(input, PathBuf::from("-"));
                assert_eq!(action, "videolist");
                assert!(!pretty);
            }
            _ => panic!("expected convert"),
        }
    }

    #[test]
    fn command_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
