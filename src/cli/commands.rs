//! CLI command definitions and argument parsing

use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

#[derive(Parser)]
#[command(name = "rabot")]
#[command(about = "RABOT: ask anything about a professional profile")]
#[command(version)]
pub struct Cli {
    /// Enable verbose debug logging (default: info level)
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file to use instead of ./config.toml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the vector index from the profile document
    Index {
        /// Overwrite an existing index without asking
        #[arg(short, long)]
        force: bool,
    },
    /// Ask a question, or start an interactive session when none is given
    Ask {
        /// The question to answer
        question: Option<String>,
        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Start the HTTP API server
    Serve {
        /// Host to bind to (default: server.host)
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (default: server.port)
        #[arg(short, long)]
        port: Option<u16>,
        /// Enable permissive CORS
        #[arg(long)]
        cors: bool,
    },
    /// Show current configuration
    Config,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_ask_with_question() {
        let cli = Cli::parse_from(["rabot", "ask", "What are your skills?"]);
        match cli.command {
            Commands::Ask { question, json } => {
                assert_eq!(question.as_deref(), Some("What are your skills?"));
                assert!(!json);
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn test_parse_index_force_and_config() {
        let cli = Cli::parse_from(["rabot", "index", "--force", "--config", "alt.toml"]);
        assert!(matches!(cli.command, Commands::Index { force: true }));
        assert_eq!(cli.config, Some(PathBuf::from("alt.toml")));
    }

    #[test]
    fn test_parse_serve_overrides() {
        let cli = Cli::parse_from(["rabot", "-v", "serve", "--port", "9000", "--cors"]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Serve { host, port, cors } => {
                assert_eq!(host, None);
                assert_eq!(port, Some(9000));
                assert!(cors);
            }
            _ => panic!("expected serve"),
        }
    }
}
