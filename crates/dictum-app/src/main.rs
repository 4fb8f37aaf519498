use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use dictum_config::Config;
use dictum_dict::DictProvider;
use tokio::signal;
use tracing_subscriber::EnvFilter;

pub mod controller;
pub mod handlers;
pub mod router;
pub mod sink;

#[cfg(test)]
mod tests;

use self::controller::{ChatController, dispatch, stdin_lines};
use self::handlers::CommandHandlers;
use self::router::Command;
use self::sink::StdoutSink;

const DEFAULT_CONFIG_FILE: &str = "dictum.json";

#[derive(Parser)]
#[command(name = "dictum", version, about = "Look words up on a DICT server")]
struct Cli {
    /// Dictionary server as host[:port]
    #[arg(short, long)]
    server: Option<String>,

    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, default_value_t = false)]
    debug: bool,

    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Define a word or phrase
    Define {
        #[arg(required = true)]
        phrase: Vec<String>,
        /// Database to search, defaults to all
        #[arg(short, long)]
        from: Option<String>,
    },
    /// List headwords matching a word or phrase
    Match {
        #[arg(required = true)]
        phrase: Vec<String>,
        /// Matching strategy, defaults to the server's
        #[arg(short, long)]
        using: Option<String>,
        /// Database to search, defaults to all
        #[arg(short, long)]
        from: Option<String>,
    },
    /// List the server's databases
    Databases,
    /// List the server's matching strategies
    Strategies,
    /// Read chat commands from stdin
    Repl,
}

impl CliCommand {
    fn into_command(self) -> Option<Command> {
        match self {
            CliCommand::Define { phrase, from } => Some(Command::Define {
                phrase: phrase.join(" "),
                database: from.as_deref().map(Into::into),
            }),
            CliCommand::Match {
                phrase,
                using,
                from,
            } => Some(Command::Match {
                phrase: phrase.join(" "),
                strategy: using.as_deref().map(Into::into),
                database: from.as_deref().map(Into::into),
            }),
            CliCommand::Databases => Some(Command::ListDatabases),
            CliCommand::Strategies => Some(Command::ListStrategies),
            CliCommand::Repl => None,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_optional(Path::new(DEFAULT_CONFIG_FILE))?,
    };
    if cli.server.is_some() {
        config.server.endpoint = cli.server.clone();
    }

    let provider = match config.server.timeout_seconds {
        0 => DictProvider::new(),
        secs => DictProvider::with_timeout(Duration::from_secs(secs)),
    };
    let handlers = CommandHandlers::new(provider, config.server.endpoint.clone());

    match cli.command.and_then(CliCommand::into_command) {
        Some(command) => {
            dispatch(&handlers, &config.format, command, &StdoutSink).await;
        }
        None => {
            if atty::is(atty::Stream::Stdin) {
                eprintln!("dictum ready: define, match, list databases, list strategies");
            }
            tracing::info!(
                "Using server {}",
                config.server.endpoint.as_deref().unwrap_or("(default)")
            );

            let controller = ChatController::new(handlers, config.format);
            let cancel = controller.cancel_token();
            tokio::spawn(async move {
                if let Err(e) = signal::ctrl_c().await {
                    tracing::error!("Failed to listen for ctrl+c: {e}");
                    return;
                }
                cancel.cancel();
            });

            controller.run(stdin_lines()).await?;
        }
    }

    Ok(())
}
