use std::io::BufRead;
use std::sync::Arc;

use dictum_config::FormatConfig;
use dictum_session::SessionProvider;
use kanal::{AsyncReceiver, AsyncSender};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::handlers::CommandHandlers;
use crate::router::{Command, ParseError, parse_command};
use crate::sink::{ChannelSink, ReplySink};

/// Run a parsed command and hand its reply to `sink`.
pub async fn dispatch<P: SessionProvider>(
    handlers: &CommandHandlers<P>,
    config: &FormatConfig,
    command: Command,
    sink: &dyn ReplySink,
) {
    match command {
        Command::Define { phrase, database } => {
            handlers.define(config, &phrase, database, sink).await
        }
        Command::Match {
            phrase,
            strategy,
            database,
        } => {
            handlers
                .match_words(config, &phrase, strategy, database, sink)
                .await
        }
        Command::ListDatabases => handlers.list_databases(config, sink).await,
        Command::ListStrategies => handlers.list_strategies(config, sink).await,
    }
}

/// Forward stdin lines over a channel from a dedicated thread.
///
/// A blocking stdin read cannot be interrupted, so it lives outside the
/// runtime. The thread ends at EOF or once the receiver is dropped and the
/// next line fails to send.
pub fn stdin_lines() -> AsyncReceiver<String> {
    let (tx, rx) = kanal::bounded(16);
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    tracing::error!("Failed to read stdin: {e}");
                    break;
                }
            };
            if tx.send(line).is_err() {
                break;
            }
        }
        tracing::debug!("Stdin reader finished");
    });
    rx.to_async()
}

/// Chat loop: every input line runs as its own task, replies are printed
/// by a single printer task in the order they complete.
pub struct ChatController<P> {
    handlers: Arc<CommandHandlers<P>>,
    config: Arc<FormatConfig>,
    replies: (AsyncSender<String>, AsyncReceiver<String>),
    cancel_token: CancellationToken,
}

impl<P> ChatController<P>
where
    P: SessionProvider + 'static,
{
    pub fn new(handlers: CommandHandlers<P>, config: FormatConfig) -> Self {
        Self {
            handlers: Arc::new(handlers),
            config: Arc::new(config),
            replies: kanal::bounded_async(64),
            cancel_token: CancellationToken::new(),
        }
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Run commands from `lines` until the channel closes or the token is
    /// cancelled. Commands already started are awaited before returning.
    pub async fn run(self, lines: AsyncReceiver<String>) -> anyhow::Result<()> {
        let (tx, rx) = self.replies;
        let printer = tokio::spawn(async move {
            while let Ok(text) = rx.recv().await {
                println!("{text}");
            }
        });

        let mut tasks = JoinSet::new();

        loop {
            let line = tokio::select! {
                _ = self.cancel_token.cancelled() => {
                    tracing::info!("Shutdown requested");
                    break;
                }
                line = lines.recv() => line,
            };
            let Ok(line) = line else {
                tracing::debug!("End of input");
                break;
            };

            let sink = ChannelSink::new(tx.clone());
            match parse_command(&line) {
                Ok(command) => {
                    let handlers = self.handlers.clone();
                    let config = self.config.clone();
                    tasks.spawn(async move {
                        dispatch(&handlers, &config, command, &sink).await;
                    });
                }
                Err(ParseError::Empty) => {}
                Err(e) => sink.reply(e.to_string()).await,
            }

            // Reap finished commands so the set does not grow unbounded
            while let Some(joined) = tasks.try_join_next() {
                if let Err(e) = joined {
                    tracing::error!("Command task panicked: {e}");
                }
            }
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Command task panicked: {e}");
            }
        }

        drop(tx);
        if let Err(e) = printer.await {
            tracing::error!("Printer task panicked: {e}");
        }
        Ok(())
    }
}
