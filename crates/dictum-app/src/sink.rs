use async_trait::async_trait;
use kanal::AsyncSender;

/// Where a command's final reply goes. Called at most once per command.
#[async_trait]
pub trait ReplySink: Send + Sync {
    async fn reply(&self, text: String);
}

/// Prints replies on stdout.
pub struct StdoutSink;

#[async_trait]
impl ReplySink for StdoutSink {
    async fn reply(&self, text: String) {
        println!("{text}");
    }
}

/// Forwards replies to the printer task.
#[derive(Clone)]
pub struct ChannelSink {
    tx: AsyncSender<String>,
}

impl ChannelSink {
    pub fn new(tx: AsyncSender<String>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl ReplySink for ChannelSink {
    async fn reply(&self, text: String) {
        if let Err(e) = self.tx.send(text).await {
            tracing::error!("Reply dropped, printer is gone: {e}");
        }
    }
}
