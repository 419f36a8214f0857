//! User-facing error reporting.

use tokio::sync::mpsc;
use tracing::warn;

/// Fire-and-forget sink for messages shown to the shopper.
pub trait Notifier: Send + Sync {
    fn error(&self, message: &str);
}

/// Writes user-facing messages to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn error(&self, message: &str) {
        warn!(target: "cart_store::notify", "{message}");
    }
}

/// Forwards messages to a UI toast layer over an unbounded channel.
///
/// Messages sent after the receiver is dropped are discarded.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: mpsc::UnboundedSender<String>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl Notifier for ChannelNotifier {
    fn error(&self, message: &str) {
        let _ = self.sender.send(message.to_string());
    }
}
