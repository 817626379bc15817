//! User-facing notifications.
//!
//! The cart store reports failures through a [`Notifier`] instead of
//! returning them. Notifications are fire-and-forget: a sink cannot fail and
//! cannot influence the operation that raised it.

use std::fmt;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use tokio::sync::mpsc;

/// A message shown to the user after a cart operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    /// Adding a product failed (missing product, lookup or storage failure).
    AddProductFailed,
    /// Removing a product failed (not in cart, storage failure).
    RemoveProductFailed,
    /// Changing a quantity failed (lookup or storage failure).
    UpdateAmountFailed,
    /// The product had no stock left when adding it.
    OutOfStockOnAdd,
    /// The requested quantity exceeds stock.
    OutOfStockOnUpdate,
}

impl Notice {
    /// Text shown to the user.
    pub fn message(&self) -> &'static str {
        match self {
            Notice::AddProductFailed => "Error adding product",
            Notice::RemoveProductFailed => "Error removing product",
            Notice::UpdateAmountFailed => "Error changing product quantity",
            Notice::OutOfStockOnAdd | Notice::OutOfStockOnUpdate => {
                "Requested quantity is out of stock"
            }
        }
    }

    /// Whether the notice reports a stock shortage rather than a failure.
    pub fn is_out_of_stock(&self) -> bool {
        matches!(self, Notice::OutOfStockOnAdd | Notice::OutOfStockOnUpdate)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// A sink for user-facing notices.
pub trait Notifier: Send + Sync {
    /// Deliver a notice. Must not block.
    fn notify(&self, notice: Notice);
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    fn notify(&self, notice: Notice) {
        (**self).notify(notice)
    }
}

/// Logs notices through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        tracing::warn!(?notice, "{}", notice.message());
    }
}

/// Forwards notices to a channel, e.g. a UI toast queue.
///
/// Notices sent after the receiver is dropped are discarded.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notice>,
}

impl ChannelNotifier {
    /// Create a notifier and the receiving end of its queue.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notice: Notice) {
        if self.tx.send(notice).is_err() {
            tracing::debug!(?notice, "notice dropped, no receiver");
        }
    }
}

/// Collects notices in memory.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Notices received so far, oldest first.
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().map(|n| n.clone()).unwrap_or_default()
    }

    /// Remove and return all notices received so far.
    pub fn take(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|mut n| std::mem::take(&mut *n))
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(Notice::AddProductFailed.to_string(), "Error adding product");
        assert_eq!(
            Notice::OutOfStockOnAdd.message(),
            Notice::OutOfStockOnUpdate.message()
        );
        assert_ne!(Notice::OutOfStockOnAdd, Notice::OutOfStockOnUpdate);
        assert!(Notice::OutOfStockOnUpdate.is_out_of_stock());
        assert!(!Notice::RemoveProductFailed.is_out_of_stock());
    }

    #[test]
    fn test_recording_take_drains() {
        let recorder = RecordingNotifier::new();
        recorder.notify(Notice::AddProductFailed);
        recorder.notify(Notice::OutOfStockOnAdd);

        assert_eq!(recorder.notices().len(), 2);
        assert_eq!(
            recorder.take(),
            vec![Notice::AddProductFailed, Notice::OutOfStockOnAdd]
        );
        assert!(recorder.notices().is_empty());
    }

    #[tokio::test]
    async fn test_channel_delivers_in_order() {
        let (notifier, mut rx) = ChannelNotifier::new();
        notifier.notify(Notice::UpdateAmountFailed);
        notifier.notify(Notice::RemoveProductFailed);

        assert_eq!(rx.recv().await, Some(Notice::UpdateAmountFailed));
        assert_eq!(rx.recv().await, Some(Notice::RemoveProductFailed));
    }

    #[test]
    fn test_channel_without_receiver_does_not_panic() {
        let (notifier, rx) = ChannelNotifier::new();
        drop(rx);
        notifier.notify(Notice::AddProductFailed);
    }

    #[test]
    fn test_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&Notice::OutOfStockOnAdd).unwrap(),
            "\"out_of_stock_on_add\""
        );
    }
}
