//! Live query subscriptions.

use futures::StreamExt;
use serde_json::Value;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;

/// One ordered snapshot of a collection.
pub type Snapshot = Vec<Value>;

/// A live subscription to a collection's ordered snapshots.
///
/// The handle owns the underlying listener; dropping it (or calling
/// [`unsubscribe`](Self::unsubscribe)) releases it. A leaked handle keeps
/// the listener alive for the lifetime of the store.
pub struct Subscription {
    initial: Option<Snapshot>,
    stream: BroadcastStream<Snapshot>,
}

impl Subscription {
    pub(crate) fn new(initial: Snapshot, rx: broadcast::Receiver<Snapshot>) -> Self {
        Self {
            initial: Some(initial),
            stream: BroadcastStream::new(rx),
        }
    }

    /// Wait for the next snapshot.
    ///
    /// The first call resolves immediately with the collection state at
    /// subscribe time. Returns `None` once the store side has gone away.
    /// A slow consumer that falls behind skips to the freshest snapshot
    /// rather than erroring; intermediate snapshots are droppable because
    /// each one is complete.
    pub async fn next_snapshot(&mut self) -> Option<Snapshot> {
        if let Some(initial) = self.initial.take() {
            return Some(initial);
        }

        loop {
            match self.stream.next().await {
                Some(Ok(snapshot)) => return Some(snapshot),
                Some(Err(BroadcastStreamRecvError::Lagged(skipped))) => {
                    tracing::debug!(skipped, "Subscription lagged; catching up");
                }
                None => return None,
            }
        }
    }

    /// Tear down the subscription and release the listener.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("pending_initial", &self.initial.is_some())
            .finish_non_exhaustive()
    }
}
