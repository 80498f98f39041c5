//! Roll broadcast relay.
//!
//! Tracks connected observers and fans each completed roll out to all of them.

use std::collections::HashMap;

use tokio::sync::{mpsc, RwLock};

use spiritdice_domain::ObserverId;
use spiritdice_shared::{RollBroadcastEvent, ServerMessage};

/// Manages the outbound channels of every connected observer.
pub struct RollBroadcastRelay {
    observers: RwLock<HashMap<ObserverId, mpsc::Sender<ServerMessage>>>,
    buffer: usize,
}

impl RollBroadcastRelay {
    /// Create a relay whose per-observer channels hold `buffer` messages.
    pub fn new(buffer: usize) -> Self {
        Self {
            observers: RwLock::new(HashMap::new()),
            buffer: buffer.max(1),
        }
    }

    /// Register a new observer. The receiver yields every subsequent broadcast
    /// and ends once the observer is unsubscribed or dropped for falling behind.
    pub async fn subscribe(&self) -> (ObserverId, mpsc::Receiver<ServerMessage>) {
        let (tx, rx) = mpsc::channel(self.buffer);
        let id = ObserverId::new();
        self.observers.write().await.insert(id, tx);
        tracing::debug!(observer_id = %id, "Observer subscribed");
        (id, rx)
    }

    /// Remove an observer. Unknown ids are ignored.
    pub async fn unsubscribe(&self, id: ObserverId) {
        if self.observers.write().await.remove(&id).is_some() {
            tracing::debug!(observer_id = %id, "Observer unsubscribed");
        }
    }

    pub async fn observer_count(&self) -> usize {
        self.observers.read().await.len()
    }

    #[cfg(test)]
    pub(crate) async fn observer_ids(&self) -> Vec<ObserverId> {
        self.observers.read().await.keys().copied().collect()
    }

    /// Send a roll to every observer.
    ///
    /// Observers whose channel is closed or full are dropped. Returns the
    /// number of observers the event was delivered to.
    pub async fn publish(&self, event: RollBroadcastEvent) -> usize {
        let message = ServerMessage::SpiritDieRoll(event);
        let mut failed = Vec::new();
        let mut delivered = 0;

        {
            let observers = self.observers.read().await;
            for (id, sender) in observers.iter() {
                match sender.try_send(message.clone()) {
                    Ok(()) => delivered += 1,
                    Err(e) => {
                        tracing::warn!(
                            observer_id = %id,
                            error = %e,
                            "Failed to broadcast roll, dropping observer"
                        );
                        failed.push(*id);
                    }
                }
            }
        }

        if !failed.is_empty() {
            let mut observers = self.observers.write().await;
            for id in failed {
                observers.remove(&id);
            }
        }

        tracing::debug!(delivered, "Roll broadcast");
        delivered
    }
}

impl Default for RollBroadcastRelay {
    fn default() -> Self {
        Self::new(crate::infrastructure::config::DEFAULT_OBSERVER_CHANNEL_BUFFER)
    }
}
