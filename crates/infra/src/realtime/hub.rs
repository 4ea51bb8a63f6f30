use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};

use bugboard_core::domain::changes::{Change, RealtimeEvent, RecentChanges};

const DEFAULT_CAPACITY: usize = 256;

/// Typed publish/subscribe channel for change-stream events. Clones share
/// the same channel and recent-changes buffer.
#[derive(Debug, Clone)]
pub struct ChangeHub {
    tx: broadcast::Sender<RealtimeEvent>,
    recent: Arc<RwLock<RecentChanges>>,
}

impl Default for ChangeHub {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ChangeHub {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            tx,
            recent: Arc::new(RwLock::new(RecentChanges::default())),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RealtimeEvent> {
        self.tx.subscribe()
    }

    pub async fn recent(&self) -> Vec<Change> {
        self.recent.read().await.snapshot()
    }

    pub async fn opened(&self) {
        self.recent.write().await.clear();
        self.publish(RealtimeEvent::Open);
    }

    pub async fn changed(&self, change: Change) {
        self.recent.write().await.push(change.clone());
        self.publish(RealtimeEvent::Change(change));
    }

    pub fn closed(&self, retry_in_secs: u64) {
        self.publish(RealtimeEvent::Closed { retry_in_secs });
    }

    fn publish(&self, event: RealtimeEvent) {
        // No subscribers is not an error; the recent buffer still records changes.
        let _ = self.tx.send(event);
    }
}
