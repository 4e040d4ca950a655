//! Snapshot push channel shared by all store adapters.

use std::sync::Arc;
use tokio::sync::watch;

use crate::record::Record;

/// A full copy of a collection at one point in time.
pub type Snapshot = Arc<Vec<Record>>;

/// Sending half of the snapshot channel, owned by a store adapter.
///
/// Publishing never blocks and never fails, with or without subscribers.
#[derive(Debug)]
pub struct SnapshotPublisher {
    sender: watch::Sender<Snapshot>,
}

impl SnapshotPublisher {
    /// Creates a publisher whose current snapshot is `initial`.
    pub fn new(initial: Vec<Record>) -> Self {
        let (sender, _) = watch::channel(Arc::new(initial));
        Self { sender }
    }

    /// Replaces the current snapshot and wakes every subscriber.
    pub fn publish(&self, records: Vec<Record>) {
        self.sender.send_replace(Arc::new(records));
    }

    /// Returns the current snapshot.
    pub fn current(&self) -> Snapshot {
        self.sender.borrow().clone()
    }

    /// Opens a new subscription positioned before the current snapshot.
    pub fn subscribe(&self) -> Subscription {
        Subscription::new(self.sender.subscribe())
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Receiving half of the snapshot channel.
///
/// Dropping the subscription unsubscribes. A consumer that falls behind sees
/// only the newest snapshot; intermediate ones are skipped, never reordered.
#[derive(Debug)]
pub struct Subscription {
    receiver: watch::Receiver<Snapshot>,
    delivered_initial: bool,
}

impl Subscription {
    fn new(receiver: watch::Receiver<Snapshot>) -> Self {
        Self {
            receiver,
            delivered_initial: false,
        }
    }

    /// Waits for the next snapshot.
    ///
    /// The first call returns the snapshot current at subscription time
    /// immediately. Returns `None` once the publishing adapter is dropped.
    pub async fn next(&mut self) -> Option<Snapshot> {
        if !self.delivered_initial {
            self.delivered_initial = true;
            return Some(self.receiver.borrow_and_update().clone());
        }

        match self.receiver.changed().await {
            Ok(()) => Some(self.receiver.borrow_and_update().clone()),
            Err(_) => None,
        }
    }
}
