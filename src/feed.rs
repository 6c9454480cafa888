//! Multicast of derived states with replay of the latest value.

use std::sync::{Arc, RwLock};

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use crate::game::DerivedState;

struct Shared {
    current: RwLock<Option<Arc<DerivedState>>>,
    tx: broadcast::Sender<Arc<DerivedState>>,
}

/// Publisher side. Clones share the same stream.
#[derive(Clone)]
pub struct StateFeed {
    shared: Arc<Shared>,
}

impl StateFeed {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            shared: Arc::new(Shared {
                current: RwLock::new(None),
                tx,
            }),
        }
    }

    /// Make `state` current and send it to every observer.
    pub fn publish(&self, state: DerivedState) {
        let state = Arc::new(state);
        // Sending under the write lock keeps `subscribe` from seeing the new
        // value both as replay and as the next update.
        let mut current = self
            .shared
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *current = Some(state.clone());
        let _ = self.shared.tx.send(state);
    }

    pub fn current(&self) -> Option<Arc<DerivedState>> {
        self.shared
            .current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// A new observer. It first gets the current value, if any, then every
    /// later one in publication order.
    pub fn subscribe(&self) -> StateSubscription {
        let current = self
            .shared
            .current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        StateSubscription {
            replay: current.clone(),
            rx: self.shared.tx.subscribe(),
        }
    }

    pub fn observer_count(&self) -> usize {
        self.shared.tx.receiver_count()
    }
}

/// Observer side of a [`StateFeed`].
pub struct StateSubscription {
    replay: Option<Arc<DerivedState>>,
    rx: broadcast::Receiver<Arc<DerivedState>>,
}

impl StateSubscription {
    /// Next state, or `None` once the feed is gone. An observer that falls
    /// too far behind skips ahead to the oldest state still buffered.
    pub async fn next(&mut self) -> Option<Arc<DerivedState>> {
        if let Some(state) = self.replay.take() {
            return Some(state);
        }
        loop {
            match self.rx.recv().await {
                Ok(state) => return Some(state),
                Err(RecvError::Lagged(skipped)) => {
                    log::warn!("State observer lagged, skipped {} updates", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// First state satisfying `pred`.
    pub async fn wait_until<F>(&mut self, pred: F) -> Option<Arc<DerivedState>>
    where
        F: Fn(&DerivedState) -> bool,
    {
        while let Some(state) = self.next().await {
            if pred(&state) {
                return Some(state);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GamePhase;

    fn state(phase: GamePhase) -> DerivedState {
        DerivedState {
            phase,
            ..DerivedState::default()
        }
    }

    #[tokio::test]
    async fn observers_attach_and_detach() {
        let feed = StateFeed::new(4);
        assert_eq!(feed.observer_count(), 0);
        assert!(feed.current().is_none());

        let mut early = feed.subscribe();
        feed.publish(state(GamePhase::WaitingP2));
        let mut late = feed.subscribe();
        assert_eq!(feed.observer_count(), 2);

        feed.publish(state(GamePhase::P1Turn));
        assert_eq!(early.next().await.map(|s| s.phase), Some(GamePhase::WaitingP2));
        assert_eq!(early.next().await.map(|s| s.phase), Some(GamePhase::P1Turn));
        assert_eq!(late.next().await.map(|s| s.phase), Some(GamePhase::WaitingP2));
        assert_eq!(late.next().await.map(|s| s.phase), Some(GamePhase::P1Turn));

        drop(early);
        assert_eq!(feed.observer_count(), 1);
    }
}
