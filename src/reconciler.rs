//! A live game session from one viewer's seat.
//!
//! Three sources feed the session: ledger snapshots pumped from a
//! subscription, the viewer's private state, and the viewer's own shots.
//! Each source writes one register owned by a single fold worker. Every
//! write re-folds the latest value of all three into the next
//! [`DerivedState`], which is published on a [`StateFeed`]. The shot
//! register starts out neutral, so folding begins as soon as the ledger and
//! the private state have each produced a value.

use core::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::action::{ActionId, LocalAction};
use crate::common::{Coord, GeometryViolation, PlayerSlot};
use crate::config::SessionConfig;
use crate::domain::{GamePhase, GameSnapshot, PrivateState};
use crate::feed::{StateFeed, StateSubscription};
use crate::game::{DerivedState, FoldInputs};
use crate::geometry::check_complete_layout;
use crate::ledger::{Ledger, TxReceipt};
use crate::private_state::{load_or_create, PrivateStateStore};
use crate::ship::ShipLayout;

/// Failure of a session write operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The layout breaks a placement rule. Never sent to the ledger.
    Geometry(GeometryViolation),
    /// The ledger refused the transaction.
    Rejected(String),
    /// The viewer holds no seat in this game.
    NotAPlayer,
    /// No seat is open in this phase.
    NotJoinable(GamePhase),
    /// No derived state yet.
    NotReady,
    /// The private state store failed.
    Store(String),
    /// The viewer already holds `0`; its layout is on the ledger.
    Seated(PlayerSlot),
    /// The session has been shut down.
    Closed,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Geometry(v) => write!(f, "invalid layout: {}", v),
            SessionError::Rejected(reason) => write!(f, "transaction rejected: {}", reason),
            SessionError::NotAPlayer => write!(f, "not a player in this game"),
            SessionError::NotJoinable(phase) => write!(f, "cannot join a game in {}", phase),
            SessionError::NotReady => write!(f, "game state not available yet"),
            SessionError::Store(e) => write!(f, "private state store: {}", e),
            SessionError::Seated(slot) => write!(f, "layout already committed as {}", slot),
            SessionError::Closed => write!(f, "session closed"),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<GeometryViolation> for SessionError {
    fn from(v: GeometryViolation) -> Self {
        SessionError::Geometry(v)
    }
}

enum Input {
    Ledger(GameSnapshot),
    Private(PrivateState),
    Local(LocalAction),
}

/// Single consumer of the three input registers.
struct FoldWorker {
    state: DerivedState,
    ledger: Option<GameSnapshot>,
    private: Option<PrivateState>,
    local: Option<LocalAction>,
    input_rx: mpsc::UnboundedReceiver<Input>,
    feed: StateFeed,
}

impl FoldWorker {
    fn new(input_rx: mpsc::UnboundedReceiver<Input>, feed: StateFeed) -> Self {
        Self {
            state: DerivedState::initial(),
            ledger: None,
            private: None,
            local: None,
            input_rx,
            feed,
        }
    }

    async fn run(mut self) {
        while let Some(input) = self.input_rx.recv().await {
            match input {
                Input::Ledger(snapshot) => self.ledger = Some(snapshot),
                Input::Private(private) => self.private = Some(private),
                Input::Local(action) => self.local = Some(action),
            }
            let (Some(snapshot), Some(private)) = (&self.ledger, &self.private) else {
                continue;
            };
            self.state = self.state.fold(&FoldInputs {
                snapshot,
                private,
                local: self.local.as_ref(),
            });
            self.feed.publish(self.state.clone());
        }
        log::debug!("Fold worker stopped");
    }
}

/// Keeps one ledger subscription alive, forever, at a fixed retry delay.
/// Undecodable payloads are skipped.
async fn pump_ledger(
    ledger: Arc<dyn Ledger>,
    inputs: mpsc::UnboundedSender<Input>,
    retry_delay: Duration,
    shutdown: Arc<AtomicBool>,
) {
    while !shutdown.load(Ordering::SeqCst) {
        match ledger.subscribe().await {
            Ok(mut feed) => {
                log::info!("Ledger subscription established");
                loop {
                    match feed.recv().await {
                        Ok(bytes) => match GameSnapshot::decode(&bytes) {
                            Ok(snapshot) => {
                                if inputs.send(Input::Ledger(snapshot)).is_err() {
                                    return;
                                }
                            }
                            Err(e) => log::warn!("Skipping ledger update: {}", e),
                        },
                        Err(e) => {
                            log::warn!("Ledger subscription dropped: {}", e);
                            break;
                        }
                    }
                }
            }
            Err(e) => log::warn!("Ledger subscription failed: {}", e),
        }
        if shutdown.load(Ordering::SeqCst) {
            break;
        }
        log::info!("Resubscribing to the ledger in {:?}", retry_delay);
        tokio::time::sleep(retry_delay).await;
    }
}

/// Reconciled view of one game, live for as long as the session exists.
pub struct GameSession {
    game_id: String,
    ledger: Arc<dyn Ledger>,
    store: Arc<dyn PrivateStateStore>,
    inputs: mpsc::UnboundedSender<Input>,
    feed: StateFeed,
    next_action: AtomicU64,
    shutdown: Arc<AtomicBool>,
    tasks: Vec<JoinHandle<()>>,
}

impl GameSession {
    /// Load (or create) the private state of `game_id` and start following
    /// the ledger. Must be called within a tokio runtime.
    pub async fn start(
        game_id: impl Into<String>,
        ledger: Arc<dyn Ledger>,
        store: Arc<dyn PrivateStateStore>,
        config: SessionConfig,
    ) -> Result<Self, SessionError> {
        let game_id = game_id.into();
        let private = load_or_create(store.as_ref(), &game_id)
            .await
            .map_err(|e| SessionError::Store(e.to_string()))?;

        let feed = StateFeed::new(config.feed_capacity);
        let (inputs, input_rx) = mpsc::unbounded_channel();
        let shutdown = Arc::new(AtomicBool::new(false));
        inputs
            .send(Input::Private(private))
            .map_err(|_| SessionError::Closed)?;

        let worker = tokio::spawn(FoldWorker::new(input_rx, feed.clone()).run());
        let pump = tokio::spawn(pump_ledger(
            ledger.clone(),
            inputs.clone(),
            config.retry_delay,
            shutdown.clone(),
        ));
        log::info!("Session for game {} started", game_id);

        Ok(Self {
            game_id,
            ledger,
            store,
            inputs,
            feed,
            next_action: AtomicU64::new(0),
            shutdown,
            tasks: vec![worker, pump],
        })
    }

    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    /// Live derived state, starting with the current value.
    pub fn subscribe(&self) -> StateSubscription {
        self.feed.subscribe()
    }

    pub fn current(&self) -> Option<Arc<DerivedState>> {
        self.feed.current()
    }

    /// Whether `layout` may be submitted. Unplaced ships are ignored.
    pub fn validate_layout(layout: &ShipLayout) -> bool {
        crate::geometry::validate_layout(layout)
    }

    fn push(&self, input: Input) -> Result<(), SessionError> {
        if self.shutdown.load(Ordering::SeqCst) {
            return Err(SessionError::Closed);
        }
        self.inputs.send(input).map_err(|_| SessionError::Closed)
    }

    async fn private_state(&self) -> Result<PrivateState, SessionError> {
        load_or_create(self.store.as_ref(), &self.game_id)
            .await
            .map_err(|e| SessionError::Store(e.to_string()))
    }

    fn my_slot(&self) -> Result<PlayerSlot, SessionError> {
        self.current()
            .ok_or(SessionError::NotReady)?
            .my_slot()
            .ok_or(SessionError::NotAPlayer)
    }

    /// Fire at `cell`. The attempt shows at once; if the ledger refuses
    /// the shot it is retracted before the error is returned.
    pub async fn submit_shot(&self, cell: Coord) -> Result<TxReceipt, SessionError> {
        let slot = self.my_slot()?;
        let private = self.private_state().await?;
        let id = ActionId(self.next_action.fetch_add(1, Ordering::SeqCst));
        let action = LocalAction::pending(id, slot, cell);
        self.push(Input::Local(action))?;

        match self.ledger.submit_shot(slot, cell, &private).await {
            Ok(receipt) => {
                log::debug!("Shot at {} accepted at height {}", cell, receipt.height);
                self.push(Input::Local(action.confirmed()))?;
                Ok(receipt)
            }
            Err(e) => {
                log::warn!("Shot at {} rejected: {}", cell, e);
                self.push(Input::Local(action.cancelled()))?;
                Err(SessionError::Rejected(e.to_string()))
            }
        }
    }

    /// Store `layout` as the viewer's secret for this game. Illegal or
    /// incomplete layouts are refused here and go no further, as is any
    /// layout once the viewer holds a seat.
    pub async fn submit_layout(&self, layout: ShipLayout) -> Result<(), SessionError> {
        check_complete_layout(&layout)?;
        if let Some(slot) = self.current().and_then(|s| s.my_slot()) {
            return Err(SessionError::Seated(slot));
        }
        let mut private = self.private_state().await?;
        private.own_layout = layout;
        self.store
            .set(&self.game_id, private.clone())
            .await
            .map_err(|e| SessionError::Store(e.to_string()))?;
        self.push(Input::Private(private))
    }

    /// Take the open seat: player 1 while the game waits for its first
    /// player, player 2 while it waits for the second. Commits the stored
    /// layout.
    pub async fn join(&self) -> Result<TxReceipt, SessionError> {
        let phase = self.current().ok_or(SessionError::NotReady)?.phase;
        let slot = match phase {
            GamePhase::WaitingP1 => PlayerSlot::Player1,
            GamePhase::WaitingP2 => PlayerSlot::Player2,
            other => return Err(SessionError::NotJoinable(other)),
        };
        let private = self.private_state().await?;
        check_complete_layout(&private.own_layout)?;
        self.ledger.join(slot, &private).await.map_err(|e| {
            log::warn!("Joining as {} rejected: {}", slot, e);
            SessionError::Rejected(e.to_string())
        })
    }

    /// Stop following the ledger. The last published state stays readable.
    pub fn shutdown(&self) {
        if !self.shutdown.swap(true, Ordering::SeqCst) {
            log::info!("Session for game {} shut down", self.game_id);
        }
        for task in &self.tasks {
            task.abort();
        }
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }
}

impl Drop for GameSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}
