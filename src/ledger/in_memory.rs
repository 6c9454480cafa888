//! In-process stand-in for the game contract, with fault injection.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::mpsc;

use crate::common::{Coord, PlayerSlot};
use crate::config::TOTAL_SHIP_CELLS;
use crate::domain::{
    DisclosedShip, GamePhase, GameSnapshot, LastShotResult, PrivateState, ShotOutcome,
};
use crate::geometry::{check_complete_layout, ship_cells};
use crate::ledger::{Ledger, LedgerFeed, TxReceipt};
use crate::ship::ShipLayout;

#[derive(Default)]
struct Inner {
    game: GameSnapshot,
    layouts: [Option<ShipLayout>; 2],
    /// Cells fired at, per board.
    targeted: [BTreeSet<Coord>; 2],
    /// Confirmed hits, per board.
    hits: [BTreeSet<Coord>; 2],
    height: u64,
    subscribers: Vec<mpsc::UnboundedSender<Vec<u8>>>,
    failing_subscribes: usize,
    rejection: Option<String>,
}

impl Inner {
    fn broadcast(&mut self, bytes: Vec<u8>) {
        self.subscribers.retain(|tx| tx.send(bytes.clone()).is_ok());
    }

    fn commit(&mut self) -> anyhow::Result<TxReceipt> {
        self.height += 1;
        let bytes = self.game.encode()?;
        self.broadcast(bytes);
        Ok(TxReceipt {
            tx_id: self.height,
            height: self.height,
        })
    }

    fn take_rejection(&mut self) -> anyhow::Result<()> {
        match self.rejection.take() {
            Some(reason) => Err(anyhow::anyhow!(reason)),
            None => Ok(()),
        }
    }

    /// Settle the shot pending on `slot`'s board against `layout`.
    fn resolve_pending(&mut self, slot: PlayerSlot, layout: &ShipLayout) {
        let Some(cell) = self.game.pending_shot.take() else {
            return;
        };
        let Some(attacker) = self.game.identity(slot.opponent()).cloned() else {
            return;
        };
        let struck = layout
            .placed()
            .find(|(id, placement)| ship_cells(*id, *placement).contains(&cell));
        let (outcome, disclosed) = match struck {
            None => (ShotOutcome::Miss, None),
            Some((ship, placement)) => {
                let hits = &mut self.hits[slot.index()];
                hits.insert(cell);
                if ship_cells(ship, placement).iter().all(|c| hits.contains(c)) {
                    (ShotOutcome::Sunk, Some(DisclosedShip { ship, placement }))
                } else {
                    (ShotOutcome::Hit, None)
                }
            }
        };
        self.game.last_shot = Some(LastShotResult {
            cell,
            fired_by: attacker,
            outcome,
            disclosed,
        });
    }
}

/// Arbiter holding one game in memory. It accepts exactly what the
/// contract accepts and publishes the encoded state after every accepted
/// transaction. A new subscriber immediately receives the current state.
#[derive(Clone, Default)]
pub struct InMemoryLedger {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> anyhow::Result<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| anyhow::anyhow!("ledger state poisoned"))
    }

    /// Current authoritative state.
    pub fn snapshot(&self) -> anyhow::Result<GameSnapshot> {
        Ok(self.lock()?.game.clone())
    }

    pub fn height(&self) -> anyhow::Result<u64> {
        Ok(self.lock()?.height)
    }

    /// Close every open subscription, as a dropped connection would.
    pub fn drop_subscriptions(&self) -> anyhow::Result<()> {
        let mut inner = self.lock()?;
        log::info!("Dropping {} ledger subscriptions", inner.subscribers.len());
        inner.subscribers.clear();
        Ok(())
    }

    /// Refuse the next `n` subscription attempts.
    pub fn fail_next_subscribes(&self, n: usize) -> anyhow::Result<()> {
        self.lock()?.failing_subscribes = n;
        Ok(())
    }

    /// Reject the next submission with `reason`, whatever it is.
    pub fn reject_next_submission(&self, reason: impl Into<String>) -> anyhow::Result<()> {
        self.lock()?.rejection = Some(reason.into());
        Ok(())
    }

    /// Deliver `bytes` to every subscriber as if the ledger had published
    /// them.
    pub fn inject_raw(&self, bytes: Vec<u8>) -> anyhow::Result<()> {
        self.lock()?.broadcast(bytes);
        Ok(())
    }
}

struct InMemoryFeed {
    rx: mpsc::UnboundedReceiver<Vec<u8>>,
}

#[async_trait::async_trait]
impl LedgerFeed for InMemoryFeed {
    async fn recv(&mut self) -> anyhow::Result<Vec<u8>> {
        self.rx
            .recv()
            .await
            .ok_or_else(|| anyhow::anyhow!("Ledger subscription closed"))
    }
}

#[async_trait::async_trait]
impl Ledger for InMemoryLedger {
    async fn subscribe(&self) -> anyhow::Result<Box<dyn LedgerFeed>> {
        let mut inner = self.lock()?;
        if inner.failing_subscribes > 0 {
            inner.failing_subscribes -= 1;
            return Err(anyhow::anyhow!("Subscription refused"));
        }
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(inner.game.encode()?)
            .map_err(|_| anyhow::anyhow!("Subscription closed"))?;
        inner.subscribers.push(tx);
        Ok(Box::new(InMemoryFeed { rx }))
    }

    async fn join(&self, slot: PlayerSlot, witness: &PrivateState) -> anyhow::Result<TxReceipt> {
        let mut inner = self.lock()?;
        inner.take_rejection()?;
        if inner.game.slot_of(&witness.identity).is_some() {
            return Err(anyhow::anyhow!("Already in the game"));
        }
        let (expected, next) = match slot {
            PlayerSlot::Player1 => (GamePhase::WaitingP1, GamePhase::WaitingP2),
            PlayerSlot::Player2 => (GamePhase::WaitingP2, GamePhase::P1Turn),
        };
        if inner.game.phase != expected {
            return Err(anyhow::anyhow!("Cannot join as {} in {}", slot, inner.game.phase));
        }
        check_complete_layout(&witness.own_layout).map_err(|e| anyhow::anyhow!(e))?;

        match slot {
            PlayerSlot::Player1 => inner.game.player1 = Some(witness.identity.clone()),
            PlayerSlot::Player2 => inner.game.player2 = Some(witness.identity.clone()),
        }
        inner.layouts[slot.index()] = Some(witness.own_layout);
        inner.game.phase = next;
        inner.commit()
    }

    async fn submit_shot(
        &self,
        slot: PlayerSlot,
        cell: Coord,
        witness: &PrivateState,
    ) -> anyhow::Result<TxReceipt> {
        let mut inner = self.lock()?;
        inner.take_rejection()?;
        if inner.game.phase.turn() != Some(slot) {
            return Err(anyhow::anyhow!("It is not {}'s turn", slot));
        }
        if inner.game.identity(slot) != Some(&witness.identity) {
            return Err(anyhow::anyhow!("Not {} of this game", slot));
        }
        let layout = inner.layouts[slot.index()]
            .ok_or_else(|| anyhow::anyhow!("No committed layout for {}", slot))?;
        if layout != witness.own_layout {
            return Err(anyhow::anyhow!("Ship positions do not match the committed layout"));
        }
        if !cell.in_bounds() {
            return Err(anyhow::anyhow!("Shot {} is off the board", cell));
        }
        let target = slot.opponent();
        if inner.targeted[target.index()].contains(&cell) {
            return Err(anyhow::anyhow!("Cell {} was already targeted", cell));
        }

        inner.resolve_pending(slot, &layout);
        if inner.hits[slot.index()].len() == TOTAL_SHIP_CELLS {
            inner.game.phase = match target {
                PlayerSlot::Player1 => GamePhase::P1Wins,
                PlayerSlot::Player2 => GamePhase::P2Wins,
            };
            return inner.commit();
        }

        inner.targeted[target.index()].insert(cell);
        inner.game.pending_shot = Some(cell);
        inner.game.phase = match target {
            PlayerSlot::Player1 => GamePhase::P1Turn,
            PlayerSlot::Player2 => GamePhase::P2Turn,
        };
        inner.commit()
    }
}
