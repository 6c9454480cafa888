//! Derived game state and the combine-and-fold step.

use crate::action::{ActionBook, LocalAction};
use crate::board::{project, PlayerBoard, ProjectionInput};
use crate::common::{Coord, PlayerSlot};
use crate::domain::{GamePhase, GameSnapshot, Identity, LastShotResult, PrivateState};
use crate::reveal::{revealed_owner, PartialReveal, PartialShipTracker};
use crate::ship::ShipLayout;

/// The reconciled view of one game from one viewer's seat.
///
/// `history` is the board fold over ledger data only. `boards` is what is
/// shown: the history with the viewer's in-flight shots drawn over it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DerivedState {
    pub phase: GamePhase,
    pub player1: Option<Identity>,
    pub player2: Option<Identity>,
    pub whoami: Option<Identity>,
    pub pending_shot: Option<Coord>,
    pub last_shot: Option<LastShotResult>,
    pub own_layout: Option<ShipLayout>,
    pub reveals: PartialShipTracker,
    pub history: [PlayerBoard; 2],
    pub boards: [PlayerBoard; 2],
    pub actions: ActionBook,
    pub last_action: Option<LocalAction>,
}

/// Latest value of each input source for one fold.
#[derive(Debug, Clone, Copy)]
pub struct FoldInputs<'a> {
    pub snapshot: &'a GameSnapshot,
    pub private: &'a PrivateState,
    /// `None` until the viewer acts.
    pub local: Option<&'a LocalAction>,
}

impl DerivedState {
    /// Seed of the fold: empty boards, nothing known.
    pub fn initial() -> Self {
        Self::default()
    }

    pub fn identity(&self, slot: PlayerSlot) -> Option<&Identity> {
        match slot {
            PlayerSlot::Player1 => self.player1.as_ref(),
            PlayerSlot::Player2 => self.player2.as_ref(),
        }
    }

    /// Seat of `identity` among the known players.
    pub fn slot_of(&self, identity: &Identity) -> Option<PlayerSlot> {
        PlayerSlot::BOTH
            .into_iter()
            .find(|slot| self.identity(*slot) == Some(identity))
    }

    /// The viewer's seat, if they are playing.
    pub fn my_slot(&self) -> Option<PlayerSlot> {
        self.whoami.as_ref().and_then(|me| self.slot_of(me))
    }

    pub fn board(&self, slot: PlayerSlot) -> &PlayerBoard {
        &self.boards[slot.index()]
    }

    pub fn reveal(&self, slot: PlayerSlot) -> &PartialReveal {
        self.reveals.reveal(slot)
    }

    /// Board the last resolved shot struck: the opponent of whoever fired
    /// it, or the phase's answer when the shooter is unknown.
    fn struck_board(&self, shot: &LastShotResult, phase: GamePhase) -> Option<PlayerSlot> {
        self.slot_of(&shot.fired_by)
            .map(PlayerSlot::opponent)
            .or_else(|| revealed_owner(phase))
    }

    /// Next state from the latest value of every source. Pure, so folding
    /// the same inputs twice in a row changes nothing the second time.
    pub fn fold(&self, inputs: &FoldInputs<'_>) -> DerivedState {
        let snapshot = inputs.snapshot;
        if !self.phase.can_advance_to(snapshot.phase) {
            log::warn!(
                "Unexpected phase transition {} -> {}",
                self.phase,
                snapshot.phase
            );
        }

        let mut next = DerivedState {
            phase: snapshot.phase,
            player1: snapshot.player1.clone().or_else(|| self.player1.clone()),
            player2: snapshot.player2.clone().or_else(|| self.player2.clone()),
            whoami: Some(inputs.private.identity.clone()),
            pending_shot: snapshot.pending_shot,
            last_shot: snapshot.last_shot.clone(),
            own_layout: Some(inputs.private.own_layout),
            reveals: self
                .reveals
                .update(snapshot.last_shot.as_ref(), snapshot.phase),
            history: self.history,
            boards: self.boards,
            actions: self.actions.clone(),
            last_action: inputs.local.copied().or(self.last_action),
        };

        let me = next.my_slot();
        let struck = snapshot
            .last_shot
            .as_ref()
            .and_then(|shot| next.struck_board(shot, snapshot.phase));
        for slot in PlayerSlot::BOTH {
            let input = ProjectionInput {
                own_layout: next.own_layout.as_ref().filter(|_| me == Some(slot)),
                reveal: next.reveals.reveal(slot),
                last_shot: snapshot
                    .last_shot
                    .as_ref()
                    .filter(|_| struck == Some(slot))
                    .map(|shot| (shot.cell, shot.outcome)),
                pending_shot: snapshot
                    .pending_shot
                    .filter(|_| snapshot.phase.turn() == Some(slot)),
            };
            next.history[slot.index()] = project(&self.history[slot.index()], &input);
        }

        if let Some(action) = inputs.local {
            next.actions.apply(action);
        }
        next.boards = next.actions.overlay(&next.history);

        log::trace!(
            "Folded phase {} (pending {:?}, actions {})",
            next.phase,
            next.pending_shot,
            next.actions.len()
        );
        next
    }
}
