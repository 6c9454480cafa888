//! The viewer's own shots while they are in flight.
//!
//! Every shot gets an [`ActionId`] and moves `Pending → Confirmed` or
//! `Pending → Cancelled`, never backwards. Until the ledger reflects a shot
//! it is drawn as an attempt on top of the confirmed board history;
//! cancelling removes that marker again.

use alloc::collections::BTreeMap;

use crate::board::{BoardCell, PlayerBoard};
use crate::common::{Coord, PlayerSlot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActionId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionStatus {
    /// Shown immediately, submission under way.
    Pending,
    /// The ledger accepted the submission.
    Confirmed,
    /// The submission failed; the marker is retracted.
    Cancelled,
}

impl ActionStatus {
    /// Whether a status may be replaced by `next`.
    pub fn can_become(self, next: ActionStatus) -> bool {
        matches!(
            (self, next),
            (ActionStatus::Pending, ActionStatus::Confirmed)
                | (ActionStatus::Pending, ActionStatus::Cancelled)
        )
    }

    pub fn is_settled(self) -> bool {
        self != ActionStatus::Pending
    }
}

/// A shot the viewer fired at `target`'s board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocalAction {
    pub id: ActionId,
    pub shooter: PlayerSlot,
    pub target: PlayerSlot,
    pub cell: Coord,
    pub status: ActionStatus,
}

impl LocalAction {
    pub fn pending(id: ActionId, shooter: PlayerSlot, cell: Coord) -> Self {
        Self {
            id,
            shooter,
            target: shooter.opponent(),
            cell,
            status: ActionStatus::Pending,
        }
    }

    pub fn confirmed(self) -> Self {
        Self {
            status: ActionStatus::Confirmed,
            ..self
        }
    }

    pub fn cancelled(self) -> Self {
        Self {
            status: ActionStatus::Cancelled,
            ..self
        }
    }
}

/// Latest known status of every shot, keyed by id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActionBook {
    actions: BTreeMap<ActionId, LocalAction>,
}

impl ActionBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `action`. Unknown ids are inserted; known ids only accept a
    /// forward status change, so replaying an older value is a no-op.
    pub fn apply(&mut self, action: &LocalAction) -> bool {
        match self.actions.get_mut(&action.id) {
            None => {
                self.actions.insert(action.id, *action);
                true
            }
            Some(known) if known.status.can_become(action.status) => {
                known.status = action.status;
                true
            }
            Some(_) => false,
        }
    }

    pub fn get(&self, id: ActionId) -> Option<&LocalAction> {
        self.actions.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LocalAction> + '_ {
        self.actions.values()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Draw unreflected shots over `history`, indexed by [`PlayerSlot::index`].
    pub fn overlay(&self, history: &[PlayerBoard; 2]) -> [PlayerBoard; 2] {
        let mut boards = *history;
        for action in self.actions.values() {
            let board = &mut boards[action.target.index()];
            let recorded = history[action.target.index()].get(action.cell);
            let shows = match action.status {
                ActionStatus::Pending => true,
                // Confirmed shots stay visible until the ledger shows the cell.
                ActionStatus::Confirmed => recorded == BoardCell::Empty,
                ActionStatus::Cancelled => false,
            };
            if shows && recorded == BoardCell::Empty {
                board.set(action.cell, recorded.with_attempt());
            }
        }
        boards
    }
}
