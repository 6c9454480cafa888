//! Sunk-ship disclosure.
//!
//! When a shot sinks a ship the ledger publishes that ship's geometry.
//! Each player has a [`PartialReveal`] accumulating those disclosures. A
//! reveal only ever grows: an entry, once set, is never altered or removed.

use alloc::vec::Vec;

use crate::bitboard::CellMask;
use crate::common::{Coord, PlayerSlot};
use crate::config::NUM_SHIPS;
use crate::domain::{GamePhase, LastShotResult, ShotOutcome};
use crate::geometry::ship_cells;
use crate::ship::{ShipId, ShipPlacement};

/// Disclosed ships of one player, keyed by ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct PartialReveal {
    ships: [Option<ShipPlacement>; NUM_SHIPS],
}

impl PartialReveal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: ShipId) -> Option<ShipPlacement> {
        self.ships[id.index()]
    }

    /// Record `placement` for `id`. The first disclosure of a ship wins;
    /// returns whether anything changed.
    pub fn disclose(&mut self, id: ShipId, placement: ShipPlacement) -> bool {
        match self.ships[id.index()] {
            None => {
                self.ships[id.index()] = Some(placement);
                true
            }
            Some(existing) => {
                if existing != placement {
                    log::warn!(
                        "Ignoring conflicting disclosure of {}: kept {:?}, got {:?}",
                        id.name(),
                        existing,
                        placement
                    );
                }
                false
            }
        }
    }

    pub fn disclosed(&self) -> impl Iterator<Item = (ShipId, ShipPlacement)> + '_ {
        ShipId::ALL
            .into_iter()
            .filter_map(|id| self.get(id).map(|p| (id, p)))
    }

    pub fn count(&self) -> usize {
        self.ships.iter().flatten().count()
    }

    pub fn is_complete(&self) -> bool {
        self.count() == NUM_SHIPS
    }

    pub fn occupied_cells(&self) -> Vec<Coord> {
        self.disclosed()
            .flat_map(|(id, placement)| ship_cells(id, placement))
            .collect()
    }

    pub fn mask(&self) -> CellMask {
        CellMask::from_cells(&self.occupied_cells())
    }

    /// Whether every disclosure of `self` is present, unchanged, in `later`.
    pub fn is_subset_of(&self, later: &PartialReveal) -> bool {
        self.disclosed().all(|(id, p)| later.get(id) == Some(p))
    }
}

/// Owner of the board a resolved shot landed on. A player resolves shots
/// against their own board during their turn, so the owner is the player
/// whose turn the ledger just moved away from: `P2Turn` (or `P2Wins`) means
/// player 1's board was struck.
pub fn revealed_owner(phase: GamePhase) -> Option<PlayerSlot> {
    match phase {
        GamePhase::P2Turn | GamePhase::P2Wins => Some(PlayerSlot::Player1),
        GamePhase::P1Turn | GamePhase::P1Wins => Some(PlayerSlot::Player2),
        GamePhase::WaitingP1 | GamePhase::WaitingP2 => None,
    }
}

/// Both players' reveals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct PartialShipTracker {
    reveals: [PartialReveal; 2],
}

impl PartialShipTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reveal(&self, slot: PlayerSlot) -> &PartialReveal {
        &self.reveals[slot.index()]
    }

    /// Merge the disclosure carried by `shot`, if it sank a ship, into the
    /// reveal of the player the phase says was struck. Anything else leaves
    /// the tracker as it is.
    pub fn update(&self, shot: Option<&LastShotResult>, phase: GamePhase) -> Self {
        let mut next = *self;
        let Some(shot) = shot else {
            return next;
        };
        if shot.outcome != ShotOutcome::Sunk {
            return next;
        }
        let (Some(disclosed), Some(owner)) = (shot.disclosed, revealed_owner(phase)) else {
            return next;
        };
        if next.reveals[owner.index()].disclose(disclosed.ship, disclosed.placement) {
            log::debug!(
                "{} of {} disclosed at {}",
                disclosed.ship.name(),
                owner,
                disclosed.placement.anchor
            );
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DisclosedShip, Identity};

    fn sunk(ship: ShipId, placement: ShipPlacement) -> LastShotResult {
        LastShotResult {
            cell: placement.anchor,
            fired_by: Identity::new("aa"),
            outcome: ShotOutcome::Sunk,
            disclosed: Some(DisclosedShip { ship, placement }),
        }
    }

    #[test]
    fn owner_follows_the_phase_moved_to() {
        let shot = sunk(ShipId::S21, ShipPlacement::vertical(5, 9));
        let tracker = PartialShipTracker::new().update(Some(&shot), GamePhase::P2Turn);
        assert_eq!(tracker.reveal(PlayerSlot::Player1).count(), 1);
        assert_eq!(tracker.reveal(PlayerSlot::Player2).count(), 0);

        let tracker = PartialShipTracker::new().update(Some(&shot), GamePhase::P1Wins);
        assert_eq!(tracker.reveal(PlayerSlot::Player2).count(), 1);
    }

    #[test]
    fn first_disclosure_wins() {
        let mut reveal = PartialReveal::new();
        assert!(reveal.disclose(ShipId::S31, ShipPlacement::horizontal(1, 1)));
        assert!(!reveal.disclose(ShipId::S31, ShipPlacement::vertical(4, 4)));
        assert_eq!(reveal.get(ShipId::S31), Some(ShipPlacement::horizontal(1, 1)));
    }

    #[test]
    fn hits_and_waiting_phases_disclose_nothing() {
        let mut shot = sunk(ShipId::S21, ShipPlacement::vertical(5, 9));
        let tracker = PartialShipTracker::new();
        assert_eq!(tracker.update(Some(&shot), GamePhase::WaitingP2), tracker);
        shot.outcome = ShotOutcome::Hit;
        assert_eq!(tracker.update(Some(&shot), GamePhase::P2Turn), tracker);
        assert_eq!(tracker.update(None, GamePhase::P2Turn), tracker);
    }
}
