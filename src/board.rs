//! Display grids and the board projector.

use crate::bitboard::CellMask;
use crate::common::Coord;
use crate::config::BOARD_SIZE;
use crate::domain::ShotOutcome;
use crate::geometry::occupied_cells;
use crate::reveal::PartialReveal;
use crate::ship::ShipLayout;

const N: usize = BOARD_SIZE as usize;

/// What a viewer sees in one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum BoardCell {
    #[default]
    Empty,
    /// One of the viewer's own ships.
    Ship,
    /// Part of a ship known to be sunk.
    ShipSunk,
    /// A hit on a ship not yet sunk.
    ShipHit,
    /// Shot fired, outcome not known yet.
    Attempt,
    Miss,
}

impl BoardCell {
    /// The marker for a shot in flight at a cell currently showing `self`.
    /// A known ship is upgraded to a hit, never downgraded to an attempt.
    pub fn with_attempt(self) -> BoardCell {
        match self {
            BoardCell::Ship | BoardCell::ShipHit => BoardCell::ShipHit,
            _ => BoardCell::Attempt,
        }
    }
}

impl From<ShotOutcome> for BoardCell {
    fn from(outcome: ShotOutcome) -> Self {
        match outcome {
            ShotOutcome::Miss => BoardCell::Miss,
            ShotOutcome::Hit => BoardCell::ShipHit,
            ShotOutcome::Sunk => BoardCell::ShipSunk,
        }
    }
}

/// A 10×10 grid of [`BoardCell`], indexed by [`Coord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerBoard {
    cells: [[BoardCell; N]; N],
}

impl PlayerBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cell at `coord`; off-board coordinates read as empty.
    pub fn get(&self, coord: Coord) -> BoardCell {
        coord
            .grid_index()
            .map(|(row, col)| self.cells[row][col])
            .unwrap_or_default()
    }

    /// Set the cell at `coord`. Returns `false` for off-board coordinates.
    pub fn set(&mut self, coord: Coord, cell: BoardCell) -> bool {
        match coord.grid_index() {
            Some((row, col)) => {
                self.cells[row][col] = cell;
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Coord, BoardCell)> + '_ {
        Coord::all().map(move |c| (c, self.get(c)))
    }

    pub fn count(&self, cell: BoardCell) -> usize {
        self.cells.iter().flatten().filter(|c| **c == cell).count()
    }

    pub fn rows(&self) -> &[[BoardCell; N]; N] {
        &self.cells
    }
}

/// Everything the projector needs to know about one board for one tick.
#[derive(Debug, Clone, Copy)]
pub struct ProjectionInput<'a> {
    /// The viewer's layout, only when the viewer owns this board.
    pub own_layout: Option<&'a ShipLayout>,
    /// Disclosed ships of the board's owner.
    pub reveal: &'a PartialReveal,
    /// Most recently resolved shot, only when it struck this board.
    pub last_shot: Option<(Coord, ShotOutcome)>,
    /// Unresolved shot, only when it targets this board and the board's
    /// owner is the one due to resolve it.
    pub pending_shot: Option<Coord>,
}

/// Project one board forward by a tick. Each cell takes the first rule
/// that applies:
///
/// 1. own ship over an empty cell shows as `Ship`;
/// 2. a cell of a disclosed ship shows as `ShipSunk`;
/// 3. the last resolved shot shows its outcome;
/// 4. a pending shot shows as an attempt (see [`BoardCell::with_attempt`]);
/// 5. anything else keeps its previous value.
///
/// Rule 1 seeds the cell rather than ending the evaluation, so a shot that
/// lands on an own ship in the very first tick is already drawn as a hit
/// and a second projection of the same input changes nothing.
///
/// Only the latest shot is known per tick, so `prev` carries the history.
pub fn project(prev: &PlayerBoard, input: &ProjectionInput<'_>) -> PlayerBoard {
    let own: CellMask = input
        .own_layout
        .map(|layout| CellMask::from_cells(&occupied_cells(layout)))
        .unwrap_or_default();
    let sunk = input.reveal.mask();

    let mut next = *prev;
    for coord in Coord::all() {
        let mut current = prev.get(coord);
        if own.contains(coord) && current == BoardCell::Empty {
            current = BoardCell::Ship;
        }
        let cell = if sunk.contains(coord) {
            BoardCell::ShipSunk
        } else if let Some((_, outcome)) = input.last_shot.filter(|(c, _)| *c == coord) {
            BoardCell::from(outcome)
        } else if input.pending_shot == Some(coord) {
            current.with_attempt()
        } else {
            current
        };
        next.set(coord, cell);
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ship::{ShipId, ShipPlacement};

    #[test]
    fn pending_shot_upgrades_own_ship_to_hit() {
        let layout = ShipLayout::unplaced().with(ShipId::S21, ShipPlacement::vertical(5, 9));
        let reveal = PartialReveal::new();
        let seeded = project(
            &PlayerBoard::new(),
            &ProjectionInput {
                own_layout: Some(&layout),
                reveal: &reveal,
                last_shot: None,
                pending_shot: None,
            },
        );
        assert_eq!(seeded.get(Coord::new(5, 9)), BoardCell::Ship);

        let next = project(
            &seeded,
            &ProjectionInput {
                own_layout: Some(&layout),
                reveal: &reveal,
                last_shot: None,
                pending_shot: Some(Coord::new(5, 9)),
            },
        );
        assert_eq!(next.get(Coord::new(5, 9)), BoardCell::ShipHit);
    }

    #[test]
    fn previous_cells_survive_when_nothing_applies() {
        let mut prev = PlayerBoard::new();
        prev.set(Coord::new(3, 3), BoardCell::Miss);
        let reveal = PartialReveal::new();
        let next = project(
            &prev,
            &ProjectionInput {
                own_layout: None,
                reveal: &reveal,
                last_shot: Some((Coord::new(4, 4), ShotOutcome::Hit)),
                pending_shot: None,
            },
        );
        assert_eq!(next.get(Coord::new(3, 3)), BoardCell::Miss);
        assert_eq!(next.get(Coord::new(4, 4)), BoardCell::ShipHit);
    }
}
