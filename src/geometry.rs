//! Ship layout legality.
//!
//! These checks gate every layout before it is offered to the ledger and
//! must accept exactly what the authoritative contract accepts: every cell
//! on the board, no cell claimed twice, and no two ships touching, not even
//! diagonally. Ships still at the `(0, 0)` sentinel are skipped so a layout
//! can be validated while it is being built.

use alloc::collections::BTreeSet;
use alloc::vec::Vec;

use crate::bitboard::CellMask;
use crate::common::{Coord, GeometryViolation};
use crate::ship::{Orientation, ShipId, ShipLayout, ShipPlacement};

/// Cells covered by a ship of `length` anchored at `anchor`, in order from
/// the anchor. Coordinates saturate at `u8::MAX`, far off the board.
pub fn expand_ship(anchor: Coord, length: usize, orientation: Orientation) -> Vec<Coord> {
    (0..length)
        .map(|i| {
            let step = u8::try_from(i).unwrap_or(u8::MAX);
            match orientation {
                Orientation::Horizontal => Coord::new(anchor.x.saturating_add(step), anchor.y),
                Orientation::Vertical => Coord::new(anchor.x, anchor.y.saturating_add(step)),
            }
        })
        .collect()
}

/// Cells of a single ship at `placement`.
pub fn ship_cells(id: ShipId, placement: ShipPlacement) -> Vec<Coord> {
    expand_ship(placement.anchor, id.length(), placement.orientation)
}

/// Concatenated cells of every placed ship, in `ShipId` order. Duplicates are
/// kept so overlapping ships remain detectable.
pub fn occupied_cells(layout: &ShipLayout) -> Vec<Coord> {
    layout
        .placed()
        .flat_map(|(id, placement)| ship_cells(id, placement))
        .collect()
}

/// Every cell within Chebyshev distance 1 of an occupied cell, minus the
/// occupied cells themselves.
pub fn buffer_cells(occupied: &[Coord]) -> BTreeSet<Coord> {
    let own: BTreeSet<Coord> = occupied.iter().copied().collect();
    occupied
        .iter()
        .flat_map(|cell| cell.neighbors())
        .filter(|cell| !own.contains(cell))
        .collect()
}

pub fn validate_bounds(cells: &[Coord]) -> bool {
    cells.iter().all(Coord::in_bounds)
}

pub fn validate_uniqueness(cells: &[Coord]) -> bool {
    first_duplicate(cells).is_none()
}

/// No ship's cells fall inside another ship's buffer.
pub fn validate_adjacency(layout: &ShipLayout) -> bool {
    first_adjacent_pair(layout).is_none()
}

/// Conjunction of the bounds, uniqueness and adjacency checks over the
/// placed ships.
pub fn validate_layout(layout: &ShipLayout) -> bool {
    check_layout(layout).is_ok()
}

/// Like [`validate_layout`] but names the first violation found, checking
/// bounds, then uniqueness, then adjacency.
pub fn check_layout(layout: &ShipLayout) -> Result<(), GeometryViolation> {
    for (id, placement) in layout.placed() {
        if let Some(cell) = ship_cells(id, placement)
            .into_iter()
            .find(|cell| !cell.in_bounds())
        {
            return Err(GeometryViolation::OutOfBounds { ship: id, cell });
        }
    }
    if let Some(cell) = first_duplicate(&occupied_cells(layout)) {
        return Err(GeometryViolation::Overlap { cell });
    }
    if let Some((first, second)) = first_adjacent_pair(layout) {
        return Err(GeometryViolation::Adjacent { first, second });
    }
    Ok(())
}

/// [`check_layout`] plus the requirement that every ship is placed. This is
/// the gate in front of any submission.
pub fn check_complete_layout(layout: &ShipLayout) -> Result<(), GeometryViolation> {
    if let Some(id) = layout.first_unplaced() {
        return Err(GeometryViolation::Unplaced(id));
    }
    check_layout(layout)
}

/// On-board cells of `cells` as a mask.
pub fn cell_mask(cells: &[Coord]) -> CellMask {
    CellMask::from_cells(cells)
}

fn first_duplicate(cells: &[Coord]) -> Option<Coord> {
    let mut seen = BTreeSet::new();
    cells.iter().copied().find(|cell| !seen.insert(*cell))
}

fn first_adjacent_pair(layout: &ShipLayout) -> Option<(ShipId, ShipId)> {
    let ships: Vec<(ShipId, Vec<Coord>)> = layout
        .placed()
        .map(|(id, placement)| (id, ship_cells(id, placement)))
        .collect();
    for (i, (first, first_cells)) in ships.iter().enumerate() {
        let buffer = buffer_cells(first_cells);
        for (second, second_cells) in ships.iter().skip(i + 1) {
            if second_cells.iter().any(|cell| buffer.contains(cell)) {
                return Some((*first, *second));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_of_corner_cell_is_the_full_ring() {
        let buffer = buffer_cells(&[Coord::new(1, 1)]);
        assert_eq!(buffer.len(), 8);
        assert!(buffer.contains(&Coord::new(0, 0)));
        assert!(buffer.contains(&Coord::new(2, 2)));
        assert!(!buffer.contains(&Coord::new(1, 1)));
    }

    #[test]
    fn expansion_saturates_instead_of_wrapping() {
        let cells = expand_ship(Coord::new(254, 1), 3, Orientation::Horizontal);
        assert_eq!(cells[2], Coord::new(255, 1));
        assert!(!validate_bounds(&cells));
    }
}
