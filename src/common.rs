//! Common types for Battleship: coordinates, player slots and geometry errors.

use core::fmt;

use crate::config::BOARD_SIZE;
use crate::ship::ShipId;

/// A board cell, 1-based on both axes. `(0, 0)` marks a ship that has not
/// been placed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Coord {
    pub x: u8,
    pub y: u8,
}

impl Coord {
    /// Sentinel for "not yet placed".
    pub const UNPLACED: Coord = Coord { x: 0, y: 0 };

    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    pub fn is_unplaced(&self) -> bool {
        *self == Self::UNPLACED
    }

    /// Both coordinates within `[1, BOARD_SIZE]`.
    pub fn in_bounds(&self) -> bool {
        (1..=BOARD_SIZE).contains(&self.x) && (1..=BOARD_SIZE).contains(&self.y)
    }

    /// Zero-based `(row, col)` into a board grid, `None` when off the board.
    pub fn grid_index(&self) -> Option<(usize, usize)> {
        if self.in_bounds() {
            Some(((self.y - 1) as usize, (self.x - 1) as usize))
        } else {
            None
        }
    }

    /// Inverse of [`Coord::grid_index`].
    pub fn from_grid(row: usize, col: usize) -> Self {
        Self {
            x: col as u8 + 1,
            y: row as u8 + 1,
        }
    }

    /// The eight cells at Chebyshev distance 1. Neighbours below zero cannot
    /// be represented and are skipped; they can never hold a ship anyway.
    pub fn neighbors(self) -> impl Iterator<Item = Coord> {
        const OFFSETS: [(i8, i8); 8] = [
            (-1, -1),
            (0, -1),
            (1, -1),
            (-1, 0),
            (1, 0),
            (-1, 1),
            (0, 1),
            (1, 1),
        ];
        OFFSETS.into_iter().filter_map(move |(dx, dy)| {
            let x = self.x.checked_add_signed(dx)?;
            let y = self.y.checked_add_signed(dy)?;
            Some(Coord { x, y })
        })
    }

    /// Iterate every on-board cell, row by row.
    pub fn all() -> impl Iterator<Item = Coord> {
        (1..=BOARD_SIZE).flat_map(|y| (1..=BOARD_SIZE).map(move |x| Coord { x, y }))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Seat in a two-player game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum PlayerSlot {
    Player1,
    Player2,
}

impl PlayerSlot {
    pub const BOTH: [PlayerSlot; 2] = [PlayerSlot::Player1, PlayerSlot::Player2];

    pub fn opponent(self) -> Self {
        match self {
            PlayerSlot::Player1 => PlayerSlot::Player2,
            PlayerSlot::Player2 => PlayerSlot::Player1,
        }
    }

    pub fn index(self) -> usize {
        match self {
            PlayerSlot::Player1 => 0,
            PlayerSlot::Player2 => 1,
        }
    }
}

impl fmt::Display for PlayerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerSlot::Player1 => write!(f, "player 1"),
            PlayerSlot::Player2 => write!(f, "player 2"),
        }
    }
}

/// Reasons a ship layout is illegal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryViolation {
    /// A ship extends past the board edge.
    OutOfBounds { ship: ShipId, cell: Coord },
    /// Two ships claim the same cell.
    Overlap { cell: Coord },
    /// Two ships touch, orthogonally or diagonally.
    Adjacent { first: ShipId, second: ShipId },
    /// Ship still at the `(0, 0)` sentinel.
    Unplaced(ShipId),
}

impl fmt::Display for GeometryViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryViolation::OutOfBounds { ship, cell } => {
                write!(f, "{} leaves the board at {}", ship.name(), cell)
            }
            GeometryViolation::Overlap { cell } => {
                write!(f, "Ship cells must be unique, {} is used twice", cell)
            }
            GeometryViolation::Adjacent { first, second } => {
                write!(f, "{} touches {}", first.name(), second.name())
            }
            GeometryViolation::Unplaced(ship) => write!(f, "{} is not placed", ship.name()),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for GeometryViolation {}
