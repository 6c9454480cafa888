//! Cell sets packed into one unsigned integer.
//!
//! An `N×N` grid maps row-major onto the low `N * N` bits of `T`. The game
//! board uses the [`CellMask`] alias, which also speaks [`Coord`].

use core::fmt;
use core::mem;
use core::ops::{BitAnd, BitOr, Sub};

use num_traits::{PrimInt, Unsigned};

use crate::common::Coord;
use crate::config::BOARD_SIZE;

/// One bit per cell of the game board.
pub type CellMask = BitBoard<u128, { BOARD_SIZE as usize }>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitBoardError {
    /// Row or column not below `N`.
    OffGrid { row: usize, col: usize },
}

impl fmt::Display for BitBoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BitBoardError::OffGrid { row, col } => {
                write!(f, "grid position row={} col={} is off the grid", row, col)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitBoard<T: PrimInt + Unsigned, const N: usize> {
    bits: T,
}

impl<T: PrimInt + Unsigned, const N: usize> BitBoard<T, N> {
    /// Compile-time guard: the grid has to fit in `T`.
    const FITS: () = assert!(N * N <= mem::size_of::<T>() * 8);

    pub fn new() -> Self {
        let () = Self::FITS;
        Self { bits: T::zero() }
    }

    fn bit(row: usize, col: usize) -> Result<T, BitBoardError> {
        if row < N && col < N {
            Ok(T::one() << (row * N + col))
        } else {
            Err(BitBoardError::OffGrid { row, col })
        }
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_zero()
    }

    pub fn test(&self, row: usize, col: usize) -> Result<bool, BitBoardError> {
        Ok(!(self.bits & Self::bit(row, col)?).is_zero())
    }

    /// Set a bit. Returns whether it was clear before.
    pub fn set(&mut self, row: usize, col: usize) -> Result<bool, BitBoardError> {
        let bit = Self::bit(row, col)?;
        let fresh = (self.bits & bit).is_zero();
        self.bits = self.bits | bit;
        Ok(fresh)
    }

    pub fn unset(&mut self, row: usize, col: usize) -> Result<(), BitBoardError> {
        self.bits = self.bits & !Self::bit(row, col)?;
        Ok(())
    }

    /// Set positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..N * N)
            .filter(move |i| !((self.bits >> *i) & T::one()).is_zero())
            .map(|i| (i / N, i % N))
    }

    pub fn is_disjoint(&self, other: &Self) -> bool {
        (self.bits & other.bits).is_zero()
    }

    pub fn is_subset(&self, other: &Self) -> bool {
        (self.bits & !other.bits).is_zero()
    }
}

impl<T: PrimInt + Unsigned, const N: usize> Default for BitBoard<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Union.
impl<T: PrimInt + Unsigned, const N: usize> BitOr for BitBoard<T, N> {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self {
            bits: self.bits | rhs.bits,
        }
    }
}

/// Intersection.
impl<T: PrimInt + Unsigned, const N: usize> BitAnd for BitBoard<T, N> {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self {
            bits: self.bits & rhs.bits,
        }
    }
}

/// Difference.
impl<T: PrimInt + Unsigned, const N: usize> Sub for BitBoard<T, N> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self {
            bits: self.bits & !rhs.bits,
        }
    }
}

impl CellMask {
    /// Mask of the on-board cells in `cells`. Off-board cells are dropped.
    pub fn from_cells<'a, I>(cells: I) -> Self
    where
        I: IntoIterator<Item = &'a Coord>,
    {
        let mut mask = Self::new();
        for cell in cells {
            mask.insert(*cell);
        }
        mask
    }

    /// Returns `false` for off-board cells.
    pub fn insert(&mut self, cell: Coord) -> bool {
        cell.grid_index()
            .is_some_and(|(row, col)| self.set(row, col).is_ok())
    }

    pub fn contains(&self, cell: Coord) -> bool {
        cell.grid_index()
            .and_then(|(row, col)| self.test(row, col).ok())
            .unwrap_or(false)
    }

    pub fn cells(&self) -> impl Iterator<Item = Coord> + '_ {
        self.positions()
            .map(|(row, col)| Coord::from_grid(row, col))
    }
}
