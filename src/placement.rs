//! Building a layout: the interactive draft used during setup and random
//! legal layouts.

use rand::Rng;

use crate::common::{Coord, GeometryViolation};
use crate::config::BOARD_SIZE;
use crate::geometry::{check_complete_layout, check_layout};
use crate::ship::{Orientation, ShipId, ShipLayout, ShipPlacement};

const PLACEMENT_ATTEMPTS: usize = 100;
const LAYOUT_ATTEMPTS: usize = 100;

/// A layout under construction. Every accepted edit keeps the placed ships
/// legal, so the draft is always a valid partial layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutDraft {
    layout: ShipLayout,
}

impl LayoutDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from an existing layout, which must itself be legal.
    pub fn from_layout(layout: ShipLayout) -> Result<Self, GeometryViolation> {
        check_layout(&layout)?;
        Ok(Self { layout })
    }

    pub fn layout(&self) -> &ShipLayout {
        &self.layout
    }

    /// Move `id` to `anchor`. Rejected edits leave the draft untouched.
    pub fn place(
        &mut self,
        id: ShipId,
        anchor: Coord,
        orientation: Orientation,
    ) -> Result<(), GeometryViolation> {
        let candidate = self
            .layout
            .with(id, ShipPlacement::new(anchor, orientation));
        check_layout(&candidate)?;
        self.layout = candidate;
        Ok(())
    }

    /// Flip a placed ship around its anchor.
    pub fn rotate(&mut self, id: ShipId) -> Result<(), GeometryViolation> {
        let current = self.layout.get(id);
        if !current.is_placed() {
            return Err(GeometryViolation::Unplaced(id));
        }
        self.place(id, current.anchor, current.orientation.flipped())
    }

    /// Take a ship back off the board.
    pub fn remove(&mut self, id: ShipId) {
        self.layout.clear(id);
    }

    pub fn is_complete(&self) -> bool {
        self.layout.is_complete()
    }

    /// The finished layout, once every ship is placed.
    pub fn finish(self) -> Result<ShipLayout, GeometryViolation> {
        check_complete_layout(&self.layout)?;
        Ok(self.layout)
    }
}

/// A random legal spot for `id` given the ships already in `layout`.
pub fn random_placement<R: Rng>(layout: &ShipLayout, id: ShipId, rng: &mut R) -> Option<ShipPlacement> {
    let len = id.length() as u8;
    for _ in 0..PLACEMENT_ATTEMPTS {
        let orientation = if rng.random() {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        };
        let (max_x, max_y) = match orientation {
            Orientation::Horizontal => (BOARD_SIZE - len + 1, BOARD_SIZE),
            Orientation::Vertical => (BOARD_SIZE, BOARD_SIZE - len + 1),
        };
        let anchor = Coord::new(rng.random_range(1..=max_x), rng.random_range(1..=max_y));
        let placement = ShipPlacement::new(anchor, orientation);
        if check_layout(&layout.with(id, placement)).is_ok() {
            return Some(placement);
        }
    }
    None
}

/// A complete random legal layout. Starts over when a ship finds no room.
pub fn random_layout<R: Rng>(rng: &mut R) -> Option<ShipLayout> {
    'attempt: for _ in 0..LAYOUT_ATTEMPTS {
        let mut layout = ShipLayout::unplaced();
        // Longest first leaves the most room for the rest.
        for id in ShipId::ALL.into_iter().rev() {
            match random_placement(&layout, id, rng) {
                Some(placement) => layout.set(id, placement),
                None => continue 'attempt,
            }
        }
        return Some(layout);
    }
    None
}
