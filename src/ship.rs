//! Ship definitions, placements and the five-ship layout.

use core::fmt;
use core::str::FromStr;

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::common::Coord;
use crate::config::{NUM_SHIPS, SHIPS};

/// Orientation of a ship on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Extends along +x from the anchor.
    #[default]
    Horizontal,
    /// Extends along +y from the anchor.
    Vertical,
}

impl Orientation {
    pub fn is_vertical(self) -> bool {
        self == Orientation::Vertical
    }

    pub fn flipped(self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }
}

/// Type of ship: name and length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShipType {
    name: &'static str,
    length: usize,
}

impl ShipType {
    /// Create a new ship type.
    pub const fn new(name: &'static str, length: usize) -> Self {
        Self { name, length }
    }

    /// Ship's name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Ship's length.
    pub fn length(&self) -> usize {
        self.length
    }
}

/// Identity of one of the five ships. The digit pair is length then
/// ordinal, so `S32` is the second three-cell ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum ShipId {
    S21,
    S31,
    S32,
    S41,
    S51,
}

impl ShipId {
    pub const ALL: [ShipId; NUM_SHIPS] = [
        ShipId::S21,
        ShipId::S31,
        ShipId::S32,
        ShipId::S41,
        ShipId::S51,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn ship_type(self) -> ShipType {
        SHIPS[self.index()]
    }

    pub fn length(self) -> usize {
        self.ship_type().length()
    }

    pub fn name(self) -> &'static str {
        self.ship_type().name()
    }

    /// Look a ship up by its configured name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.name() == name)
    }
}

/// Anchor and orientation of one ship. Length is implied by the ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct ShipPlacement {
    pub anchor: Coord,
    pub orientation: Orientation,
}

impl ShipPlacement {
    pub const fn new(anchor: Coord, orientation: Orientation) -> Self {
        Self {
            anchor,
            orientation,
        }
    }

    pub const fn horizontal(x: u8, y: u8) -> Self {
        Self::new(Coord::new(x, y), Orientation::Horizontal)
    }

    pub const fn vertical(x: u8, y: u8) -> Self {
        Self::new(Coord::new(x, y), Orientation::Vertical)
    }

    pub fn is_placed(&self) -> bool {
        !self.anchor.is_unplaced()
    }
}

/// Positions of all five ships. Entries anchored at `(0, 0)` are not placed
/// yet; a submitted layout has none of those.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct ShipLayout {
    placements: [ShipPlacement; NUM_SHIPS],
}

impl ShipLayout {
    pub fn new(placements: [ShipPlacement; NUM_SHIPS]) -> Self {
        Self { placements }
    }

    /// Layout with every ship at the sentinel.
    pub fn unplaced() -> Self {
        Self::default()
    }

    pub fn get(&self, id: ShipId) -> ShipPlacement {
        self.placements[id.index()]
    }

    pub fn set(&mut self, id: ShipId, placement: ShipPlacement) {
        self.placements[id.index()] = placement;
    }

    /// Builder form of [`ShipLayout::set`].
    pub fn with(mut self, id: ShipId, placement: ShipPlacement) -> Self {
        self.set(id, placement);
        self
    }

    pub fn clear(&mut self, id: ShipId) {
        self.placements[id.index()] = ShipPlacement::default();
    }

    /// Placed ships in `ShipId` order.
    pub fn placed(&self) -> impl Iterator<Item = (ShipId, ShipPlacement)> + '_ {
        ShipId::ALL
            .into_iter()
            .map(|id| (id, self.get(id)))
            .filter(|(_, p)| p.is_placed())
    }

    pub fn is_complete(&self) -> bool {
        self.first_unplaced().is_none()
    }

    pub fn first_unplaced(&self) -> Option<ShipId> {
        ShipId::ALL
            .into_iter()
            .find(|id| !self.get(*id).is_placed())
    }
}

/// Error parsing the text form of a layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLayoutError(String);

impl fmt::Display for ParseLayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid layout: {}", self.0)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseLayoutError {}

/// Text form: five whitespace separated entries in `ShipId` order, each
/// `x,y,h` or `x,y,v`, or `-` for an unplaced ship.
impl FromStr for ShipLayout {
    type Err = ParseLayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let entries: Vec<&str> = s.split_whitespace().collect();
        if entries.len() != NUM_SHIPS {
            return Err(ParseLayoutError(alloc::format!(
                "expected {} entries, got {}",
                NUM_SHIPS,
                entries.len()
            )));
        }
        let mut layout = ShipLayout::unplaced();
        for (id, entry) in ShipId::ALL.into_iter().zip(entries) {
            if entry == "-" {
                continue;
            }
            let parts: Vec<&str> = entry.split(',').collect();
            let [x, y, o] = parts.as_slice() else {
                return Err(ParseLayoutError(alloc::format!(
                    "{}: expected x,y,h|v but got {}",
                    id.name(),
                    entry
                )));
            };
            let x: u8 = x
                .parse()
                .map_err(|_| ParseLayoutError(alloc::format!("{}: bad x {}", id.name(), x)))?;
            let y: u8 = y
                .parse()
                .map_err(|_| ParseLayoutError(alloc::format!("{}: bad y {}", id.name(), y)))?;
            let orientation = match *o {
                "h" | "H" => Orientation::Horizontal,
                "v" | "V" => Orientation::Vertical,
                other => {
                    return Err(ParseLayoutError(alloc::format!(
                        "{}: bad orientation {}",
                        id.name(),
                        other
                    )))
                }
            };
            layout.set(id, ShipPlacement::new(Coord::new(x, y), orientation));
        }
        Ok(layout)
    }
}

impl fmt::Display for ShipLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries: Vec<String> = ShipId::ALL
            .into_iter()
            .map(|id| {
                let p = self.get(id);
                if !p.is_placed() {
                    "-".to_string()
                } else {
                    let o = if p.orientation.is_vertical() { 'v' } else { 'h' };
                    alloc::format!("{},{},{}", p.anchor.x, p.anchor.y, o)
                }
            })
            .collect();
        write!(f, "{}", entries.join(" "))
    }
}
