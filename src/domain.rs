//! Data published by the ledger and held in the private store.

use core::fmt;

use alloc::string::String;

use crate::common::{Coord, PlayerSlot};
use crate::geometry::ship_cells;
use crate::ship::{ShipId, ShipLayout, ShipPlacement};

/// Public key of a participant, hex encoded.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Identity(pub String);

impl Identity {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Phase of the game as decided by the ledger.
///
/// `WaitingP1 → WaitingP2 → P1Turn ⇄ P2Turn → P1Wins | P2Wins`. During
/// `P1Turn` player 1 resolves any shot pending on its board and fires at
/// player 2; `P2Turn` mirrors that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum GamePhase {
    #[default]
    WaitingP1,
    WaitingP2,
    P1Turn,
    P2Turn,
    P1Wins,
    P2Wins,
}

impl GamePhase {
    /// Whose move it is.
    pub fn turn(self) -> Option<PlayerSlot> {
        match self {
            GamePhase::P1Turn => Some(PlayerSlot::Player1),
            GamePhase::P2Turn => Some(PlayerSlot::Player2),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::P1Wins | GamePhase::P2Wins)
    }

    pub fn winner(self) -> Option<PlayerSlot> {
        match self {
            GamePhase::P1Wins => Some(PlayerSlot::Player1),
            GamePhase::P2Wins => Some(PlayerSlot::Player2),
            _ => None,
        }
    }

    /// Whether the ledger moving from `self` to `next` follows the phase
    /// machine. Staying put is always allowed.
    pub fn can_advance_to(self, next: GamePhase) -> bool {
        use GamePhase::*;
        self == next
            || matches!(
                (self, next),
                (WaitingP1, WaitingP2)
                    | (WaitingP2, P1Turn)
                    | (P1Turn, P2Turn)
                    | (P2Turn, P1Turn)
                    | (P1Turn, P2Wins)
                    | (P2Turn, P1Wins)
            )
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GamePhase::WaitingP1 => "waiting_p1",
            GamePhase::WaitingP2 => "waiting_p2",
            GamePhase::P1Turn => "p1_turn",
            GamePhase::P2Turn => "p2_turn",
            GamePhase::P1Wins => "p1_wins",
            GamePhase::P2Wins => "p2_wins",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum ShotOutcome {
    Miss,
    Hit,
    Sunk,
}

/// Geometry of a ship made public because it was sunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct DisclosedShip {
    pub ship: ShipId,
    pub placement: ShipPlacement,
}

/// The most recently resolved shot. It struck the board of `fired_by`'s
/// opponent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct LastShotResult {
    pub cell: Coord,
    pub fired_by: Identity,
    pub outcome: ShotOutcome,
    pub disclosed: Option<DisclosedShip>,
}

/// Authoritative game state as published by the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct GameSnapshot {
    pub phase: GamePhase,
    pub player1: Option<Identity>,
    pub player2: Option<Identity>,
    /// Shot fired but not yet resolved. It targets the board of the player
    /// whose turn it is.
    pub pending_shot: Option<Coord>,
    pub last_shot: Option<LastShotResult>,
}

impl GameSnapshot {
    pub fn identity(&self, slot: PlayerSlot) -> Option<&Identity> {
        match slot {
            PlayerSlot::Player1 => self.player1.as_ref(),
            PlayerSlot::Player2 => self.player2.as_ref(),
        }
    }

    pub fn slot_of(&self, identity: &Identity) -> Option<PlayerSlot> {
        PlayerSlot::BOTH
            .into_iter()
            .find(|slot| self.identity(*slot) == Some(identity))
    }

    /// Content checks a well-formed payload must also pass.
    pub fn check(&self) -> Result<(), LedgerError> {
        if let Some(cell) = self.pending_shot {
            if !cell.in_bounds() {
                return Err(LedgerError::InvalidField("pending shot off the board"));
            }
        }
        if let Some(shot) = &self.last_shot {
            if !shot.cell.in_bounds() {
                return Err(LedgerError::InvalidField("last shot off the board"));
            }
            match (shot.outcome, &shot.disclosed) {
                (ShotOutcome::Sunk, None) => {
                    return Err(LedgerError::InvalidField("sunk shot without disclosed ship"))
                }
                (ShotOutcome::Sunk, Some(ship)) => {
                    if !ship_cells(ship.ship, ship.placement)
                        .iter()
                        .all(Coord::in_bounds)
                    {
                        return Err(LedgerError::InvalidField("disclosed ship off the board"));
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// The viewer's own secret: who they are and where their ships are.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct PrivateState {
    pub identity: Identity,
    pub own_layout: ShipLayout,
}

impl PrivateState {
    pub fn new(identity: Identity, own_layout: ShipLayout) -> Self {
        Self {
            identity,
            own_layout,
        }
    }
}

/// An authoritative payload that cannot be read as a [`GameSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Bytes did not decode.
    Malformed(String),
    /// Decoded, but the content is impossible.
    InvalidField(&'static str),
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerError::Malformed(e) => write!(f, "malformed ledger payload: {}", e),
            LedgerError::InvalidField(what) => write!(f, "invalid ledger payload: {}", what),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LedgerError {}

#[cfg(feature = "std")]
mod codec {
    use bincode::Options;

    use super::{GameSnapshot, LedgerError, PrivateState};
    use crate::config::MAX_PAYLOAD_SIZE;

    fn options() -> impl Options {
        bincode::DefaultOptions::new()
            .with_fixint_encoding()
            .with_limit(MAX_PAYLOAD_SIZE)
            .reject_trailing_bytes()
    }

    impl GameSnapshot {
        pub fn encode(&self) -> anyhow::Result<Vec<u8>> {
            options()
                .serialize(self)
                .map_err(|e| anyhow::anyhow!("Serialization error: {}", e))
        }

        /// Decode and check one ledger payload.
        pub fn decode(bytes: &[u8]) -> Result<Self, LedgerError> {
            let snapshot: GameSnapshot = options()
                .deserialize(bytes)
                .map_err(|e| LedgerError::Malformed(e.to_string()))?;
            snapshot.check()?;
            Ok(snapshot)
        }
    }

    impl PrivateState {
        pub fn encode(&self) -> anyhow::Result<Vec<u8>> {
            options()
                .serialize(self)
                .map_err(|e| anyhow::anyhow!("Serialization error: {}", e))
        }

        pub fn decode(bytes: &[u8]) -> anyhow::Result<Self> {
            options()
                .deserialize(bytes)
                .map_err(|e| anyhow::anyhow!("Deserialization error: {}", e))
        }
    }
}
