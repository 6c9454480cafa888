#![allow(dead_code)]

use battleship_view::{
    DisclosedShip, GamePhase, GameSnapshot, Identity, LastShotResult, PrivateState, ShipId,
    ShipLayout, ShipPlacement, ShotOutcome, Coord,
};

pub fn player1_layout() -> ShipLayout {
    ShipLayout::new([
        ShipPlacement::vertical(5, 9),
        ShipPlacement::horizontal(8, 2),
        ShipPlacement::horizontal(8, 5),
        ShipPlacement::horizontal(1, 2),
        ShipPlacement::horizontal(6, 7),
    ])
}

pub fn player2_layout() -> ShipLayout {
    ShipLayout::new([
        ShipPlacement::vertical(2, 2),
        ShipPlacement::vertical(1, 8),
        ShipPlacement::horizontal(5, 9),
        ShipPlacement::vertical(10, 1),
        ShipPlacement::horizontal(1, 5),
    ])
}

pub fn alice() -> Identity {
    Identity::new("a1a1")
}

pub fn bob() -> Identity {
    Identity::new("b0b0")
}

pub fn alice_private() -> PrivateState {
    PrivateState::new(alice(), player1_layout())
}

pub fn bob_private() -> PrivateState {
    PrivateState::new(bob(), player2_layout())
}

/// Both players seated, nothing fired yet.
pub fn started() -> GameSnapshot {
    GameSnapshot {
        phase: GamePhase::P1Turn,
        player1: Some(alice()),
        player2: Some(bob()),
        pending_shot: None,
        last_shot: None,
    }
}

pub fn shot(cell: Coord, fired_by: Identity, outcome: ShotOutcome) -> LastShotResult {
    LastShotResult {
        cell,
        fired_by,
        outcome,
        disclosed: None,
    }
}

pub fn sunk(cell: Coord, fired_by: Identity, ship: ShipId, placement: ShipPlacement) -> LastShotResult {
    LastShotResult {
        cell,
        fired_by,
        outcome: ShotOutcome::Sunk,
        disclosed: Some(DisclosedShip { ship, placement }),
    }
}
