//! Seat-relative presentation of a [`DerivedState`].

use crate::board::PlayerBoard;
use crate::common::PlayerSlot;
use crate::domain::GamePhase;
use crate::game::DerivedState;

/// How the viewer takes part in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewerRole {
    Player1,
    Player2,
    Watching,
}

impl ViewerRole {
    pub fn of(state: &DerivedState) -> Self {
        match state.my_slot() {
            Some(PlayerSlot::Player1) => ViewerRole::Player1,
            Some(PlayerSlot::Player2) => ViewerRole::Player2,
            None => ViewerRole::Watching,
        }
    }

    pub fn slot(self) -> Option<PlayerSlot> {
        match self {
            ViewerRole::Player1 => Some(PlayerSlot::Player1),
            ViewerRole::Player2 => Some(PlayerSlot::Player2),
            ViewerRole::Watching => None,
        }
    }

    pub fn is_playing(self) -> bool {
        self != ViewerRole::Watching
    }

    /// Board shown on the left: the viewer's own, or player 1's when
    /// watching. The right side shows the other one.
    pub fn left_slot(self) -> PlayerSlot {
        self.slot().unwrap_or(PlayerSlot::Player1)
    }

    pub fn right_slot(self) -> PlayerSlot {
        self.left_slot().opponent()
    }
}

pub fn my_turn(state: &DerivedState) -> bool {
    let role = ViewerRole::of(state);
    role.is_playing() && state.phase.turn() == role.slot()
}

pub fn opponent_turn(state: &DerivedState) -> bool {
    let role = ViewerRole::of(state);
    role.is_playing() && state.phase.turn() == role.slot().map(PlayerSlot::opponent)
}

pub fn left_board(state: &DerivedState) -> &PlayerBoard {
    state.board(ViewerRole::of(state).left_slot())
}

pub fn right_board(state: &DerivedState) -> &PlayerBoard {
    state.board(ViewerRole::of(state).right_slot())
}

pub fn left_board_title(state: &DerivedState) -> &'static str {
    if ViewerRole::of(state).is_playing() {
        "My board"
    } else {
        "Player 1"
    }
}

pub fn right_board_title(state: &DerivedState) -> &'static str {
    if ViewerRole::of(state).is_playing() {
        "Opponent board"
    } else {
        "Player 2"
    }
}

/// One-line prompt describing the game from the viewer's seat.
pub fn status_message(state: &DerivedState) -> &'static str {
    use ViewerRole::*;
    let role = ViewerRole::of(state);
    match (state.phase, role) {
        (GamePhase::WaitingP1, _) => "Waiting for the first player to join the game",
        (GamePhase::WaitingP2, Player1) => "Waiting for your opponent to join the game",
        (GamePhase::WaitingP2, _) => "Waiting for the second player to join the game",
        (GamePhase::P1Turn, Watching) => "Player 1's turn...",
        (GamePhase::P1Turn, Player1) | (GamePhase::P2Turn, Player2) => "It’s your turn!",
        (GamePhase::P1Turn, Player2) => {
            if state.last_shot.is_some() {
                "Waiting for your opponent to validate your shot"
            } else {
                "Waiting for your opponent to make their first move"
            }
        }
        (GamePhase::P2Turn, Watching) => "Player 2's turn...",
        (GamePhase::P2Turn, Player1) => "Waiting for your opponent to validate your shot",
        (GamePhase::P1Wins, Watching) => "Player 1 is victorious!",
        (GamePhase::P2Wins, Watching) => "Player 2 is victorious!",
        (GamePhase::P1Wins, Player1) | (GamePhase::P2Wins, Player2) => "Congratulations, you win!",
        (GamePhase::P1Wins, Player2) => "Better luck next time, you lost.",
        (GamePhase::P2Wins, Player1) => "You lost, better luck next time.",
    }
}
