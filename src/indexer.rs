//! Directory of many games built from their ledger updates.

use std::collections::BTreeMap;

use crate::domain::{GamePhase, GameSnapshot, Identity, LedgerError};

/// What a lobby needs to know about one game.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GameSummary {
    pub address: String,
    pub player1: Option<Identity>,
    pub player2: Option<Identity>,
    pub phase: GamePhase,
}

impl GameSummary {
    pub fn from_snapshot(address: impl Into<String>, snapshot: &GameSnapshot) -> Self {
        Self {
            address: address.into(),
            player1: snapshot.player1.clone(),
            player2: snapshot.player2.clone(),
            phase: snapshot.phase,
        }
    }

    /// A second player can still join.
    pub fn is_open(&self) -> bool {
        self.phase == GamePhase::WaitingP2
    }
}

/// Latest summary per game address.
#[derive(Debug, Clone, Default)]
pub struct GameDirectory {
    games: BTreeMap<String, GameSummary>,
}

impl GameDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one update for `address`.
    pub fn apply_update(&mut self, address: &str, payload: &[u8]) -> Result<&GameSummary, LedgerError> {
        let snapshot = GameSnapshot::decode(payload)?;
        let summary = GameSummary::from_snapshot(address, &snapshot);
        self.games.insert(address.to_string(), summary);
        self.games
            .get(address)
            .ok_or(LedgerError::InvalidField("address"))
    }

    /// Record a batch of `(address, payload)` updates in order. A malformed
    /// payload is logged and skipped; it never affects other games or the
    /// summary already held for its own address. Returns how many applied.
    pub fn apply<I, A, P>(&mut self, updates: I) -> usize
    where
        I: IntoIterator<Item = (A, P)>,
        A: AsRef<str>,
        P: AsRef<[u8]>,
    {
        let mut applied = 0;
        for (address, payload) in updates {
            match self.apply_update(address.as_ref(), payload.as_ref()) {
                Ok(_) => applied += 1,
                Err(e) => log::warn!("Skipping update for {}: {}", address.as_ref(), e),
            }
        }
        applied
    }

    pub fn get(&self, address: &str) -> Option<&GameSummary> {
        self.games.get(address)
    }

    pub fn games(&self) -> impl Iterator<Item = &GameSummary> + '_ {
        self.games.values()
    }

    pub fn open_games(&self) -> impl Iterator<Item = &GameSummary> + '_ {
        self.games.values().filter(|g| g.is_open())
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}
