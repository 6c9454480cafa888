//! Port to the authoritative game contract.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::common::{Coord, PlayerSlot};
use crate::domain::PrivateState;

pub mod in_memory;

/// A live subscription to one game's authoritative state. Every item is
/// an encoded [`crate::domain::GameSnapshot`]; an error means the
/// subscription is gone and a new one must be opened.
#[async_trait::async_trait]
pub trait LedgerFeed: Send {
    async fn recv(&mut self) -> anyhow::Result<Vec<u8>>;
}

/// Receipt of an accepted transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxReceipt {
    pub tx_id: u64,
    /// Ledger height after the transaction.
    pub height: u64,
}

/// The contract of one game. It alone decides legality, turn order and
/// the winner; every call either lands or fails with the reason.
#[async_trait::async_trait]
pub trait Ledger: Send + Sync {
    async fn subscribe(&self) -> anyhow::Result<Box<dyn LedgerFeed>>;

    /// Take `slot` with the layout in `witness`.
    async fn join(&self, slot: PlayerSlot, witness: &PrivateState) -> anyhow::Result<TxReceipt>;

    /// Resolve any shot pending on `slot`'s board against the layout in
    /// `witness`, then fire at `cell` on the opponent's board.
    async fn submit_shot(
        &self,
        slot: PlayerSlot,
        cell: Coord,
        witness: &PrivateState,
    ) -> anyhow::Result<TxReceipt>;
}
