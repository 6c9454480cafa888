#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod action;
mod bitboard;
pub mod board;
mod common;
mod config;
pub mod domain;
pub mod game;
pub mod geometry;
pub mod placement;
pub mod render;
pub mod reveal;
mod ship;
pub mod view;

#[cfg(feature = "std")]
pub mod feed;
#[cfg(feature = "std")]
pub mod indexer;
#[cfg(feature = "std")]
pub mod ledger;
#[cfg(feature = "std")]
mod logging;
#[cfg(feature = "std")]
pub mod private_state;
#[cfg(feature = "std")]
pub mod reconciler;

pub use action::{ActionBook, ActionId, ActionStatus, LocalAction};
pub use bitboard::{BitBoard, BitBoardError, CellMask};
pub use board::{project, BoardCell, PlayerBoard, ProjectionInput};
pub use common::*;
pub use config::*;
pub use domain::*;
pub use game::{DerivedState, FoldInputs};
pub use geometry::validate_layout;
pub use placement::{random_layout, random_placement, LayoutDraft};
pub use render::render_game;
pub use reveal::{revealed_owner, PartialReveal, PartialShipTracker};
pub use ship::*;
pub use view::ViewerRole;

#[cfg(feature = "std")]
pub use feed::{StateFeed, StateSubscription};
#[cfg(feature = "std")]
pub use indexer::{GameDirectory, GameSummary};
#[cfg(feature = "std")]
pub use ledger::{in_memory::InMemoryLedger, Ledger, LedgerFeed, TxReceipt};
#[cfg(feature = "std")]
pub use logging::{init_logging, parse_level};
#[cfg(feature = "std")]
pub use private_state::{InMemoryPrivateStateStore, PrivateStateStore};
#[cfg(feature = "std")]
pub use reconciler::{GameSession, SessionError};
