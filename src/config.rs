use crate::ship::ShipType;

pub const BOARD_SIZE: u8 = 10;
pub const NUM_SHIPS: usize = 5;

/// Fleet in `ShipId` order: one two-cell, two three-cell, one four-cell
/// and one five-cell ship.
pub const SHIPS: [ShipType; NUM_SHIPS] = [
    ShipType::new("Destroyer", 2),
    ShipType::new("Cruiser", 3),
    ShipType::new("Submarine", 3),
    ShipType::new("Battleship", 4),
    ShipType::new("Carrier", 5),
];

/// Total number of ship segments used in the standard configuration.
pub const TOTAL_SHIP_CELLS: usize = 2 + 3 + 3 + 4 + 5;

/// Upper bound for a single authoritative payload (1 MB).
pub const MAX_PAYLOAD_SIZE: u64 = 1_000_000;

#[cfg(feature = "std")]
pub use runtime::*;

#[cfg(feature = "std")]
mod runtime {
    use std::env;
    use std::time::Duration;

    /// Delay between a dropped ledger subscription and the next attempt.
    pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

    /// Number of derived states an observer may fall behind before lagging.
    pub const DEFAULT_FEED_CAPACITY: usize = 64;

    /// Runtime knobs of a game session.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SessionConfig {
        /// Fixed delay before resubscribing to the ledger. Never grows.
        pub retry_delay: Duration,
        /// Broadcast buffer shared by all observers of the derived state.
        pub feed_capacity: usize,
    }

    impl Default for SessionConfig {
        fn default() -> Self {
            Self {
                retry_delay: DEFAULT_RETRY_DELAY,
                feed_capacity: DEFAULT_FEED_CAPACITY,
            }
        }
    }

    impl SessionConfig {
        /// Defaults overridden by `BATTLESHIP_RETRY_MS` and
        /// `BATTLESHIP_FEED_CAPACITY` when those parse.
        pub fn from_env() -> Self {
            let mut config = Self::default();
            if let Some(ms) = env::var("BATTLESHIP_RETRY_MS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
            {
                config.retry_delay = Duration::from_millis(ms);
            }
            if let Some(cap) = env::var("BATTLESHIP_FEED_CAPACITY")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .filter(|cap| *cap > 0)
            {
                config.feed_capacity = cap;
            }
            config
        }

        pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
            self.retry_delay = retry_delay;
            self
        }
    }
}
