//! Storage of the viewer's secret per game.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use rand::Rng;

use crate::domain::{Identity, PrivateState};
use crate::ship::ShipLayout;

/// Key of the entry whose identity seeds every new game.
pub const INITIAL_KEY: &str = "initial";

/// Key-value store of private states, keyed by game id.
#[async_trait::async_trait]
pub trait PrivateStateStore: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Option<PrivateState>>;
    async fn set(&self, key: &str, state: PrivateState) -> anyhow::Result<()>;
}

/// Store keeping encoded states in memory.
#[derive(Clone, Default)]
pub struct InMemoryPrivateStateStore {
    entries: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryPrivateStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl PrivateStateStore for InMemoryPrivateStateStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<PrivateState>> {
        let bytes = {
            let entries = self
                .entries
                .lock()
                .map_err(|_| anyhow::anyhow!("private state store poisoned"))?;
            entries.get(key).cloned()
        };
        bytes.map(|b| PrivateState::decode(&b)).transpose()
    }

    async fn set(&self, key: &str, state: PrivateState) -> anyhow::Result<()> {
        let bytes = state.encode()?;
        self.entries
            .lock()
            .map_err(|_| anyhow::anyhow!("private state store poisoned"))?
            .insert(key.to_string(), bytes);
        Ok(())
    }
}

/// 32 random bytes, hex encoded.
pub fn random_identity<R: Rng>(rng: &mut R) -> Identity {
    let mut bytes = [0u8; 32];
    rng.fill(&mut bytes);
    Identity::new(bytes.iter().map(|b| format!("{:02x}", b)).collect::<String>())
}

/// The stored state of `game_id`, or a fresh one holding the identity of
/// the `initial` entry (created on first use) and no ships placed.
pub async fn load_or_create(
    store: &dyn PrivateStateStore,
    game_id: &str,
) -> anyhow::Result<PrivateState> {
    if let Some(state) = store.get(game_id).await? {
        return Ok(state);
    }
    let initial = match store.get(INITIAL_KEY).await? {
        Some(initial) => initial,
        None => {
            let initial = PrivateState::new(random_identity(&mut rand::rng()), ShipLayout::unplaced());
            store.set(INITIAL_KEY, initial.clone()).await?;
            log::info!("Created identity {}", initial.identity);
            initial
        }
    };
    let state = PrivateState::new(initial.identity, ShipLayout::unplaced());
    store.set(game_id, state.clone()).await?;
    Ok(state)
}
