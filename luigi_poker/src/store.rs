//! Balance persistence.
//!
//! Loading never fails: anything missing or unreadable falls back to the
//! starting balances. Saving failures are logged and dropped so a full
//! disk never interrupts a game.

use log::{debug, warn};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::game::entities::{Balances, Coins};

/// Somewhere balances survive between sessions.
pub trait BalanceStore {
    fn load(&self) -> Balances;
    fn save(&mut self, balances: Balances);
}

/// A save file as read back. Either key may be missing.
#[derive(Debug, Deserialize)]
struct SavedBalances {
    #[serde(default)]
    player: Option<Coins>,
    #[serde(default)]
    opponent: Option<Coins>,
}

/// Balances stored as `{"player": n, "opponent": m}` in one file.
/// A missing key falls back on its own.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    fallback: Balances,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            fallback: Balances::default(),
        }
    }

    /// Use `starting_balance` for both sides when nothing can be loaded.
    #[must_use]
    pub fn with_starting_balance(mut self, starting_balance: Coins) -> Self {
        self.fallback = Balances::new(starting_balance, starting_balance);
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BalanceStore for JsonFileStore {
    fn load(&self) -> Balances {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) => {
                debug!("no saved balances at {}: {error}", self.path.display());
                return self.fallback;
            }
        };
        match serde_json::from_str::<SavedBalances>(&raw) {
            Ok(saved) => Balances::new(
                saved.player.unwrap_or(self.fallback.player),
                saved.opponent.unwrap_or(self.fallback.opponent),
            ),
            Err(error) => {
                warn!(
                    "ignoring corrupt balances in {}: {error}",
                    self.path.display()
                );
                self.fallback
            }
        }
    }

    fn save(&mut self, balances: Balances) {
        let result = serde_json::to_string(&balances)
            .map_err(std::io::Error::from)
            .and_then(|json| fs::write(&self.path, json));
        match result {
            Ok(()) => debug!("saved balances {balances} to {}", self.path.display()),
            Err(error) => warn!("failed to save balances to {}: {error}", self.path.display()),
        }
    }
}

/// Keeps balances in memory only.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    balances: Option<Balances>,
    saves: usize,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_balances(balances: Balances) -> Self {
        Self {
            balances: Some(balances),
            saves: 0,
        }
    }

    /// How many times [`BalanceStore::save`] was called.
    #[must_use]
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl BalanceStore for MemoryStore {
    fn load(&self) -> Balances {
        self.balances.unwrap_or_default()
    }

    fn save(&mut self, balances: Balances) {
        self.balances = Some(balances);
        self.saves += 1;
    }
}
