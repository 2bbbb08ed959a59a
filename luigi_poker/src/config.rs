//! Game configuration management.
//!
//! Defaults match the classic table. Environment variables overlay the
//! defaults and the result is validated before anyone plays with it.

use serde::{Deserialize, Serialize};
use std::{path::PathBuf, str::FromStr, time::Duration};
use thiserror::Error;

use crate::game::entities::{Coins, DEFAULT_BALANCE};

pub const DEFAULT_PORT: u16 = 5555;
pub const DEFAULT_SAVE_PATH: &str = "balances.json";

/// Everything tunable about a game.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GameConfig {
    /// Balance for each side when nothing was saved, and for each side of
    /// a network session.
    pub starting_balance: Coins,
    /// Wager a solo round opens with.
    pub initial_wager: Coins,
    /// How much one raise or lower moves the wager.
    pub wager_step: Coins,
    pub min_wager: Coins,
    pub max_wager: Coins,
    /// Fixed wager for every network round.
    pub network_wager: Coins,
    pub port: u16,
    /// Where solo balances are saved between sessions.
    pub save_path: PathBuf,
    /// Pause between a settled solo round and the next deal.
    pub next_round_delay_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_balance: DEFAULT_BALANCE,
            initial_wager: 10,
            wager_step: 10,
            min_wager: 10,
            max_wager: 30,
            network_wager: 10,
            port: DEFAULT_PORT,
            save_path: PathBuf::from(DEFAULT_SAVE_PATH),
            next_round_delay_ms: 3800,
        }
    }
}

impl GameConfig {
    /// Load configuration from the process environment.
    ///
    /// Reads `LUIGI_PORT`, `LUIGI_SAVE_PATH`, `LUIGI_NETWORK_WAGER` and
    /// `LUIGI_ROUND_DELAY_MS`. Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but can't be parsed, or if the
    /// resulting configuration doesn't validate.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`GameConfig::from_env`], reading variables through `lookup`.
    ///
    /// # Errors
    ///
    /// See [`GameConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(port) = parse_var(&lookup, "LUIGI_PORT")? {
            config.port = port;
        }
        if let Some(path) = lookup("LUIGI_SAVE_PATH") {
            config.save_path = PathBuf::from(path);
        }
        if let Some(wager) = parse_var(&lookup, "LUIGI_NETWORK_WAGER")? {
            config.network_wager = wager;
        }
        if let Some(delay) = parse_var(&lookup, "LUIGI_ROUND_DELAY_MS")? {
            config.next_round_delay_ms = delay;
        }
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration after loading.
    ///
    /// # Errors
    ///
    /// Returns the first setting found out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_wager == 0 {
            return Err(ConfigError::Invalid {
                var: "min_wager".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }

        if self.max_wager < self.min_wager {
            return Err(ConfigError::Invalid {
                var: "max_wager".to_string(),
                reason: format!("must be at least the minimum wager ({})", self.min_wager),
            });
        }

        if !(self.min_wager..=self.max_wager).contains(&self.initial_wager) {
            return Err(ConfigError::Invalid {
                var: "initial_wager".to_string(),
                reason: format!(
                    "must be between {} and {}",
                    self.min_wager, self.max_wager
                ),
            });
        }

        if self.wager_step == 0 {
            return Err(ConfigError::Invalid {
                var: "wager_step".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }

        if self.network_wager == 0 {
            return Err(ConfigError::Invalid {
                var: "LUIGI_NETWORK_WAGER".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }

        if self.starting_balance < self.network_wager {
            return Err(ConfigError::Invalid {
                var: "LUIGI_NETWORK_WAGER".to_string(),
                reason: format!(
                    "can't exceed the starting balance ({})",
                    self.starting_balance
                ),
            });
        }

        if self.port == 0 {
            return Err(ConfigError::Invalid {
                var: "LUIGI_PORT".to_string(),
                reason: "must be a fixed port, not 0".to_string(),
            });
        }

        Ok(())
    }

    #[must_use]
    pub fn next_round_delay(&self) -> Duration {
        Duration::from_millis(self.next_round_delay_ms)
    }
}

#[derive(Debug, Eq, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
    #[error("can't parse {var}={value}")]
    Unparsable { var: String, value: String },
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Unparsable {
                var: key.to_string(),
                value,
            }),
    }
}
