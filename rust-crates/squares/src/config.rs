use crate::board::{
    DEFAULT_AWAY_TEAM,
    DEFAULT_HOME_TEAM,
    DEFAULT_PRICE_PER_SQUARE,
};
use anyhow::{
    Context,
    anyhow,
};
use rust_decimal::Decimal;
use serde::{
    Deserialize,
    Serialize,
};
use std::{
    fs,
    path::Path,
};

pub const CONFIG_FILE: &str = "config.json";
pub const DEFAULT_MAX_SCORE_INPUT: u32 = 99;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SquaresConfig {
    pub default_price_per_square: Decimal,
    pub default_home_team: String,
    pub default_away_team: String,
    /// Refuse price edits once any square is claimed.
    pub lock_price_once_claimed: bool,
    /// Largest score a user may type into a quarter field.
    pub max_score_input: u32,
}

impl Default for SquaresConfig {
    fn default() -> Self {
        Self {
            default_price_per_square: DEFAULT_PRICE_PER_SQUARE,
            default_home_team: DEFAULT_HOME_TEAM.to_string(),
            default_away_team: DEFAULT_AWAY_TEAM.to_string(),
            lock_price_once_claimed: false,
            max_score_input: DEFAULT_MAX_SCORE_INPUT,
        }
    }
}

/// Rules a client enforces before it writes to the shared store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClientPolicy {
    pub lock_price_once_claimed: bool,
    pub max_score_input: u32,
}

impl Default for ClientPolicy {
    fn default() -> Self {
        SquaresConfig::default().policy()
    }
}

impl SquaresConfig {
    pub fn policy(&self) -> ClientPolicy {
        ClientPolicy {
            lock_price_once_claimed: self.lock_price_once_claimed,
            max_score_input: self.max_score_input,
        }
    }

    /// Reads `config.json` under `dir`; a missing or blank file yields defaults.
    pub fn load(dir: impl AsRef<Path>) -> crate::Result<Self> {
        let path = dir.as_ref().join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read(&path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        if data.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        let config: Self = serde_json::from_slice(&data)
            .with_context(|| format!("Failed to parse config at {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> crate::Result<()> {
        if self.default_price_per_square <= Decimal::ZERO {
            return Err(anyhow!(
                "default_price_per_square must be positive, got {}",
                self.default_price_per_square
            ));
        }
        Ok(())
    }
}
