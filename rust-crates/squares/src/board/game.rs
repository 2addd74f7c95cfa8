use crate::{
    board::{
        cell::{
            CELL_COUNT,
            Cell,
        },
        digits::Digits,
        score::Scores,
    },
    error::ValidationError,
};
use chrono::{
    DateTime,
    Utc,
};
use rust_decimal::Decimal;
use std::{
    collections::BTreeMap,
    fmt,
};

pub const DEFAULT_HOME_TEAM: &str = "Home Team";
pub const DEFAULT_AWAY_TEAM: &str = "Away Team";
pub const DEFAULT_PRICE_PER_SQUARE: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlayerName(String);

impl PlayerName {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::MissingPlayerName);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Claimed cells. An absent cell is unclaimed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Grid(BTreeMap<Cell, PlayerName>);

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn occupant(&self, cell: Cell) -> Option<&PlayerName> {
        self.0.get(&cell)
    }

    pub fn claimed_count(&self) -> usize {
        self.0.len()
    }

    pub fn empty_count(&self) -> usize {
        CELL_COUNT - self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Cell, &PlayerName)> {
        self.0.iter().map(|(cell, player)| (*cell, player))
    }

    pub(crate) fn set(&mut self, cell: Cell, occupant: Option<PlayerName>) {
        match occupant {
            Some(player) => {
                self.0.insert(cell, player);
            }
            None => {
                self.0.remove(&cell);
            }
        }
    }
}

impl FromIterator<(Cell, PlayerName)> for Grid {
    fn from_iter<T: IntoIterator<Item = (Cell, PlayerName)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    pub home_team_name: String,
    pub away_team_name: String,
    pub price_per_square: Decimal,
    pub grid: Grid,
    /// `Some` exactly when the board has been randomized.
    pub digits: Option<Digits>,
    pub scores: Scores,
    pub created_at: DateTime<Utc>,
    /// Bumped by the store on every committed write.
    pub revision: u64,
}

impl Game {
    pub fn new(created_at: DateTime<Utc>) -> Self {
        Self {
            home_team_name: DEFAULT_HOME_TEAM.to_string(),
            away_team_name: DEFAULT_AWAY_TEAM.to_string(),
            price_per_square: DEFAULT_PRICE_PER_SQUARE,
            grid: Grid::new(),
            digits: None,
            scores: Scores::default(),
            created_at,
            revision: 0,
        }
    }

    pub fn is_randomized(&self) -> bool {
        self.digits.is_some()
    }
}
