// Persisted shape of a game, as the shared store holds it.
use crate::{
    board::{
        Cell,
        DigitPermutation,
        Digits,
        Game,
        Grid,
        PlayerName,
        Quarter,
        QuarterScore,
        Scores,
    },
    error::ValidationError,
};
use anyhow::Context;
use chrono::{
    DateTime,
    Utc,
};
use rust_decimal::Decimal;
use serde::{
    Deserialize,
    Serialize,
};
use std::{
    collections::BTreeMap,
    fmt,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDocument {
    pub home_team_name: String,
    pub away_team_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price_per_square: Decimal,
    #[serde(default)]
    pub grid: BTreeMap<String, String>,
    #[serde(default)]
    pub home_digits: Option<Vec<u8>>,
    #[serde(default)]
    pub away_digits: Option<Vec<u8>>,
    #[serde(default)]
    pub is_randomized: bool,
    #[serde(default)]
    pub scores: ScoresDocument,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub revision: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoresDocument {
    pub q1: ScoreDocument,
    pub q2: ScoreDocument,
    pub q3: ScoreDocument,
    pub q4: ScoreDocument,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreDocument {
    pub home: Option<u32>,
    pub away: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    Invalid(ValidationError),
    RandomizedFlagMismatch {
        is_randomized: bool,
        home_digits: bool,
        away_digits: bool,
    },
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentError::Invalid(err) => write!(f, "invalid game document: {err}"),
            DocumentError::RandomizedFlagMismatch {
                is_randomized,
                home_digits,
                away_digits,
            } => write!(
                f,
                "isRandomized is {is_randomized} but homeDigits present: {home_digits}, awayDigits present: {away_digits}"
            ),
        }
    }
}

impl std::error::Error for DocumentError {}

impl From<ValidationError> for DocumentError {
    fn from(err: ValidationError) -> Self {
        DocumentError::Invalid(err)
    }
}

impl ScoresDocument {
    fn slot(&self, quarter: Quarter) -> &ScoreDocument {
        match quarter {
            Quarter::Q1 => &self.q1,
            Quarter::Q2 => &self.q2,
            Quarter::Q3 => &self.q3,
            Quarter::Q4 => &self.q4,
        }
    }

    fn slot_mut(&mut self, quarter: Quarter) -> &mut ScoreDocument {
        match quarter {
            Quarter::Q1 => &mut self.q1,
            Quarter::Q2 => &mut self.q2,
            Quarter::Q3 => &mut self.q3,
            Quarter::Q4 => &mut self.q4,
        }
    }
}

impl From<&Game> for GameDocument {
    fn from(game: &Game) -> Self {
        let mut scores = ScoresDocument::default();
        for (quarter, score) in game.scores.iter() {
            *scores.slot_mut(quarter) = ScoreDocument {
                home: score.home,
                away: score.away,
            };
        }
        Self {
            home_team_name: game.home_team_name.clone(),
            away_team_name: game.away_team_name.clone(),
            price_per_square: game.price_per_square,
            grid: game
                .grid
                .iter()
                .map(|(cell, player)| (cell.key(), player.to_string()))
                .collect(),
            home_digits: game.digits.map(|digits| digits.home.as_array().to_vec()),
            away_digits: game.digits.map(|digits| digits.away.as_array().to_vec()),
            is_randomized: game.is_randomized(),
            scores,
            created_at: game.created_at,
            revision: game.revision,
        }
    }
}

impl TryFrom<GameDocument> for Game {
    type Error = DocumentError;

    fn try_from(document: GameDocument) -> Result<Self, Self::Error> {
        if document.price_per_square <= Decimal::ZERO {
            return Err(ValidationError::InvalidPrice {
                input: document.price_per_square.to_string(),
            }
            .into());
        }

        let grid = document
            .grid
            .iter()
            .map(|(key, player)| Ok((Cell::parse_key(key)?, PlayerName::parse(player)?)))
            .collect::<Result<Grid, ValidationError>>()?;

        let digits = match (
            document.is_randomized,
            &document.home_digits,
            &document.away_digits,
        ) {
            (true, Some(home), Some(away)) => Some(Digits {
                home: DigitPermutation::from_slice(home)?,
                away: DigitPermutation::from_slice(away)?,
            }),
            (false, None, None) => None,
            (is_randomized, home, away) => {
                return Err(DocumentError::RandomizedFlagMismatch {
                    is_randomized,
                    home_digits: home.is_some(),
                    away_digits: away.is_some(),
                });
            }
        };

        let mut scores = Scores::default();
        for quarter in Quarter::ALL {
            let stored = document.scores.slot(quarter);
            *scores.get_mut(quarter) = QuarterScore {
                home: stored.home,
                away: stored.away,
            };
        }

        Ok(Game {
            home_team_name: document.home_team_name,
            away_team_name: document.away_team_name,
            price_per_square: document.price_per_square,
            grid,
            digits,
            scores,
            created_at: document.created_at,
            revision: document.revision,
        })
    }
}

pub fn encode_game(game: &Game) -> crate::Result<Vec<u8>> {
    serde_json::to_vec(&GameDocument::from(game)).context("serialize game document")
}

pub fn decode_game(bytes: &[u8]) -> crate::Result<Game> {
    let document: GameDocument =
        serde_json::from_slice(bytes).context("deserialize game document")?;
    Game::try_from(document).context("validate game document")
}
