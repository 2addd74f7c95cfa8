use crate::error::ValidationError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    pub const ALL: [Quarter; 4] = [Quarter::Q1, Quarter::Q2, Quarter::Q3, Quarter::Q4];

    pub fn index(self) -> usize {
        match self {
            Quarter::Q1 => 0,
            Quarter::Q2 => 1,
            Quarter::Q3 => 2,
            Quarter::Q4 => 3,
        }
    }

    /// Key used in the stored document (`q1`..`q4`).
    pub fn key(self) -> &'static str {
        match self {
            Quarter::Q1 => "q1",
            Quarter::Q2 => "q2",
            Quarter::Q3 => "q3",
            Quarter::Q4 => "q4",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Quarter::Q1 => "1st Quarter",
            Quarter::Q2 => "2nd Quarter",
            Quarter::Q3 => "3rd Quarter",
            Quarter::Q4 => "Final Score",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Quarter::ALL
            .into_iter()
            .find(|quarter| quarter.key().eq_ignore_ascii_case(key))
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key().to_ascii_uppercase())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn key(self) -> &'static str {
        match self {
            Side::Home => "home",
            Side::Away => "away",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "home" => Some(Side::Home),
            "away" => Some(Side::Away),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct QuarterScore {
    pub home: Option<u32>,
    pub away: Option<u32>,
}

impl QuarterScore {
    pub fn new(home: u32, away: u32) -> Self {
        Self {
            home: Some(home),
            away: Some(away),
        }
    }

    /// `(home, away)` once both sides have been entered.
    pub fn entered(&self) -> Option<(u32, u32)> {
        match (self.home, self.away) {
            (Some(home), Some(away)) => Some((home, away)),
            _ => None,
        }
    }

    pub fn side(&self, side: Side) -> Option<u32> {
        match side {
            Side::Home => self.home,
            Side::Away => self.away,
        }
    }

    pub fn set_side(&mut self, side: Side, value: Option<u32>) {
        match side {
            Side::Home => self.home = value,
            Side::Away => self.away = value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Scores([QuarterScore; 4]);

impl Scores {
    pub fn get(&self, quarter: Quarter) -> &QuarterScore {
        &self.0[quarter.index()]
    }

    pub fn get_mut(&mut self, quarter: Quarter) -> &mut QuarterScore {
        &mut self.0[quarter.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Quarter, &QuarterScore)> {
        Quarter::ALL.into_iter().zip(self.0.iter())
    }
}

/// Parses a score field as typed by a user. Blank input clears the score.
pub fn parse_score_input(input: &str, max: u32) -> Result<Option<u32>, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return Ok(None);
    }
    let value = trimmed
        .parse::<u32>()
        .map_err(|_| ValidationError::InvalidScore {
            input: input.to_string(),
        })?;
    if value > max {
        return Err(ValidationError::ScoreTooLarge { value, max });
    }
    Ok(Some(value))
}
