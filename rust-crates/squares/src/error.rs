use crate::board::{
    Cell,
    PlayerName,
};
use std::fmt;

/// Errors raised by the board rules. None of them is fatal: the operation that
/// raised one leaves the game unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    Validation(ValidationError),
    /// The cell is held by someone else, or changed since the caller last
    /// observed it. `occupant` is the holder at the time of the check.
    Conflict {
        cell: Cell,
        occupant: Option<PlayerName>,
    },
    AlreadyRandomized,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MissingPlayerName,
    CellOutOfRange { row: u32, col: u32 },
    MalformedCellKey { key: String },
    InvalidScore { input: String },
    ScoreTooLarge { value: u32, max: u32 },
    InvalidPrice { input: String },
    PriceLocked { claimed: usize },
    InvalidDigits { digits: Vec<u8> },
}

impl BoardError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, BoardError::Conflict { .. })
    }
}

impl From<ValidationError> for BoardError {
    fn from(err: ValidationError) -> Self {
        BoardError::Validation(err)
    }
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::Validation(err) => err.fmt(f),
            BoardError::Conflict {
                cell,
                occupant: Some(occupant),
            } => {
                write!(f, "cell {cell} already claimed by {occupant}")
            }
            BoardError::Conflict {
                cell,
                occupant: None,
            } => {
                write!(f, "cell {cell} changed before the claim was written")
            }
            BoardError::AlreadyRandomized => {
                write!(f, "numbers have already been assigned to this board")
            }
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingPlayerName => {
                write!(f, "missing player name")
            }
            ValidationError::CellOutOfRange { row, col } => {
                write!(f, "cell ({row}, {col}) is outside the 10x10 board")
            }
            ValidationError::MalformedCellKey { key } => {
                write!(f, "malformed cell key '{key}'")
            }
            ValidationError::InvalidScore { input } => {
                write!(f, "invalid score '{input}'")
            }
            ValidationError::ScoreTooLarge { value, max } => {
                write!(f, "score {value} exceeds the maximum of {max}")
            }
            ValidationError::InvalidPrice { input } => {
                write!(f, "invalid price per square '{input}'")
            }
            ValidationError::PriceLocked { claimed } => {
                write!(
                    f,
                    "price per square is locked once squares are claimed ({claimed} claimed)"
                )
            }
            ValidationError::InvalidDigits { digits } => {
                write!(f, "{digits:?} is not a permutation of the digits 0-9")
            }
        }
    }
}

impl std::error::Error for BoardError {}

impl std::error::Error for ValidationError {}
