//! Maps a quarter's score to the square that wins it.
//!
//! Resolution is a pure function of the current game and is recomputed on
//! every read: a square claimed after a quarter was scored changes that
//! quarter's winner.

use crate::board::{
    Cell,
    Digits,
    Game,
    PlayerName,
    Quarter,
};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuarterOutcome {
    /// Not randomized yet, or the quarter's score is incomplete.
    Pending,
    /// The winning square has no occupant.
    Unclaimed,
    Winner(PlayerName),
}

impl QuarterOutcome {
    pub fn winner(&self) -> Option<&PlayerName> {
        match self {
            QuarterOutcome::Winner(player) => Some(player),
            _ => None,
        }
    }
}

impl fmt::Display for QuarterOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuarterOutcome::Pending => write!(f, "Pending"),
            QuarterOutcome::Unclaimed => write!(f, "Empty Square"),
            QuarterOutcome::Winner(player) => player.fmt(f),
        }
    }
}

/// The one cell whose row digit is `away % 10` and column digit `home % 10`.
pub fn winning_cell(digits: &Digits, home_score: u32, away_score: u32) -> Option<Cell> {
    let home_digit = (home_score % 10) as u8;
    let away_digit = (away_score % 10) as u8;
    let col = digits.home.position_of(home_digit)?;
    let row = digits.away.position_of(away_digit)?;
    Cell::new(row as u32, col as u32).ok()
}

pub fn resolve_winner(game: &Game, quarter: Quarter) -> QuarterOutcome {
    let Some(digits) = game.digits.as_ref() else {
        return QuarterOutcome::Pending;
    };
    let Some((home, away)) = game.scores.get(quarter).entered() else {
        return QuarterOutcome::Pending;
    };
    let Some(cell) = winning_cell(digits, home, away) else {
        return QuarterOutcome::Pending;
    };
    match game.grid.occupant(cell) {
        Some(player) => QuarterOutcome::Winner(player.clone()),
        None => QuarterOutcome::Unclaimed,
    }
}

pub fn resolve_all(game: &Game) -> [(Quarter, QuarterOutcome); 4] {
    Quarter::ALL.map(|quarter| (quarter, resolve_winner(game, quarter)))
}
