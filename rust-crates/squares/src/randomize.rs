//! One-time assignment of score digits to rows and columns.

use crate::{
    board::{
        DigitPermutation,
        Digits,
        Game,
    },
    error::BoardError,
};
use rand::Rng;
use std::fmt;

/// Raised before randomizing a board that still has open squares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptySquaresWarning {
    pub empty: usize,
}

impl fmt::Display for EmptySquaresWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "There are still {} empty squares remaining. Are you sure you want to assign numbers now? This action cannot be undone.",
            self.empty
        )
    }
}

/// Decides whether to go ahead with a partially filled board.
pub trait RandomizeConfirmation {
    fn confirm(&self, warning: &EmptySquaresWarning) -> bool;
}

impl<F> RandomizeConfirmation for F
where
    F: Fn(&EmptySquaresWarning) -> bool,
{
    fn confirm(&self, warning: &EmptySquaresWarning) -> bool {
        self(warning)
    }
}

pub struct AlwaysProceed;

impl RandomizeConfirmation for AlwaysProceed {
    fn confirm(&self, _warning: &EmptySquaresWarning) -> bool {
        true
    }
}

pub fn randomization_warning(game: &Game) -> Option<EmptySquaresWarning> {
    let empty = game.grid.empty_count();
    (empty > 0).then_some(EmptySquaresWarning { empty })
}

/// Draws two independent permutations for an unrandomized game.
pub fn draw_digits<R: Rng + ?Sized>(game: &Game, rng: &mut R) -> Result<Digits, BoardError> {
    if game.is_randomized() {
        return Err(BoardError::AlreadyRandomized);
    }
    let home = DigitPermutation::shuffled(rng);
    let away = DigitPermutation::shuffled(rng);
    Ok(Digits { home, away })
}

/// Asks `confirmation` when squares are still open. `Ok(None)` means the
/// caller backed out and nothing should be written.
pub fn prepare_randomization<R, C>(
    game: &Game,
    confirmation: &C,
    rng: &mut R,
) -> Result<Option<Digits>, BoardError>
where
    R: Rng + ?Sized,
    C: RandomizeConfirmation + ?Sized,
{
    if game.is_randomized() {
        return Err(BoardError::AlreadyRandomized);
    }
    if let Some(warning) = randomization_warning(game) {
        if !confirmation.confirm(&warning) {
            return Ok(None);
        }
    }
    draw_digits(game, rng).map(Some)
}

/// Sets both assignments at once. Never overwrites existing digits.
pub fn commit_digits(game: &mut Game, digits: Digits) -> Result<(), BoardError> {
    if game.is_randomized() {
        return Err(BoardError::AlreadyRandomized);
    }
    game.digits = Some(digits);
    Ok(())
}

pub fn randomize<R: Rng + ?Sized>(game: &Game, rng: &mut R) -> Result<Game, BoardError> {
    let digits = draw_digits(game, rng)?;
    let mut next = game.clone();
    commit_digits(&mut next, digits)?;
    Ok(next)
}
