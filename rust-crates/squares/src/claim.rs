//! Who may occupy or vacate a cell.
//!
//! A claim is planned against the caller's latest view of the game and then
//! committed as a compare-and-set: the write only lands if the cell still holds
//! the occupant the caller observed. Two clients racing for the same empty cell
//! therefore cannot both succeed; the second commit observes the first
//! claimant and fails with a conflict.

use crate::{
    board::{
        Cell,
        Game,
        PlayerName,
    },
    error::BoardError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimAction {
    Claim,
    Release,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimChange {
    pub cell: Cell,
    pub player: PlayerName,
    pub action: ClaimAction,
}

impl ClaimChange {
    pub fn claim(cell: Cell, player: PlayerName) -> Self {
        Self {
            cell,
            player,
            action: ClaimAction::Claim,
        }
    }

    pub fn release(cell: Cell, player: PlayerName) -> Self {
        Self {
            cell,
            player,
            action: ClaimAction::Release,
        }
    }

    /// Occupant the cell must hold for the change to apply.
    pub fn expected_occupant(&self) -> Option<&PlayerName> {
        match self.action {
            ClaimAction::Claim => None,
            ClaimAction::Release => Some(&self.player),
        }
    }

    pub fn next_occupant(&self) -> Option<&PlayerName> {
        match self.action {
            ClaimAction::Claim => Some(&self.player),
            ClaimAction::Release => None,
        }
    }

    pub fn apply_to(&self, game: &mut Game) -> Result<(), BoardError> {
        let current = game.grid.occupant(self.cell);
        if current != self.expected_occupant() {
            return Err(BoardError::Conflict {
                cell: self.cell,
                occupant: current.cloned(),
            });
        }
        game.grid.set(self.cell, self.next_occupant().cloned());
        Ok(())
    }
}

/// Decides whether clicking `cell` claims or releases it for `player`.
pub fn plan_toggle(
    game: &Game,
    cell: Cell,
    player: PlayerName,
) -> Result<ClaimChange, BoardError> {
    match game.grid.occupant(cell) {
        None => Ok(ClaimChange::claim(cell, player)),
        Some(occupant) if *occupant == player => Ok(ClaimChange::release(cell, player)),
        Some(occupant) => Err(BoardError::Conflict {
            cell,
            occupant: Some(occupant.clone()),
        }),
    }
}

pub fn toggle_claim(
    game: &Game,
    row: u32,
    col: u32,
    player: &str,
) -> Result<Game, BoardError> {
    let player = PlayerName::parse(player)?;
    let cell = Cell::new(row, col)?;
    let change = plan_toggle(game, cell, player)?;
    let mut next = game.clone();
    change.apply_to(&mut next)?;
    Ok(next)
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]
    use super::*;
    use crate::error::ValidationError;
    use chrono::Utc;

    fn cell(row: u32, col: u32) -> Cell {
        Cell::new(row, col).unwrap()
    }

    fn player(name: &str) -> PlayerName {
        PlayerName::parse(name).unwrap()
    }

    #[test]
    fn toggle_claim__unclaimed_cell__assigns_player() {
        // given
        let game = Game::new(Utc::now());

        // when
        let next = toggle_claim(&game, 2, 3, "Alice").unwrap();

        // then
        assert_eq!(next.grid.occupant(cell(2, 3)), Some(&player("Alice")));
        assert_eq!(next.grid.claimed_count(), 1);
    }

    #[test]
    fn toggle_claim__own_cell__releases_it_and_restores_grid() {
        // given
        let mut game = Game::new(Utc::now());
        game = toggle_claim(&game, 0, 0, "Bob").unwrap();
        let before = game.grid.clone();

        // when
        let claimed = toggle_claim(&game, 5, 5, "Alice").unwrap();
        let released = toggle_claim(&claimed, 5, 5, "Alice").unwrap();

        // then
        assert_eq!(released.grid, before);
    }

    #[test]
    fn toggle_claim__cell_held_by_other_player__conflicts_without_mutation() {
        // given
        let game = toggle_claim(&Game::new(Utc::now()), 2, 3, "Alice").unwrap();

        // when
        let result = toggle_claim(&game, 2, 3, "Bob");

        // then
        assert_eq!(
            result,
            Err(BoardError::Conflict {
                cell: cell(2, 3),
                occupant: Some(player("Alice")),
            })
        );
        assert_eq!(game.grid.occupant(cell(2, 3)), Some(&player("Alice")));
    }

    #[test]
    fn toggle_claim__blank_player_name__is_a_validation_error() {
        let game = Game::new(Utc::now());
        let result = toggle_claim(&game, 1, 1, "   ");
        assert_eq!(
            result,
            Err(BoardError::Validation(ValidationError::MissingPlayerName))
        );
    }

    #[test]
    fn toggle_claim__cell_out_of_range__is_a_validation_error() {
        let game = Game::new(Utc::now());
        let result = toggle_claim(&game, 10, 1, "Alice");
        assert_eq!(
            result,
            Err(BoardError::Validation(ValidationError::CellOutOfRange {
                row: 10,
                col: 1
            }))
        );
    }

    #[test]
    fn apply_to__stale_claim__reports_current_occupant() {
        // given
        let mut game = Game::new(Utc::now());
        let alice = ClaimChange::claim(cell(4, 4), player("Alice"));
        let bob = ClaimChange::claim(cell(4, 4), player("Bob"));
        alice.apply_to(&mut game).unwrap();

        // when
        let result = bob.apply_to(&mut game);

        // then
        assert_eq!(
            result,
            Err(BoardError::Conflict {
                cell: cell(4, 4),
                occupant: Some(player("Alice")),
            })
        );
        assert_eq!(game.grid.occupant(cell(4, 4)), Some(&player("Alice")));
    }

    #[test]
    fn apply_to__release_of_cell_already_vacated__conflicts() {
        // given
        let mut game = Game::new(Utc::now());
        let release = ClaimChange::release(cell(1, 2), player("Alice"));

        // when
        let result = release.apply_to(&mut game);

        // then
        assert_eq!(
            result,
            Err(BoardError::Conflict {
                cell: cell(1, 2),
                occupant: None,
            })
        );
    }

    #[test]
    fn toggle_claim__one_player_may_hold_many_cells() {
        let mut game = Game::new(Utc::now());
        for col in 0..10 {
            game = toggle_claim(&game, 7, col, "Carol").unwrap();
        }
        assert_eq!(game.grid.claimed_count(), 10);
    }
}
