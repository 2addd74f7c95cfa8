use crate::{
    board::{
        digits::Digits,
        game::Game,
        score::{
            Quarter,
            Side,
        },
    },
    claim::ClaimChange,
    error::{
        BoardError,
        ValidationError,
    },
    randomize,
};
use rust_decimal::Decimal;

/// A last-writer-wins write of a single document field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    TeamName {
        side: Side,
        name: String,
    },
    PricePerSquare(Decimal),
    Score {
        quarter: Quarter,
        side: Side,
        value: Option<u32>,
    },
}

impl FieldUpdate {
    /// Path of the field inside the stored document.
    pub fn path(&self) -> String {
        match self {
            FieldUpdate::TeamName {
                side: Side::Home, ..
            } => "homeTeamName".to_string(),
            FieldUpdate::TeamName {
                side: Side::Away, ..
            } => "awayTeamName".to_string(),
            FieldUpdate::PricePerSquare(_) => "pricePerSquare".to_string(),
            FieldUpdate::Score { quarter, side, .. } => {
                format!("scores/{}/{}", quarter.key(), side.key())
            }
        }
    }

    pub fn apply_to(&self, game: &mut Game) -> Result<(), BoardError> {
        match self {
            FieldUpdate::TeamName { side, name } => match side {
                Side::Home => game.home_team_name = name.clone(),
                Side::Away => game.away_team_name = name.clone(),
            },
            FieldUpdate::PricePerSquare(price) => {
                if *price <= Decimal::ZERO {
                    return Err(ValidationError::InvalidPrice {
                        input: price.to_string(),
                    }
                    .into());
                }
                game.price_per_square = *price;
            }
            FieldUpdate::Score {
                quarter,
                side,
                value,
            } => game.scores.get_mut(*quarter).set_side(*side, *value),
        }
        Ok(())
    }
}

/// The unit a store commits atomically against its latest copy of a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Field(FieldUpdate),
    /// Conditioned on the cell still holding the observed occupant.
    Cell(ClaimChange),
    /// Conditioned on the game not being randomized yet.
    Randomize(Digits),
    /// Price write conditioned on no square being claimed yet.
    UnclaimedPrice(Decimal),
}

impl Mutation {
    /// Applies the mutation or fails without touching `game`.
    pub fn apply_to(&self, game: &mut Game) -> Result<(), BoardError> {
        match self {
            Mutation::Field(update) => update.apply_to(game),
            Mutation::Cell(change) => change.apply_to(game),
            Mutation::Randomize(digits) => randomize::commit_digits(game, *digits),
            Mutation::UnclaimedPrice(price) => {
                let claimed = game.grid.claimed_count();
                if claimed > 0 {
                    return Err(ValidationError::PriceLocked { claimed }.into());
                }
                FieldUpdate::PricePerSquare(*price).apply_to(game)
            }
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Mutation::Field(update) => update.path(),
            Mutation::Cell(change) => format!("grid/{}", change.cell.key()),
            Mutation::Randomize(_) => "homeDigits+awayDigits+isRandomized".to_string(),
            Mutation::UnclaimedPrice(_) => "pricePerSquare".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]
    use super::*;
    use chrono::Utc;

    #[test]
    fn path__names_the_document_field() {
        let update = FieldUpdate::Score {
            quarter: Quarter::Q2,
            side: Side::Away,
            value: Some(3),
        };
        assert_eq!(update.path(), "scores/q2/away");
        assert_eq!(
            FieldUpdate::PricePerSquare(Decimal::ONE).path(),
            "pricePerSquare"
        );
    }

    #[test]
    fn apply_to__score_update__only_touches_that_side() {
        // given
        let mut game = Game::new(Utc::now());
        game.scores.get_mut(Quarter::Q1).home = Some(14);
        let update = FieldUpdate::Score {
            quarter: Quarter::Q1,
            side: Side::Away,
            value: Some(10),
        };

        // when
        update.apply_to(&mut game).unwrap();

        // then
        assert_eq!(game.scores.get(Quarter::Q1).entered(), Some((14, 10)));
    }

    #[test]
    fn apply_to__unclaimed_price_on_claimed_board__is_refused() {
        // given
        let mut game = crate::claim::toggle_claim(&Game::new(Utc::now()), 6, 1, "Dana").unwrap();
        let mutation = Mutation::UnclaimedPrice(Decimal::from(50));

        // when
        let result = mutation.apply_to(&mut game);

        // then
        assert_eq!(
            result,
            Err(BoardError::Validation(ValidationError::PriceLocked { claimed: 1 }))
        );
        assert_eq!(game.price_per_square, Decimal::from(5));
        let mut empty = Game::new(Utc::now());
        mutation.apply_to(&mut empty).unwrap();
        assert_eq!(empty.price_per_square, Decimal::from(50));
    }

    #[test]
    fn apply_to__non_positive_price__is_rejected_and_price_kept() {
        // given
        let mut game = Game::new(Utc::now());
        let before = game.price_per_square;

        // when
        let result = FieldUpdate::PricePerSquare(Decimal::ZERO).apply_to(&mut game);

        // then
        assert!(matches!(
            result,
            Err(BoardError::Validation(ValidationError::InvalidPrice { .. }))
        ));
        assert_eq!(game.price_per_square, before);
    }
}
