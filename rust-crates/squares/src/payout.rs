//! Pot and quarterly payout math. Amounts are exact decimals so repeated
//! recomputation never drifts.

use crate::{
    board::{
        Game,
        PlayerName,
        Quarter,
    },
    winner::{
        QuarterOutcome,
        resolve_all,
    },
};
use rust_decimal::{
    Decimal,
    RoundingStrategy,
};
use std::collections::BTreeMap;

pub type Money = Decimal;

/// Fraction of the pot paid for a quarter: 20% each for Q1-Q3, 40% for the final.
pub fn payout_share(quarter: Quarter) -> Decimal {
    match quarter {
        Quarter::Q1 | Quarter::Q2 | Quarter::Q3 => Decimal::new(20, 2),
        Quarter::Q4 => Decimal::new(40, 2),
    }
}

pub fn compute_pot(game: &Game) -> Money {
    Decimal::from(game.grid.claimed_count()) * game.price_per_square
}

/// Amount at stake for a quarter, whether or not it has been decided.
pub fn compute_payout(game: &Game, quarter: Quarter) -> Money {
    compute_pot(game) * payout_share(quarter)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerStats {
    pub squares: usize,
    pub owed: Money,
}

pub fn player_stats(game: &Game) -> BTreeMap<PlayerName, PlayerStats> {
    let mut counts: BTreeMap<PlayerName, usize> = BTreeMap::new();
    for (_, player) in game.grid.iter() {
        *counts.entry(player.clone()).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(player, squares)| {
            let owed = Decimal::from(squares) * game.price_per_square;
            (player, PlayerStats { squares, owed })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuarterPayout {
    pub quarter: Quarter,
    pub outcome: QuarterOutcome,
    pub amount: Money,
}

pub fn quarter_payouts(game: &Game) -> [QuarterPayout; 4] {
    let pot = compute_pot(game);
    resolve_all(game).map(|(quarter, outcome)| QuarterPayout {
        quarter,
        outcome,
        amount: pot * payout_share(quarter),
    })
}

/// Total decided payouts per winning player.
pub fn winnings_by_player(game: &Game) -> BTreeMap<PlayerName, Money> {
    let mut winnings: BTreeMap<PlayerName, Money> = BTreeMap::new();
    for payout in quarter_payouts(game) {
        if let Some(player) = payout.outcome.winner() {
            *winnings.entry(player.clone()).or_default() += payout.amount;
        }
    }
    winnings
}

pub fn format_money(amount: Money) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}")
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]
    use super::*;
    use crate::{
        board::{
            Cell,
            DigitPermutation,
            Digits,
            FieldUpdate,
            QuarterScore,
            Side,
        },
        claim::toggle_claim,
    };
    use chrono::Utc;
    use std::str::FromStr;

    fn claim_many(mut game: Game, player: &str, cells: impl Iterator<Item = Cell>) -> Game {
        for cell in cells {
            game = toggle_claim(&game, cell.row() as u32, cell.col() as u32, player).unwrap();
        }
        game
    }

    #[test]
    fn payout_share__sums_to_one() {
        let total: Decimal = Quarter::ALL.into_iter().map(payout_share).sum();
        assert_eq!(total, Decimal::ONE);
    }

    #[test]
    fn compute_pot__empty_grid__is_zero() {
        let game = Game::new(Utc::now());
        assert_eq!(compute_pot(&game), Decimal::ZERO);
        assert_eq!(compute_payout(&game, Quarter::Q4), Decimal::ZERO);
    }

    #[test]
    fn compute_pot__four_players_with_five_squares_each_at_five__is_100() {
        // given
        let mut game = Game::new(Utc::now());
        let mut cells = Cell::all();
        for player in ["Alice", "Bob", "Carol", "Dave"] {
            game = claim_many(game, player, cells.by_ref().take(5));
        }

        // when
        let pot = compute_pot(&game);

        // then
        assert_eq!(pot, Decimal::from(100));
        assert_eq!(format_money(compute_payout(&game, Quarter::Q1)), "20.00");
        assert_eq!(format_money(compute_payout(&game, Quarter::Q4)), "40.00");
    }

    #[test]
    fn compute_pot__scales_linearly_with_price() {
        // given
        let mut game = claim_many(Game::new(Utc::now()), "Erin", Cell::all().take(13));
        let base = compute_pot(&game);

        // when
        FieldUpdate::PricePerSquare(Decimal::from(15))
            .apply_to(&mut game)
            .unwrap();

        // then
        assert_eq!(compute_pot(&game), base * Decimal::from(3));
    }

    #[test]
    fn player_stats__counts_squares_and_amount_owed() {
        // given
        let mut game = claim_many(Game::new(Utc::now()), "Alice", Cell::all().take(3));
        game = claim_many(game, "Bob", Cell::all().skip(3).take(1));
        FieldUpdate::PricePerSquare(Decimal::from_str("2.50").unwrap())
            .apply_to(&mut game)
            .unwrap();

        // when
        let stats = player_stats(&game);

        // then
        let alice = &stats[&PlayerName::parse("Alice").unwrap()];
        let bob = &stats[&PlayerName::parse("Bob").unwrap()];
        assert_eq!(alice.squares, 3);
        assert_eq!(alice.owed, Decimal::from_str("7.50").unwrap());
        assert_eq!(bob.squares, 1);
        assert_eq!(bob.owed, Decimal::from_str("2.50").unwrap());
    }

    #[test]
    fn quarter_payouts__stay_consistent_across_many_score_updates() {
        // given
        let mut game = claim_many(Game::new(Utc::now()), "Frank", Cell::all().take(37));
        FieldUpdate::PricePerSquare(Decimal::from_str("2.35").unwrap())
            .apply_to(&mut game)
            .unwrap();
        game.digits = Some(Digits {
            home: DigitPermutation::identity(),
            away: DigitPermutation::identity(),
        });
        let pot = compute_pot(&game);

        // when
        for step in 0..1_000u32 {
            let quarter = Quarter::ALL[(step % 4) as usize];
            let side = if step % 2 == 0 { Side::Home } else { Side::Away };
            FieldUpdate::Score {
                quarter,
                side,
                value: Some(step % 60),
            }
            .apply_to(&mut game)
            .unwrap();

            // then
            let payouts = quarter_payouts(&game);
            let total: Decimal = payouts.iter().map(|payout| payout.amount).sum();
            assert_eq!(total, pot);
            assert_eq!(compute_pot(&game), pot);
        }
        assert_eq!(format_money(pot), "86.95");
    }

    #[test]
    fn winnings_by_player__sums_quarters_won() {
        // given
        let mut game = claim_many(Game::new(Utc::now()), "Gina", Cell::all().take(10));
        game.digits = Some(Digits {
            home: DigitPermutation::identity(),
            away: DigitPermutation::identity(),
        });
        // row 0 is Gina's: any away score ending in 0 wins for her
        *game.scores.get_mut(Quarter::Q1) = QuarterScore::new(3, 10);
        *game.scores.get_mut(Quarter::Q4) = QuarterScore::new(27, 20);
        *game.scores.get_mut(Quarter::Q2) = QuarterScore::new(3, 7);

        // when
        let winnings = winnings_by_player(&game);

        // then
        let gina = PlayerName::parse("Gina").unwrap();
        assert_eq!(winnings.len(), 1);
        assert_eq!(winnings[&gina], Decimal::from(30));
    }

    #[test]
    fn format_money__rounds_half_away_from_zero() {
        assert_eq!(format_money(Decimal::from_str("1.005").unwrap()), "1.01");
        assert_eq!(format_money(Decimal::from(7)), "7.00");
    }
}
