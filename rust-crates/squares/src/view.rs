use crate::{
    board::{
        Digits,
        Game,
        Grid,
        PlayerName,
        Scores,
    },
    payout::{
        Money,
        PlayerStats,
        QuarterPayout,
        compute_pot,
        player_stats,
        quarter_payouts,
        winnings_by_player,
    },
};
use std::collections::BTreeMap;

/// Everything a screen shows, derived from one game value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    pub home_team_name: String,
    pub away_team_name: String,
    pub price_per_square: Money,
    pub grid: Grid,
    pub digits: Option<Digits>,
    pub scores: Scores,
    pub claimed: usize,
    pub empty: usize,
    pub pot: Money,
    pub payouts: [QuarterPayout; 4],
    pub players: BTreeMap<PlayerName, PlayerStats>,
    pub winnings: BTreeMap<PlayerName, Money>,
    pub revision: u64,
}

impl BoardView {
    pub fn of(game: &Game) -> Self {
        Self {
            home_team_name: game.home_team_name.clone(),
            away_team_name: game.away_team_name.clone(),
            price_per_square: game.price_per_square,
            grid: game.grid.clone(),
            digits: game.digits,
            scores: game.scores,
            claimed: game.grid.claimed_count(),
            empty: game.grid.empty_count(),
            pot: compute_pot(game),
            payouts: quarter_payouts(game),
            players: player_stats(game),
            winnings: winnings_by_player(game),
            revision: game.revision,
        }
    }

    pub fn is_randomized(&self) -> bool {
        self.digits.is_some()
    }
}
