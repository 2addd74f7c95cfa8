//! One participant's handle on a shared game.
//!
//! The client keeps a cached copy of the game for validation and display.
//! Writes go to the store first and the cache only ever takes what the store
//! confirmed, either as the result of a write or as a newer snapshot.

use crate::{
    BoardError,
    Cell,
    FieldUpdate,
    Game,
    GameId,
    Mutation,
    PlayerName,
    Quarter,
    Side,
    ValidationError,
    app::game_store::{
        GameStore,
        WriteOutcome,
    },
    board::{
        Digits,
        parse_score_input,
    },
    claim::{
        ClaimAction,
        plan_toggle,
    },
    config::{
        ClientPolicy,
        SquaresConfig,
    },
    randomize::{
        RandomizeConfirmation,
        prepare_randomization,
    },
    view::BoardView,
};
use chrono::{
    DateTime,
    Utc,
};
use rand::Rng;
use rust_decimal::Decimal;
use std::{
    fmt,
    str::FromStr,
};

#[derive(Debug)]
pub enum ClientError {
    Board(BoardError),
    GameNotFound(GameId),
    GameExists(GameId),
    Store(anyhow::Error),
}

impl ClientError {
    pub fn board_error(&self) -> Option<&BoardError> {
        match self {
            ClientError::Board(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Board(err) => err.fmt(f),
            ClientError::GameNotFound(game_id) => write!(f, "game {game_id} not found"),
            ClientError::GameExists(game_id) => write!(f, "game {game_id} already exists"),
            ClientError::Store(err) => write!(f, "store error: {err:#}"),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Board(err) => Some(err),
            ClientError::Store(err) => Some(&**err),
            ClientError::GameNotFound(_) | ClientError::GameExists(_) => None,
        }
    }
}

impl From<BoardError> for ClientError {
    fn from(err: BoardError) -> Self {
        ClientError::Board(err)
    }
}

impl From<ValidationError> for ClientError {
    fn from(err: ValidationError) -> Self {
        ClientError::Board(err.into())
    }
}

impl From<anyhow::Error> for ClientError {
    fn from(err: anyhow::Error) -> Self {
        ClientError::Store(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RandomizeOutcome {
    Applied(Digits),
    /// The participant backed out at the empty-squares warning.
    Declined { empty: usize },
}

/// Parses a price typed by a user. Must be a positive amount.
pub fn parse_price(input: &str) -> Result<Decimal, ValidationError> {
    let invalid = || ValidationError::InvalidPrice {
        input: input.to_string(),
    };
    let price = Decimal::from_str(input.trim()).map_err(|_| invalid())?;
    if price <= Decimal::ZERO {
        return Err(invalid());
    }
    Ok(price)
}

pub struct BoardClient<S> {
    game_id: GameId,
    store: S,
    cache: Game,
    policy: ClientPolicy,
}

impl<S: GameStore> BoardClient<S> {
    pub fn open(store: S, game_id: GameId, policy: ClientPolicy) -> Result<Self, ClientError> {
        let cache = store
            .load_game(&game_id)?
            .ok_or_else(|| ClientError::GameNotFound(game_id.clone()))?;
        Ok(Self {
            game_id,
            store,
            cache,
            policy,
        })
    }

    /// Writes a fresh game seeded from `config` and opens it. Fails with
    /// `GameExists` rather than replacing a stored game.
    pub fn create(
        mut store: S,
        game_id: GameId,
        config: &SquaresConfig,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ClientError> {
        let game = Game {
            home_team_name: config.default_home_team.clone(),
            away_team_name: config.default_away_team.clone(),
            price_per_square: config.default_price_per_square,
            ..Game::new(created_at)
        };
        let cache = store
            .create_document(&game_id, &game)?
            .ok_or_else(|| ClientError::GameExists(game_id.clone()))?;
        tracing::info!("created game {game_id}");
        Ok(Self {
            game_id,
            store,
            cache,
            policy: config.policy(),
        })
    }

    pub fn game_id(&self) -> &GameId {
        &self.game_id
    }

    pub fn game(&self) -> &Game {
        &self.cache
    }

    pub fn view(&self) -> BoardView {
        BoardView::of(&self.cache)
    }

    pub fn policy(&self) -> ClientPolicy {
        self.policy
    }

    pub fn subscribe(&self) -> Result<S::Subscription, ClientError> {
        Ok(self.store.subscribe(&self.game_id)?)
    }

    /// Replaces the cache when `game` is newer. Returns whether it was taken.
    pub fn apply_snapshot(&mut self, game: Game) -> bool {
        if game.revision <= self.cache.revision {
            tracing::debug!(
                "ignoring snapshot at revision {} for game {}, have {}",
                game.revision,
                self.game_id,
                self.cache.revision
            );
            return false;
        }
        self.cache = game;
        true
    }

    pub fn toggle_claim(
        &mut self,
        row: u32,
        col: u32,
        player: &str,
    ) -> Result<&Game, ClientError> {
        let player = PlayerName::parse(player)?;
        let cell = Cell::new(row, col)?;
        let change = plan_toggle(&self.cache, cell, player)?;
        let verb = match change.action {
            ClaimAction::Claim => "claimed",
            ClaimAction::Release => "released",
        };
        let player = change.player.clone();
        self.commit(Mutation::Cell(change))?;
        tracing::info!("{player} {verb} {cell} in game {}", self.game_id);
        Ok(&self.cache)
    }

    pub fn randomize<C, R>(
        &mut self,
        confirmation: &C,
        rng: &mut R,
    ) -> Result<RandomizeOutcome, ClientError>
    where
        C: RandomizeConfirmation + ?Sized,
        R: Rng + ?Sized,
    {
        let Some(digits) = prepare_randomization(&self.cache, confirmation, rng)? else {
            let empty = self.cache.grid.empty_count();
            tracing::info!(
                "randomization of game {} declined with {empty} empty squares",
                self.game_id
            );
            return Ok(RandomizeOutcome::Declined { empty });
        };
        self.commit(Mutation::Randomize(digits))?;
        tracing::info!("assigned numbers for game {}", self.game_id);
        Ok(RandomizeOutcome::Applied(digits))
    }

    pub fn set_score(
        &mut self,
        quarter: Quarter,
        side: Side,
        input: &str,
    ) -> Result<&Game, ClientError> {
        let value = parse_score_input(input, self.policy.max_score_input)?;
        self.write_field(FieldUpdate::Score {
            quarter,
            side,
            value,
        })
    }

    /// With `lock_price_once_claimed` the store only takes the price while the
    /// stored board has no claims.
    pub fn set_price(&mut self, input: &str) -> Result<&Game, ClientError> {
        let price = parse_price(input)?;
        if !self.policy.lock_price_once_claimed {
            return self.write_field(FieldUpdate::PricePerSquare(price));
        }
        let claimed = self.cache.grid.claimed_count();
        if claimed > 0 {
            return Err(ValidationError::PriceLocked { claimed }.into());
        }
        self.commit(Mutation::UnclaimedPrice(price))?;
        tracing::info!("updated pricePerSquare in game {}", self.game_id);
        Ok(&self.cache)
    }

    pub fn set_team_name(&mut self, side: Side, name: &str) -> Result<&Game, ClientError> {
        self.write_field(FieldUpdate::TeamName {
            side,
            name: name.trim().to_string(),
        })
    }

    pub fn set_team_names(&mut self, home: &str, away: &str) -> Result<&Game, ClientError> {
        self.set_team_name(Side::Home, home)?;
        self.set_team_name(Side::Away, away)
    }

    fn write_field(&mut self, update: FieldUpdate) -> Result<&Game, ClientError> {
        let path = update.path();
        self.commit(Mutation::Field(update))?;
        tracing::info!("updated {path} in game {}", self.game_id);
        Ok(&self.cache)
    }

    fn commit(&mut self, mutation: Mutation) -> Result<(), ClientError> {
        match self.store.apply(&self.game_id, &mutation)? {
            WriteOutcome::Applied(game) => {
                self.apply_snapshot(game);
                Ok(())
            }
            WriteOutcome::Rejected { current, reason } => {
                tracing::warn!(
                    "{} rejected for game {}: {reason}",
                    mutation.describe(),
                    self.game_id
                );
                self.apply_snapshot(current);
                Err(reason.into())
            }
            WriteOutcome::Missing => Err(ClientError::GameNotFound(self.game_id.clone())),
        }
    }
}
