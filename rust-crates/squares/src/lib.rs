pub mod app;

pub mod board;

pub mod claim;

pub mod client;

pub mod config;

pub mod document;

pub mod error;

pub mod game_id;

pub mod payout;

pub mod randomize;

pub mod routing;

pub mod view;

pub mod winner;

pub use board::{
    Cell,
    DigitPermutation,
    Digits,
    FieldUpdate,
    Game,
    Grid,
    Mutation,
    PlayerName,
    Quarter,
    QuarterScore,
    Scores,
    Side,
};
pub use error::{
    BoardError,
    ValidationError,
};
pub use game_id::{
    GameId,
    GameIdError,
};

pub type Result<T, E = anyhow::Error> = std::result::Result<T, E>;

pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
