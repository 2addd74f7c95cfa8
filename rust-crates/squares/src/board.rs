//! Board state: the shared document every participant converges on.

mod cell;
mod digits;
mod game;
mod score;
mod update;

pub use cell::{
    CELL_COUNT,
    Cell,
    GRID_SIZE,
};
pub use digits::{
    DigitPermutation,
    Digits,
};
pub use game::{
    DEFAULT_AWAY_TEAM,
    DEFAULT_HOME_TEAM,
    DEFAULT_PRICE_PER_SQUARE,
    Game,
    Grid,
    PlayerName,
};
pub use score::{
    Quarter,
    QuarterScore,
    Scores,
    Side,
    parse_score_input,
};
pub use update::{
    FieldUpdate,
    Mutation,
};
