use crate::error::ValidationError;
use std::{
    fmt,
    str::FromStr,
};

pub const GRID_SIZE: u8 = 10;
pub const CELL_COUNT: usize = GRID_SIZE as usize * GRID_SIZE as usize;

/// One of the 100 squares. Rows carry the away digits, columns the home digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cell {
    row: u8,
    col: u8,
}

impl Cell {
    pub fn new(row: u32, col: u32) -> Result<Self, ValidationError> {
        if row >= GRID_SIZE as u32 || col >= GRID_SIZE as u32 {
            return Err(ValidationError::CellOutOfRange { row, col });
        }
        Ok(Self {
            row: row as u8,
            col: col as u8,
        })
    }

    pub fn row(&self) -> usize {
        self.row as usize
    }

    pub fn col(&self) -> usize {
        self.col as usize
    }

    /// Store key, `"<row>-<col>"`.
    pub fn key(&self) -> String {
        format!("{}-{}", self.row, self.col)
    }

    /// Only the canonical form is accepted, so each cell has exactly one key.
    pub fn parse_key(key: &str) -> Result<Self, ValidationError> {
        let malformed = || ValidationError::MalformedCellKey {
            key: key.to_string(),
        };
        let (row, col) = key.split_once('-').ok_or_else(malformed)?;
        let row = row.parse::<u32>().map_err(|_| malformed())?;
        let col = col.parse::<u32>().map_err(|_| malformed())?;
        let cell = Self::new(row, col)?;
        if cell.key() != key {
            return Err(malformed());
        }
        Ok(cell)
    }

    /// Row-major walk over the whole board.
    pub fn all() -> impl Iterator<Item = Cell> {
        (0..GRID_SIZE).flat_map(|row| (0..GRID_SIZE).map(move |col| Cell { row, col }))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl FromStr for Cell {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse_key(value)
    }
}
