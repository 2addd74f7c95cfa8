use crate::{
    board::cell::GRID_SIZE,
    error::ValidationError,
};
use rand::{
    Rng,
    seq::SliceRandom,
};

/// A bijection from board position (row or column index) to a score digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DigitPermutation([u8; GRID_SIZE as usize]);

impl DigitPermutation {
    pub fn new(digits: [u8; GRID_SIZE as usize]) -> Result<Self, ValidationError> {
        let mut seen = [false; GRID_SIZE as usize];
        for digit in digits {
            let slot = seen.get_mut(digit as usize);
            match slot {
                Some(seen) if !*seen => *seen = true,
                _ => {
                    return Err(ValidationError::InvalidDigits {
                        digits: digits.to_vec(),
                    });
                }
            }
        }
        Ok(Self(digits))
    }

    pub fn from_slice(digits: &[u8]) -> Result<Self, ValidationError> {
        let array: [u8; GRID_SIZE as usize] =
            digits
                .try_into()
                .map_err(|_| ValidationError::InvalidDigits {
                    digits: digits.to_vec(),
                })?;
        Self::new(array)
    }

    /// The identity assignment, position `i` carries digit `i`.
    pub fn identity() -> Self {
        Self([0, 1, 2, 3, 4, 5, 6, 7, 8, 9])
    }

    /// Uniformly random assignment (Fisher-Yates over the identity).
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut digits = Self::identity().0;
        digits.shuffle(rng);
        Self(digits)
    }

    pub fn digit_at(&self, index: usize) -> Option<u8> {
        self.0.get(index).copied()
    }

    /// Index holding `digit`. Always `Some` for `digit < 10`.
    pub fn position_of(&self, digit: u8) -> Option<usize> {
        self.0.iter().position(|d| *d == digit)
    }

    pub fn as_array(&self) -> &[u8; GRID_SIZE as usize] {
        &self.0
    }
}

/// Both axes' assignments. They only ever exist together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digits {
    /// Indexed by column.
    pub home: DigitPermutation,
    /// Indexed by row.
    pub away: DigitPermutation,
}
