//! Diet level: the strictness class of a patient's nutritional plan.

use serde::{Deserialize, Serialize};

/// Integer diet level in `1..=5`. Wire format is the bare integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub struct DietLevel(u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("diet level must be between {min} and {max}, got {0}", min = DietLevel::MIN, max = DietLevel::MAX)]
pub struct InvalidDietLevel(pub i64);

impl DietLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(level: i64) -> Result<Self, InvalidDietLevel> {
        if (Self::MIN as i64..=Self::MAX as i64).contains(&level) {
            Ok(Self(level as u8))
        } else {
            Err(InvalidDietLevel(level))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = DietLevel> {
        (Self::MIN..=Self::MAX).map(DietLevel)
    }
}

impl TryFrom<i16> for DietLevel {
    type Error = InvalidDietLevel;

    fn try_from(v: i16) -> Result<Self, Self::Error> {
        Self::new(v as i64)
    }
}

impl From<DietLevel> for i16 {
    fn from(level: DietLevel) -> Self {
        level.0 as i16
    }
}
