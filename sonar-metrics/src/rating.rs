use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};
use thiserror::Error;

/// Letter rating shown on the quality dashboard, decoded from the numeric
/// rating values Sonar reports.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, AsRefStr, Serialize,
    Deserialize,
)]
pub enum Rating {
    A,
    B,
    C,
    D,
    E,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("rating value must be 1..=5, got {0:?}")]
pub struct ParseRatingError(pub String);

impl FromStr for Rating {
    type Err = ParseRatingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "1" => Ok(Rating::A),
            "2" => Ok(Rating::B),
            "3" => Ok(Rating::C),
            "4" => Ok(Rating::D),
            "5" => Ok(Rating::E),
            other => Err(ParseRatingError(other.to_string())),
        }
    }
}

impl Rating {
    /// Numeric form used on the wire.
    pub fn as_number(self) -> u8 {
        match self {
            Rating::A => 1,
            Rating::B => 2,
            Rating::C => 3,
            Rating::D => 4,
            Rating::E => 5,
        }
    }
}
