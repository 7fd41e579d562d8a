// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::fmt;
use std::str::FromStr;

/// Traffic condition of a road segment, as set by an operator.
///
/// Every condition scales the physical length of an [EdgeRecord](crate::EdgeRecord)
/// by a fixed [multiplier](Condition::multiplier). [Condition::Blocked] removes
/// the segment from routing altogether.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    #[default]
    Normal,
    Congested,
    Flooded,
    Blocked,
}

impl Condition {
    /// All known conditions, in the order they are presented to operators.
    pub const ALL: [Condition; 4] = [
        Condition::Normal,
        Condition::Congested,
        Condition::Flooded,
        Condition::Blocked,
    ];

    /// Returns the cost multiplier of this condition,
    /// or `None` if segments with this condition can't be traversed at all.
    ///
    /// All multipliers are at least 1, which keeps the crow-flies distance
    /// an admissible A* heuristic.
    pub fn multiplier(self) -> Option<f64> {
        match self {
            Self::Normal => Some(1.0),
            Self::Congested => Some(2.0),
            Self::Flooded => Some(3.0),
            Self::Blocked => None,
        }
    }

    /// Returns `true` if segments with this condition may be traversed.
    pub fn is_passable(self) -> bool {
        self.multiplier().is_some()
    }

    /// Returns the short code under which this condition is persisted.
    pub fn code(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Congested => "traffic",
            Self::Flooded => "flood",
            Self::Blocked => "block",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Returned when a string doesn't name any [Condition].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown road condition: {0:?}")]
pub struct ParseConditionError(pub String);

impl FromStr for Condition {
    type Err = ParseConditionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "traffic" | "congested" => Ok(Self::Congested),
            "flood" | "flooded" => Ok(Self::Flooded),
            "block" | "blocked" => Ok(Self::Blocked),
            _ => Err(ParseConditionError(s.to_string())),
        }
    }
}
