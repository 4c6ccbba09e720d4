//! Core data types for honours classification

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::classification::error::ModuleError;

/// Study level of a module. Only levels 2 and 3 count towards the class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Level {
    Two,
    Three,
}

impl TryFrom<u8> for Level {
    type Error = ModuleError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(Level::Two),
            3 => Ok(Level::Three),
            other => Err(ModuleError::InvalidLevel { level: other.into() }),
        }
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        match level {
            Level::Two => 2,
            Level::Three => 3,
        }
    }
}

/// Module result on the inverted 1..4 scale: `One` is the best (distinction),
/// `Four` the worst passing grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Grade {
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
}

impl Grade {
    /// Numeric weight used in every score; lower is better.
    pub fn points(self) -> u32 {
        self as u32
    }

    pub fn label(self) -> &'static str {
        match self {
            Grade::One => "Distinction",
            Grade::Two => "Pass 2",
            Grade::Three => "Pass 3",
            Grade::Four => "Pass 4",
        }
    }
}

impl TryFrom<u8> for Grade {
    type Error = ModuleError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Grade::One),
            2 => Ok(Grade::Two),
            3 => Ok(Grade::Three),
            4 => Ok(Grade::Four),
            other => Err(ModuleError::InvalidGrade { grade: other.into() }),
        }
    }
}

impl From<Grade> for u8 {
    fn from(grade: Grade) -> Self {
        grade as u8
    }
}

/// A single assessed module as seen by the engine. Identity is irrelevant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub level: Level,
    pub credits: u32,
    pub grade: Grade,
}

impl Module {
    pub fn new(level: Level, credits: u32, grade: Grade) -> Self {
        Self {
            level,
            credits,
            grade,
        }
    }
}

/// Honours class, ordered best to worst so that `max` picks the worse of two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Classification {
    #[serde(rename = "1st")]
    First,
    #[serde(rename = "2:1")]
    UpperSecond,
    #[serde(rename = "2:2")]
    LowerSecond,
    #[serde(rename = "3rd")]
    Third,
    #[serde(rename = "Fail")]
    Fail,
}

impl Classification {
    pub const ALL: [Classification; 5] = [
        Classification::First,
        Classification::UpperSecond,
        Classification::LowerSecond,
        Classification::Third,
        Classification::Fail,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Classification::First => "1st",
            Classification::UpperSecond => "2:1",
            Classification::LowerSecond => "2:2",
            Classification::Third => "3rd",
            Classification::Fail => "Fail",
        }
    }

    /// The "lower of two" rule: the worse class wins.
    pub fn lower_of(self, other: Classification) -> Classification {
        self.max(other)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable output of one engine run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Weighted grade point score; lower is better.
    pub weighted_score: u64,
    /// Quality assurance score over the best level 3 credits; lower is better.
    pub qa_score: u64,
    pub weighted_class: Classification,
    pub qa_class: Classification,
    pub classification: Classification,
    /// Credit row of the threshold tables that was applied.
    pub threshold_credits: u32,
}

/// A slice of one module's credits assigned to a scoring bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditPortion {
    /// Position of the contributing module in the engine input.
    pub module_index: usize,
    pub credits: u32,
    pub grade: Grade,
}

impl CreditPortion {
    pub fn points(&self) -> u64 {
        u64::from(self.credits) * u64::from(self.grade.points())
    }
}
