//! Validation errors for module records

use thiserror::Error;

/// Reasons a module record is refused at the store boundary.
///
/// The engine never sees a record that failed one of these checks.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModuleError {
    #[error("Module name must not be empty")]
    EmptyName,

    #[error("Level {level} modules do not count towards classification; use level 2 or 3")]
    InvalidLevel { level: i64 },

    #[error("Credits must be a positive number, got {credits}")]
    NonPositiveCredits { credits: i64 },

    #[error("Credits value {credits} is too large")]
    CreditsOutOfRange { credits: i64 },

    #[error("Grade must be between 1 (best) and 4, got {grade}")]
    InvalidGrade { grade: i64 },

    #[error("Module {id} not found")]
    NotFound { id: i64 },
}

impl ModuleError {
    pub fn not_found(id: i64) -> Self {
        Self::NotFound { id }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
