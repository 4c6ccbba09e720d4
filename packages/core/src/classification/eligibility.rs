//! Credit breakdown and the precondition gating the engine.
//!
//! A forecast is only produced when the counted credits total between 120
//! and 240 and both levels are represented. Otherwise the engine is not run
//! at all and the caller gets guidance on what is missing.

use serde::{Deserialize, Serialize};

use crate::classification::{
    engine::classify,
    types::{CalculationResult, Level, Module},
};

pub const MIN_TOTAL_CREDITS: u32 = 120;
pub const MAX_TOTAL_CREDITS: u32 = 240;

/// Credits per counted level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditBreakdown {
    pub level2: u32,
    pub level3: u32,
    pub total: u32,
}

impl CreditBreakdown {
    pub fn from_modules<'a>(modules: impl IntoIterator<Item = &'a Module>) -> Self {
        let mut breakdown = Self::default();
        for module in modules {
            match module.level {
                Level::Two => breakdown.level2 = breakdown.level2.saturating_add(module.credits),
                Level::Three => breakdown.level3 = breakdown.level3.saturating_add(module.credits),
            }
        }
        // Saturated totals still land far above the maximum.
        breakdown.total = breakdown.level2.saturating_add(breakdown.level3);
        breakdown
    }

    pub fn eligibility(&self) -> Eligibility {
        if self.total == 0 {
            Eligibility::NoModules
        } else if self.level2 == 0 {
            Eligibility::MissingLevel2
        } else if self.level3 == 0 {
            Eligibility::MissingLevel3
        } else if self.total < MIN_TOTAL_CREDITS {
            Eligibility::BelowMinimum {
                shortfall: MIN_TOTAL_CREDITS - self.total,
            }
        } else if self.total > MAX_TOTAL_CREDITS {
            Eligibility::AboveMaximum {
                excess: self.total - MAX_TOTAL_CREDITS,
            }
        } else {
            Eligibility::Eligible
        }
    }
}

/// Whether a credit mix may be classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Eligibility {
    Eligible,
    NoModules,
    MissingLevel2,
    MissingLevel3,
    BelowMinimum { shortfall: u32 },
    AboveMaximum { excess: u32 },
}

impl Eligibility {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Eligibility::Eligible)
    }

    /// Guidance for the student; `None` when eligible.
    pub fn message(&self, credits: &CreditBreakdown) -> Option<String> {
        let CreditBreakdown {
            level2,
            level3,
            total,
        } = *credits;
        match self {
            Eligibility::Eligible => None,
            Eligibility::NoModules => Some(
                "Start by adding your Level 2 and Level 3 modules to see your forecasted classification."
                    .to_string(),
            ),
            Eligibility::MissingLevel2 => Some(format!(
                "You have {level3} Level 3 credits. Add Level 2 modules to see your forecast."
            )),
            Eligibility::MissingLevel3 => Some(format!(
                "You have {level2} Level 2 credits. Add Level 3 modules to see your forecast."
            )),
            Eligibility::BelowMinimum { shortfall } => Some(format!(
                "You have {total} credits (L2: {level2}, L3: {level3}). Add at least {shortfall} more credits to see your forecast."
            )),
            Eligibility::AboveMaximum { .. } => Some(format!(
                "You have {total} credits, which exceeds the maximum of {MAX_TOTAL_CREDITS}. Please review your modules."
            )),
        }
    }
}

/// Caller-side view: credit breakdown plus a result when eligible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Forecast {
    pub credits: CreditBreakdown,
    pub eligibility: Eligibility,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub result: Option<CalculationResult>,
}

impl Forecast {
    pub fn is_available(&self) -> bool {
        self.result.is_some()
    }
}

/// Check the precondition and only run the engine when it holds.
pub fn forecast(modules: &[Module]) -> Forecast {
    let credits = CreditBreakdown::from_modules(modules);
    let eligibility = credits.eligibility();
    let message = eligibility.message(&credits);

    let result = if eligibility.is_eligible() {
        Some(classify(modules))
    } else {
        tracing::debug!(?eligibility, total = credits.total, "forecast suppressed");
        None
    };

    Forecast {
        credits,
        eligibility,
        message,
        result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::types::Grade;

    fn breakdown(level2: u32, level3: u32) -> CreditBreakdown {
        CreditBreakdown {
            level2,
            level3,
            total: level2 + level3,
        }
    }

    #[test]
    fn breakdown_sums_per_level() {
        let modules = [
            Module::new(Level::Two, 60, Grade::One),
            Module::new(Level::Three, 30, Grade::Two),
            Module::new(Level::Three, 60, Grade::Four),
        ];
        assert_eq!(CreditBreakdown::from_modules(&modules), breakdown(60, 90));
    }

    #[test]
    fn eligibility_states() {
        assert_eq!(breakdown(0, 0).eligibility(), Eligibility::NoModules);
        assert_eq!(breakdown(0, 150).eligibility(), Eligibility::MissingLevel2);
        assert_eq!(breakdown(150, 0).eligibility(), Eligibility::MissingLevel3);
        assert_eq!(
            breakdown(30, 60).eligibility(),
            Eligibility::BelowMinimum { shortfall: 30 }
        );
        assert_eq!(
            breakdown(150, 120).eligibility(),
            Eligibility::AboveMaximum { excess: 30 }
        );
        assert_eq!(breakdown(60, 60).eligibility(), Eligibility::Eligible);
        assert_eq!(breakdown(120, 120).eligibility(), Eligibility::Eligible);
    }

    #[test]
    fn messages_mention_the_missing_piece() {
        let credits = breakdown(0, 90);
        let msg = Eligibility::MissingLevel2.message(&credits).unwrap();
        assert!(msg.contains("90 Level 3 credits"));

        let credits = breakdown(30, 60);
        let msg = credits.eligibility().message(&credits).unwrap();
        assert!(msg.contains("at least 30 more"));

        assert!(Eligibility::Eligible.message(&breakdown(60, 60)).is_none());
    }

    #[test]
    fn ineligible_forecast_carries_no_result() {
        let modules = [
            Module::new(Level::Three, 60, Grade::One),
            Module::new(Level::Three, 60, Grade::One),
            Module::new(Level::Three, 30, Grade::Two),
        ];
        let forecast = forecast(&modules);
        assert_eq!(forecast.eligibility, Eligibility::MissingLevel2);
        assert!(!forecast.is_available());
        assert!(forecast.message.is_some());
    }

    #[test]
    fn eligibility_serializes_with_status_tag() {
        let json = serde_json::to_value(Eligibility::BelowMinimum { shortfall: 30 }).unwrap();
        assert_eq!(json["status"], "below_minimum");
        assert_eq!(json["shortfall"], 30);
    }
}
