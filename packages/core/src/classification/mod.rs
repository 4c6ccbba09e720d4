//! Honours Classification Module
//!
//! Forecasts an honours class from level 2 and level 3 modules using the
//! weighted grade point score test, the quality assurance test and the
//! "lower of two" rule.

pub mod engine;
pub mod eligibility;
pub mod error;
pub mod qa;
pub mod thresholds;
pub mod types;
pub mod weighting;


pub use engine::{classify, classify_detailed, ClassificationBreakdown};
pub use eligibility::{forecast, CreditBreakdown, Eligibility, Forecast};
pub use error::ModuleError;
pub use types::*;
