//! Quality assurance selection over the best level 3 credits

use crate::classification::types::{CreditPortion, Module};

/// Best level 3 credits up to the quota, with their grades.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QaSelection {
    pub quota: u32,
    pub portions: Vec<CreditPortion>,
}

impl QaSelection {
    /// Walk `ranked_level3` (best grade first) until `quota` credits are taken.
    ///
    /// Runs independently of the weighting pass, so a module may feed both.
    pub fn select(ranked_level3: &[(usize, Module)], quota: u32) -> Self {
        let mut portions = Vec::new();
        let mut taken = 0;

        for &(module_index, module) in ranked_level3 {
            if taken >= quota {
                break;
            }
            let credits = module.credits.min(quota - taken);
            if credits > 0 {
                portions.push(CreditPortion {
                    module_index,
                    credits,
                    grade: module.grade,
                });
                taken += credits;
            }
        }

        Self { quota, portions }
    }

    pub fn credits(&self) -> u32 {
        self.portions.iter().map(|p| p.credits).sum()
    }

    /// Σ credits × grade over the selected portions.
    pub fn score(&self) -> u64 {
        self.portions.iter().map(CreditPortion::points).sum()
    }
}
