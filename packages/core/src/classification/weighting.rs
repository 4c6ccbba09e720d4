//! Best-120 double weighting allocation

use crate::classification::types::{CreditPortion, Module};

/// Level 3 credits eligible for double weighting.
pub const DOUBLE_WEIGHTED_CAP: u32 = 120;

/// Credits split into the double and single weighted buckets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeightedAllocation {
    pub double_weighted: Vec<CreditPortion>,
    pub single_weighted: Vec<CreditPortion>,
}

impl WeightedAllocation {
    /// Allocate credits from `ranked_level3` (best grade first) and `level2`.
    ///
    /// Each entry carries the module's position in the original input. The
    /// module crossing the 120 credit boundary is split across both buckets.
    pub fn allocate(ranked_level3: &[(usize, Module)], level2: &[(usize, Module)]) -> Self {
        let mut allocation = Self::default();
        let mut doubled = 0;

        for &(module_index, module) in ranked_level3 {
            let to_double = module.credits.min(DOUBLE_WEIGHTED_CAP - doubled);
            let to_single = module.credits - to_double;

            if to_double > 0 {
                allocation.double_weighted.push(CreditPortion {
                    module_index,
                    credits: to_double,
                    grade: module.grade,
                });
                doubled += to_double;
            }
            if to_single > 0 {
                allocation.single_weighted.push(CreditPortion {
                    module_index,
                    credits: to_single,
                    grade: module.grade,
                });
            }
        }

        for &(module_index, module) in level2 {
            allocation.single_weighted.push(CreditPortion {
                module_index,
                credits: module.credits,
                grade: module.grade,
            });
        }

        allocation
    }

    pub fn double_weighted_credits(&self) -> u32 {
        self.double_weighted.iter().map(|p| p.credits).sum()
    }

    pub fn single_weighted_credits(&self) -> u64 {
        self.single_weighted.iter().map(|p| u64::from(p.credits)).sum()
    }

    /// Σ credits × grade × 2 over the double bucket plus Σ credits × grade
    /// over the single bucket.
    pub fn score(&self) -> u64 {
        let double: u64 = self.double_weighted.iter().map(|p| p.points() * 2).sum();
        let single: u64 = self.single_weighted.iter().map(CreditPortion::points).sum();
        double + single
    }
}
