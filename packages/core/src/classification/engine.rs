//! Classification engine - pure scoring over a set of level 2 and 3 modules

use crate::classification::{
    qa::QaSelection,
    thresholds::{thresholds_for, QaQuota, Thresholds, WeightedCeilings},
    types::*,
    weighting::WeightedAllocation,
};

/// Full working behind a [`CalculationResult`].
#[derive(Debug, Clone)]
pub struct ClassificationBreakdown {
    pub result: CalculationResult,
    pub total_credits: u64,
    pub thresholds: Thresholds,
    pub allocation: WeightedAllocation,
    pub qa: QaSelection,
}

/// Classify `modules`.
///
/// Total over well formed input. The caller decides whether the credit mix is
/// eligible (see [`crate::classification::eligibility`]); this function never
/// rejects input and applies the 240 credit row when no row matches.
pub fn classify(modules: &[Module]) -> CalculationResult {
    classify_detailed(modules).result
}

/// Like [`classify`] but keeps the bucket allocation and QA selection.
pub fn classify_detailed(modules: &[Module]) -> ClassificationBreakdown {
    let mut level2 = Vec::new();
    let mut level3 = Vec::new();
    for (index, module) in modules.iter().copied().enumerate() {
        match module.level {
            Level::Two => level2.push((index, module)),
            Level::Three => level3.push((index, module)),
        }
    }

    // Summed wide: any positive credits are accepted here, not only the
    // values the store lets through.
    let total_credits: u64 = modules.iter().map(|m| u64::from(m.credits)).sum();
    let thresholds = thresholds_for(u32::try_from(total_credits).unwrap_or(u32::MAX));

    // Stable: equal grades keep their input order.
    level3.sort_by_key(|(_, module)| module.grade);

    let allocation = WeightedAllocation::allocate(&level3, &level2);
    let qa = QaSelection::select(&level3, thresholds.qa.quota);

    let weighted_score = allocation.score();
    let qa_score = qa.score();
    let weighted_class = weighted_class(weighted_score, &thresholds.weighted);
    let qa_class = qa_class(qa_score, &thresholds.qa);
    let classification = weighted_class.lower_of(qa_class);

    tracing::debug!(
        total_credits,
        threshold_credits = thresholds.weighted.credits,
        weighted_score,
        qa_score,
        %weighted_class,
        %qa_class,
        %classification,
        "classified modules"
    );

    ClassificationBreakdown {
        result: CalculationResult {
            weighted_score,
            qa_score,
            weighted_class,
            qa_class,
            classification,
            threshold_credits: thresholds.weighted.credits,
        },
        total_credits,
        thresholds,
        allocation,
        qa,
    }
}

/// First ceiling the score does not exceed; above all four is a fail.
pub fn weighted_class(score: u64, ceilings: &WeightedCeilings) -> Classification {
    let score = score as f64;
    if score <= ceilings.first {
        Classification::First
    } else if score <= ceilings.upper_second {
        Classification::UpperSecond
    } else if score <= ceilings.lower_second {
        Classification::LowerSecond
    } else if score <= ceilings.third {
        Classification::Third
    } else {
        Classification::Fail
    }
}

/// Bands at quota × grade for grades 1 to 3. The QA test only gates the top
/// three classes, so anything above the last band is a third, never a fail.
pub fn qa_class(score: u64, quota: &QaQuota) -> Classification {
    let quota = u64::from(quota.quota);
    if score <= quota {
        Classification::First
    } else if score <= quota * 2 {
        Classification::UpperSecond
    } else if score <= quota * 3 {
        Classification::LowerSecond
    } else {
        Classification::Third
    }
}
