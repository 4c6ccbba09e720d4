//! Static threshold tables keyed by total counted credits.
//!
//! Ceilings scale pro-rata from the 240 credit row. Only the five tabulated
//! totals have rows; any other total falls back to the 240 row rather than
//! being interpolated.

/// Weighted score ceilings, one per non-fail class (inclusive upper bounds).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedCeilings {
    pub credits: u32,
    pub first: f64,
    pub upper_second: f64,
    pub lower_second: f64,
    pub third: f64,
}

/// Number of best level 3 credits examined by the quality assurance test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QaQuota {
    pub credits: u32,
    pub quota: u32,
}

/// Pair of rows applied to one calculation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub weighted: WeightedCeilings,
    pub qa: QaQuota,
}

impl Thresholds {
    /// `true` when no row matched and the 240 row was used instead.
    pub fn is_fallback(&self, total_credits: u32) -> bool {
        self.weighted.credits != total_credits
    }
}

pub const FALLBACK_CREDITS: u32 = 240;

pub const WEIGHTED_CEILINGS: [WeightedCeilings; 5] = [
    WeightedCeilings { credits: 240, first: 630.0, upper_second: 900.0, lower_second: 1170.0, third: 1440.0 },
    WeightedCeilings { credits: 210, first: 577.5, upper_second: 825.0, lower_second: 1072.5, third: 1320.0 },
    WeightedCeilings { credits: 180, first: 525.0, upper_second: 750.0, lower_second: 975.0, third: 1200.0 },
    WeightedCeilings { credits: 150, first: 472.5, upper_second: 675.0, lower_second: 877.5, third: 1080.0 },
    WeightedCeilings { credits: 120, first: 420.0, upper_second: 600.0, lower_second: 780.0, third: 960.0 },
];

pub const QA_QUOTAS: [QaQuota; 5] = [
    QaQuota { credits: 240, quota: 60 },
    QaQuota { credits: 210, quota: 60 },
    QaQuota { credits: 180, quota: 60 },
    QaQuota { credits: 150, quota: 60 },
    QaQuota { credits: 120, quota: 30 },
];

/// Look up the rows for `total_credits`, falling back to the 240 row.
pub fn thresholds_for(total_credits: u32) -> Thresholds {
    let weighted = WEIGHTED_CEILINGS
        .iter()
        .find(|row| row.credits == total_credits)
        .copied()
        .unwrap_or(WEIGHTED_CEILINGS[0]);

    let qa = QA_QUOTAS
        .iter()
        .find(|row| row.credits == total_credits)
        .copied()
        .unwrap_or(QA_QUOTAS[0]);

    Thresholds { weighted, qa }
}
