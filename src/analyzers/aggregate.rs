use crate::analyzers::types::{ClaimStatistics, Distribution, StatisticsReport};
use crate::analyzers::utility::{mean, median, pct};
use crate::record::CanonicalCaseRecord;
use chrono::Utc;

/// Claim amount at or above which a case counts as high-value.
pub const DEFAULT_HIGH_VALUE_THRESHOLD: f64 = 10_000_000.0;

/// Number of high-value cases surfaced in a report.
pub const DEFAULT_TOP_N: usize = 10;

/// Court label for cases without a court name.
pub const UNSPECIFIED_COURT: &str = "Unspecified";

/// Builds the full report: claim statistics, court and plaintiff-group
/// distributions, appeal percentage, and the `top_n` largest cases with a
/// claim amount of at least `threshold`.
pub fn analyze(records: &[CanonicalCaseRecord], threshold: f64, top_n: usize) -> StatisticsReport {
    let mut high_value = high_value_cases(records, threshold);
    high_value.truncate(top_n);

    StatisticsReport {
        generated_at: Utc::now(),
        statistics: claim_statistics(records),
        court_distribution: court_distribution(records),
        plaintiff_group_distribution: plaintiff_group_distribution(records),
        appeal_percentage: appeal_percentage(records),
        high_value_cases: high_value,
    }
}

impl StatisticsReport {
    /// Report with the default high-value threshold and top-N.
    pub fn from_cases(records: &[CanonicalCaseRecord]) -> Self {
        analyze(records, DEFAULT_HIGH_VALUE_THRESHOLD, DEFAULT_TOP_N)
    }
}

pub fn claim_statistics(records: &[CanonicalCaseRecord]) -> ClaimStatistics {
    let amounts: Vec<f64> = records
        .iter()
        .map(|r| r.claim_amount)
        .filter(|&a| a > 0.0)
        .collect();

    if amounts.is_empty() {
        return ClaimStatistics {
            total_cases: records.len(),
            ..Default::default()
        };
    }

    ClaimStatistics {
        total_cases: records.len(),
        with_claim_amount: amounts.len(),
        mean: mean(&amounts),
        median: median(&amounts),
        min: amounts.iter().copied().fold(f64::INFINITY, f64::min),
        max: amounts.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        sum: amounts.iter().sum(),
    }
}

pub fn court_distribution(records: &[CanonicalCaseRecord]) -> Distribution {
    Distribution::tally(records.iter().map(|r| {
        if r.court_name.trim().is_empty() {
            UNSPECIFIED_COURT
        } else {
            r.court_name.as_str()
        }
    }))
}

/// Like [`court_distribution`], but cases with a blank plaintiff group are
/// left out entirely.
pub fn plaintiff_group_distribution(records: &[CanonicalCaseRecord]) -> Distribution {
    Distribution::tally(
        records
            .iter()
            .map(|r| r.plaintiff_group.as_str())
            .filter(|g| !g.trim().is_empty()),
    )
}

pub fn appeal_percentage(records: &[CanonicalCaseRecord]) -> f64 {
    let appeals = records.iter().filter(|r| r.is_appeal_case()).count();
    pct(appeals, records.len())
}

/// All cases with `claim_amount >= threshold`, largest first. Equal amounts
/// keep their input order.
pub fn high_value_cases(records: &[CanonicalCaseRecord], threshold: f64) -> Vec<CanonicalCaseRecord> {
    let mut cases: Vec<CanonicalCaseRecord> = records
        .iter()
        .filter(|r| r.claim_amount >= threshold)
        .cloned()
        .collect();

    cases.sort_by(|a, b| b.claim_amount.total_cmp(&a.claim_amount));
    cases
}
