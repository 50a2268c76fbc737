//! Data types produced by the analysis pipeline.

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::HashMap;

use crate::record::CanonicalCaseRecord;

/// Claim-amount statistics. Everything except `total_cases` is computed over
/// cases with a positive claim amount only.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClaimStatistics {
    pub total_cases: usize,
    pub with_claim_amount: usize,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub sum: f64,
}

/// Case counts per label, highest count first. Labels with equal counts
/// keep the order in which they were first seen.
///
/// Serializes as a JSON object whose key order is the sorted order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Distribution(Vec<(String, usize)>);

impl Distribution {
    pub fn tally<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut entries: Vec<(String, usize)> = Vec::new();

        for label in labels {
            match index.get(label) {
                Some(&i) => entries[i].1 += 1,
                None => {
                    index.insert(label, entries.len());
                    entries.push((label.to_string(), 1));
                }
            }
        }

        // stable: ties stay in first-seen order
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        Self(entries)
    }

    pub fn entries(&self) -> &[(String, usize)] {
        &self.0
    }

    pub fn get(&self, label: &str) -> Option<usize> {
        self.0.iter().find(|(l, _)| l == label).map(|(_, n)| *n)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(l, _)| l.as_str())
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.0.iter().map(|(_, n)| n).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Distribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, count) in &self.0 {
            map.serialize_entry(label, count)?;
        }
        map.end()
    }
}

/// Full statistics report over a set of canonical cases, written out as
/// `analysis_report.json`.
#[derive(Debug, Clone, Serialize)]
pub struct StatisticsReport {
    pub generated_at: DateTime<Utc>,
    pub statistics: ClaimStatistics,
    pub court_distribution: Distribution,
    pub plaintiff_group_distribution: Distribution,
    #[serde(serialize_with = "serialize_percentage")]
    pub appeal_percentage: f64,
    pub high_value_cases: Vec<CanonicalCaseRecord>,
}

fn serialize_percentage<S: Serializer>(pct: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{pct:.2}%"))
}
