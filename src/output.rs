//! Output formatting and persistence for cases and reports.
//!
//! Supports pretty-printing, a log summary, CSV export (with a UTF-8 BOM so
//! spreadsheet tools pick the right encoding) and pretty JSON export.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::analyzers::types::StatisticsReport;
use crate::record::{CanonicalCaseRecord, CsvCaseRow};
use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;
use std::path::Path;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Logs the report using Rust's debug pretty-print format.
pub fn print_pretty(report: &StatisticsReport) {
    debug!("{:#?}", report);
}

/// Logs the report as pretty-printed JSON.
pub fn print_json(report: &StatisticsReport) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Logs the headline numbers of a report as structured fields.
pub fn log_summary(report: &StatisticsReport) {
    let stats = &report.statistics;
    info!(
        total_cases = stats.total_cases,
        with_claim_amount = stats.with_claim_amount,
        mean = stats.mean,
        median = stats.median,
        min = stats.min,
        max = stats.max,
        sum = stats.sum,
        appeal_percentage = report.appeal_percentage,
        "Claim statistics"
    );

    for (court, count) in report.court_distribution.entries().iter().take(5) {
        info!(court = %court, count, "Cases by court");
    }
    for (group, count) in report.plaintiff_group_distribution.entries().iter().take(5) {
        info!(group = %group, count, "Cases by plaintiff group");
    }
    for case in &report.high_value_cases {
        info!(
            case = %case.case_display_id,
            name = %case.case_name,
            court = %case.court_name,
            claim_amount = case.claim_amount,
            "High-value case"
        );
    }
}

/// Writes cases as CSV: BOM, canonical header, one row per case. The header
/// is written even when there are no cases.
pub fn write_cases_csv(path: &Path, cases: &[CanonicalCaseRecord]) -> Result<()> {
    debug!(path = %path.display(), rows = cases.len(), "Writing CSV export");

    let mut file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    file.write_all(UTF8_BOM)?;

    let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
    writer.write_record(CanonicalCaseRecord::FIELDS)?;
    for case in cases {
        writer.serialize(CsvCaseRow::from(case))?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = cases.len(), "Cases saved to CSV");
    Ok(())
}

/// Writes cases as a pretty-printed JSON array.
pub fn write_cases_json(path: &Path, cases: &[CanonicalCaseRecord]) -> Result<()> {
    write_json(path, &cases)?;
    info!(path = %path.display(), count = cases.len(), "Cases saved to JSON");
    Ok(())
}

/// Writes the report as pretty-printed JSON.
pub fn write_report_json(path: &Path, report: &StatisticsReport) -> Result<()> {
    write_json(path, report)?;
    info!(path = %path.display(), "Report saved");
    Ok(())
}

// serde_json leaves non-ASCII unescaped and indents with two spaces.
fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    let mut body = serde_json::to_string_pretty(value)?;
    body.push('\n');
    std::fs::write(path, body).with_context(|| format!("writing {}", path.display()))
}
