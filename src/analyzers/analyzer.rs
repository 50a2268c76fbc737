use crate::analyzers::aggregate::analyze;
use crate::analyzers::types::StatisticsReport;
use crate::record::{CanonicalCaseRecord, CsvCaseRow};
use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;
use tracing::info;

/// Loads canonical cases from a previous export, choosing the format by
/// file extension (`.csv` or `.json`).
pub fn load_cases(path: &Path) -> Result<Vec<CanonicalCaseRecord>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let cases = match ext.as_deref() {
        Some("csv") => load_cases_csv(path)?,
        Some("json") => load_cases_json(path)?,
        _ => bail!("unsupported export format: {}", path.display()),
    };

    info!(path = %path.display(), count = cases.len(), "Loaded cases from export");
    Ok(cases)
}

/// Loads an export and analyzes it.
pub fn analyze_file(path: &Path, threshold: f64, top_n: usize) -> Result<StatisticsReport> {
    let cases = load_cases(path)?;
    Ok(analyze(&cases, threshold, top_n))
}

fn load_cases_csv(path: &Path) -> Result<Vec<CanonicalCaseRecord>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);

    let mut rdr = csv::Reader::from_reader(content.as_bytes());
    let mut rows = Vec::new();

    for result in rdr.deserialize() {
        let row: CsvCaseRow =
            result.with_context(|| format!("parsing CSV row in {}", path.display()))?;
        rows.push(CanonicalCaseRecord::from(row));
    }

    Ok(rows)
}

fn load_cases_json(path: &Path) -> Result<Vec<CanonicalCaseRecord>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let cases = serde_json::from_str(&content)
        .with_context(|| format!("parsing JSON cases in {}", path.display()))?;
    Ok(cases)
}
