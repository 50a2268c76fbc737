//! Defaults and output layout.
//!
//! Every value here can be overridden from the command line or the matching
//! environment variable (a `.env` file is honoured). Nothing touches the
//! filesystem until [`OutputPaths::ensure`] is called.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Registry home page that embeds the case array.
pub const DEFAULT_REGISTRY_URL: &str = "https://www.court.gov.il/NGCS.Web.Site/HomePage.aspx";

pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_LOG_FILE_PATH: &str = "logs/class_action_registry.log";

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
pub const ACCEPT_LANGUAGE: &str = "he-IL,he;q=0.9,en-US;q=0.8,en;q=0.7";

pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_HTTP_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY_SECS: u64 = 5;

pub const CASES_CSV: &str = "cases.csv";
pub const CASES_JSON: &str = "cases.json";
pub const REPORT_JSON: &str = "analysis_report.json";

/// File locations for one pipeline run's exports.
#[derive(Debug, Clone)]
pub struct OutputPaths {
    dir: PathBuf,
}

impl OutputPaths {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn cases_csv(&self) -> PathBuf {
        self.dir.join(CASES_CSV)
    }

    pub fn cases_json(&self) -> PathBuf {
        self.dir.join(CASES_JSON)
    }

    pub fn report_json(&self) -> PathBuf {
        self.dir.join(REPORT_JSON)
    }

    /// Creates the output directory if it does not exist.
    pub fn ensure(&self) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating output directory {}", self.dir.display()))
    }
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_paths() {
        let paths = OutputPaths::new("/tmp/registry");
        assert_eq!(paths.cases_csv(), Path::new("/tmp/registry/cases.csv"));
        assert_eq!(paths.cases_json(), Path::new("/tmp/registry/cases.json"));
        assert_eq!(paths.report_json(), Path::new("/tmp/registry/analysis_report.json"));
        assert_eq!(OutputPaths::default().dir(), Path::new(DEFAULT_DATA_DIR));
    }

    #[test]
    fn test_ensure_creates_directory() {
        let dir = std::env::temp_dir().join("class_action_registry_test_ensure");
        let _ = std::fs::remove_dir_all(&dir);

        let paths = OutputPaths::new(&dir);
        paths.ensure().unwrap();
        assert!(dir.is_dir());
        paths.ensure().unwrap();

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
