pub mod analyzers;
pub mod config;
pub mod error;
pub mod extractor;
pub mod fetch;
pub mod logging;
pub mod normalizer;
pub mod output;
pub mod record;
pub mod sample;

pub use analyzers::aggregate::analyze;
pub use analyzers::types::StatisticsReport;
pub use extractor::extract;
pub use normalizer::normalize;
pub use record::{CanonicalCaseRecord, RawCaseRecord};
