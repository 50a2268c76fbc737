//! Statistics over canonical cases.
//!
//! This module computes claim-amount statistics, court and plaintiff-group
//! distributions, the share of appeal cases and the high-value subset, and
//! bundles them into a [`types::StatisticsReport`]. It can also reload a
//! previous CSV or JSON export and analyze that instead of a fresh scrape.

pub mod aggregate;
pub mod analyzer;
pub mod filter;
pub mod types;
pub mod utility;
