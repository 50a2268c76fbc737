//! Maps raw registry records onto [`CanonicalCaseRecord`].
//!
//! All field lookups and defaults live here. A record that cannot be mapped
//! at all is logged and dropped; a bad field only falls back to its default.

use serde_json::{Map, Value};
use tracing::{debug, error};

use crate::error::{NormalizeError, json_kind};
use crate::record::{CanonicalCaseRecord, CaseId, RawCaseRecord};

/// Source payload keys.
pub mod keys {
    pub const CASE_DISPLAY_ID: &str = "CaseDisplayIdentifier";
    pub const CASE_NAME: &str = "CaseName";
    pub const OPEN_DATE: &str = "CaseOpenDate";
    pub const COURT_NAME: &str = "CourtName";
    pub const PLAINTIFF_GROUP: &str = "RepresentativeComplaintGroupName";
    pub const LEGAL_QUESTION: &str = "LegalQuestion";
    pub const REQUESTED_AID: &str = "RequestedAID";
    pub const CLAIM_AMOUNT: &str = "ClaimAmount";
    pub const CASE_ID: &str = "CaseID";
    pub const IS_APPEAL: &str = "isAppealCase";
    pub const DOCS: &str = "Docs";
}

/// Normalizes a batch, skipping records that fail to map. Output order
/// follows input order.
pub fn normalize(records: &[RawCaseRecord]) -> Vec<CanonicalCaseRecord> {
    let mut out = Vec::with_capacity(records.len());

    for (index, raw) in records.iter().enumerate() {
        match normalize_record(raw) {
            Ok(record) => out.push(record),
            Err(e) => error!(index, error = %e, "Skipping unmappable case record"),
        }
    }

    debug!(input = records.len(), output = out.len(), "Normalized case records");
    out
}

/// Maps a single record. Fails only when the record is not a JSON object.
pub fn normalize_record(raw: &RawCaseRecord) -> Result<CanonicalCaseRecord, NormalizeError> {
    let Value::Object(fields) = raw else {
        return Err(NormalizeError::NotAnObject(json_kind(raw)));
    };

    Ok(CanonicalCaseRecord {
        case_display_id: text(fields, keys::CASE_DISPLAY_ID),
        case_name: text(fields, keys::CASE_NAME),
        open_date: text(fields, keys::OPEN_DATE),
        court_name: text(fields, keys::COURT_NAME),
        plaintiff_group: text(fields, keys::PLAINTIFF_GROUP),
        legal_question: text(fields, keys::LEGAL_QUESTION),
        requested_aid: text(fields, keys::REQUESTED_AID),
        claim_amount: amount(fields.get(keys::CLAIM_AMOUNT)),
        case_id: case_id(fields.get(keys::CASE_ID)),
        is_appeal: appeal_flag(fields.get(keys::IS_APPEAL)).to_string(),
        document_count: fields
            .get(keys::DOCS)
            .and_then(Value::as_array)
            .map_or(0, Vec::len),
    })
}

fn text(fields: &Map<String, Value>, key: &str) -> String {
    match fields.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn amount(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => {
            let cleaned: String = s
                .chars()
                .filter(|c| !matches!(c, ',' | '₪') && !c.is_whitespace())
                .collect();
            cleaned.parse::<f64>().ok()
        }
        _ => None,
    };

    match parsed {
        Some(v) if v.is_finite() && v >= 0.0 => v,
        _ => 0.0,
    }
}

fn case_id(value: Option<&Value>) -> CaseId {
    match value {
        Some(Value::Number(n)) => CaseId::Number(n.clone()),
        Some(Value::String(s)) => CaseId::Text(s.clone()),
        _ => CaseId::default(),
    }
}

fn appeal_flag(value: Option<&Value>) -> &'static str {
    let is_appeal = match value {
        Some(Value::String(s)) => {
            let s = s.trim();
            s == "1" || s.eq_ignore_ascii_case("true")
        }
        Some(Value::Number(n)) => n.as_f64() == Some(1.0),
        Some(Value::Bool(b)) => *b,
        _ => false,
    };

    if is_appeal { "1" } else { "0" }
}
