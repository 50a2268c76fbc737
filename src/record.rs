//! Raw and canonical case record types.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;

/// A case as it appears in the registry payload. Expected to be a JSON
/// object, but nothing about it is guaranteed.
pub type RawCaseRecord = serde_json::Value;

/// Fixed-schema projection of one registry case.
///
/// Field order is significant: it is the CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalCaseRecord {
    pub case_display_id: String,
    pub case_name: String,
    pub open_date: String,
    pub court_name: String,
    pub plaintiff_group: String,
    pub legal_question: String,
    pub requested_aid: String,
    #[serde(serialize_with = "serialize_amount")]
    pub claim_amount: f64,
    pub case_id: CaseId,
    pub is_appeal: String,
    pub document_count: usize,
}

impl Default for CanonicalCaseRecord {
    fn default() -> Self {
        Self {
            case_display_id: String::new(),
            case_name: String::new(),
            open_date: String::new(),
            court_name: String::new(),
            plaintiff_group: String::new(),
            legal_question: String::new(),
            requested_aid: String::new(),
            claim_amount: 0.0,
            case_id: CaseId::default(),
            is_appeal: "0".to_string(),
            document_count: 0,
        }
    }
}

impl CanonicalCaseRecord {
    /// Canonical field names, in column order.
    pub const FIELDS: [&'static str; 11] = [
        "case_display_id",
        "case_name",
        "open_date",
        "court_name",
        "plaintiff_group",
        "legal_question",
        "requested_aid",
        "claim_amount",
        "case_id",
        "is_appeal",
        "document_count",
    ];

    pub fn is_appeal_case(&self) -> bool {
        self.is_appeal == "1"
    }
}

/// Registry case id. The payload carries it as a number, older pages as a
/// string; the original shape is kept for export.
#[derive(Debug, Clone, PartialEq)]
pub enum CaseId {
    Number(serde_json::Number),
    Text(String),
}

impl Default for CaseId {
    fn default() -> Self {
        CaseId::Text(String::new())
    }
}

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaseId::Number(n) => write!(f, "{n}"),
            CaseId::Text(s) => f.write_str(s),
        }
    }
}

impl Serialize for CaseId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CaseId::Number(n) => n.serialize(serializer),
            CaseId::Text(s) => serializer.serialize_str(s),
        }
    }
}

// Accept every scalar rather than relying on an untagged derive; older
// exports carry booleans and floats here.
impl<'de> Deserialize<'de> for CaseId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CaseIdVisitor;

        impl<'de> Visitor<'de> for CaseIdVisitor {
            type Value = CaseId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a case id number or string")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<CaseId, E> {
                Ok(CaseId::Number(v.into()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<CaseId, E> {
                Ok(CaseId::Number(v.into()))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<CaseId, E> {
                Ok(serde_json::Number::from_f64(v)
                    .map(CaseId::Number)
                    .unwrap_or_default())
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<CaseId, E> {
                Ok(CaseId::Text(v.to_string()))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<CaseId, E> {
                Ok(CaseId::Text(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<CaseId, E> {
                Ok(CaseId::Text(v))
            }

            fn visit_unit<E: de::Error>(self) -> Result<CaseId, E> {
                Ok(CaseId::default())
            }

            fn visit_none<E: de::Error>(self) -> Result<CaseId, E> {
                Ok(CaseId::default())
            }
        }

        deserializer.deserialize_any(CaseIdVisitor)
    }
}

impl CaseId {
    /// Text form for a CSV cell. Text that would read back as a number, or
    /// that itself starts with a quote, is written as a JSON string literal.
    pub fn to_csv_cell(&self) -> Cow<'_, str> {
        match self {
            CaseId::Number(n) => Cow::Owned(n.to_string()),
            CaseId::Text(s) if s.parse::<serde_json::Number>().is_ok() || s.starts_with('"') => {
                Cow::Owned(serde_json::Value::from(s.as_str()).to_string())
            }
            CaseId::Text(s) => Cow::Borrowed(s),
        }
    }

    /// Inverse of [`CaseId::to_csv_cell`].
    pub fn from_csv_cell(cell: &str) -> CaseId {
        if cell.starts_with('"') {
            if let Ok(text) = serde_json::from_str::<String>(cell) {
                return CaseId::Text(text);
            }
        }
        match cell.parse::<serde_json::Number>() {
            Ok(n) => CaseId::Number(n),
            Err(_) => CaseId::Text(cell.to_string()),
        }
    }
}

/// One CSV row. Cells carry no type, so the case id travels through
/// [`CaseId::to_csv_cell`] to come back with its original shape.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct CsvCaseRow {
    case_display_id: String,
    case_name: String,
    open_date: String,
    court_name: String,
    plaintiff_group: String,
    legal_question: String,
    requested_aid: String,
    #[serde(serialize_with = "serialize_amount")]
    claim_amount: f64,
    case_id: String,
    is_appeal: String,
    document_count: usize,
}

impl From<&CanonicalCaseRecord> for CsvCaseRow {
    fn from(record: &CanonicalCaseRecord) -> Self {
        Self {
            case_display_id: record.case_display_id.clone(),
            case_name: record.case_name.clone(),
            open_date: record.open_date.clone(),
            court_name: record.court_name.clone(),
            plaintiff_group: record.plaintiff_group.clone(),
            legal_question: record.legal_question.clone(),
            requested_aid: record.requested_aid.clone(),
            claim_amount: record.claim_amount,
            case_id: record.case_id.to_csv_cell().into_owned(),
            is_appeal: record.is_appeal.clone(),
            document_count: record.document_count,
        }
    }
}

impl From<CsvCaseRow> for CanonicalCaseRecord {
    fn from(row: CsvCaseRow) -> Self {
        Self {
            case_display_id: row.case_display_id,
            case_name: row.case_name,
            open_date: row.open_date,
            court_name: row.court_name,
            plaintiff_group: row.plaintiff_group,
            legal_question: row.legal_question,
            requested_aid: row.requested_aid,
            claim_amount: row.claim_amount,
            case_id: CaseId::from_csv_cell(&row.case_id),
            is_appeal: row.is_appeal,
            document_count: row.document_count,
        }
    }
}

/// Writes whole amounts as integers so exports read `15000000`, not
/// `15000000.0`.
fn serialize_amount<S: Serializer>(amount: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    // 2^53: beyond this not every integer is representable as f64
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;

    if amount.fract() == 0.0 && amount.abs() <= MAX_EXACT {
        serializer.serialize_i64(*amount as i64)
    } else {
        serializer.serialize_f64(*amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_whole_amount_serializes_as_integer() {
        let record = CanonicalCaseRecord {
            claim_amount: 15_000_000.0,
            ..Default::default()
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["claim_amount"], json!(15000000));
    }

    #[test]
    fn test_fractional_amount_kept() {
        let record = CanonicalCaseRecord {
            claim_amount: 1234.5,
            ..Default::default()
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["claim_amount"], json!(1234.5));
    }

    #[test]
    fn test_case_id_keeps_shape() {
        assert_eq!(
            serde_json::to_value(CaseId::Number(83300966.into())).unwrap(),
            json!(83300966)
        );
        assert_eq!(
            serde_json::to_value(CaseId::Text("A-17".into())).unwrap(),
            json!("A-17")
        );

        let parsed: CaseId = serde_json::from_value(json!(42)).unwrap();
        assert_eq!(parsed, CaseId::Number(42.into()));
        let parsed: CaseId = serde_json::from_value(json!("")).unwrap();
        assert_eq!(parsed, CaseId::default());
    }

    #[test]
    fn test_csv_cell_keeps_case_id_shape() {
        let ids = [
            CaseId::Number(83300966.into()),
            CaseId::Text("1002".into()),
            CaseId::Text("-7".into()),
            CaseId::Text("A-17".into()),
            CaseId::Text("\"quoted\"".into()),
            CaseId::default(),
        ];
        for id in ids {
            assert_eq!(CaseId::from_csv_cell(&id.to_csv_cell()), id);
        }

        assert_eq!(CaseId::Text("1002".into()).to_csv_cell(), "\"1002\"");
        assert_eq!(CaseId::Text("A-17".into()).to_csv_cell(), "A-17");
        assert_eq!(CaseId::Number(5.into()).to_csv_cell(), "5");
    }

    #[test]
    fn test_field_order_matches_serialization() {
        let value = serde_json::to_value(CanonicalCaseRecord::default()).unwrap();
        let object = value.as_object().unwrap();
        for field in CanonicalCaseRecord::FIELDS {
            assert!(object.contains_key(field), "missing {field}");
        }
        assert_eq!(object.len(), CanonicalCaseRecord::FIELDS.len());
    }

    #[test]
    fn test_is_appeal_case() {
        let mut record = CanonicalCaseRecord::default();
        assert!(!record.is_appeal_case());
        record.is_appeal = "1".into();
        assert!(record.is_appeal_case());
    }
}
