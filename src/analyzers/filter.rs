//! Search and range filters over canonical cases.

use std::fmt;
use std::str::FromStr;

use crate::record::CanonicalCaseRecord;

/// Text fields that [`search`] can match against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    CaseName,
    CourtName,
    PlaintiffGroup,
}

impl SearchField {
    fn value(self, record: &CanonicalCaseRecord) -> &str {
        match self {
            SearchField::CaseName => &record.case_name,
            SearchField::CourtName => &record.court_name,
            SearchField::PlaintiffGroup => &record.plaintiff_group,
        }
    }
}

impl FromStr for SearchField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "case_name" | "name" => Ok(SearchField::CaseName),
            "court_name" | "court" => Ok(SearchField::CourtName),
            "plaintiff_group" | "group" => Ok(SearchField::PlaintiffGroup),
            other => Err(format!(
                "unknown search field '{other}' (expected case_name, court_name or plaintiff_group)"
            )),
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SearchField::CaseName => "case_name",
            SearchField::CourtName => "court_name",
            SearchField::PlaintiffGroup => "plaintiff_group",
        })
    }
}

/// Cases whose `field` contains `term`, ignoring case. An empty term
/// matches nothing.
pub fn search<'a>(
    records: &'a [CanonicalCaseRecord],
    field: SearchField,
    term: &str,
) -> Vec<&'a CanonicalCaseRecord> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    records
        .iter()
        .filter(|r| field.value(r).to_lowercase().contains(&needle))
        .collect()
}

/// Cases with `min <= claim_amount <= max`, in input order.
pub fn filter_by_amount(
    records: &[CanonicalCaseRecord],
    min: f64,
    max: f64,
) -> Vec<&CanonicalCaseRecord> {
    records
        .iter()
        .filter(|r| r.claim_amount >= min && r.claim_amount <= max)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cases() -> Vec<CanonicalCaseRecord> {
        vec![
            CanonicalCaseRecord {
                case_name: "Cohen v. Mega Foods".into(),
                court_name: "מחוזי תל אביב".into(),
                plaintiff_group: "צרכנים".into(),
                claim_amount: 5_000_000.0,
                ..Default::default()
            },
            CanonicalCaseRecord {
                case_name: "Levi v. Telecom".into(),
                court_name: "מחוזי מרכז".into(),
                plaintiff_group: "לקוחות".into(),
                claim_amount: 12_000_000.0,
                ..Default::default()
            },
            CanonicalCaseRecord {
                case_name: "MEGA claim".into(),
                court_name: "אזורי לעבודה חיפה".into(),
                plaintiff_group: "עובדים".into(),
                claim_amount: 0.0,
                ..Default::default()
            },
        ]
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let cases = cases();
        let found = search(&cases, SearchField::CaseName, "mega");

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].case_name, "Cohen v. Mega Foods");
        assert_eq!(found[1].case_name, "MEGA claim");
    }

    #[test]
    fn test_search_other_fields() {
        let cases = cases();
        assert_eq!(search(&cases, SearchField::CourtName, "מחוזי").len(), 2);
        assert_eq!(search(&cases, SearchField::PlaintiffGroup, "עובדים").len(), 1);
        assert!(search(&cases, SearchField::PlaintiffGroup, "nobody").is_empty());
    }

    #[test]
    fn test_empty_term_matches_nothing() {
        let cases = cases();
        assert!(search(&cases, SearchField::CaseName, "  ").is_empty());
    }

    #[test]
    fn test_filter_by_amount_is_inclusive() {
        let cases = cases();

        let found = filter_by_amount(&cases, 5_000_000.0, 12_000_000.0);
        assert_eq!(found.len(), 2);

        let found = filter_by_amount(&cases, 0.0, 5_000_000.0);
        let names: Vec<_> = found.iter().map(|c| c.case_name.as_str()).collect();
        assert_eq!(names, ["Cohen v. Mega Foods", "MEGA claim"]);

        assert!(filter_by_amount(&cases, 20_000_000.0, 10_000_000.0).is_empty());
    }

    #[test]
    fn test_search_field_parse() {
        assert_eq!("court".parse::<SearchField>().unwrap(), SearchField::CourtName);
        assert_eq!(
            "Plaintiff-Group".parse::<SearchField>().unwrap(),
            SearchField::PlaintiffGroup
        );
        assert_eq!(SearchField::CaseName.to_string(), "case_name");
        assert!("judge".parse::<SearchField>().is_err());
    }
}
