//! Locates the registry's embedded case array inside server-rendered HTML.
//!
//! The registry page ships every case as a JSON array in the `value`
//! attribute of a hidden `<input>`. A tolerant pattern search over the raw
//! text finds it without parsing the whole document; when that misses, the
//! document is parsed with [`scraper`] and the input is looked up by id.

use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value;
use std::sync::LazyLock;
use tracing::{debug, error, info, warn};

use crate::error::{ExtractError, json_kind};
use crate::record::RawCaseRecord;

/// Id of the hidden input that carries the case array on the registry page.
pub const DEFAULT_TARGET_ID: &str = "RepresentativeRegistryGridArrayStore";

/// Keys whose presence marks a hidden input value as case data during the
/// hidden-input scan.
pub const IDENTIFYING_KEYS: &[&str] = &["CaseDisplayIdentifier", "CaseID", "CaseName", "CaseNumber"];

static DEFAULT_EXTRACTOR: LazyLock<Extractor> = LazyLock::new(|| {
    Extractor::new(DEFAULT_TARGET_ID).expect("default target id forms a valid pattern")
});

/// Extracts raw case records from `html` using the default target id.
///
/// Never fails: a missing element, empty payload or undecodable JSON is
/// logged and yields an empty vector.
pub fn extract(html: &str) -> Vec<RawCaseRecord> {
    DEFAULT_EXTRACTOR.extract(html)
}

/// Like [`extract`], but reports why nothing was found.
pub fn try_extract(html: &str) -> Result<Vec<RawCaseRecord>, ExtractError> {
    DEFAULT_EXTRACTOR.try_extract(html)
}

#[derive(Debug, Clone)]
pub struct Extractor {
    target_id: String,
    pattern: Regex,
    scan_hidden_inputs: bool,
}

impl Default for Extractor {
    fn default() -> Self {
        DEFAULT_EXTRACTOR.clone()
    }
}

impl Extractor {
    /// Builds an extractor for the input element with id `target_id`.
    ///
    /// The single-quoted value is matched minimally, up to a `'` that ends
    /// the tag or starts the next attribute, so apostrophes inside JSON
    /// strings are not mistaken for the closing quote.
    pub fn new(target_id: &str) -> Result<Self, ExtractError> {
        let id = regex::escape(target_id);
        let pattern = Regex::new(&format!(
            r#"(?s)\sid\s*=\s*["']{id}["'][^>]*?\svalue\s*=\s*(?:'(?P<single>.*?)'(?:\s*/?>|\s+[A-Za-z_:][-\w:.]*\s*=)|"(?P<double>[^"]*)")"#
        ))?;

        Ok(Self {
            target_id: target_id.to_string(),
            pattern,
            scan_hidden_inputs: false,
        })
    }

    /// Also accept case data from any hidden input whose value looks like a
    /// JSON array or object mentioning one of [`IDENTIFYING_KEYS`]. Older
    /// registry pages used different ids.
    pub fn scan_hidden_inputs(mut self, enabled: bool) -> Self {
        self.scan_hidden_inputs = enabled;
        self
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    pub fn extract(&self, html: &str) -> Vec<RawCaseRecord> {
        match self.try_extract(html) {
            Ok(records) => {
                info!(count = records.len(), "Extracted case records");
                records
            }
            Err(e @ ExtractError::TargetNotFound(_)) => {
                warn!(error = %e, html_len = html.len(), "No case payload in document");
                Vec::new()
            }
            Err(e) => {
                error!(error = %e, "Case payload extraction failed");
                Vec::new()
            }
        }
    }

    pub fn try_extract(&self, html: &str) -> Result<Vec<RawCaseRecord>, ExtractError> {
        if let Some(caps) = self.pattern.captures(html) {
            let raw = caps
                .name("single")
                .or_else(|| caps.name("double"))
                .map_or("", |m| m.as_str());
            debug!(payload_len = raw.len(), "Target input matched by pattern");

            return match decode_attribute(raw) {
                Ok(records) => Ok(records),
                // A stray quote can end the match early; the parser reads attributes properly.
                Err(e) => {
                    debug!(error = %e, "Matched payload did not decode, parsing document");
                    self.scan_document(html).or(Err(e))
                }
            };
        }

        debug!(target_id = %self.target_id, "Pattern missed, parsing document");
        self.scan_document(html)
    }

    fn scan_document(&self, html: &str) -> Result<Vec<RawCaseRecord>, ExtractError> {
        let document = Html::parse_document(html);
        let inputs =
            Selector::parse("input").map_err(|e| ExtractError::Selector(format!("{e:?}")))?;

        let mut scanned = Vec::new();

        for input in document.select(&inputs) {
            let element = input.value();

            if element.id() == Some(self.target_id.as_str()) {
                let payload = element.attr("value").unwrap_or("").trim();
                if payload.is_empty() {
                    return Err(ExtractError::EmptyPayload);
                }
                return decode_payload(payload);
            }

            if !self.scan_hidden_inputs {
                continue;
            }

            let hidden = element
                .attr("type")
                .is_some_and(|t| t.eq_ignore_ascii_case("hidden"));
            let value = element.attr("value").unwrap_or("").trim();

            if hidden && looks_like_case_data(value) {
                match decode_payload(value) {
                    Ok(records) => {
                        debug!(id = ?element.id(), count = records.len(), "Hidden input carries case data");
                        scanned.extend(records);
                    }
                    Err(e) => debug!(id = ?element.id(), error = %e, "Skipping hidden input"),
                }
            }
        }

        if scanned.is_empty() {
            Err(ExtractError::TargetNotFound(self.target_id.clone()))
        } else {
            Ok(scanned)
        }
    }
}

fn decode_attribute(raw: &str) -> Result<Vec<RawCaseRecord>, ExtractError> {
    let payload = html_escape::decode_html_entities(raw);
    let payload = payload.trim();
    if payload.is_empty() {
        return Err(ExtractError::EmptyPayload);
    }
    decode_payload(payload)
}

fn looks_like_case_data(value: &str) -> bool {
    (value.starts_with('[') || value.starts_with('{'))
        && IDENTIFYING_KEYS.iter().any(|key| value.contains(key))
}

/// Decodes a JSON payload into records: an array yields its elements, a
/// lone object becomes a one-element sequence.
fn decode_payload(payload: &str) -> Result<Vec<RawCaseRecord>, ExtractError> {
    let value: Value = match serde_json::from_str(payload) {
        Ok(value) => value,
        // The registry escapes apostrophes in names as \' which JSON rejects.
        Err(err) if payload.contains("\\'") => {
            debug!(error = %err, "Retrying payload with unescaped single quotes");
            serde_json::from_str(&payload.replace("\\'", "'")).map_err(|_| err)?
        }
        Err(err) => return Err(err.into()),
    };

    match value {
        Value::Array(items) => Ok(items),
        Value::Object(_) => Ok(vec![value]),
        other => Err(ExtractError::UnexpectedShape(json_kind(&other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn wrap(payload: &str) -> String {
        format!(
            "<html><body><form>\n<input type=\"hidden\" id=\"{DEFAULT_TARGET_ID}\" \nvalue='{payload}' />\n</form></body></html>"
        )
    }

    #[test]
    fn test_missing_target_returns_empty() {
        let html = r#"<html><body><input type="hidden" id="Other" value='[{"CaseID":1}]' /></body></html>"#;
        assert!(extract(html).is_empty());
        assert!(matches!(
            try_extract(html),
            Err(ExtractError::TargetNotFound(_))
        ));
    }

    #[test]
    fn test_degenerate_input_returns_empty() {
        assert!(extract("").is_empty());
        assert!(extract("<<<'>'").is_empty());
        assert!(extract(DEFAULT_TARGET_ID).is_empty());
    }

    #[test]
    fn test_extract_single_record() {
        let html = wrap(r#"[{"CaseDisplayIdentifier":"123","CaseName":"test case","CaseID":1}]"#);
        let records = extract(&html);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["CaseDisplayIdentifier"], "123");
        assert_eq!(records[0]["CaseID"], 1);
    }

    #[test]
    fn test_apostrophe_in_name_does_not_truncate() {
        let html = wrap(
            r#"[{"CaseDisplayIdentifier":"8011-01-25","CaseName":"בז'נוב נ' אריסטון","ClaimAmount":15000000}]"#,
        );
        let records = extract(&html);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["CaseName"], "בז'נוב נ' אריסטון");
    }

    #[test]
    fn test_backslash_escaped_apostrophe() {
        let html = wrap(r#"[{"CaseName":"O\'Brien v. Acme","CaseID":7}]"#);
        let records = extract(&html);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["CaseName"], "O'Brien v. Acme");
    }

    #[test]
    fn test_round_trip_preserves_records() {
        let cases = json!([
            {"CaseDisplayIdentifier": "8011-01-25", "CaseName": "דוגמה נ' נתבע", "ClaimAmount": 15000000, "Docs": [{"Id": 1}]},
            {"CaseDisplayIdentifier": "8012-01-25", "CaseName": "Second", "ClaimAmount": null, "isAppealCase": "1"},
            {"CaseID": 83300967}
        ]);
        let html = wrap(&serde_json::to_string(&cases).unwrap());

        let records = extract(&html);

        assert_eq!(records.len(), 3);
        assert_eq!(Value::Array(records), cases);
    }

    #[test]
    fn test_double_quoted_entity_encoded_value() {
        let html = format!(
            r#"<input type="hidden" id="{DEFAULT_TARGET_ID}" value="[{{&quot;CaseName&quot;:&quot;Smith &amp; Sons&#39;&quot;}}]" />"#
        );
        let records = extract(&html);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["CaseName"], "Smith & Sons'");
    }

    #[test]
    fn test_trailing_attribute_after_value() {
        let html = format!(
            r#"<input id="{DEFAULT_TARGET_ID}" value='[{{"CaseID":5}}]' type="hidden">"#
        );
        let records = extract(&html);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["CaseID"], 5);
    }

    #[test]
    fn test_value_before_id_uses_document_fallback() {
        let html = format!(
            r#"<input type="hidden" value='[{{"CaseID":1}},{{"CaseID":2}}]' id="{DEFAULT_TARGET_ID}" />"#
        );
        let records = extract(&html);

        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["CaseID"], 2);
    }

    #[test]
    fn test_single_object_payload_is_wrapped() {
        let html = wrap(r#"{"CaseDisplayIdentifier":"9","CaseName":"solo"}"#);
        let records = extract(&html);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["CaseName"], "solo");
    }

    #[test]
    fn test_scalar_payload_is_rejected() {
        let html = wrap("42");
        assert!(extract(&html).is_empty());
        assert!(matches!(
            try_extract(&html),
            Err(ExtractError::UnexpectedShape("number"))
        ));
    }

    #[test]
    fn test_invalid_json_returns_empty() {
        let html = wrap(r#"[{"CaseID": 1,,}]"#);
        assert!(extract(&html).is_empty());
        assert!(matches!(try_extract(&html), Err(ExtractError::Json(_))));
    }

    #[test]
    fn test_empty_payload() {
        let html = wrap("");
        assert!(extract(&html).is_empty());
        assert!(matches!(try_extract(&html), Err(ExtractError::EmptyPayload)));
    }

    #[test]
    fn test_hidden_input_scan_is_opt_in() {
        let html = r#"
            <input type="hidden" id="__VIEWSTATE" value="dDwtMTA4NzY" />
            <input type="hidden" id="LegacyStore" value='{"CaseNumber":"CA 2024-001","CaseName":"first"}' />
            <input type="hidden" id="LegacyList" value='[{"CaseNumber":"CA 2024-002"},{"CaseNumber":"CA 2024-003"}]' />
            <input type="text" id="Visible" value='{"CaseNumber":"ignored"}' />
        "#;

        assert!(extract(html).is_empty());

        let extractor = Extractor::default().scan_hidden_inputs(true);
        let records = extractor.extract(html);

        assert_eq!(records.len(), 3);
        assert_eq!(records[0]["CaseNumber"], "CA 2024-001");
        assert_eq!(records[2]["CaseNumber"], "CA 2024-003");
    }

    #[test]
    fn test_custom_target_id() {
        let extractor = Extractor::new("Grid.Store[0]").unwrap();
        let html = r#"<input type="hidden" id="Grid.Store[0]" value='[{"CaseID":3}]' />"#;

        assert_eq!(extractor.target_id(), "Grid.Store[0]");
        assert_eq!(extractor.extract(html).len(), 1);
        assert!(extract(html).is_empty());
    }

    #[test]
    fn test_named_references_are_decoded() {
        let html = format!(
            r#"<input type="hidden" id="{DEFAULT_TARGET_ID}" value="[{{&quot;CaseName&quot;:&quot;O&rsquo;Brien &ndash; Acme &#x5D0;&quot;}}]" />"#
        );
        let records = extract(&html);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["CaseName"], "O\u{2019}Brien \u{2013} Acme \u{5D0}");
    }

    #[test]
    fn test_pattern_and_document_paths_agree() {
        let payload = "[{&quot;CaseName&quot;:&quot;O&rsquo;Brien &ndash; Acme &amp; Sons&quot;}]";
        let id_first =
            format!(r#"<input type="hidden" id="{DEFAULT_TARGET_ID}" value="{payload}" />"#);
        let value_first =
            format!(r#"<input type="hidden" value="{payload}" id="{DEFAULT_TARGET_ID}" />"#);

        let by_pattern = try_extract(&id_first).unwrap();
        let by_document = try_extract(&value_first).unwrap();

        assert_eq!(by_pattern, by_document);
        assert_eq!(by_pattern[0]["CaseName"], "O\u{2019}Brien \u{2013} Acme & Sons");
    }

    #[test]
    fn test_data_id_attribute_is_not_the_target() {
        let html = format!(
            r#"<input type="hidden" data-id="{DEFAULT_TARGET_ID}" value='[{{"CaseID":1}}]' />"#
        );
        assert!(extract(&html).is_empty());
        assert!(matches!(
            try_extract(&html),
            Err(ExtractError::TargetNotFound(_))
        ));
    }

    #[test]
    fn test_undecodable_match_falls_back_to_document() {
        // No space before the next attribute, so the pattern runs on to the
        // following input's closing quote.
        let html = format!(
            r#"<input type="hidden" id="{DEFAULT_TARGET_ID}" value='[{{"CaseID":1}}]'data-grid="main">
<input type="hidden" id="Other" value='x' />"#
        );
        let records = try_extract(&html).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["CaseID"], 1);
    }
}
