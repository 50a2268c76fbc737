//! A small registry page with two cases, used by the `demo` command.
//!
//! Mirrors the live page's markup: the case array sits in a hidden input's
//! single-quoted `value`, and the case names carry raw apostrophes.

pub const SAMPLE_HTML: &str = r##"<!DOCTYPE html>
<html dir="rtl" lang="he">
<head><meta charset="utf-8"><title>פנקס תובענות ייצוגיות</title></head>
<body>
<form id="form1">
<input type="hidden" id="RepresentativeRegistryGridArrayStore"
value='[
    {"CaseDisplayIdentifier":"8011-01-25","CaseName":"בז'נוב נ' אריסטון","CaseOpenDate":"03/12/2025","CourtName":"אזורי לעבודה חיפה","ClaimAmount":15000000,"CaseID":83300966,"isAppealCase":"0","RepresentativeComplaintGroupName":"עובדים","LegalQuestion":"זכויות עובדים","RequestedAID":"תגמול","Docs":[]},
    {"CaseDisplayIdentifier":"8012-01-25","CaseName":"דוגמה שניה נ' נתבע","CaseOpenDate":"04/12/2025","CourtName":"מחוזי תל אביב","ClaimAmount":25000000,"CaseID":83300967,"isAppealCase":"1","RepresentativeComplaintGroupName":"צרכנים","LegalQuestion":"הגנת צרכן","RequestedAID":"פיצוי","Docs":[]}
]' />
</form>
</body>
</html>
"##;
