use serde::{Deserialize, Serialize};

/// Prefixes naming the party whose finances a document evidences.
pub const FINANCIAL_PARTY_PREFIXES: [&str; 4] = ["SELF_", "MOTHER_", "FATHER_", "OTHER_INCOME_"];

/// Closed set of academic document types.
pub const EDUCATION_DOCUMENT_TYPES: [&str; 5] = [
    "MARKSHEET_10TH",
    "MARKSHEET_12TH",
    "GRE_SCORECARD",
    "TOEFL_SCORECARD",
    "LANGUAGE_TEST_SCORECARD",
];

/// Disjoint document categories used by the completion rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentCategory {
    Financial,
    Education,
    General,
}

/// Classify a document type tag. Tags matching neither pattern fall through to `General`.
///
/// A new catalog entry that happens to start with a party prefix is classified as financial
/// even if it is not one; the catalog must keep the patterns disjoint.
pub fn classify_document_type(tag: &str) -> DocumentCategory {
    let normalized = tag.trim().to_ascii_uppercase();

    if FINANCIAL_PARTY_PREFIXES
        .iter()
        .any(|prefix| normalized.starts_with(prefix))
    {
        DocumentCategory::Financial
    } else if EDUCATION_DOCUMENT_TYPES.contains(&normalized.as_str()) {
        DocumentCategory::Education
    } else {
        DocumentCategory::General
    }
}
