use serde::{Deserialize, Serialize};

/// Fewer whitespace-delimited words than this and the resume is "too short".
pub const MIN_WORD_COUNT: usize = 200;

/// At least one of these must appear (case-insensitive) somewhere in the text.
const STANDARD_SECTIONS: &[&str] = &["skills", "experience", "education"];

pub const TOO_SHORT_REASON: &str = "Your resume text is too short. Consider adding more details.";
pub const MISSING_SECTIONS_REASON: &str =
    "Missing standard sections like Skills, Experience, or Education.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatCheckResult {
    pub is_acceptable: bool,
    pub reasons: Vec<String>,
}

/// Applies both heuristics and reports every rule that fired.
///
/// Either rule firing blocks the evaluation; there is no partial credit.
pub fn check_resume_format(text: &str) -> FormatCheckResult {
    let mut reasons = Vec::new();

    if word_count(text) < MIN_WORD_COUNT {
        reasons.push(TOO_SHORT_REASON.to_string());
    }

    let lower = text.to_lowercase();
    if !STANDARD_SECTIONS.iter().any(|s| lower.contains(s)) {
        reasons.push(MISSING_SECTIONS_REASON.to_string());
    }

    FormatCheckResult {
        is_acceptable: reasons.is_empty(),
        reasons,
    }
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
pub(crate) fn filler(words: usize) -> String {
    vec!["lorem"; words].join(" ")
}
