//! Result Interpreter — turns raw model text into a typed `EvaluationResult`
//! and maps scores onto eligibility and gauge-colour bands.
//!
//! The model is asked for strict JSON but nothing guarantees it. Everything
//! that is not a JSON object with the expected field types is a
//! `ResponseParse` error; missing fields default permissively.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::AppError;

pub const JD_MATCH_FIELD: &str = "JD Match";
pub const ATS_SCORE_FIELD: &str = "ATS Score";
pub const MISSING_KEYWORDS_FIELD: &str = "MissingKeywords";
pub const STRONG_POINTS_FIELD: &str = "StrongPoints";
pub const SUGGESTIONS_FIELD: &str = "Suggestions";
pub const CONCLUSION_FIELD: &str = "Conclusion";

/// Exactly one variant per evaluation, chosen by whether a job description
/// was supplied with the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EvaluationResult {
    JobMatch {
        match_percentage: u8,
        missing_keywords: Vec<String>,
    },
    AtsReview {
        ats_score: u8,
        strong_points: Vec<String>,
        suggestions: String,
        conclusion: String,
    },
}

impl EvaluationResult {
    /// The percentage shown on the gauge.
    pub fn score(&self) -> u8 {
        match self {
            EvaluationResult::JobMatch {
                match_percentage, ..
            } => *match_percentage,
            EvaluationResult::AtsReview { ats_score, .. } => *ats_score,
        }
    }
}

/// Parses the raw model response into the variant selected by `has_job_description`.
pub fn interpret_response(
    raw: &str,
    has_job_description: bool,
) -> Result<EvaluationResult, AppError> {
    let value: Value = serde_json::from_str(strip_json_fences(raw))
        .map_err(|e| AppError::ResponseParse(e.to_string()))?;

    let record = value.as_object().ok_or_else(|| {
        AppError::ResponseParse(format!(
            "expected a JSON object, got {}",
            json_type_name(&value)
        ))
    })?;

    if has_job_description {
        Ok(EvaluationResult::JobMatch {
            match_percentage: percentage_field(record, JD_MATCH_FIELD)?,
            missing_keywords: string_list_field(record, MISSING_KEYWORDS_FIELD)?,
        })
    } else {
        Ok(EvaluationResult::AtsReview {
            ats_score: percentage_field(record, ATS_SCORE_FIELD)?,
            strong_points: string_list_field(record, STRONG_POINTS_FIELD)?,
            suggestions: text_field(record, SUGGESTIONS_FIELD)?,
            conclusion: text_field(record, CONCLUSION_FIELD)?,
        })
    }
}

/// Reads `"75%"`, `"75"` or `75`. Absent or null means 0.
fn percentage_field(record: &Map<String, Value>, field: &str) -> Result<u8, AppError> {
    let parsed = match record.get(field) {
        None | Some(Value::Null) => return Ok(0),
        Some(Value::String(s)) => {
            let s = s.trim();
            let digits = s.strip_suffix('%').unwrap_or(s).trim_end();
            digits.parse::<i64>().map_err(|_| {
                AppError::ResponseParse(format!("\"{field}\" is not a percentage: {s:?}"))
            })?
        }
        Some(Value::Number(n)) => n.as_i64().ok_or_else(|| {
            AppError::ResponseParse(format!("\"{field}\" is not an integer: {n}"))
        })?,
        Some(other) => {
            return Err(AppError::ResponseParse(format!(
                "\"{field}\" must be a string, got {}",
                json_type_name(other)
            )))
        }
    };

    u8::try_from(parsed)
        .ok()
        .filter(|p| *p <= 100)
        .ok_or_else(|| AppError::ResponseParse(format!("\"{field}\" out of range: {parsed}")))
}

fn string_list_field(record: &Map<String, Value>, field: &str) -> Result<Vec<String>, AppError> {
    match record.get(field) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str().map(String::from).ok_or_else(|| {
                    AppError::ResponseParse(format!(
                        "\"{field}\" must contain only strings, found {}",
                        json_type_name(item)
                    ))
                })
            })
            .collect(),
        Some(other) => Err(AppError::ResponseParse(format!(
            "\"{field}\" must be a list, got {}",
            json_type_name(other)
        ))),
    }
}

fn text_field(record: &Map<String, Value>, field: &str) -> Result<String, AppError> {
    match record.get(field) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(AppError::ResponseParse(format!(
            "\"{field}\" must be text, got {}",
            json_type_name(other)
        ))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Bands
// ────────────────────────────────────────────────────────────────────────────

/// Role eligibility derived from the JD match percentage.
///
/// [0,30] not eligible, [31,60] needs update, [61,80] good but needs update,
/// [81,100] perfect fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityBand {
    NotEligible,
    NeedsUpdate,
    GoodNeedsUpdate,
    PerfectFit,
}

impl EligibilityBand {
    pub fn from_percentage(pct: u8) -> Self {
        match pct {
            0..=30 => EligibilityBand::NotEligible,
            31..=60 => EligibilityBand::NeedsUpdate,
            61..=80 => EligibilityBand::GoodNeedsUpdate,
            _ => EligibilityBand::PerfectFit,
        }
    }

    pub fn status_message(self) -> &'static str {
        match self {
            EligibilityBand::NotEligible => "You are not eligible for this job role.",
            EligibilityBand::NeedsUpdate => "Please update your resume for this job role.",
            EligibilityBand::GoodNeedsUpdate => "Good, but you need to update your resume.",
            EligibilityBand::PerfectFit => "Congrats, you are perfect for this job role!",
        }
    }

    pub fn expected_salary(self) -> &'static str {
        match self {
            EligibilityBand::NotEligible => "2k",
            EligibilityBand::NeedsUpdate => "4k",
            EligibilityBand::GoodNeedsUpdate => "5k to 6k",
            EligibilityBand::PerfectFit => "6k to 7k",
        }
    }
}

/// Gauge bar colour for any percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GaugeColor {
    DarkRed,
    LightCoral,
    Orange,
    LightGreen,
    DarkGreen,
}

impl GaugeColor {
    pub fn from_percentage(pct: u8) -> Self {
        match pct {
            0..=40 => GaugeColor::DarkRed,
            41..=60 => GaugeColor::LightCoral,
            61..=80 => GaugeColor::Orange,
            81..=90 => GaugeColor::LightGreen,
            _ => GaugeColor::DarkGreen,
        }
    }
}
