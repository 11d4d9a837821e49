//! Report — the JSON the client renders: gauge, band commentary, and the
//! variant-specific text with the fallback messages for empty fields.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::screening::interpreter::{EligibilityBand, EvaluationResult, GaugeColor};

const NO_MISSING_KEYWORDS: &str = "No keywords are missing. Great job!";
const NO_STRONG_POINTS: &str = "No strong points identified.";
const NO_SUGGESTIONS: &str = "No suggestions provided.";
const NO_CONCLUSION: &str = "No conclusion provided.";

#[derive(Debug, Clone, Serialize)]
pub struct Gauge {
    pub label: &'static str,
    pub value: u8,
    pub max: u8,
    pub color: GaugeColor,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportBody {
    JobMatch {
        match_percentage: u8,
        band: EligibilityBand,
        role_status: &'static str,
        expected_salary: &'static str,
        missing_keywords: Vec<String>,
        missing_keywords_summary: String,
    },
    AtsReview {
        ats_score: u8,
        strong_points: Vec<String>,
        strong_points_summary: String,
        suggestions: String,
        conclusion: String,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub evaluation_id: Uuid,
    pub evaluated_at: DateTime<Utc>,
    pub message: &'static str,
    pub gauge: Gauge,
    #[serde(flatten)]
    pub body: ReportBody,
}

pub fn build_report(result: EvaluationResult) -> EvaluationReport {
    let score = result.score();
    let label = match result {
        EvaluationResult::JobMatch { .. } => "JD Match %",
        EvaluationResult::AtsReview { .. } => "ATS Score",
    };

    let body = match result {
        EvaluationResult::JobMatch {
            match_percentage,
            missing_keywords,
        } => {
            let band = EligibilityBand::from_percentage(match_percentage);
            ReportBody::JobMatch {
                match_percentage,
                band,
                role_status: band.status_message(),
                expected_salary: band.expected_salary(),
                missing_keywords_summary: join_or(&missing_keywords, NO_MISSING_KEYWORDS),
                missing_keywords,
            }
        }
        EvaluationResult::AtsReview {
            ats_score,
            strong_points,
            suggestions,
            conclusion,
        } => ReportBody::AtsReview {
            ats_score,
            strong_points_summary: join_or(&strong_points, NO_STRONG_POINTS),
            strong_points,
            suggestions: text_or(suggestions, NO_SUGGESTIONS),
            conclusion: text_or(conclusion, NO_CONCLUSION),
        },
    };

    EvaluationReport {
        evaluation_id: Uuid::new_v4(),
        evaluated_at: Utc::now(),
        message: "Evaluation Complete!",
        gauge: Gauge {
            label,
            value: score,
            max: 100,
            color: GaugeColor::from_percentage(score),
        },
        body,
    }
}

fn join_or(items: &[String], fallback: &str) -> String {
    if items.is_empty() {
        fallback.to_string()
    } else {
        items.join(", ")
    }
}

fn text_or(text: String, fallback: &str) -> String {
    if text.trim().is_empty() {
        fallback.to_string()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ats_report_gauge_and_text() {
        let report = build_report(EvaluationResult::AtsReview {
            ats_score: 82,
            strong_points: vec!["Python".into(), "SQL".into()],
            suggestions: "Add metrics".into(),
            conclusion: "Strong candidate".into(),
        });
        assert_eq!(report.gauge.label, "ATS Score");
        assert_eq!(report.gauge.value, 82);
        assert_eq!(report.gauge.color, GaugeColor::LightGreen);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["kind"], "ats_review");
        assert_eq!(json["gauge"]["color"], "lightgreen");
        assert_eq!(json["strong_points_summary"], "Python, SQL");
        assert_eq!(json["suggestions"], "Add metrics");
    }

    #[test]
    fn test_ats_report_fallbacks() {
        let report = build_report(EvaluationResult::AtsReview {
            ats_score: 0,
            strong_points: vec![],
            suggestions: String::new(),
            conclusion: " ".into(),
        });
        match report.body {
            ReportBody::AtsReview {
                strong_points_summary,
                suggestions,
                conclusion,
                ..
            } => {
                assert_eq!(strong_points_summary, NO_STRONG_POINTS);
                assert_eq!(suggestions, NO_SUGGESTIONS);
                assert_eq!(conclusion, NO_CONCLUSION);
            }
            other => panic!("unexpected body {other:?}"),
        }
        assert_eq!(report.gauge.color, GaugeColor::DarkRed);
    }

    #[test]
    fn test_job_match_report_band_commentary() {
        let report = build_report(EvaluationResult::JobMatch {
            match_percentage: 25,
            missing_keywords: vec!["SQL".into(), "Docker".into()],
        });
        assert_eq!(report.gauge.label, "JD Match %");
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["kind"], "job_match");
        assert_eq!(json["band"], "not_eligible");
        assert_eq!(json["expected_salary"], "2k");
        assert_eq!(json["missing_keywords"], serde_json::json!(["SQL", "Docker"]));
        assert_eq!(json["missing_keywords_summary"], "SQL, Docker");
    }

    #[test]
    fn test_job_match_no_missing_keywords() {
        let report = build_report(EvaluationResult::JobMatch {
            match_percentage: 95,
            missing_keywords: vec![],
        });
        match report.body {
            ReportBody::JobMatch {
                band,
                missing_keywords_summary,
                role_status,
                ..
            } => {
                assert_eq!(band, EligibilityBand::PerfectFit);
                assert_eq!(role_status, "Congrats, you are perfect for this job role!");
                assert_eq!(missing_keywords_summary, NO_MISSING_KEYWORDS);
            }
            other => panic!("unexpected body {other:?}"),
        }
        assert_eq!(report.gauge.color, GaugeColor::DarkGreen);
    }
}
