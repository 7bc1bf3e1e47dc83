use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "userrole", rename_all = "lowercase")]
pub(crate) enum UserRole {
    Teacher,
    Student,
}

/// One quiz question with its answer key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Question {
    pub(crate) text: String,
    pub(crate) options: Vec<String>,
    pub(crate) correct_answer: i32,
}

/// Submitted quiz answers, keyed by stringified question position.
pub(crate) type AnswerMap = BTreeMap<String, i32>;

/// Essay rubric: criterion name to its description.
pub(crate) type Rubric = BTreeMap<String, RubricCriterion>;

/// A rubric criterion is stored either as a bare description string or as an
/// object with an optional weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub(crate) enum RubricCriterion {
    Text(String),
    Detailed {
        description: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        weight: Option<f64>,
    },
}

impl RubricCriterion {
    pub(crate) fn description(&self) -> &str {
        match self {
            RubricCriterion::Text(text) => text,
            RubricCriterion::Detailed { description, .. } => description,
        }
    }
}

/// Structured essay feedback as produced by the generator and stored on the
/// submission row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct FeedbackReport {
    pub(crate) grammar_score: i32,
    pub(crate) clarity_score: i32,
    pub(crate) keyword_usage_score: i32,
    pub(crate) overall_feedback: String,
    pub(crate) strengths: Vec<String>,
    pub(crate) weaknesses: Vec<String>,
    pub(crate) suggestions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) overall_score: Option<i32>,
}

impl FeedbackReport {
    /// Force every score into [0, 100]. Provider output is not trusted to
    /// respect the requested range.
    pub(crate) fn clamped(mut self) -> Self {
        self.grammar_score = self.grammar_score.clamp(0, 100);
        self.clarity_score = self.clarity_score.clamp(0, 100);
        self.keyword_usage_score = self.keyword_usage_score.clamp(0, 100);
        self.overall_score = self.overall_score.map(|score| score.clamp(0, 100));
        self
    }
}

/// Essay feedback in one of three shapes: a parsed report, the neutral
/// fallback carrying the provider failure, or the raw text of a response
/// that could not be structured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub(crate) enum AiFeedback {
    Ready {
        #[serde(flatten)]
        report: FeedbackReport,
    },
    Fallback {
        #[serde(flatten)]
        report: FeedbackReport,
        error: String,
    },
    Unparsable {
        error: String,
        raw: String,
    },
}

impl AiFeedback {
    /// The structured report, if this feedback carries one.
    pub(crate) fn report(&self) -> Option<&FeedbackReport> {
        match self {
            AiFeedback::Ready { report } | AiFeedback::Fallback { report, .. } => Some(report),
            AiFeedback::Unparsable { .. } => None,
        }
    }

    pub(crate) fn overall_score(&self) -> Option<i32> {
        self.report().and_then(|report| report.overall_score)
    }

    pub(crate) fn is_degraded(&self) -> bool {
        !matches!(self, AiFeedback::Ready { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> FeedbackReport {
        FeedbackReport {
            grammar_score: 80,
            clarity_score: 75,
            keyword_usage_score: 70,
            overall_feedback: "Solid work".to_string(),
            strengths: vec!["Good structure".to_string()],
            weaknesses: vec!["Weak conclusion".to_string()],
            suggestions: vec!["Expand the final paragraph".to_string()],
            overall_score: None,
        }
    }

    #[test]
    fn rubric_criterion_accepts_bare_string() {
        let criterion: RubricCriterion = serde_json::from_str("\"Uses topic vocabulary\"").unwrap();
        assert_eq!(criterion.description(), "Uses topic vocabulary");
    }

    #[test]
    fn rubric_criterion_accepts_object_with_weight() {
        let criterion: RubricCriterion =
            serde_json::from_str(r#"{"description": "Grammar", "weight": 0.4}"#).unwrap();
        assert_eq!(criterion.description(), "Grammar");
        assert!(matches!(criterion, RubricCriterion::Detailed { weight: Some(w), .. } if w == 0.4));
    }

    #[test]
    fn feedback_serializes_with_status_tag() {
        let ready = AiFeedback::Ready { report: report() };
        let value = serde_json::to_value(&ready).unwrap();
        assert_eq!(value["status"], "ready");
        assert_eq!(value["grammar_score"], 80);

        let parsed: AiFeedback = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, ready);
    }

    #[test]
    fn fallback_and_unparsable_stay_distinguishable() {
        let fallback =
            AiFeedback::Fallback { report: report(), error: "timeout".to_string() };
        let unparsable =
            AiFeedback::Unparsable { error: "not json".to_string(), raw: "hello".to_string() };

        let fallback_value = serde_json::to_value(&fallback).unwrap();
        let unparsable_value = serde_json::to_value(&unparsable).unwrap();
        assert_eq!(fallback_value["status"], "fallback");
        assert_eq!(unparsable_value["status"], "unparsable");
        assert!(unparsable_value.get("grammar_score").is_none());

        assert!(fallback.is_degraded());
        assert!(unparsable.is_degraded());
        assert!(!AiFeedback::Ready { report: report() }.is_degraded());
    }

    #[test]
    fn clamped_restores_score_bounds() {
        let mut out_of_range = report();
        out_of_range.grammar_score = 140;
        out_of_range.clarity_score = -5;
        out_of_range.overall_score = Some(1000);

        let clamped = out_of_range.clamped();
        assert_eq!(clamped.grammar_score, 100);
        assert_eq!(clamped.clarity_score, 0);
        assert_eq!(clamped.overall_score, Some(100));
    }

    #[test]
    fn overall_score_reads_through_report() {
        let mut with_score = report();
        with_score.overall_score = Some(88);
        assert_eq!(AiFeedback::Ready { report: with_score }.overall_score(), Some(88));
        assert_eq!(
            AiFeedback::Unparsable { error: "x".to_string(), raw: "y".to_string() }
                .overall_score(),
            None
        );
    }
}
