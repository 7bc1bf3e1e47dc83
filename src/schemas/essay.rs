use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::{Essay, EssaySubmission};
use crate::db::types::{AiFeedback, Rubric};

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct EssayCreate {
    #[validate(length(min = 1, message = "prompt must not be empty"))]
    pub(crate) prompt: String,
    #[serde(default)]
    pub(crate) rubric: Rubric,
}

#[derive(Debug, Serialize)]
pub(crate) struct EssayResponse {
    pub(crate) id: String,
    pub(crate) teacher_id: String,
    pub(crate) prompt: String,
    pub(crate) rubric: Rubric,
    pub(crate) created_at: String,
}

impl EssayResponse {
    pub(crate) fn from_db(essay: Essay) -> Self {
        Self {
            id: essay.id,
            teacher_id: essay.teacher_id,
            prompt: essay.prompt,
            rubric: essay.rubric.0,
            created_at: format_primitive(essay.created_at),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct EssaySubmissionRequest {
    #[serde(alias = "text")]
    #[validate(length(min = 1, message = "content must not be empty"))]
    pub(crate) content: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct EssaySubmissionResponse {
    pub(crate) id: String,
    pub(crate) essay_id: String,
    pub(crate) student_id: String,
    pub(crate) content: String,
    pub(crate) ai_feedback: Option<AiFeedback>,
    pub(crate) rubric_scores: Option<BTreeMap<String, f64>>,
    pub(crate) submitted_at: String,
}

impl EssaySubmissionResponse {
    pub(crate) fn from_db(submission: EssaySubmission) -> Self {
        Self {
            id: submission.id,
            essay_id: submission.essay_id,
            student_id: submission.student_id,
            content: submission.content,
            ai_feedback: submission.ai_feedback.map(|json| json.0),
            rubric_scores: submission.rubric_scores.map(|json| json.0),
            submitted_at: format_primitive(submission.submitted_at),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct FeedbackQuery {
    #[serde(alias = "submissionId")]
    pub(crate) submission_id: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct FeedbackEnvelope {
    pub(crate) feedback: AiFeedback,
}
