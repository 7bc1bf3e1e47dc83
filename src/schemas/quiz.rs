use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::{Quiz, QuizSubmission};
use crate::db::types::{AnswerMap, Question};

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct QuizCreate {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) questions: Vec<Question>,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuizResponse {
    pub(crate) id: String,
    pub(crate) teacher_id: String,
    pub(crate) title: String,
    pub(crate) questions: Vec<Question>,
    pub(crate) created_at: String,
}

impl QuizResponse {
    pub(crate) fn from_db(quiz: Quiz) -> Self {
        Self {
            id: quiz.id,
            teacher_id: quiz.teacher_id,
            title: quiz.title,
            questions: quiz.questions.0,
            created_at: format_primitive(quiz.created_at),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuizSubmissionRequest {
    #[serde(default)]
    pub(crate) answers: AnswerMap,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuizSubmissionResponse {
    pub(crate) id: String,
    pub(crate) quiz_id: String,
    pub(crate) student_id: String,
    pub(crate) answers: AnswerMap,
    pub(crate) score: i32,
    pub(crate) submitted_at: String,
}

impl QuizSubmissionResponse {
    pub(crate) fn from_db(submission: QuizSubmission) -> Self {
        Self {
            id: submission.id,
            quiz_id: submission.quiz_id,
            student_id: submission.student_id,
            answers: submission.answers.0,
            score: submission.score,
            submitted_at: format_primitive(submission.submitted_at),
        }
    }
}
