use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use time::PrimitiveDateTime;

use crate::db::types::{AiFeedback, AnswerMap, Question, Rubric, UserRole};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct User {
    pub(crate) id: String,
    pub(crate) firebase_uid: String,
    pub(crate) email: String,
    pub(crate) full_name: String,
    pub(crate) role: UserRole,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Quiz {
    pub(crate) id: String,
    pub(crate) teacher_id: String,
    pub(crate) title: String,
    pub(crate) questions: Json<Vec<Question>>,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct QuizSubmission {
    pub(crate) id: String,
    pub(crate) quiz_id: String,
    pub(crate) student_id: String,
    pub(crate) answers: Json<AnswerMap>,
    pub(crate) score: i32,
    pub(crate) submitted_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Essay {
    pub(crate) id: String,
    pub(crate) teacher_id: String,
    pub(crate) prompt: String,
    pub(crate) rubric: Json<Rubric>,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct EssaySubmission {
    pub(crate) id: String,
    pub(crate) essay_id: String,
    pub(crate) student_id: String,
    pub(crate) content: String,
    pub(crate) ai_feedback: Option<Json<AiFeedback>>,
    pub(crate) rubric_scores: Option<Json<BTreeMap<String, f64>>>,
    pub(crate) submitted_at: PrimitiveDateTime,
}

impl EssaySubmission {
    pub(crate) fn feedback(&self) -> Option<&AiFeedback> {
        self.ai_feedback.as_ref().map(|json| &json.0)
    }
}
