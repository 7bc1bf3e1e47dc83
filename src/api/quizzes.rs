use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::{CurrentStudent, CurrentTeacher, CurrentUser};
use crate::api::validation;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories::quizzes;
use crate::schemas::quiz::{
    QuizCreate, QuizResponse, QuizSubmissionRequest, QuizSubmissionResponse,
};
use crate::services::submissions;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_quiz))
        .route("/:quiz_id", get(get_quiz))
        .route("/:quiz_id/submit", post(submit_quiz))
}

async fn create_quiz(
    CurrentTeacher(teacher): CurrentTeacher,
    State(state): State<AppState>,
    Json(payload): Json<QuizCreate>,
) -> Result<(StatusCode, Json<QuizResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    validation::validate_questions(&payload.questions)?;

    let quiz = quizzes::create(
        state.db(),
        quizzes::CreateQuiz {
            id: &Uuid::new_v4().to_string(),
            teacher_id: &teacher.id,
            title: &payload.title,
            questions: payload.questions,
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create quiz"))?;

    tracing::info!(quiz_id = %quiz.id, teacher_id = %teacher.id, "Created quiz");

    Ok((StatusCode::CREATED, Json(QuizResponse::from_db(quiz))))
}

async fn get_quiz(
    Path(quiz_id): Path<String>,
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<QuizResponse>, ApiError> {
    let quiz = quizzes::find_by_id(state.db(), &quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load quiz"))?
        .ok_or_else(|| ApiError::NotFound("Quiz not found".to_string()))?;

    Ok(Json(QuizResponse::from_db(quiz)))
}

/// Grade the answers against the stored key and persist the result in one
/// step. Resubmissions are allowed; each lands as its own row.
async fn submit_quiz(
    Path(quiz_id): Path<String>,
    CurrentStudent(student): CurrentStudent,
    State(state): State<AppState>,
    Json(payload): Json<QuizSubmissionRequest>,
) -> Result<Json<QuizSubmissionResponse>, ApiError> {
    let quiz = quizzes::find_by_id(state.db(), &quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load quiz"))?
        .ok_or_else(|| ApiError::NotFound("Quiz not found".to_string()))?;

    let submission = submissions::submit_quiz(&state, &quiz, &student.id, payload.answers)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to store quiz submission"))?;

    Ok(Json(QuizSubmissionResponse::from_db(submission)))
}
