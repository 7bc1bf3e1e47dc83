use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::{CurrentStudent, CurrentTeacher, CurrentUser};
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories::{essay_submissions, essays};
use crate::schemas::essay::{
    EssayCreate, EssayResponse, EssaySubmissionRequest, EssaySubmissionResponse, FeedbackEnvelope,
    FeedbackQuery,
};
use crate::services::submissions;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_essay))
        .route("/:essay_id", get(get_essay))
        .route("/:essay_id/submit", post(submit_essay))
        .route("/:essay_id/feedback", post(regenerate_feedback))
}

async fn create_essay(
    CurrentTeacher(teacher): CurrentTeacher,
    State(state): State<AppState>,
    Json(payload): Json<EssayCreate>,
) -> Result<(StatusCode, Json<EssayResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let essay = essays::create(
        state.db(),
        essays::CreateEssay {
            id: &Uuid::new_v4().to_string(),
            teacher_id: &teacher.id,
            prompt: &payload.prompt,
            rubric: payload.rubric,
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create essay"))?;

    tracing::info!(essay_id = %essay.id, teacher_id = %teacher.id, "Created essay assignment");

    Ok((StatusCode::CREATED, Json(EssayResponse::from_db(essay))))
}

async fn get_essay(
    Path(essay_id): Path<String>,
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<EssayResponse>, ApiError> {
    let essay = essays::find_by_id(state.db(), &essay_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load essay"))?
        .ok_or_else(|| ApiError::NotFound("Essay not found".to_string()))?;

    Ok(Json(EssayResponse::from_db(essay)))
}

/// Store the essay with whatever feedback the generator produced. The
/// submission itself never fails on feedback problems.
async fn submit_essay(
    Path(essay_id): Path<String>,
    CurrentStudent(student): CurrentStudent,
    State(state): State<AppState>,
    Json(payload): Json<EssaySubmissionRequest>,
) -> Result<Json<EssaySubmissionResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let essay = essays::find_by_id(state.db(), &essay_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load essay"))?
        .ok_or_else(|| ApiError::NotFound("Essay not found".to_string()))?;

    let submission = submissions::submit_essay(&state, &essay, &student.id, payload.content)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to store essay submission"))?;

    Ok(Json(EssaySubmissionResponse::from_db(submission)))
}

async fn regenerate_feedback(
    Path(essay_id): Path<String>,
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
    Query(query): Query<FeedbackQuery>,
) -> Result<Json<FeedbackEnvelope>, ApiError> {
    let submission = essay_submissions::find_by_id(state.db(), &query.submission_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load submission"))?
        .filter(|submission| submission.essay_id == essay_id)
        .ok_or_else(|| ApiError::NotFound("Submission not found".to_string()))?;

    let essay = essays::find_by_id(state.db(), &essay_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load essay"))?
        .ok_or_else(|| ApiError::NotFound("Essay not found".to_string()))?;

    let feedback = submissions::regenerate_feedback(&state, &essay, &submission)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to store regenerated feedback"))?;

    Ok(Json(FeedbackEnvelope { feedback }))
}
