use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::api::errors::ApiError;
use crate::api::guards::{CurrentTeacher, CurrentUser};
use crate::core::state::AppState;
use crate::db::types::UserRole;
use crate::repositories::{essay_submissions, essays, quiz_submissions, quizzes};
use crate::schemas::analytics::{EssayAnalytics, QuizAnalytics, StudentAnalytics};
use crate::services::analytics;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/quiz/:quiz_id", get(quiz_analytics))
        .route("/essay/:essay_id", get(essay_analytics))
        .route("/student/:student_id", get(student_analytics))
}

async fn quiz_analytics(
    Path(quiz_id): Path<String>,
    CurrentTeacher(teacher): CurrentTeacher,
    State(state): State<AppState>,
) -> Result<Json<QuizAnalytics>, ApiError> {
    let quiz = quizzes::find_by_id(state.db(), &quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load quiz"))?
        .ok_or_else(|| ApiError::NotFound("Quiz not found".to_string()))?;

    if quiz.teacher_id != teacher.id {
        return Err(ApiError::Forbidden("Access denied"));
    }

    let submissions = quiz_submissions::list_by_quiz(state.db(), &quiz.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load quiz submissions"))?;

    Ok(Json(analytics::quiz_analytics(&quiz.id, &submissions)))
}

async fn essay_analytics(
    Path(essay_id): Path<String>,
    CurrentTeacher(teacher): CurrentTeacher,
    State(state): State<AppState>,
) -> Result<Json<EssayAnalytics>, ApiError> {
    let essay = essays::find_by_id(state.db(), &essay_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load essay"))?
        .ok_or_else(|| ApiError::NotFound("Essay not found".to_string()))?;

    if essay.teacher_id != teacher.id {
        return Err(ApiError::Forbidden("Access denied"));
    }

    let submissions = essay_submissions::list_by_essay(state.db(), &essay.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load essay submissions"))?;

    Ok(Json(analytics::essay_analytics(&essay.id, &submissions)))
}

/// Students may only read their own analytics; teachers may read anyone's.
async fn student_analytics(
    Path(student_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<StudentAnalytics>, ApiError> {
    if user.role == UserRole::Student && user.id != student_id {
        return Err(ApiError::Forbidden("Access denied"));
    }

    let quizzes = quizzes::list_all(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load quizzes"))?;
    let essays = essays::list_all(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load essays"))?;
    let quiz_subs = quiz_submissions::list_by_student(state.db(), &student_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load quiz submissions"))?;
    let essay_subs = essay_submissions::list_by_student(state.db(), &student_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load essay submissions"))?;

    Ok(Json(analytics::student_analytics(
        &student_id,
        &quizzes,
        &essays,
        &quiz_subs,
        &essay_subs,
    )))
}
