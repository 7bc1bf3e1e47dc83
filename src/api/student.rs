use std::collections::HashSet;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentStudent;
use crate::core::state::AppState;
use crate::repositories::{essay_submissions, essays, quiz_submissions, quizzes};
use crate::schemas::analytics::Dashboard;
use crate::schemas::essay::{EssayResponse, EssaySubmissionResponse};
use crate::schemas::quiz::{QuizResponse, QuizSubmissionResponse};
use crate::services::analytics;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/quizzes/available", get(available_quizzes))
        .route("/essays/available", get(available_essays))
        .route("/submissions/quizzes", get(quiz_history))
        .route("/submissions/essays", get(essay_history))
}

async fn dashboard(
    CurrentStudent(student): CurrentStudent,
    State(state): State<AppState>,
) -> Result<Json<Dashboard>, ApiError> {
    let quizzes = quizzes::list_all(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load quizzes"))?;
    let essays = essays::list_all(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load essays"))?;
    let quiz_subs = quiz_submissions::list_by_student(state.db(), &student.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load quiz submissions"))?;
    let essay_subs = essay_submissions::list_by_student(state.db(), &student.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load essay submissions"))?;

    Ok(Json(analytics::dashboard(quizzes, essays, &quiz_subs, &essay_subs)))
}

async fn available_quizzes(
    CurrentStudent(student): CurrentStudent,
    State(state): State<AppState>,
) -> Result<Json<Vec<QuizResponse>>, ApiError> {
    let quizzes = quizzes::list_all(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load quizzes"))?;
    let submissions = quiz_submissions::list_by_student(state.db(), &student.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load quiz submissions"))?;

    let submitted: HashSet<&str> = submissions.iter().map(|sub| sub.quiz_id.as_str()).collect();
    let available = quizzes
        .into_iter()
        .filter(|quiz| !submitted.contains(quiz.id.as_str()))
        .map(QuizResponse::from_db)
        .collect();

    Ok(Json(available))
}

async fn available_essays(
    CurrentStudent(student): CurrentStudent,
    State(state): State<AppState>,
) -> Result<Json<Vec<EssayResponse>>, ApiError> {
    let essays = essays::list_all(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load essays"))?;
    let submissions = essay_submissions::list_by_student(state.db(), &student.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load essay submissions"))?;

    let submitted: HashSet<&str> = submissions.iter().map(|sub| sub.essay_id.as_str()).collect();
    let available = essays
        .into_iter()
        .filter(|essay| !submitted.contains(essay.id.as_str()))
        .map(EssayResponse::from_db)
        .collect();

    Ok(Json(available))
}

async fn quiz_history(
    CurrentStudent(student): CurrentStudent,
    State(state): State<AppState>,
) -> Result<Json<Vec<QuizSubmissionResponse>>, ApiError> {
    let submissions = quiz_submissions::list_by_student(state.db(), &student.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load quiz submissions"))?;

    Ok(Json(submissions.into_iter().map(QuizSubmissionResponse::from_db).collect()))
}

async fn essay_history(
    CurrentStudent(student): CurrentStudent,
    State(state): State<AppState>,
) -> Result<Json<Vec<EssaySubmissionResponse>>, ApiError> {
    let submissions = essay_submissions::list_by_student(state.db(), &student.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load essay submissions"))?;

    Ok(Json(submissions.into_iter().map(EssaySubmissionResponse::from_db).collect()))
}
