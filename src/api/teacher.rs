use std::collections::HashSet;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentTeacher;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::{Essay, EssaySubmission, Quiz, QuizSubmission, User};
use crate::repositories::{essay_submissions, essays, quiz_submissions, quizzes, users};
use crate::schemas::analytics::{QuizDetailedAnalytics, StudentSummary, TeacherOverview};
use crate::schemas::essay::EssayResponse;
use crate::schemas::quiz::QuizResponse;
use crate::services::analytics;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/quizzes", get(list_quizzes))
        .route("/essays", get(list_essays))
        .route("/analytics/overview", get(overview))
        .route("/analytics/students", get(student_summaries))
        .route("/analytics/quiz/:quiz_id", get(quiz_details))
}

async fn list_quizzes(
    CurrentTeacher(teacher): CurrentTeacher,
    State(state): State<AppState>,
) -> Result<Json<Vec<QuizResponse>>, ApiError> {
    let quizzes = quizzes::list_by_teacher(state.db(), &teacher.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load quizzes"))?;

    Ok(Json(quizzes.into_iter().map(QuizResponse::from_db).collect()))
}

async fn list_essays(
    CurrentTeacher(teacher): CurrentTeacher,
    State(state): State<AppState>,
) -> Result<Json<Vec<EssayResponse>>, ApiError> {
    let essays = essays::list_by_teacher(state.db(), &teacher.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load essays"))?;

    Ok(Json(essays.into_iter().map(EssayResponse::from_db).collect()))
}

async fn overview(
    CurrentTeacher(teacher): CurrentTeacher,
    State(state): State<AppState>,
) -> Result<Json<TeacherOverview>, ApiError> {
    let (quizzes, essays, quiz_subs, essay_subs) = load_teacher_data(&state, &teacher.id).await?;

    Ok(Json(analytics::teacher_overview(
        primitive_now_utc(),
        &quizzes,
        &essays,
        &quiz_subs,
        &essay_subs,
    )))
}

async fn student_summaries(
    CurrentTeacher(teacher): CurrentTeacher,
    State(state): State<AppState>,
) -> Result<Json<Vec<StudentSummary>>, ApiError> {
    let (_quizzes, _essays, quiz_subs, essay_subs) = load_teacher_data(&state, &teacher.id).await?;

    let student_ids: HashSet<&str> = quiz_subs
        .iter()
        .map(|sub| sub.student_id.as_str())
        .chain(essay_subs.iter().map(|sub| sub.student_id.as_str()))
        .collect();
    let student_ids: Vec<String> = student_ids.into_iter().map(str::to_string).collect();

    let students: Vec<User> = users::find_by_ids(state.db(), &student_ids)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load students"))?;

    Ok(Json(analytics::student_summaries(&students, &quiz_subs, &essay_subs)))
}

async fn quiz_details(
    Path(quiz_id): Path<String>,
    CurrentTeacher(teacher): CurrentTeacher,
    State(state): State<AppState>,
) -> Result<Json<QuizDetailedAnalytics>, ApiError> {
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

    Ok(Json(analytics::quiz_detailed_analytics(&quiz.id, &submissions)))
}

/// Everything the teacher-facing aggregations need: the teacher's own
/// assignments and every submission made against them.
async fn load_teacher_data(
    state: &AppState,
    teacher_id: &str,
) -> Result<(Vec<Quiz>, Vec<Essay>, Vec<QuizSubmission>, Vec<EssaySubmission>), ApiError> {
    let quizzes = quizzes::list_by_teacher(state.db(), teacher_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load quizzes"))?;
    let essays = essays::list_by_teacher(state.db(), teacher_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load essays"))?;

    let quiz_ids: Vec<String> = quizzes.iter().map(|quiz| quiz.id.clone()).collect();
    let essay_ids: Vec<String> = essays.iter().map(|essay| essay.id.clone()).collect();

    let quiz_subs = quiz_submissions::list_by_quizzes(state.db(), &quiz_ids)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load quiz submissions"))?;
    let essay_subs = essay_submissions::list_by_essays(state.db(), &essay_ids)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load essay submissions"))?;

    Ok((quizzes, essays, quiz_subs, essay_subs))
}
