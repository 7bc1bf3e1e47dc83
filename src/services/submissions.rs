//! Submission workflow: the assignment is validated by the caller, the
//! grader or feedback generator runs here, and the fully formed record is
//! persisted. Feedback generation never fails the submission.

use uuid::Uuid;

use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::{Essay, EssaySubmission, Quiz, QuizSubmission};
use crate::db::types::{AiFeedback, AnswerMap};
use crate::repositories;
use crate::repositories::essay_submissions::CreateEssaySubmission;
use crate::repositories::quiz_submissions::CreateQuizSubmission;
use crate::services::grading;

pub(crate) async fn submit_quiz(
    state: &AppState,
    quiz: &Quiz,
    student_id: &str,
    answers: AnswerMap,
) -> Result<QuizSubmission, sqlx::Error> {
    let score = grading::grade(&quiz.questions.0, &answers);
    let submission_id = Uuid::new_v4().to_string();

    let submission = repositories::quiz_submissions::create(
        state.db(),
        CreateQuizSubmission {
            id: &submission_id,
            quiz_id: &quiz.id,
            student_id,
            answers,
            score,
            submitted_at: primitive_now_utc(),
        },
    )
    .await?;

    tracing::info!(
        quiz_id = %quiz.id,
        student_id = %student_id,
        score = submission.score,
        "Quiz submission graded"
    );
    Ok(submission)
}

pub(crate) async fn submit_essay(
    state: &AppState,
    essay: &Essay,
    student_id: &str,
    content: String,
) -> Result<EssaySubmission, sqlx::Error> {
    let submission_id = Uuid::new_v4().to_string();
    let feedback = state.feedback().generate_feedback(&submission_id, &content, &essay.rubric.0).await;

    let submission = repositories::essay_submissions::create(
        state.db(),
        CreateEssaySubmission {
            id: &submission_id,
            essay_id: &essay.id,
            student_id,
            content: &content,
            ai_feedback: Some(feedback),
            submitted_at: primitive_now_utc(),
        },
    )
    .await?;

    tracing::info!(
        essay_id = %essay.id,
        student_id = %student_id,
        degraded = submission.feedback().is_some_and(|f| f.is_degraded()),
        "Essay submission stored"
    );
    Ok(submission)
}

pub(crate) async fn regenerate_feedback(
    state: &AppState,
    essay: &Essay,
    submission: &EssaySubmission,
) -> Result<AiFeedback, sqlx::Error> {
    let feedback = state
        .feedback()
        .generate_feedback(&submission.id, &submission.content, &essay.rubric.0)
        .await;

    repositories::essay_submissions::update_feedback(state.db(), &submission.id, &feedback).await?;

    tracing::info!(
        submission_id = %submission.id,
        degraded = feedback.is_degraded(),
        "Regenerated essay feedback"
    );
    Ok(feedback)
}
