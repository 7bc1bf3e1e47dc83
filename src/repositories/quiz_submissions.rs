use sqlx::types::Json;
use sqlx::PgPool;

use crate::db::models::QuizSubmission;
use crate::db::types::AnswerMap;

const COLUMNS: &str = "id, quiz_id, student_id, answers, score, submitted_at";

pub(crate) async fn list_by_quiz(
    pool: &PgPool,
    quiz_id: &str,
) -> Result<Vec<QuizSubmission>, sqlx::Error> {
    sqlx::query_as::<_, QuizSubmission>(&format!(
        "SELECT {COLUMNS} FROM quiz_submissions WHERE quiz_id = $1"
    ))
    .bind(quiz_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_by_quizzes(
    pool: &PgPool,
    quiz_ids: &[String],
) -> Result<Vec<QuizSubmission>, sqlx::Error> {
    if quiz_ids.is_empty() {
        return Ok(Vec::new());
    }

    sqlx::query_as::<_, QuizSubmission>(&format!(
        "SELECT {COLUMNS} FROM quiz_submissions WHERE quiz_id = ANY($1)"
    ))
    .bind(quiz_ids)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_by_student(
    pool: &PgPool,
    student_id: &str,
) -> Result<Vec<QuizSubmission>, sqlx::Error> {
    sqlx::query_as::<_, QuizSubmission>(&format!(
        "SELECT {COLUMNS} FROM quiz_submissions WHERE student_id = $1 ORDER BY submitted_at DESC"
    ))
    .bind(student_id)
    .fetch_all(pool)
    .await
}

pub(crate) struct CreateQuizSubmission<'a> {
    pub(crate) id: &'a str,
    pub(crate) quiz_id: &'a str,
    pub(crate) student_id: &'a str,
    pub(crate) answers: AnswerMap,
    pub(crate) score: i32,
    pub(crate) submitted_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateQuizSubmission<'_>,
) -> Result<QuizSubmission, sqlx::Error> {
    sqlx::query_as::<_, QuizSubmission>(&format!(
        "INSERT INTO quiz_submissions (id, quiz_id, student_id, answers, score, submitted_at)
         VALUES ($1,$2,$3,$4,$5,$6)
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.quiz_id)
    .bind(params.student_id)
    .bind(Json(params.answers))
    .bind(params.score)
    .bind(params.submitted_at)
    .fetch_one(pool)
    .await
}
