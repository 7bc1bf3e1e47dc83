use sqlx::types::Json;
use sqlx::PgPool;

use crate::db::models::EssaySubmission;
use crate::db::types::AiFeedback;

const COLUMNS: &str = "id, essay_id, student_id, content, ai_feedback, rubric_scores, submitted_at";

pub(crate) async fn find_by_id(
    pool: &PgPool,
    id: &str,
) -> Result<Option<EssaySubmission>, sqlx::Error> {
    sqlx::query_as::<_, EssaySubmission>(&format!(
        "SELECT {COLUMNS} FROM essay_submissions WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_by_essay(
    pool: &PgPool,
    essay_id: &str,
) -> Result<Vec<EssaySubmission>, sqlx::Error> {
    sqlx::query_as::<_, EssaySubmission>(&format!(
        "SELECT {COLUMNS} FROM essay_submissions WHERE essay_id = $1"
    ))
    .bind(essay_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_by_essays(
    pool: &PgPool,
    essay_ids: &[String],
) -> Result<Vec<EssaySubmission>, sqlx::Error> {
    if essay_ids.is_empty() {
        return Ok(Vec::new());
    }

    sqlx::query_as::<_, EssaySubmission>(&format!(
        "SELECT {COLUMNS} FROM essay_submissions WHERE essay_id = ANY($1)"
    ))
    .bind(essay_ids)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_by_student(
    pool: &PgPool,
    student_id: &str,
) -> Result<Vec<EssaySubmission>, sqlx::Error> {
    sqlx::query_as::<_, EssaySubmission>(&format!(
        "SELECT {COLUMNS} FROM essay_submissions WHERE student_id = $1 ORDER BY submitted_at DESC"
    ))
    .bind(student_id)
    .fetch_all(pool)
    .await
}

pub(crate) struct CreateEssaySubmission<'a> {
    pub(crate) id: &'a str,
    pub(crate) essay_id: &'a str,
    pub(crate) student_id: &'a str,
    pub(crate) content: &'a str,
    pub(crate) ai_feedback: Option<AiFeedback>,
    pub(crate) submitted_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateEssaySubmission<'_>,
) -> Result<EssaySubmission, sqlx::Error> {
    sqlx::query_as::<_, EssaySubmission>(&format!(
        "INSERT INTO essay_submissions (id, essay_id, student_id, content, ai_feedback, submitted_at)
         VALUES ($1,$2,$3,$4,$5,$6)
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.essay_id)
    .bind(params.student_id)
    .bind(params.content)
    .bind(params.ai_feedback.map(Json))
    .bind(params.submitted_at)
    .fetch_one(pool)
    .await
}

/// Overwrite stored feedback. Concurrent regenerations race and the last
/// write wins.
pub(crate) async fn update_feedback(
    pool: &PgPool,
    id: &str,
    feedback: &AiFeedback,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE essay_submissions SET ai_feedback = $1 WHERE id = $2")
        .bind(Json(feedback))
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
