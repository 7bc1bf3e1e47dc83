use sqlx::types::Json;
use sqlx::PgPool;

use crate::db::models::Essay;
use crate::db::types::Rubric;

const COLUMNS: &str = "id, teacher_id, prompt, rubric, created_at";

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Essay>, sqlx::Error> {
    sqlx::query_as::<_, Essay>(&format!("SELECT {COLUMNS} FROM essays WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list_all(pool: &PgPool) -> Result<Vec<Essay>, sqlx::Error> {
    sqlx::query_as::<_, Essay>(&format!(
        "SELECT {COLUMNS} FROM essays ORDER BY created_at DESC"
    ))
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_by_teacher(
    pool: &PgPool,
    teacher_id: &str,
) -> Result<Vec<Essay>, sqlx::Error> {
    sqlx::query_as::<_, Essay>(&format!(
        "SELECT {COLUMNS} FROM essays WHERE teacher_id = $1 ORDER BY created_at DESC"
    ))
    .bind(teacher_id)
    .fetch_all(pool)
    .await
}

pub(crate) struct CreateEssay<'a> {
    pub(crate) id: &'a str,
    pub(crate) teacher_id: &'a str,
    pub(crate) prompt: &'a str,
    pub(crate) rubric: Rubric,
    pub(crate) created_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateEssay<'_>) -> Result<Essay, sqlx::Error> {
    sqlx::query_as::<_, Essay>(&format!(
        "INSERT INTO essays (id, teacher_id, prompt, rubric, created_at)
         VALUES ($1,$2,$3,$4,$5)
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.teacher_id)
    .bind(params.prompt)
    .bind(Json(params.rubric))
    .bind(params.created_at)
    .fetch_one(pool)
    .await
}
