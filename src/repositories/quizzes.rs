use sqlx::types::Json;
use sqlx::PgPool;

use crate::db::models::Quiz;
use crate::db::types::Question;

const COLUMNS: &str = "id, teacher_id, title, questions, created_at";

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Quiz>, sqlx::Error> {
    sqlx::query_as::<_, Quiz>(&format!("SELECT {COLUMNS} FROM quizzes WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list_all(pool: &PgPool) -> Result<Vec<Quiz>, sqlx::Error> {
    sqlx::query_as::<_, Quiz>(&format!(
        "SELECT {COLUMNS} FROM quizzes ORDER BY created_at DESC"
    ))
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_by_teacher(
    pool: &PgPool,
    teacher_id: &str,
) -> Result<Vec<Quiz>, sqlx::Error> {
    sqlx::query_as::<_, Quiz>(&format!(
        "SELECT {COLUMNS} FROM quizzes WHERE teacher_id = $1 ORDER BY created_at DESC"
    ))
    .bind(teacher_id)
    .fetch_all(pool)
    .await
}

pub(crate) struct CreateQuiz<'a> {
    pub(crate) id: &'a str,
    pub(crate) teacher_id: &'a str,
    pub(crate) title: &'a str,
    pub(crate) questions: Vec<Question>,
    pub(crate) created_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateQuiz<'_>) -> Result<Quiz, sqlx::Error> {
    sqlx::query_as::<_, Quiz>(&format!(
        "INSERT INTO quizzes (id, teacher_id, title, questions, created_at)
         VALUES ($1,$2,$3,$4,$5)
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.teacher_id)
    .bind(params.title)
    .bind(Json(params.questions))
    .bind(params.created_at)
    .fetch_one(pool)
    .await
}
