use sqlx::PgPool;

use crate::db::models::User;
use crate::db::types::UserRole;

const COLUMNS: &str = "id, firebase_uid, email, full_name, role, created_at";

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn find_by_firebase_uid(
    pool: &PgPool,
    firebase_uid: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE firebase_uid = $1"))
        .bind(firebase_uid)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn exists_by_uid_or_email(
    pool: &PgPool,
    firebase_uid: &str,
    email: &str,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        "SELECT id FROM users WHERE firebase_uid = $1 OR email = $2 LIMIT 1",
    )
    .bind(firebase_uid)
    .bind(email)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn find_by_ids(pool: &PgPool, ids: &[String]) -> Result<Vec<User>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE id = ANY($1)"))
        .bind(ids)
        .fetch_all(pool)
        .await
}

pub(crate) struct CreateUser<'a> {
    pub(crate) id: &'a str,
    pub(crate) firebase_uid: &'a str,
    pub(crate) email: &'a str,
    pub(crate) full_name: &'a str,
    pub(crate) role: UserRole,
    pub(crate) created_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateUser<'_>) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (id, firebase_uid, email, full_name, role, created_at)
         VALUES ($1,$2,$3,$4,$5,$6)
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.firebase_uid)
    .bind(params.email)
    .bind(params.full_name)
    .bind(params.role)
    .bind(params.created_at)
    .fetch_one(pool)
    .await
}
