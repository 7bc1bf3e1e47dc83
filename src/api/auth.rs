use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::{bearer_token, CurrentUser};
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories::users::{self, CreateUser};
use crate::schemas::auth::{LoginRequest, RegisterRequest, SessionResponse};
use crate::schemas::user::UserResponse;
use crate::services::identity::IdentityError;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
}

/// Create the database profile for an identity-provider account. The caller
/// proves ownership of the account with its ID token; the stored uid comes
/// from the verified token, never from the request body.
async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let token = bearer_token(&headers)?;
    let identity = state
        .identity()
        .verify_id_token(token)
        .await
        .map_err(|_| ApiError::Unauthorized("Invalid authentication credentials"))?;

    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let existing = users::exists_by_uid_or_email(state.db(), &identity.uid, &payload.email)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to check existing user"))?;

    if existing.is_some() {
        return Err(ApiError::Conflict("User already registered".to_string()));
    }

    let user = users::create(
        state.db(),
        CreateUser {
            id: &Uuid::new_v4().to_string(),
            firebase_uid: &identity.uid,
            email: &payload.email,
            full_name: &payload.full_name,
            role: payload.role,
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create user"))?;

    tracing::info!(user_id = %user.id, role = ?user.role, "Registered user");

    Ok((StatusCode::CREATED, Json(UserResponse::from_db(user))))
}

async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let tokens = state
        .identity()
        .sign_in_with_password(&payload.email, &payload.password)
        .await
        .map_err(|err| match err {
            IdentityError::Rejected(reason) => {
                tracing::warn!(reason = %reason, "Login rejected by identity provider");
                ApiError::Unauthorized("Incorrect email or password")
            }
            other => ApiError::internal(other, "Identity provider sign-in failed"),
        })?;

    Ok(Json(SessionResponse::from_tokens(tokens)))
}

async fn me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(UserResponse::from_db(user))
}
