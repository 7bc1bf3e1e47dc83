use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::db::types::UserRole;
use crate::services::identity::SessionTokens;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct RegisterRequest {
    #[validate(email(message = "email must be a valid address"))]
    pub(crate) email: String,
    #[serde(alias = "fullName", alias = "name")]
    #[validate(length(min = 1, max = 200, message = "full_name must not be empty"))]
    pub(crate) full_name: String,
    pub(crate) role: UserRole,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct LoginRequest {
    #[validate(email(message = "email must be a valid address"))]
    pub(crate) email: String,
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub(crate) password: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct SessionResponse {
    pub(crate) id_token: String,
    pub(crate) refresh_token: String,
    pub(crate) expires_in: String,
    pub(crate) local_id: String,
    pub(crate) email: String,
}

impl SessionResponse {
    pub(crate) fn from_tokens(tokens: SessionTokens) -> Self {
        Self {
            id_token: tokens.id_token,
            refresh_token: tokens.refresh_token,
            expires_in: tokens.expires_in,
            local_id: tokens.local_id,
            email: tokens.email,
        }
    }
}
