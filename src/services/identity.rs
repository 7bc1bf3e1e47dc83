use std::collections::HashMap;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::core::config::Settings;

/// How long a fetched signing-key set stays fresh. Google rotates the
/// securetoken keys on the order of days; an unknown kid forces a refresh
/// regardless.
const KEY_REFRESH_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Error)]
pub(crate) enum IdentityError {
    #[error("invalid identity token")]
    InvalidToken,
    #[error("unknown signing key: {0}")]
    UnknownKey(String),
    #[error("identity provider rejected credentials: {0}")]
    Rejected(String),
    #[error("identity provider unavailable: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Subject extracted from a verified ID token.
#[derive(Debug, Clone)]
pub(crate) struct VerifiedIdentity {
    pub(crate) uid: String,
    pub(crate) email: Option<String>,
}

/// Token bundle returned by the provider's password sign-in endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SessionTokens {
    pub(crate) id_token: String,
    pub(crate) refresh_token: String,
    pub(crate) expires_in: String,
    pub(crate) local_id: String,
    pub(crate) email: String,
}

#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JwksResponse {
    keys: Vec<Jwk>,
}

#[derive(Debug, Clone, Deserialize)]
struct Jwk {
    kid: String,
    n: String,
    e: String,
}

struct CachedKeys {
    keys: HashMap<String, Jwk>,
    fetched_at: Option<Instant>,
}

/// Verifies Firebase-style RS256 ID tokens against the provider's published
/// key set and proxies password sign-in. The key set is cached in-process
/// and refreshed when stale or when a token references an unknown kid.
pub(crate) struct IdentityService {
    client: Client,
    project_id: String,
    issuer: String,
    sign_in_url: String,
    jwks_url: String,
    cache: RwLock<CachedKeys>,
}

impl IdentityService {
    pub(crate) fn from_settings(settings: &Settings) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;

        let identity = settings.identity();
        Ok(Self {
            client,
            project_id: identity.firebase_project_id.clone(),
            issuer: identity.issuer(),
            sign_in_url: identity.sign_in_url(),
            jwks_url: identity.jwks_url.clone(),
            cache: RwLock::new(CachedKeys { keys: HashMap::new(), fetched_at: None }),
        })
    }

    /// Verify a bearer ID token and return its subject.
    pub(crate) async fn verify_id_token(
        &self,
        token: &str,
    ) -> Result<VerifiedIdentity, IdentityError> {
        let kid = token_kid(token)?;
        let jwk = self.signing_key(&kid).await?;

        let decoding_key = DecodingKey::from_rsa_components(&jwk.n, &jwk.e)
            .map_err(|_| IdentityError::UnknownKey(kid))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[self.project_id.as_str()]);
        validation.set_issuer(&[self.issuer.as_str()]);

        let data = decode::<IdTokenClaims>(token, &decoding_key, &validation)
            .map_err(|_| IdentityError::InvalidToken)?;

        Ok(VerifiedIdentity { uid: data.claims.sub, email: data.claims.email })
    }

    /// Exchange email/password for a token bundle via the provider.
    pub(crate) async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SessionTokens, IdentityError> {
        let payload = json!({
            "email": email,
            "password": password,
            "returnSecureToken": true
        });

        let response = self.client.post(&self.sign_in_url).json(&payload).send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<SessionTokens>().await?);
        }

        let body: serde_json::Value = response.json().await.unwrap_or_default();
        let message = body
            .get("error")
            .and_then(|error| error.get("message"))
            .and_then(|value| value.as_str())
            .unwrap_or("INVALID_CREDENTIALS")
            .to_string();

        tracing::debug!(status = status.as_u16(), reason = %message, "Password sign-in rejected");
        Err(IdentityError::Rejected(message))
    }

    async fn signing_key(&self, kid: &str) -> Result<Jwk, IdentityError> {
        {
            let cache = self.cache.read().await;
            if let Some(jwk) = cache.keys.get(kid) {
                let fresh = cache
                    .fetched_at
                    .map(|at| at.elapsed() < KEY_REFRESH_INTERVAL)
                    .unwrap_or(false);
                if fresh {
                    return Ok(jwk.clone());
                }
            }
        }

        let mut cache = self.cache.write().await;
        let needs_fetch = cache
            .fetched_at
            .map(|at| at.elapsed() >= KEY_REFRESH_INTERVAL)
            .unwrap_or(true)
            || !cache.keys.contains_key(kid);

        if needs_fetch {
            let response = self.client.get(&self.jwks_url).send().await?;
            let jwks: JwksResponse = response.json().await?;
            cache.keys = jwks.keys.into_iter().map(|jwk| (jwk.kid.clone(), jwk)).collect();
            cache.fetched_at = Some(Instant::now());
            tracing::debug!(keys = cache.keys.len(), "Refreshed identity signing keys");
        }

        cache.keys.get(kid).cloned().ok_or_else(|| IdentityError::UnknownKey(kid.to_string()))
    }
}

fn token_kid(token: &str) -> Result<String, IdentityError> {
    let header = decode_header(token).map_err(|_| IdentityError::InvalidToken)?;
    header.kid.ok_or(IdentityError::InvalidToken)
}
