//! Bearer-token identity
//!
//! The identity provider is an external collaborator: it turns a bearer
//! credential into a verified (subject, email) pair. The [`Identity`]
//! extractor verifies the token, upserts the application user, and hands the
//! handler explicit per-request context. Nothing here is ambient state.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::user::User;
use crate::error::ApiError;
use crate::{store, AppState};

/// Verified caller identity as reported by the identity provider.
#[derive(Clone, Debug, Deserialize)]
pub struct VerifiedToken {
    pub subject: String,
    pub email: String,
}

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("token rejected by identity provider")]
    Rejected,
    #[error("identity provider unreachable: {0}")]
    Provider(#[from] reqwest::Error),
}

#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<VerifiedToken, VerifyError>;
}

/// Verifies tokens against the provider's HTTP verification endpoint.
pub struct RemoteVerifier {
    endpoint: String,
    http: reqwest::Client,
}

impl RemoteVerifier {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self { endpoint: endpoint.into(), http: reqwest::Client::new() }
    }
}

#[async_trait]
impl TokenVerifier for RemoteVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedToken, VerifyError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(&serde_json::json!({ "token": token }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(VerifyError::Rejected);
        }
        Ok(response.json::<VerifiedToken>().await?)
    }
}

/// Authenticated caller, available to any handler that lists it as an
/// extractor. The backing user row is found or created on every request, so
/// role checks always see the current role.
pub struct Identity {
    pub user: User,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.user.is_admin()
    }

    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ApiError::Forbidden("Forbidden: admin access required.".into()))
        }
    }

    /// Owner-or-admin visibility rule for a single order.
    pub fn can_view_order(&self, owner_id: Uuid) -> bool {
        self.user.id == owner_id || self.is_admin()
    }
}

pub fn bearer_token(header_value: Option<&str>) -> Option<&str> {
    header_value?.strip_prefix("Bearer ")
}

#[async_trait]
impl FromRequestParts<AppState> for Identity {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());
        let token = bearer_token(header_value).ok_or_else(|| {
            ApiError::Unauthorized(
                "Missing or invalid Authorization header (expected Bearer token).".into(),
            )
        })?;

        let verified = state.verifier.verify(token).await.map_err(|err| {
            tracing::warn!(error = %err, "token verification failed");
            ApiError::Unauthorized("Unauthorized. Invalid or expired token.".into())
        })?;

        let user = store::users::upsert(&state.db, &verified).await?;
        Ok(Self { user })
    }
}

/// Shared verifier handle stored in [`AppState`].
pub type SharedVerifier = Arc<dyn TokenVerifier>;
