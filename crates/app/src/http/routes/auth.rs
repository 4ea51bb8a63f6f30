use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::state::AppState;
use bugboard_core::domain::auth::AuthState;
use bugboard_infra::auth::AuthError;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub assertion: String,
}

#[derive(Debug, Error)]
pub enum AuthApiError {
    #[error("not logged in")]
    NotLoggedIn,
    #[error("auth request failed: {0}")]
    Login(#[from] AuthError),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthState>, AuthApiError> {
    let auth = state.auth.login(&payload.assertion).await?;
    Ok(Json(auth))
}

pub async fn logout(State(state): State<AppState>) -> StatusCode {
    state.auth.logout().await;
    StatusCode::NO_CONTENT
}

pub async fn me(State(state): State<AppState>) -> Json<AuthState> {
    Json(state.auth.current().await)
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Fetches a fresh API token for the signed-in user.
pub async fn token(State(state): State<AppState>) -> Result<Json<TokenResponse>, AuthApiError> {
    if !state.auth.current().await.logged_in {
        return Err(AuthApiError::NotLoggedIn);
    }
    let token = state.auth.refresh_token().await?;
    Ok(Json(TokenResponse { token }))
}

fn status_for(err: &AuthError) -> StatusCode {
    match err {
        AuthError::MissingAssertion => StatusCode::BAD_REQUEST,
        AuthError::Rejected { .. } => StatusCode::UNAUTHORIZED,
        AuthError::Http(_) | AuthError::InvalidResponse(_) => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for AuthApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AuthApiError::NotLoggedIn => StatusCode::UNAUTHORIZED,
            AuthApiError::Login(err) => {
                let status = status_for(err);
                if status == StatusCode::BAD_GATEWAY {
                    warn!(error = %err, "auth backend unavailable");
                }
                status
            }
        };
        let body = Json(ErrorBody {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}
