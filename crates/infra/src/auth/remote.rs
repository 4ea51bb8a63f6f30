use async_trait::async_trait;
use reqwest::Response;
use serde::Deserialize;
use serde_json::from_str;
use tracing::info;

use bugboard_core::domain::auth::AuthState;

use crate::auth::{AuthError, AuthProvider};

const LOGIN_PATH: &str = "/auth/login";
const LOGOUT_PATH: &str = "/auth/logout";
const TOKEN_PATH: &str = "/api/me/token/";

#[derive(Debug, Deserialize)]
struct LoginResponse {
    email: String,
    #[serde(default)]
    emailmd5: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

/// Verifies identity assertions against the bug tracker's own login
/// endpoints. The provided client must keep cookies so the session set by
/// `/auth/login` is reused by later calls.
#[derive(Debug, Clone)]
pub struct RemoteAuthProvider {
    http: reqwest::Client,
    base_url: String,
    audience: String,
}

impl RemoteAuthProvider {
    pub fn new(http: reqwest::Client, base_url: &str, audience: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            audience: audience.into(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl AuthProvider for RemoteAuthProvider {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn login(&self, assertion: &str) -> Result<AuthState, AuthError> {
        let assertion = assertion.trim();
        if assertion.is_empty() {
            return Err(AuthError::MissingAssertion);
        }
        let response = self
            .http
            .post(self.endpoint(LOGIN_PATH))
            .form(&[("assertion", assertion), ("audience", self.audience.as_str())])
            .send()
            .await?;
        let body = read_success(response).await?;
        let payload: LoginResponse = from_str(&body)
            .map_err(|_| AuthError::InvalidResponse(format!("invalid login payload: {body}")))?;
        info!(user = %payload.email, "remote login succeeded");
        Ok(AuthState::signed_in(payload.email, payload.emailmd5))
    }

    async fn logout(&self) -> Result<(), AuthError> {
        let response = self.http.post(self.endpoint(LOGOUT_PATH)).send().await?;
        read_success(response).await?;
        Ok(())
    }

    async fn fetch_token(&self) -> Result<String, AuthError> {
        let response = self.http.get(self.endpoint(TOKEN_PATH)).send().await?;
        let body = read_success(response).await?;
        let payload: TokenResponse = from_str(&body)
            .map_err(|_| AuthError::InvalidResponse(format!("invalid token payload: {body}")))?;
        if payload.token.trim().is_empty() {
            return Err(AuthError::InvalidResponse("missing token".to_string()));
        }
        Ok(payload.token)
    }
}

async fn read_success(response: Response) -> Result<String, AuthError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(AuthError::Rejected { status, body });
    }
    Ok(body)
}
