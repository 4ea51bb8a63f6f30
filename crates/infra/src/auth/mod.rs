pub mod remote;
pub mod session;
pub mod stub;

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

use bugboard_core::domain::auth::AuthState;

pub use remote::RemoteAuthProvider;
pub use session::AuthSession;
pub use stub::StubAuthProvider;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("login assertion is required")]
    MissingAssertion,
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("auth backend rejected request ({status}): {body}")]
    Rejected { status: StatusCode, body: String },
    #[error("invalid auth response: {0}")]
    InvalidResponse(String),
}

/// Identity backend used by the login/logout flow.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn login(&self, assertion: &str) -> Result<AuthState, AuthError>;

    async fn logout(&self) -> Result<(), AuthError>;

    /// API token for command-line access on behalf of the signed-in user.
    async fn fetch_token(&self) -> Result<String, AuthError>;
}
