use async_trait::async_trait;
use tracing::debug;

use bugboard_core::domain::auth::AuthState;

use crate::auth::{AuthError, AuthProvider};

const STUB_TOKEN: &str = "stub-token";

/// Signs every non-empty assertion in as one fixed user. Never touches the
/// network.
#[derive(Debug, Clone)]
pub struct StubAuthProvider {
    user: String,
}

impl StubAuthProvider {
    pub fn new(user: impl Into<String>) -> Self {
        Self { user: user.into() }
    }
}

#[async_trait]
impl AuthProvider for StubAuthProvider {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn login(&self, assertion: &str) -> Result<AuthState, AuthError> {
        if assertion.trim().is_empty() {
            return Err(AuthError::MissingAssertion);
        }
        debug!(user = %self.user, "stub login");
        Ok(AuthState::signed_in(self.user.clone(), String::new()))
    }

    async fn logout(&self) -> Result<(), AuthError> {
        Ok(())
    }

    async fn fetch_token(&self) -> Result<String, AuthError> {
        Ok(STUB_TOKEN.to_string())
    }
}
