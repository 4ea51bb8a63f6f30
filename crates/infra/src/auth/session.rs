use std::sync::Arc;

use tokio::sync::{watch, RwLock};
use tracing::{info, warn};

use bugboard_core::domain::auth::AuthState;

use crate::auth::{AuthError, AuthProvider};

/// Current sign-in state plus a watch channel that flips on every login or
/// logout. The realtime feed restarts its socket on each flip.
pub struct AuthSession {
    provider: Arc<dyn AuthProvider>,
    state: RwLock<AuthState>,
    logged_in: watch::Sender<bool>,
}

impl AuthSession {
    pub fn new(provider: Arc<dyn AuthProvider>) -> Self {
        let (logged_in, _) = watch::channel(false);
        Self {
            provider,
            state: RwLock::new(AuthState::signed_out()),
            logged_in,
        }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.logged_in.subscribe()
    }

    pub async fn current(&self) -> AuthState {
        self.state.read().await.clone()
    }

    pub async fn login(&self, assertion: &str) -> Result<AuthState, AuthError> {
        let state = self.provider.login(assertion).await?;
        *self.state.write().await = state.clone();
        self.logged_in.send_replace(true);
        info!(user = %state.username, provider = self.provider.name(), "logged in");
        Ok(state)
    }

    /// Always ends signed out; a failing backend logout is only logged.
    pub async fn logout(&self) {
        if let Err(err) = self.provider.logout().await {
            warn!(error = %err, "backend logout failed");
        }
        *self.state.write().await = AuthState::signed_out();
        self.logged_in.send_replace(false);
        info!("logged out");
    }

    pub async fn refresh_token(&self) -> Result<String, AuthError> {
        let token = self.provider.fetch_token().await?;
        self.state.write().await.auth_token = token.clone();
        Ok(token)
    }
}
