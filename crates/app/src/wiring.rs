use std::sync::Arc;

use reqwest::Client;
use thiserror::Error;
use tracing::info;

use crate::config::{AppConfig, AuthMode};
use crate::state::AppState;
use bugboard_infra::api::{BugApiClient, Credentials};
use bugboard_infra::auth::{AuthProvider, AuthSession, RemoteAuthProvider, StubAuthProvider};
use bugboard_infra::realtime::ChangeHub;

#[derive(Debug, Error)]
pub enum WiringError {
    #[error("http client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

pub fn build_state(config: AppConfig) -> Result<AppState, WiringError> {
    let client = Client::builder()
        .timeout(config.request_timeout)
        .cookie_store(true)
        .build()?;
    let api = BugApiClient::new(client.clone(), &config.backend_url)
        .with_credentials(credentials(&config));
    let provider = build_auth_provider(&config, client);
    info!(provider = provider.name(), backend = %config.backend_url, "state wired");
    Ok(AppState {
        config: Arc::new(config),
        api,
        auth: Arc::new(AuthSession::new(provider)),
        changes: ChangeHub::default(),
    })
}

fn credentials(config: &AppConfig) -> Option<Credentials> {
    match (config.api_user.as_ref(), config.api_key.as_ref()) {
        (Some(user), Some(key)) => Some(Credentials {
            user: user.clone(),
            key: key.clone(),
        }),
        _ => None,
    }
}

fn build_auth_provider(config: &AppConfig, client: Client) -> Arc<dyn AuthProvider> {
    match config.auth_mode {
        AuthMode::Stub => Arc::new(StubAuthProvider::new(config.stub_user.clone())),
        AuthMode::Remote => Arc::new(RemoteAuthProvider::new(
            client,
            &config.backend_url,
            config.audience.clone(),
        )),
    }
}
