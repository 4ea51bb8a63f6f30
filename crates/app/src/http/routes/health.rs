use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub modules: HealthModules,
}

#[derive(Debug, Serialize)]
pub struct HealthModules {
    pub backend: BackendStatus,
    pub auth: AuthStatus,
    pub realtime: RealtimeStatus,
}

#[derive(Debug, Serialize)]
pub struct BackendStatus {
    pub url: String,
    pub credentials: bool,
}

#[derive(Debug, Serialize)]
pub struct AuthStatus {
    pub provider: &'static str,
    pub logged_in: bool,
}

#[derive(Debug, Serialize)]
pub struct RealtimeStatus {
    pub enabled: bool,
    pub recent_changes: usize,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let auth = state.auth.current().await;
    let recent_changes = state.changes.recent().await.len();
    Json(HealthResponse {
        status: "ok",
        modules: HealthModules {
            backend: BackendStatus {
                url: state.api.base_url().to_string(),
                credentials: state.config.api_user.is_some() && state.config.api_key.is_some(),
            },
            auth: AuthStatus {
                provider: state.auth.provider_name(),
                logged_in: auth.logged_in,
            },
            realtime: RealtimeStatus {
                enabled: state.config.realtime_enabled,
                recent_changes,
            },
        },
    })
}
