use std::sync::Arc;

use crate::config::AppConfig;
use bugboard_infra::api::BugApiClient;
use bugboard_infra::auth::AuthSession;
use bugboard_infra::realtime::ChangeHub;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub api: BugApiClient,
    pub auth: Arc<AuthSession>,
    pub changes: ChangeHub,
}
