use tracing::info;

use crate::state::AppState;
use bugboard_infra::realtime::{ChangeFeed, RealtimeError};

/// Runs the change-stream supervisor until the auth session goes away.
pub async fn start(state: AppState) -> Result<(), RealtimeError> {
    let config = &state.config;
    info!(url = %config.changes_url, "realtime change feed starting");
    let feed = ChangeFeed::new(
        config.changes_url.clone(),
        config.auth_cookie.clone(),
        state.changes.clone(),
        config.realtime_max_retry_secs,
        state.auth.subscribe(),
    );
    feed.run().await
}
