use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::warn;

use crate::http::routes::{auth, changes, health, search, tags};
use crate::state::AppState;

pub fn build(state: AppState) -> Router {
    let cors = CorsOrigins::parse(&state.config.cors_allow_origins).into_layer();
    let router = Router::new()
        .route("/health", get(health::health))
        .route("/v1/search", get(search::search))
        .route("/v1/search/toggle", get(search::toggle))
        .route("/v1/tags/cloud", get(tags::tag_cloud))
        .route("/v1/changes/recent", get(changes::recent_changes))
        .route("/v1/changes/stream", get(changes::change_stream))
        .route("/v1/auth/login", post(auth::login))
        .route("/v1/auth/logout", post(auth::logout))
        .route("/v1/auth/me", get(auth::me))
        .route("/v1/auth/token", post(auth::token))
        .with_state(state);
    match cors {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

/// Browser origins allowed to call the API, from `BUGBOARD_CORS_ALLOW_ORIGINS`.
#[derive(Debug, PartialEq, Eq)]
enum CorsOrigins {
    Disabled,
    Any,
    List(Vec<HeaderValue>),
}

impl CorsOrigins {
    /// A `*` entry wins over any explicit origin. Unparsable origins are
    /// skipped.
    fn parse(raw: &[String]) -> Self {
        if raw.iter().any(|origin| origin.trim() == "*") {
            return CorsOrigins::Any;
        }
        let origins: Vec<HeaderValue> = raw
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %origin, "invalid CORS origin ignored");
                    None
                }
            })
            .collect();
        if origins.is_empty() {
            CorsOrigins::Disabled
        } else {
            CorsOrigins::List(origins)
        }
    }

    fn into_layer(self) -> Option<CorsLayer> {
        let cors = CorsLayer::new().allow_methods([Method::GET, Method::POST, Method::OPTIONS]);
        match self {
            CorsOrigins::Disabled => None,
            CorsOrigins::Any => Some(cors.allow_origin(Any).allow_headers(Any)),
            // credentialed requests need an explicit origin list
            CorsOrigins::List(origins) => Some(
                cors.allow_origin(AllowOrigin::list(origins))
                    .allow_credentials(true)
                    .allow_headers([CONTENT_TYPE]),
            ),
        }
    }
}
