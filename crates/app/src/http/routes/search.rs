use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::state::AppState;
use bugboard_core::domain::search::{SearchOptions, SearchOutcome};
use bugboard_core::error::CoreError;
use bugboard_core::types::page_size::PageSize;

const MAX_QUERY_LEN: usize = 256;

#[derive(Debug, Serialize)]
pub struct SearchView {
    #[serde(flatten)]
    pub outcome: SearchOutcome,
    pub location: String,
}

#[derive(Debug, Serialize)]
pub struct ToggleView {
    pub options: SearchOptions,
    pub location: String,
}

#[derive(Debug, Error)]
pub enum SearchApiError {
    #[error("query too long (max {0} chars)")]
    QueryTooLong(usize),
    #[error("no toggle parameter given")]
    MissingToggle,
    #[error("invalid number for {0}: {1}")]
    InvalidNumber(&'static str, String),
    #[error("invalid page size: {0}")]
    PageSize(#[from] CoreError),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Runs the search described by the view's query string. Backend failures
/// still produce a view (with `error_message` set), served as 502.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, SearchApiError> {
    let query_text = query_text(&params);
    enforce_query_length(&query_text)?;
    let options = SearchOptions::from_query_pairs(&params);
    debug!(query_text = %query_text, ?options, "view search");

    let outcome = state.api.run_search(&query_text, options).await;
    let status = if outcome.is_error() {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::OK
    };
    let location = build_location(&query_text, &outcome.options);
    Ok((status, Json(SearchView { outcome, location })))
}

/// Applies one filter/sort/page toggle and returns the resulting view URL.
pub async fn toggle(
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ToggleView>, SearchApiError> {
    let query_text = query_text(&params);
    enforce_query_length(&query_text)?;
    let mut options = SearchOptions::from_query_pairs(&params);
    apply_toggles(&mut options, &params)?;
    let location = build_location(&query_text, &options);
    Ok(Json(ToggleView { options, location }))
}

fn query_text(params: &HashMap<String, String>) -> String {
    params
        .get("query")
        .map(|value| value.trim().to_string())
        .unwrap_or_default()
}

fn enforce_query_length(query_text: &str) -> Result<(), SearchApiError> {
    if query_text.chars().count() > MAX_QUERY_LEN {
        return Err(SearchApiError::QueryTooLong(MAX_QUERY_LEN));
    }
    Ok(())
}

fn apply_toggles(
    options: &mut SearchOptions,
    params: &HashMap<String, String>,
) -> Result<(), SearchApiError> {
    let mut applied = false;
    if let Some(value) = params.get("toggle_status") {
        options.toggle_status(value);
        applied = true;
    }
    if let Some(value) = params.get("toggle_tag") {
        options.toggle_tag(value);
        applied = true;
    }
    if let Some(value) = params.get("toggle_modified") {
        options.toggle_modified(value);
        applied = true;
    }
    if let Some(value) = params.get("toggle_sort") {
        options.toggle_sort(value);
        applied = true;
    }
    if let Some(value) = params.get("set_rpp") {
        let raw = parse_number("set_rpp", value)?;
        options.change_page_size(PageSize::try_from(raw)?);
        applied = true;
    }
    if let Some(value) = params.get("goto") {
        options.jump_to_page(parse_number("goto", value)?);
        applied = true;
    }
    if !applied {
        return Err(SearchApiError::MissingToggle);
    }
    Ok(())
}

fn parse_number(key: &'static str, value: &str) -> Result<usize, SearchApiError> {
    value
        .trim()
        .parse()
        .map_err(|_| SearchApiError::InvalidNumber(key, value.to_string()))
}

/// Query string of the view URL: the query text followed by every
/// non-default option.
fn build_location(query_text: &str, options: &SearchOptions) -> String {
    let mut pairs = Vec::new();
    if !query_text.is_empty() {
        pairs.push(("query", query_text.to_string()));
    }
    pairs.extend(options.to_query_pairs());
    if pairs.is_empty() {
        return String::new();
    }
    let encoded: Vec<String> = pairs
        .iter()
        .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
        .collect();
    format!("?{}", encoded.join("&"))
}

impl SearchApiError {
    fn status(&self) -> StatusCode {
        match self {
            SearchApiError::QueryTooLong(_) => StatusCode::URI_TOO_LONG,
            SearchApiError::MissingToggle
            | SearchApiError::InvalidNumber(..)
            | SearchApiError::PageSize(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for SearchApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let body = Json(ErrorBody {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}
