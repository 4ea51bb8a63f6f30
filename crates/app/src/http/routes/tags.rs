use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::state::AppState;
use bugboard_core::domain::tag_cloud::{bucketize, TagCloudEntry, DEFAULT_BUCKETS, DEFAULT_TOP_TAGS};
use bugboard_infra::api::ApiError;

const MAX_BUCKETS: usize = 20;

#[derive(Debug, Deserialize)]
pub struct TagCloudParams {
    pub top: Option<usize>,
    pub buckets: Option<usize>,
}

#[derive(Debug, Error)]
pub enum TagsApiError {
    #[error("buckets must be between 1 and {0}")]
    InvalidBuckets(usize),
    #[error("tags backend failure: {0}")]
    Backend(#[from] ApiError),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

pub async fn tag_cloud(
    State(state): State<AppState>,
    Query(params): Query<TagCloudParams>,
) -> Result<Json<Vec<TagCloudEntry>>, TagsApiError> {
    let (top, buckets) = cloud_shape(&params)?;
    let frequencies = state.api.tag_frequencies().await?;
    Ok(Json(bucketize(frequencies, top, buckets)))
}

fn cloud_shape(params: &TagCloudParams) -> Result<(usize, usize), TagsApiError> {
    let top = params.top.unwrap_or(DEFAULT_TOP_TAGS);
    let buckets = params.buckets.unwrap_or(DEFAULT_BUCKETS);
    if buckets == 0 || buckets > MAX_BUCKETS {
        return Err(TagsApiError::InvalidBuckets(MAX_BUCKETS));
    }
    Ok((top, buckets))
}

impl IntoResponse for TagsApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            TagsApiError::InvalidBuckets(_) => StatusCode::BAD_REQUEST,
            TagsApiError::Backend(err) => {
                warn!(error = %err, "tag frequencies unavailable");
                StatusCode::BAD_GATEWAY
            }
        };
        let body = Json(ErrorBody {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}
