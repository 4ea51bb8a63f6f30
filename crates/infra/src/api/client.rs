use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::from_str;
use thiserror::Error;
use tracing::{debug, warn};

use bugboard_core::domain::search::{SearchOptions, SearchOutcome, SearchResponse};
use bugboard_core::domain::tag_cloud::TagFrequency;

use crate::api::prefs::{MeResponse, UserPrefs};

const SEARCH_PATH: &str = "/api/search/";
const TAGS_PATH: &str = "/api/tags/";
const ME_PATH: &str = "/api/me/";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("backend returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("invalid response from {path}: {message}")]
    InvalidResponse { path: &'static str, message: String },
}

impl ApiError {
    /// Text shown to the user: the backend's own body for HTTP failures.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { body, .. } if !body.trim().is_empty() => body.clone(),
            other => other.to_string(),
        }
    }
}

/// HTTP basic credentials: user id and API auth token.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub user: String,
    pub key: String,
}

#[derive(Debug, Clone)]
pub struct BugApiClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Option<Credentials>,
}

impl BugApiClient {
    pub fn new(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials: None,
        }
    }

    pub fn with_credentials(mut self, credentials: Option<Credentials>) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<SearchResponse, ApiError> {
        let params = options.api_params(query);
        debug!(query, page = options.page, "backend search request");
        let body = self
            .send(self.request(Method::POST, SEARCH_PATH).query(&params), SEARCH_PATH)
            .await?;
        decode(SEARCH_PATH, &body)
    }

    /// Runs a search and folds any failure into the outcome's error message.
    pub async fn run_search(&self, query: &str, options: SearchOptions) -> SearchOutcome {
        match self.search(query, &options).await {
            Ok(response) => {
                let outcome = SearchOutcome::from_response(query, options, response);
                if !outcome.warning_message.is_empty() {
                    warn!(query, warning = %outcome.warning_message, "partial search results");
                }
                outcome
            }
            Err(err) => {
                warn!(query, error = %err, "search failed");
                SearchOutcome::failed(query, options, err.user_message())
            }
        }
    }

    pub async fn tag_frequencies(&self) -> Result<TagFrequency, ApiError> {
        let body = self
            .send(self.request(Method::GET, TAGS_PATH), TAGS_PATH)
            .await?;
        decode(TAGS_PATH, &body)
    }

    pub async fn user_prefs(&self) -> Result<UserPrefs, ApiError> {
        let body = self.send(self.request(Method::GET, ME_PATH), ME_PATH).await?;
        let me: MeResponse = decode(ME_PATH, &body)?;
        Ok(me.prefs)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self.http.request(method, self.endpoint(path));
        match self.credentials.as_ref() {
            Some(credentials) => request.basic_auth(&credentials.user, Some(&credentials.key)),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder, path: &'static str) -> Result<String, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            debug!(path, %status, "backend request failed");
            return Err(ApiError::Status { status, body });
        }
        Ok(body)
    }
}

fn decode<T>(path: &'static str, body: &str) -> Result<T, ApiError>
where
    T: for<'de> Deserialize<'de>,
{
    from_str(body).map_err(|err| ApiError::InvalidResponse {
        path,
        message: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves one canned HTTP response and returns the request line it saw.
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|window| window == b"\r\n\r\n") {
                let read = socket.read(&mut buf).await.unwrap();
                if read == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..read]);
            }
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            let request = String::from_utf8_lossy(&request).to_string();
            request.lines().next().unwrap_or_default().to_string()
        });
        (base_url, handle)
    }

    #[tokio::test]
    async fn backend_500_becomes_error_outcome_with_body() {
        let (base_url, server) =
            serve_once("500 Internal Server Error", "index unavailable").await;
        let client = BugApiClient::new(reqwest::Client::new(), &base_url);

        let outcome = client.run_search("crash", SearchOptions::default()).await;

        assert!(outcome.is_error());
        assert_eq!(outcome.error_message, "index unavailable");
        assert!(outcome.pager.is_none());
        assert!(outcome.hits.is_empty());
        let request_line = server.await.unwrap();
        assert!(request_line.starts_with("POST /api/search/?query=crash&from=0&size=15"));
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        let client = BugApiClient::new(reqwest::Client::new(), "http://bugs.example.com/");
        assert_eq!(client.endpoint(SEARCH_PATH), "http://bugs.example.com/api/search/");
    }

    #[test]
    fn status_error_surfaces_backend_body() {
        let err = ApiError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: "dial tcp 127.0.0.1:9200: connection refused".to_string(),
        };
        assert_eq!(err.user_message(), "dial tcp 127.0.0.1:9200: connection refused");
    }

    #[test]
    fn empty_status_body_falls_back_to_error_text() {
        let err = ApiError::Status {
            status: StatusCode::BAD_GATEWAY,
            body: String::new(),
        };
        assert!(err.user_message().contains("502"));
    }

    #[test]
    fn decode_tag_frequencies() {
        let tags: TagFrequency = decode(TAGS_PATH, r#"{"ui": 4, "crash": 9}"#).unwrap();
        assert_eq!(tags["crash"], 9);
    }

    #[test]
    fn decode_reports_path_on_bad_json() {
        let err = decode::<TagFrequency>(TAGS_PATH, "not json").unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse { path: TAGS_PATH, .. }));
    }
}
