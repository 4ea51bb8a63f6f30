use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use thiserror::Error;

const CHANGES_PATH: &str = "/api/changes/websocket";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Stub,
    Remote,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_addr: SocketAddr,
    pub backend_url: String,
    pub changes_url: String,
    pub request_timeout: Duration,
    pub auth_mode: AuthMode,
    pub stub_user: String,
    pub audience: String,
    pub api_user: Option<String>,
    pub api_key: Option<String>,
    pub auth_cookie: Option<String>,
    pub realtime_enabled: bool,
    pub realtime_max_retry_secs: u64,
    pub cors_allow_origins: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid socket address: {0}")]
    InvalidSocket(String),
    #[error("invalid integer for {0}: {1}")]
    InvalidNumber(&'static str, String),
    #[error("invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let http_addr_raw = read_string("BUGBOARD_HTTP_ADDR", "127.0.0.1:8080");
        let http_addr = http_addr_raw
            .parse()
            .map_err(|_| ConfigError::InvalidSocket(http_addr_raw.clone()))?;
        let backend_url = read_string("BUGBOARD_BACKEND_URL", "http://127.0.0.1:8066");
        let changes_url = match read_optional_string("BUGBOARD_CHANGES_URL") {
            Some(url) => url,
            None => derive_changes_url(&backend_url)
                .ok_or_else(|| ConfigError::InvalidValue("BUGBOARD_BACKEND_URL", backend_url.clone()))?,
        };
        let request_timeout_secs = read_u64("BUGBOARD_REQUEST_TIMEOUT_SECS", 15)?;
        let auth_mode = parse_auth_mode(&read_string("BUGBOARD_AUTH_MODE", "stub"))?;
        let stub_user = read_string("BUGBOARD_STUB_USER", "dev@example.com");
        let audience = read_string("BUGBOARD_AUDIENCE", "http://127.0.0.1:8080");
        let api_user = read_optional_string("BUGBOARD_API_USER");
        let api_key = read_optional_string("BUGBOARD_API_KEY");
        let auth_cookie = read_optional_string("BUGBOARD_AUTH_COOKIE");
        let realtime_enabled = read_bool("BUGBOARD_REALTIME_ENABLED", true)?;
        let realtime_max_retry_secs = read_u64("BUGBOARD_REALTIME_MAX_RETRY_SECS", 3600)?;
        let cors_allow_origins = read_list("BUGBOARD_CORS_ALLOW_ORIGINS");

        Ok(Self {
            http_addr,
            backend_url,
            changes_url,
            request_timeout: Duration::from_secs(request_timeout_secs),
            auth_mode,
            stub_user,
            audience,
            api_user,
            api_key,
            auth_cookie,
            realtime_enabled,
            realtime_max_retry_secs,
            cors_allow_origins,
        })
    }
}

/// `http://host` becomes `ws://host/api/changes/websocket` (and `https` →
/// `wss`). Returns `None` for any other scheme.
fn derive_changes_url(backend_url: &str) -> Option<String> {
    let base = backend_url.trim().trim_end_matches('/');
    let ws_base = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        return None;
    };
    Some(format!("{ws_base}{CHANGES_PATH}"))
}

fn parse_auth_mode(raw: &str) -> Result<AuthMode, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "stub" => Ok(AuthMode::Stub),
        "remote" => Ok(AuthMode::Remote),
        _ => Err(ConfigError::InvalidValue("BUGBOARD_AUTH_MODE", raw.to_string())),
    }
}

pub fn load_dotenv() -> Result<(), std::io::Error> {
    let path = Path::new(".env");
    if !path.exists() {
        return Ok(());
    }
    let contents = std::fs::read_to_string(path)?;
    for (key, value) in contents.lines().filter_map(parse_dotenv_line) {
        if std::env::var_os(&key).is_none() {
            // Safety: `main` calls this before the tokio runtime is built, so no
            // other thread reads the environment concurrently.
            unsafe {
                std::env::set_var(key, value);
            }
        }
    }
    Ok(())
}

fn read_string(key: &'static str, default: &'static str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn read_u64(key: &'static str, default: u64) -> Result<u64, ConfigError> {
    let raw = std::env::var(key).unwrap_or_else(|_| default.to_string());
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber(key, raw))
}

fn read_bool(key: &'static str, default: bool) -> Result<bool, ConfigError> {
    let Ok(raw) = std::env::var(key) else {
        return Ok(default);
    };
    parse_bool(&raw).ok_or(ConfigError::InvalidValue(key, raw))
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn read_optional_string(key: &'static str) -> Option<String> {
    let value = std::env::var(key).unwrap_or_default();
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn read_list(key: &'static str) -> Vec<String> {
    std::env::var(key)
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_dotenv_line(line: &str) -> Option<(String, String)> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
    let (key, value) = trimmed.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    let value = value.trim();
    let value = value
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|inner| inner.strip_suffix('\'')))
        .unwrap_or(value);
    Some((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn changes_url_follows_backend_scheme() {
        assert_eq!(
            derive_changes_url("http://bugs.example.com:8066/").as_deref(),
            Some("ws://bugs.example.com:8066/api/changes/websocket")
        );
        assert_eq!(
            derive_changes_url("https://bugs.example.com").as_deref(),
            Some("wss://bugs.example.com/api/changes/websocket")
        );
        assert!(derive_changes_url("bugs.example.com").is_none());
    }

    #[test]
    fn auth_mode_is_case_insensitive() {
        assert_eq!(parse_auth_mode("Remote").unwrap(), AuthMode::Remote);
        assert_eq!(parse_auth_mode(" stub ").unwrap(), AuthMode::Stub);
        assert!(parse_auth_mode("persona").is_err());
    }

    #[test]
    fn parse_bool_accepts_common_spellings() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn parse_dotenv_line_handles_export_and_quotes() {
        assert_eq!(
            parse_dotenv_line("export FOO=bar"),
            Some(("FOO".to_string(), "bar".to_string()))
        );
        assert_eq!(
            parse_dotenv_line(r#"FOO="hello world""#),
            Some(("FOO".to_string(), "hello world".to_string()))
        );
        assert_eq!(
            parse_dotenv_line("FOO='single'"),
            Some(("FOO".to_string(), "single".to_string()))
        );
    }

    #[test]
    fn parse_dotenv_line_skips_comments() {
        assert!(parse_dotenv_line("# comment").is_none());
        assert!(parse_dotenv_line("   ").is_none());
        assert!(parse_dotenv_line("=value").is_none());
    }
}
