pub mod backoff;
pub mod feed;
pub mod hub;

use thiserror::Error;

pub use backoff::RetryDelay;
pub use feed::ChangeFeed;
pub use hub::ChangeHub;

#[derive(Debug, Error)]
pub enum RealtimeError {
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("invalid auth message: {0}")]
    AuthMessage(#[from] serde_json::Error),
}
