use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use tokio::sync::watch;
use tokio::time::sleep;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use bugboard_core::domain::changes::Change;

use crate::realtime::{ChangeHub, RealtimeError, RetryDelay};

#[derive(Debug, Serialize)]
struct AuthMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    cookie: &'a str,
}

#[derive(Debug, PartialEq, Eq)]
enum SessionEnd {
    Closed,
    LoginChanged,
    Shutdown,
}

/// Owns the only connection to the backend change stream and republishes
/// its frames on a [`ChangeHub`].
pub struct ChangeFeed {
    url: String,
    auth_cookie: Option<String>,
    hub: ChangeHub,
    retry: RetryDelay,
    login: watch::Receiver<bool>,
}

impl ChangeFeed {
    pub fn new(
        url: impl Into<String>,
        auth_cookie: Option<String>,
        hub: ChangeHub,
        max_retry_secs: u64,
        login: watch::Receiver<bool>,
    ) -> Self {
        Self {
            url: url.into(),
            auth_cookie,
            hub,
            retry: RetryDelay::new(max_retry_secs),
            login,
        }
    }

    /// Runs until the login channel closes. A login flip restarts the socket
    /// right away; a dropped socket is retried after the published delay.
    pub async fn run(mut self) -> Result<(), RealtimeError> {
        loop {
            let end = match self.session().await {
                Ok(end) => end,
                Err(err) => {
                    warn!(url = %self.url, error = %err, "change stream failed");
                    SessionEnd::Closed
                }
            };
            match end {
                SessionEnd::Shutdown => return Ok(()),
                SessionEnd::LoginChanged => {
                    info!("login state changed, restarting change stream");
                    continue;
                }
                SessionEnd::Closed => {
                    let retry_in_secs = self.retry.on_close();
                    self.hub.closed(retry_in_secs);
                    info!(retry_in_secs, "change stream closed");
                    tokio::select! {
                        _ = sleep(Duration::from_secs(retry_in_secs)) => {}
                        changed = self.login.changed() => {
                            if changed.is_err() {
                                return Ok(());
                            }
                        }
                    }
                }
            }
        }
    }

    async fn session(&mut self) -> Result<SessionEnd, RealtimeError> {
        let (stream, _) = connect_async(self.url.as_str()).await?;
        let (mut write, mut read) = stream.split();

        let auth = auth_message(self.auth_cookie.as_deref())?;
        write.send(Message::text(auth)).await?;
        self.retry.reset();
        self.hub.opened().await;
        info!(url = %self.url, "change stream connected");

        loop {
            let frame = tokio::select! {
                frame = read.next() => frame,
                changed = self.login.changed() => {
                    if let Err(err) = write.send(Message::Close(None)).await {
                        debug!(error = %err, "close frame not sent");
                    }
                    return Ok(if changed.is_ok() {
                        SessionEnd::LoginChanged
                    } else {
                        SessionEnd::Shutdown
                    });
                }
            };
            match frame {
                Some(Ok(Message::Text(text))) => self.handle_frame(text.as_str()).await,
                Some(Ok(Message::Close(_))) | None => return Ok(SessionEnd::Closed),
                Some(Ok(_)) => {}
                Some(Err(err)) => return Err(err.into()),
            }
        }
    }

    async fn handle_frame(&self, text: &str) {
        match parse_change(text) {
            Some(change) => {
                debug!(action = %change.action, user = %change.user.email, "change received");
                self.hub.changed(change).await;
            }
            None => warn!(frame = %text, "ignoring malformed change frame"),
        }
    }
}

fn auth_message(cookie: Option<&str>) -> Result<String, serde_json::Error> {
    serde_json::to_string(&AuthMessage {
        kind: "auth",
        cookie: cookie.unwrap_or_default(),
    })
}

fn parse_change(text: &str) -> Option<Change> {
    serde_json::from_str(text).ok()
}
