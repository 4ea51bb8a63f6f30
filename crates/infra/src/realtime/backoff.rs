use std::time::Duration;

pub const INITIAL_RETRY_SECS: u64 = 30;

/// Reconnect delay for the change stream: reset on every successful open,
/// doubled on every close, capped at `max_secs`.
#[derive(Debug, Clone)]
pub struct RetryDelay {
    current_secs: u64,
    max_secs: u64,
}

impl RetryDelay {
    pub fn new(max_secs: u64) -> Self {
        Self {
            current_secs: INITIAL_RETRY_SECS.min(max_secs.max(1)),
            max_secs: max_secs.max(1),
        }
    }

    pub fn reset(&mut self) {
        self.current_secs = INITIAL_RETRY_SECS.min(self.max_secs);
    }

    /// Doubles the delay and returns the new value in seconds.
    pub fn on_close(&mut self) -> u64 {
        self.current_secs = self.current_secs.saturating_mul(2).min(self.max_secs);
        self.current_secs
    }

    pub fn current(&self) -> Duration {
        Duration::from_secs(self.current_secs)
    }
}
