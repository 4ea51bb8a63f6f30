use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const RECENT_CHANGES_LIMIT: usize = 10;

/// Actor of a change: short email plus the md5 of the full address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangeUser {
    pub email: String,
    pub md5: String,
}

/// One notification from the backend change stream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Change {
    pub user: ChangeUser,
    pub action: String,
    pub bug: serde_json::Value,
    #[serde(rename = "bugid")]
    pub bug_id: String,
    pub title: String,
    pub time: Option<DateTime<Utc>>,
    pub private: bool,
}

impl Change {
    /// Bug id, falling back to the `id` of the embedded bug document.
    pub fn resolved_bug_id(&self) -> Option<&str> {
        if !self.bug_id.is_empty() {
            return Some(&self.bug_id);
        }
        self.bug.get("id").and_then(|value| value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RealtimeEvent {
    Open,
    Closed { retry_in_secs: u64 },
    Change(Change),
}

/// Last few changes seen on the stream, newest first.
#[derive(Debug, Clone, Default)]
pub struct RecentChanges {
    entries: VecDeque<Change>,
}

impl RecentChanges {
    pub fn push(&mut self, change: Change) {
        self.entries.push_front(change);
        self.entries.truncate(RECENT_CHANGES_LIMIT);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn snapshot(&self) -> Vec<Change> {
        self.entries.iter().cloned().collect()
    }
}
