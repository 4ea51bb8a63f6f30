use serde::{Deserialize, Serialize};

use bugboard_core::types::page_size::{PageSize, DEFAULT_PAGE_SIZE};

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct MeResponse {
    #[serde(default)]
    pub prefs: UserPrefs,
}

/// User preferences stored by the backend. Missing keys keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPrefs {
    pub search: SearchPrefs,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchPrefs {
    pub rows_per_page: usize,
}

impl Default for SearchPrefs {
    fn default() -> Self {
        Self {
            rows_per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

impl UserPrefs {
    pub fn page_size(&self) -> PageSize {
        PageSize::try_from(self.search.rows_per_page).unwrap_or_default()
    }
}
