pub mod client;
pub mod prefs;

pub use client::{ApiError, BugApiClient, Credentials};
pub use prefs::UserPrefs;
