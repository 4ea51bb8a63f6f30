use std::fmt;

use serde::Serialize;

use crate::error::CoreError;

pub const DEFAULT_PAGE_SIZE: usize = 15;
pub const DEFAULT_PAGE_WINDOW: usize = 7;

/// Number of results shown per page. Always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PageSize(usize);

impl PageSize {
    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize(DEFAULT_PAGE_SIZE)
    }
}

impl TryFrom<usize> for PageSize {
    type Error = CoreError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        if value == 0 {
            return Err(CoreError::InvalidPageSize(value));
        }
        Ok(PageSize(value))
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Maximum number of page links rendered at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PageWindow(usize);

impl PageWindow {
    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for PageWindow {
    fn default() -> Self {
        PageWindow(DEFAULT_PAGE_WINDOW)
    }
}

impl TryFrom<usize> for PageWindow {
    type Error = CoreError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        if value == 0 {
            return Err(CoreError::InvalidPageWindow(value));
        }
        Ok(PageWindow(value))
    }
}
