use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid page size: {0}")]
    InvalidPageSize(usize),
    #[error("invalid page window: {0}")]
    InvalidPageWindow(usize),
}
