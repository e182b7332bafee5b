use storefront_core::CoreError;
use storefront_engine::EngineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("core error: {0}")]
    Core(#[from] CoreError),

    #[error("write rejected: {0}")]
    Rejected(String),

    #[error("row not found: {0}")]
    NotFound(String),
}

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("engine error: {0}")]
    Engine(#[from] EngineError),
}
