use storefront_core::CoreError;
use storefront_storage::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("core error: {0}")]
    Core(#[from] CoreError),

    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("entity already present: {0}")]
    DuplicateEntity(String),

    #[error("mutation not pending: {0}")]
    UnknownMutation(String),

    #[error("mutation already confirmed: {0}")]
    AlreadyConfirmed(String),

    #[error("confirmation for {actual} does not match mutation on {expected}")]
    MismatchedConfirmation { expected: String, actual: String },

    #[error("too many pending mutations (limit {limit})")]
    TooManyPending { limit: usize },

    #[error("access violation: {0}")]
    AccessViolation(String),

    #[error("data source error: {0}")]
    Source(String),
}
