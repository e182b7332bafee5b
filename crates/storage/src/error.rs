use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate id in collection: {0}")]
    DuplicateId(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("core error: {0}")]
    Core(#[from] storefront_core::CoreError),
}
