use thiserror::Error;

/// Failures surfaced by [`crate::portfolio::PortfolioService`].
///
/// Adapters use `anyhow` internally; anything they bubble up lands in `Other`.
#[derive(Debug, Error)]
pub enum PortfolioError {
    /// Missing or malformed request field. Nothing was written.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// The store accepted the call but returned no row.
    #[error("{0}")]
    StoreRejected(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PortfolioError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn store_rejected(msg: impl Into<String>) -> Self {
        Self::StoreRejected(msg.into())
    }
}

pub type Result<T, E = PortfolioError> = std::result::Result<T, E>;
