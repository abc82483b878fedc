use thiserror::Error;

/// Domain-facing error taxonomy for catalog operations.
///
/// Every failure is detected before or during the single commit step;
/// nothing is partially applied.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Stale version: {0}")]
    StaleVersion(String),

    #[error("Duplicate SKU: {0}")]
    DuplicateSku(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, CatalogError>;

impl CatalogError {
    /// True for failures the caller can resolve by reloading fresh state
    /// (stale version) or by changing input (duplicate SKU).
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::StaleVersion(_) | Self::DuplicateSku(_))
    }
}
