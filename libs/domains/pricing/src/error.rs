use thiserror::Error;

use crate::catalog::CatalogKind;

/// Result type for pricing operations
pub type PricingResult<T> = Result<T, PricingError>;

/// Errors that can occur in the pricing domain
#[derive(Debug, Error)]
pub enum PricingError {
    /// An id was referenced that the catalog does not contain
    #[error("Unknown {kind} '{id}': not present in the pricing catalog")]
    UnknownCatalogKey { kind: CatalogKind, id: String },

    /// A user-supplied field could not be accepted
    #[error("Invalid value for {field}: {reason}")]
    InvalidFieldValue { field: String, reason: String },

    /// An alternate catalog violates the catalog invariants
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    /// Malformed catalog or configuration document
    #[error("Malformed JSON document: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to read a catalog or configuration file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PricingError {
    pub fn unknown_key(kind: CatalogKind, id: impl Into<String>) -> Self {
        PricingError::UnknownCatalogKey {
            kind,
            id: id.into(),
        }
    }

    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        PricingError::InvalidFieldValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
