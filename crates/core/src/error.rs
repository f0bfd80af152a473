//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every variant is a deterministic, synchronous rejection raised before any
/// mutation is applied; callers can treat a `DomainError` as "operation
/// entirely rejected". Infrastructure failures belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// A value failed validation (e.g. blank name, negative quantity).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A stock item name collided with another item (case-insensitive).
    #[error("duplicate stock item name: {0}")]
    DuplicateName(String),

    /// A deduction would have driven an on-hand quantity negative.
    #[error("insufficient stock (available: {available}, requested: {requested})")]
    InsufficientStock { available: f64, requested: f64 },

    /// A requested entity was not found (domain-level).
    #[error("not found")]
    NotFound,

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn duplicate_name(name: impl Into<String>) -> Self {
        Self::DuplicateName(name.into())
    }

    pub fn insufficient_stock(available: f64, requested: f64) -> Self {
        Self::InsufficientStock {
            available,
            requested,
        }
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}
