//! Unified error types for the stockroom crate.
//!
//! Validation failures are raised before any store call. Store failures wrap
//! the underlying `SeaORM` error and are never retried by the core.

use thiserror::Error;

/// All errors produced by stockroom operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Settings file could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// User input failed a precondition (e.g. empty name)
    #[error("Validation error: {message}")]
    Validation {
        /// What was wrong with the input
        message: String,
    },

    /// Quantity outside the allowed range for the operation
    #[error("Invalid quantity: {quantity}")]
    InvalidQuantity {
        /// The rejected quantity
        quantity: i64,
    },

    /// Price negative or not a finite number
    #[error("Invalid price: {price}")]
    InvalidPrice {
        /// The rejected price
        price: f64,
    },

    /// No stock line with this id exists
    #[error("Item not found: {id}")]
    ItemNotFound {
        /// Id that was looked up
        id: i64,
    },

    /// Issuing more than is on the shelf
    #[error("Insufficient stock: {available} available, {requested} requested")]
    InsufficientStock {
        /// Quantity currently stored on the line
        available: i64,
        /// Quantity the caller tried to issue
        requested: i64,
    },

    /// A stored or summed quantity does not fit in an `i64`
    #[error("Quantity overflow in {what}")]
    QuantityOverflow {
        /// Line or total that overflowed
        what: String,
    },

    /// A category or supplier with this name already exists
    #[error("Duplicate {kind} name: {name}")]
    DuplicateReference {
        /// "category" or "supplier"
        kind: &'static str,
        /// The clashing name
        name: String,
    },

    /// The record store is unreachable or rejected the statement
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error while writing an export
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization failure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// True for errors raised by input validation, before any store call.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::InvalidQuantity { .. } | Self::InvalidPrice { .. }
        )
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
