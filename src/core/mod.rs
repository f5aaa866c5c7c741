//! Core business logic - framework-agnostic inventory operations.
//!
//! Every function takes the store client explicitly and re-reads the
//! authoritative state; nothing is cached between calls.

/// Append-only activity log
pub mod audit;
/// Category and supplier reference data
pub mod catalog;
/// Join, grouping and valuation of stock lines
pub mod inventory;
/// Receipts, edits, issues and deletions
pub mod receiving;
/// Decoding of stored item rows
pub mod records;
/// Stock-take export
pub mod report;
