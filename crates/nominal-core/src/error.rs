//! Error types for token generation.
//!
//! Stores are total and never fail; the only fallible identity operation is
//! drawing a fresh value from an exhausted counter.

use thiserror::Error;

/// Errors from [`TokenGenerator`](crate::TokenGenerator).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum TokenError {
    /// The counter has issued every value up to `u64::MAX` and the free
    /// list (if any) is empty.
    #[error("token counter exhausted after issuing {issued} tokens")]
    Exhausted {
        /// Number of fresh values the counter handed out before running dry.
        issued: u64,
    },
}
