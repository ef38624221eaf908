//! Test utilities and fixtures for Nominal development.
//!
//! Provides fresh token batches ([`tokens`], [`token_vec`]), a shared
//! [`CallLog`] for asserting on behavior invocations, and
//! [`init_tracing`] for seeing log events from a failing test.
//!
//! This crate depends only on `nominal-core` so every other crate can use
//! it from its unit tests.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::CallLog;

use nominal_core::{Token, TokenGenerator};

/// Install a `tracing` subscriber for the current test binary.
///
/// Honours `RUST_LOG`; defaults to `warn`. Safe to call from every test:
/// only the first call installs anything.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// `N` distinct tokens from a fresh generator (raw values `1..=N`).
pub fn tokens<const N: usize>() -> [Token; N] {
    let mut gen = TokenGenerator::new();
    std::array::from_fn(|_| gen.create().expect("fresh generator cannot be exhausted"))
}

/// `count` distinct tokens from a fresh generator.
pub fn token_vec(count: usize) -> Vec<Token> {
    let mut gen = TokenGenerator::new();
    (0..count)
        .map(|_| gen.create().expect("fresh generator cannot be exhausted"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_distinct_and_valid() {
        let [a, b, c] = tokens();
        assert!(a.is_valid() && b.is_valid() && c.is_valid());
        assert!(a != b && b != c && a != c);
    }

    #[test]
    fn token_vec_matches_array_helper() {
        let [a, b] = tokens();
        assert_eq!(token_vec(2), vec![a, b]);
    }

    #[test]
    fn init_tracing_is_idempotent() {
        init_tracing();
        init_tracing();
    }
}
