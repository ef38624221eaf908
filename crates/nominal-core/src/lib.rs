//! Core types and traits for the Nominal composition engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! identity handle ([`Token`]), the injectable [`TokenGenerator`], the error
//! types, and the seam traits that stores and behaviors implement:
//!
//! - [`DatumRead`] / [`DatumWrite`]: token-keyed access to a store's value.
//! - [`Associate`]: attaching and detaching a value for a token.
//! - [`Membership`]: subscribing tokens to a group or behavior.
//!
//! A token carries no data and no behavior of its own. Data lives in stores
//! (`nominal-datum`), behavior in dispatchers (`nominal-behavior`), and both
//! are reached by keying on the token.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod token;
pub mod traits;

pub use config::GeneratorConfig;
pub use error::TokenError;
pub use token::{Token, TokenGenerator};
pub use traits::{Associate, DatumRead, DatumWrite, Membership};
