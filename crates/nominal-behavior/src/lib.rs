//! Behavior dispatch for the Nominal composition engine.
//!
//! A [`Behavior`] wraps a callable and a set of subscribed tokens. Running
//! it for a token hands the callable a [`Context`] naming that token; the
//! callable reaches "its own" data by reading stores through the context
//! instead of being passed a token explicitly.
//!
//! The behavior also records the token it last dispatched for
//! ([`Behavior::current_context`]), so code holding the behavior can read
//! stores as that token with [`Behavior::read`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod behavior;
pub mod context;
pub mod error;

pub use behavior::{Behavior, Callable, Dispatch};
pub use context::Context;
pub use error::BehaviorError;
