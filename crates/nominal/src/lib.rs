//! Nominal: give opaque identities data and behavior at runtime, without
//! inheritance.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Nominal sub-crates. For most users, adding `nominal` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use nominal::prelude::*;
//!
//! let mut tokens = TokenGenerator::new();
//! let tester = tokens.create().unwrap();
//!
//! // Data: a per-token name.
//! let names = Rc::new(RefCell::new(Datum::<String>::new()));
//! tester.associate(&mut *names.borrow_mut(), String::from("Tester"));
//!
//! // Behavior: greet whichever token it runs for.
//! let captured = Rc::clone(&names);
//! let mut greet = Behavior::new(move |ctx: &Context, ()| {
//!     format!("hello, {}", ctx.read(&*captured.borrow()))
//! })
//! .with_name("greet");
//! tester.subscribe(&mut greet);
//!
//! let greetings = greet.broadcast(()).unwrap();
//! assert_eq!(greetings, vec![(tester, String::from("hello, Tester"))]);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `nominal-core` | `Token`, `TokenGenerator`, config, errors, seam traits |
//! | [`datum`] | `nominal-datum` | The four token-keyed stores and `PoolId` |
//! | [`behavior`] | `nominal-behavior` | `Behavior`, `Context`, `Dispatch` |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Tokens, token generation, errors, and seam traits (`nominal-core`).
pub use nominal_core as types;

/// Token-keyed data stores (`nominal-datum`).
pub use nominal_datum as datum;

/// Behavior dispatch (`nominal-behavior`).
pub use nominal_behavior as behavior;

/// Everything needed for typical use.
///
/// ```rust
/// use nominal::prelude::*;
/// ```
pub mod prelude {
    pub use nominal_behavior::{Behavior, BehaviorError, Context, Dispatch};
    pub use nominal_core::{
        Associate, DatumRead, DatumWrite, GeneratorConfig, Membership, Token, TokenError,
        TokenGenerator,
    };
    pub use nominal_datum::{Datum, PoolId, SharedDatum, SolitaryDatum, StaticDatum};
}
