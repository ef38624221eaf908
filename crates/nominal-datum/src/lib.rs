//! Token-keyed data stores for the Nominal composition engine.
//!
//! A store grants tokens access to data. Tokens never own the data; the
//! store does, and the four store kinds differ only in how many tokens
//! share one value:
//!
//! | Store | Sharing | Access rule |
//! |-------|---------|-------------|
//! | [`Datum`] | one value per token | any associated token |
//! | [`StaticDatum`] | one value for the whole group | subscribed tokens |
//! | [`SolitaryDatum`] | one value, one owner | the bound token only |
//! | [`SharedDatum`] | one value per pool | tokens mapped to that pool |
//!
//! Every store is total: reading through a token without access yields the
//! store's fixed default, and no store operation returns an error.
//! [`Token::NONE`](nominal_core::Token::NONE) never gains access to anything.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod direct;
pub mod exclusive;
pub mod group;
pub mod pooled;

pub use direct::Datum;
pub use exclusive::SolitaryDatum;
pub use group::StaticDatum;
pub use pooled::{PoolId, SharedDatum};
