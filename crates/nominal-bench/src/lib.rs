//! Benchmark profiles for the Nominal composition engine.
//!
//! - [`populated_datum`]: a direct-map store with one entry per token
//! - [`paired_pools`]: a pooled store where tokens share pools two by two
//! - [`counting_behavior`]: a behavior that bumps a per-token counter

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::cell::RefCell;
use std::rc::Rc;

use nominal_behavior::{Behavior, Context};
use nominal_core::{Token, TokenError, TokenGenerator};
use nominal_datum::{Datum, SharedDatum};

/// Issue `count` tokens from a fresh generator.
pub fn issue_tokens(count: usize) -> Result<Vec<Token>, TokenError> {
    let mut gen = TokenGenerator::new();
    (0..count).map(|_| gen.create()).collect()
}

/// A store holding `index as u64` for each of `tokens`.
pub fn populated_datum(tokens: &[Token]) -> Datum<u64> {
    let mut store = Datum::new();
    for (i, &t) in tokens.iter().enumerate() {
        store.associate(t, i as u64);
    }
    store
}

/// A pooled store where consecutive tokens share one pool.
pub fn paired_pools(tokens: &[Token]) -> SharedDatum<u64> {
    let mut store = SharedDatum::new();
    for pair in tokens.chunks(2) {
        store.create_pool_for(pair[0], 0);
        if let Some(&second) = pair.get(1) {
            store.join_latest_pool(second);
        }
    }
    store
}

/// A behavior subscribed to all of `tokens` that increments each token's
/// counter in the returned store.
pub fn counting_behavior(tokens: &[Token]) -> (Behavior<u64>, Rc<RefCell<Datum<u64>>>) {
    let counters = Rc::new(RefCell::new(populated_datum(tokens)));
    let captured = Rc::clone(&counters);
    let mut behavior = Behavior::new(move |ctx: &Context, step: u64| {
        if let Some(c) = ctx.get_mut(&mut *captured.borrow_mut()) {
            *c += step;
        }
    })
    .with_name("count");
    for &t in tokens {
        behavior.subscribe(t);
    }
    (behavior, counters)
}
