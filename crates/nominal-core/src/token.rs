//! The [`Token`] identity handle and its [`TokenGenerator`].

use std::collections::BTreeSet;
use std::fmt;

use crate::config::GeneratorConfig;
use crate::error::TokenError;
use crate::traits::{Associate, DatumRead, Membership};

/// An opaque identity.
///
/// A token holds no data and no behavior: it is only a key. Stores hold
/// values keyed by a token's raw value, and behaviors hold sets of
/// subscribed tokens. Dropping a token does not touch any store.
///
/// The raw value 0 is reserved as [`Token::NONE`] and is never issued by a
/// [`TokenGenerator`]. Every store treats it as "no identity".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Token(u64);

impl Token {
    /// The reserved "no identity" sentinel.
    pub const NONE: Token = Token(0);

    /// Wrap a caller-supplied raw value, bypassing any generator.
    ///
    /// Nothing is reserved or checked: a raw token may collide with one a
    /// generator issues later.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw integer key.
    pub const fn id(self) -> u64 {
        self.0
    }

    /// Whether this token is anything other than [`Token::NONE`].
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }

    /// Attach `value` to this token in `store`.
    ///
    /// Returns `None` without touching the store when `self` is
    /// [`Token::NONE`].
    pub fn associate<S: Associate + ?Sized>(
        self,
        store: &mut S,
        value: S::Value,
    ) -> Option<&mut S::Value> {
        store.associate(self, value)
    }

    /// Detach this token from `store`, returning the value it had access to
    /// (or the store's default if it had none).
    pub fn dissociate<S: Associate + ?Sized>(self, store: &mut S) -> S::Value {
        store.dissociate(self)
    }

    /// Add this token to `group`. Returns `true` if it was not already a member.
    pub fn subscribe<M: Membership + ?Sized>(self, group: &mut M) -> bool {
        group.subscribe(self)
    }

    /// Remove this token from `group`. Returns `true` if it was a member.
    pub fn unsubscribe<M: Membership + ?Sized>(self, group: &mut M) -> bool {
        group.unsubscribe(self)
    }

    /// Read this token's value from `store`, or the store's default.
    pub fn read<S: DatumRead + ?Sized>(self, store: &S) -> &S::Value {
        store.read_or_default(self)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Token> for u64 {
    fn from(token: Token) -> u64 {
        token.0
    }
}

/// Issues unique, monotonically increasing tokens.
///
/// One generator is constructed per application context and passed to
/// whatever needs fresh identities. Two generators are independent: they
/// can issue the same raw values, which keeps tests isolated from each other.
///
/// With [`GeneratorConfig::recycle`] enabled, released tokens are reissued
/// lowest-first before the counter advances.
#[derive(Debug)]
pub struct TokenGenerator {
    config: GeneratorConfig,
    /// Next fresh value, or `None` once `u64::MAX` has been issued.
    next: Option<u64>,
    /// Fresh values handed out so far.
    issued: u64,
    /// Released values awaiting reissue. Always empty unless recycling.
    free: BTreeSet<u64>,
}

impl TokenGenerator {
    /// Create a generator with the default config.
    pub fn new() -> Self {
        Self::with_config(GeneratorConfig::default())
    }

    /// Create a generator from an explicit config.
    pub fn with_config(config: GeneratorConfig) -> Self {
        let next = Some(config.effective_first());
        Self {
            config,
            next,
            issued: 0,
            free: BTreeSet::new(),
        }
    }

    /// Issue a token.
    ///
    /// Returns a recycled token if one is available, otherwise a value one
    /// greater than every value this generator has issued so far.
    pub fn create(&mut self) -> Result<Token, TokenError> {
        if let Some(raw) = self.free.pop_first() {
            tracing::trace!(token = raw, "reissued recycled token");
            return Ok(Token(raw));
        }
        let Some(raw) = self.next else {
            tracing::warn!(issued = self.issued, "token counter exhausted");
            return Err(TokenError::Exhausted {
                issued: self.issued,
            });
        };
        self.next = raw.checked_add(1);
        self.issued += 1;
        tracing::trace!(token = raw, "issued token");
        Ok(Token(raw))
    }

    /// Hand a token back for reuse.
    ///
    /// Only has an effect when recycling is enabled and `token` is one this
    /// generator issued and has not already been released. Returns whether
    /// the token was accepted. Releasing does not touch any store: entries
    /// keyed by the token stay where they are and will be visible to
    /// whoever receives the token next.
    pub fn release(&mut self, token: Token) -> bool {
        if !self.config.recycle || !self.was_issued(token) {
            return false;
        }
        let accepted = self.free.insert(token.0);
        if accepted {
            tracing::trace!(token = token.0, "released token for reuse");
        }
        accepted
    }

    /// Number of fresh values the counter has handed out.
    pub fn issued(&self) -> u64 {
        self.issued
    }

    /// The raw value the counter will issue next, ignoring the free list.
    ///
    /// `None` once the counter is exhausted.
    pub fn peek_next(&self) -> Option<u64> {
        self.next
    }

    /// Number of released tokens waiting to be reissued.
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// The config this generator was built from.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    fn was_issued(&self, token: Token) -> bool {
        let first = self.config.effective_first();
        match self.next {
            Some(next) => token.0 >= first && token.0 < next,
            None => token.0 >= first,
        }
    }
}

impl Default for TokenGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_token_is_one() {
        let mut gen = TokenGenerator::new();
        assert_eq!(gen.create().unwrap(), Token::from_raw(1));
    }

    #[test]
    fn tokens_are_strictly_increasing() {
        let mut gen = TokenGenerator::new();
        let a = gen.create().unwrap();
        let b = gen.create().unwrap();
        let c = gen.create().unwrap();
        assert!(a < b && b < c);
        assert_eq!(gen.issued(), 3);
    }

    #[test]
    fn none_is_invalid_and_zero() {
        assert!(!Token::NONE.is_valid());
        assert_eq!(Token::NONE.id(), 0);
        assert_eq!(Token::default(), Token::NONE);
    }

    #[test]
    fn generator_never_issues_none() {
        let mut gen = TokenGenerator::with_config(GeneratorConfig::new().starting_at(0));
        assert!(gen.create().unwrap().is_valid());
    }

    #[test]
    fn from_raw_bypasses_counter() {
        let mut gen = TokenGenerator::new();
        let raw = Token::from_raw(42);
        assert_eq!(raw.id(), 42);
        assert_eq!(gen.create().unwrap().id(), 1);
    }

    #[test]
    fn independent_generators_do_not_share_state() {
        let mut a = TokenGenerator::new();
        let mut b = TokenGenerator::new();
        a.create().unwrap();
        a.create().unwrap();
        assert_eq!(b.create().unwrap().id(), 1);
    }

    #[test]
    fn exhaustion_is_reported_after_max() {
        let mut gen = TokenGenerator::with_config(GeneratorConfig::new().starting_at(u64::MAX));
        assert_eq!(gen.create().unwrap().id(), u64::MAX);
        assert_eq!(gen.peek_next(), None);
        assert_eq!(gen.create(), Err(TokenError::Exhausted { issued: 1 }));
    }

    #[test]
    fn generator_keeps_its_config() {
        let config = GeneratorConfig::recycling().starting_at(10);
        let gen = TokenGenerator::with_config(config.clone());
        assert_eq!(gen.config(), &config);
        assert_eq!(TokenGenerator::new().config(), &GeneratorConfig::default());
    }

    #[test]
    fn release_ignored_without_recycling() {
        let mut gen = TokenGenerator::new();
        let t = gen.create().unwrap();
        assert!(!gen.release(t));
        assert_ne!(gen.create().unwrap(), t);
    }

    #[test]
    fn recycled_tokens_reissued_lowest_first() {
        let mut gen = TokenGenerator::with_config(GeneratorConfig::recycling());
        let t1 = gen.create().unwrap();
        let t2 = gen.create().unwrap();
        let _t3 = gen.create().unwrap();
        assert!(gen.release(t2));
        assert!(gen.release(t1));
        assert_eq!(gen.free_count(), 2);
        assert_eq!(gen.create().unwrap(), t1);
        assert_eq!(gen.create().unwrap(), t2);
        assert_eq!(gen.create().unwrap().id(), 4);
    }

    #[test]
    fn release_rejects_foreign_and_duplicate_tokens() {
        let mut gen = TokenGenerator::with_config(GeneratorConfig::recycling());
        let t = gen.create().unwrap();
        assert!(!gen.release(Token::NONE));
        assert!(!gen.release(Token::from_raw(99)));
        assert!(gen.release(t));
        assert!(!gen.release(t));
    }

    #[test]
    fn display_is_raw_value() {
        assert_eq!(Token::from_raw(17).to_string(), "17");
        assert_eq!(u64::from(Token::from_raw(17)), 17);
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn issued_tokens_are_unique_and_nonzero(count in 1usize..200) {
                let mut gen = TokenGenerator::new();
                let tokens: Vec<Token> = (0..count).map(|_| gen.create().unwrap()).collect();
                let distinct: std::collections::HashSet<_> = tokens.iter().collect();
                prop_assert_eq!(distinct.len(), count);
                prop_assert!(tokens.iter().all(|t| t.is_valid()));
                prop_assert!(tokens.windows(2).all(|w| w[0] < w[1]));
            }

            #[test]
            fn recycling_never_duplicates_live_tokens(
                ops in proptest::collection::vec(any::<bool>(), 1..100),
            ) {
                let mut gen = TokenGenerator::with_config(GeneratorConfig::recycling());
                let mut live: Vec<Token> = Vec::new();
                for create in ops {
                    if create || live.is_empty() {
                        let t = gen.create().unwrap();
                        prop_assert!(!live.contains(&t));
                        live.push(t);
                    } else {
                        let t = live.remove(0);
                        prop_assert!(gen.release(t));
                    }
                }
            }
        }
    }
}
