//! [`SharedDatum`]: tokens grouped into pools, one value per pool.
//!
//! Where [`StaticDatum`](crate::StaticDatum) has a single fixed group,
//! a [`SharedDatum`] forms groups dynamically. Each call to
//! [`create_pool_for`](SharedDatum::create_pool_for) opens a fresh pool with
//! its own value; other tokens join it with
//! [`join_latest_pool`](SharedDatum::join_latest_pool) or
//! [`join_pool`](SharedDatum::join_pool). Distinct pools never share data.
//!
//! Pools are kept after their last member leaves unless the store was built
//! with [`SharedDatum::with_reclamation`], in which case each pool is
//! member-counted and dropped when the count reaches zero.

use std::fmt;

use indexmap::IndexMap;
use nominal_core::{Associate, DatumRead, DatumWrite, Token};

/// Identifies a pool within one [`SharedDatum`].
///
/// Issued from a per-store monotonic counter starting at 1. Ids are never
/// reused, even when reclamation drops a pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolId(pub u64);

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for PoolId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

#[derive(Clone, Debug)]
struct Pool<T> {
    value: T,
    members: usize,
}

/// Token → pool → value store.
#[derive(Clone, Debug)]
pub struct SharedDatum<T> {
    /// Which pool each token is mapped to. At most one per token.
    assignments: IndexMap<Token, PoolId>,
    pools: IndexMap<PoolId, Pool<T>>,
    /// `None` once every pool id has been issued.
    next_pool: Option<u64>,
    /// Most recently created pool, cleared if reclamation drops it.
    latest: Option<PoolId>,
    reclaim: bool,
    default: T,
}

impl<T: Default> SharedDatum<T> {
    /// Create an empty store that keeps pools forever.
    pub fn new() -> Self {
        Self::with_default(T::default())
    }

    /// Create an empty store that drops pools once they have no members.
    pub fn with_reclamation() -> Self {
        Self {
            reclaim: true,
            ..Self::new()
        }
    }
}

impl<T> SharedDatum<T> {
    /// Create an empty store with an explicit default for unmapped tokens.
    pub fn with_default(default: T) -> Self {
        Self {
            assignments: IndexMap::new(),
            pools: IndexMap::new(),
            next_pool: Some(1),
            latest: None,
            reclaim: false,
            default,
        }
    }

    /// Open a new pool holding `value` and map `token` to it.
    ///
    /// If `token` was already in a pool it moves to the new one. Returns
    /// the new pool's value, or `None` for [`Token::NONE`] or once every
    /// pool id has been issued, in which case no pool is created.
    pub fn create_pool_for(&mut self, token: Token, value: T) -> Option<&mut T> {
        if !token.is_valid() {
            return None;
        }
        let Some(raw) = self.next_pool else {
            tracing::warn!(token = token.id(), "pool ids exhausted");
            return None;
        };
        self.next_pool = raw.checked_add(1);
        let pool = PoolId(raw);
        self.pools.insert(pool, Pool { value, members: 0 });
        self.latest = Some(pool);
        tracing::trace!(pool = pool.0, token = token.id(), "created pool");
        self.assign(token, pool);
        self.pool_value_mut(pool)
    }

    /// Map `token` to the most recently created pool.
    ///
    /// Returns `None` without changes if no pool exists (or the latest one
    /// was reclaimed) or if `token` is [`Token::NONE`].
    pub fn join_latest_pool(&mut self, token: Token) -> Option<&mut T> {
        let pool = self.latest?;
        self.join_pool(token, pool)
    }

    /// Map `token` to an existing pool.
    ///
    /// Returns `None` without changes if `pool` does not exist or if
    /// `token` is [`Token::NONE`].
    pub fn join_pool(&mut self, token: Token, pool: PoolId) -> Option<&mut T> {
        if !token.is_valid() || !self.pools.contains_key(&pool) {
            return None;
        }
        self.assign(token, pool);
        self.pool_value_mut(pool)
    }

    /// The pool `token` is mapped to.
    pub fn pool_of(&self, token: Token) -> Option<PoolId> {
        self.assignments.get(&token).copied()
    }

    /// The most recently created pool, if it still exists.
    pub fn latest_pool(&self) -> Option<PoolId> {
        self.latest
    }

    /// Number of pools currently held.
    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    /// Number of tokens mapped to `pool`.
    pub fn member_count(&self, pool: PoolId) -> usize {
        self.pools.get(&pool).map_or(0, |p| p.members)
    }

    /// Tokens mapped to `pool`, in the order they were mapped.
    pub fn members_of(&self, pool: PoolId) -> impl Iterator<Item = Token> + '_ {
        self.assignments
            .iter()
            .filter(move |(_, &p)| p == pool)
            .map(|(&token, _)| token)
    }

    /// The value of `pool`, irrespective of membership.
    pub fn pool_value(&self, pool: PoolId) -> Option<&T> {
        self.pools.get(&pool).map(|p| &p.value)
    }

    /// Mutable access to the value of `pool`, irrespective of membership.
    pub fn pool_value_mut(&mut self, pool: PoolId) -> Option<&mut T> {
        self.pools.get_mut(&pool).map(|p| &mut p.value)
    }

    /// The value of the pool `token` is mapped to.
    pub fn get(&self, token: Token) -> Option<&T> {
        let pool = self.pool_of(token)?;
        self.pool_value(pool)
    }

    /// Mutable access to the value of the pool `token` is mapped to.
    pub fn get_mut(&mut self, token: Token) -> Option<&mut T> {
        let pool = self.pool_of(token)?;
        self.pool_value_mut(pool)
    }

    /// The value of the pool `token` is mapped to, or the default.
    pub fn read_or_default(&self, token: Token) -> &T {
        self.get(token).unwrap_or(&self.default)
    }

    /// Whether this store drops pools that lose their last member.
    pub fn reclaims_empty_pools(&self) -> bool {
        self.reclaim
    }

    fn assign(&mut self, token: Token, pool: PoolId) {
        if let Some(previous) = self.assignments.insert(token, pool) {
            if previous == pool {
                return;
            }
            self.release_member(previous);
        }
        if let Some(p) = self.pools.get_mut(&pool) {
            p.members += 1;
        }
    }

    /// Drop one member from `pool`. Returns the pool's value if the pool
    /// was reclaimed as a result.
    fn release_member(&mut self, pool: PoolId) -> Option<T> {
        let entry = self.pools.get_mut(&pool)?;
        entry.members = entry.members.saturating_sub(1);
        if !self.reclaim || entry.members > 0 {
            return None;
        }
        let reclaimed = self.pools.shift_remove(&pool)?;
        if self.latest == Some(pool) {
            self.latest = None;
        }
        tracing::trace!(pool = pool.0, "reclaimed empty pool");
        Some(reclaimed.value)
    }
}

impl<T: Clone> SharedDatum<T> {
    /// Unmap `token` from its pool, returning the pool's current value.
    ///
    /// The pool keeps its value for any remaining members. Leaving without
    /// a mapping is a no-op that returns the default.
    pub fn leave(&mut self, token: Token) -> T {
        let Some(pool) = self.assignments.shift_remove(&token) else {
            return self.default.clone();
        };
        if let Some(value) = self.release_member(pool) {
            return value;
        }
        self.pool_value(pool)
            .cloned()
            .unwrap_or_else(|| self.default.clone())
    }
}

impl<T: Default> Default for SharedDatum<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DatumRead for SharedDatum<T> {
    type Value = T;

    fn get(&self, token: Token) -> Option<&T> {
        SharedDatum::get(self, token)
    }

    fn default_value(&self) -> &T {
        &self.default
    }
}

impl<T> DatumWrite for SharedDatum<T> {
    fn get_mut(&mut self, token: Token) -> Option<&mut T> {
        SharedDatum::get_mut(self, token)
    }
}

impl<T: Clone> Associate for SharedDatum<T> {
    fn associate(&mut self, token: Token, value: T) -> Option<&mut T> {
        self.create_pool_for(token, value)
    }

    fn dissociate(&mut self, token: Token) -> T {
        self.leave(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nominal_test_utils::tokens;

    #[test]
    fn joiner_shares_creator_value() {
        let [a, b] = tokens();
        let mut store = SharedDatum::new();
        store.create_pool_for(a, 10);
        store.join_latest_pool(b);
        assert_eq!(*store.read_or_default(a), 10);
        assert_eq!(*store.read_or_default(b), 10);
        *store.get_mut(b).unwrap() = 11;
        assert_eq!(*store.read_or_default(a), 11);
    }

    #[test]
    fn separate_pools_are_independent() {
        let [a, b, c] = tokens();
        let mut store = SharedDatum::new();
        store.create_pool_for(a, 1);
        store.join_latest_pool(b);
        store.create_pool_for(c, 2);
        assert_eq!(*store.read_or_default(c), 2);
        assert_ne!(store.read_or_default(c), store.read_or_default(a));
        assert_eq!(store.pool_count(), 2);
    }

    #[test]
    fn unmapped_token_reads_default() {
        let [a, b] = tokens();
        let mut store = SharedDatum::new();
        store.create_pool_for(a, 5);
        assert_eq!(*store.read_or_default(b), 0);
        assert!(store.get_mut(b).is_none());
    }

    #[test]
    fn join_latest_without_pools_is_noop() {
        let [a] = tokens();
        let mut store: SharedDatum<i32> = SharedDatum::new();
        assert!(store.join_latest_pool(a).is_none());
        assert_eq!(store.pool_of(a), None);
    }

    #[test]
    fn none_token_never_mapped() {
        let mut store = SharedDatum::new();
        assert!(store.create_pool_for(Token::NONE, 1).is_none());
        assert_eq!(store.pool_count(), 0);
        assert_eq!(*store.read_or_default(Token::NONE), 0);
    }

    #[test]
    fn leave_returns_value_and_keeps_pool() {
        let [a, b] = tokens();
        let mut store = SharedDatum::new();
        store.create_pool_for(a, 7);
        store.join_latest_pool(b);
        assert_eq!(store.leave(a), 7);
        assert_eq!(*store.read_or_default(a), 0);
        assert_eq!(*store.read_or_default(b), 7);
        assert_eq!(store.leave(b), 7);
        assert_eq!(store.pool_count(), 1, "pools are kept by default");
    }

    #[test]
    fn leave_unmapped_is_noop() {
        let [a, b] = tokens();
        let mut store = SharedDatum::new();
        store.create_pool_for(a, 7);
        assert_eq!(store.leave(b), 0);
        assert_eq!(store.member_count(store.pool_of(a).unwrap()), 1);
    }

    #[test]
    fn create_moves_token_to_new_pool() {
        let [a, b] = tokens();
        let mut store = SharedDatum::new();
        store.create_pool_for(a, 1);
        let first = store.pool_of(a).unwrap();
        store.join_latest_pool(b);
        store.create_pool_for(a, 2);
        let second = store.pool_of(a).unwrap();
        assert_ne!(first, second);
        assert_eq!(store.member_count(first), 1);
        assert_eq!(store.members_of(first).collect::<Vec<_>>(), vec![b]);
        assert_eq!(*store.read_or_default(b), 1);
    }

    #[test]
    fn join_explicit_pool() {
        let [a, b, c] = tokens();
        let mut store = SharedDatum::new();
        store.create_pool_for(a, 'x');
        let first = store.pool_of(a).unwrap();
        store.create_pool_for(b, 'y');
        store.join_pool(c, first);
        assert_eq!(*store.read_or_default(c), 'x');
        assert!(store.join_pool(c, PoolId(99)).is_none());
        assert_eq!(store.pool_of(c), Some(first));
    }

    #[test]
    fn pool_ids_are_monotonic() {
        let [a, b] = tokens();
        let mut store = SharedDatum::new();
        store.create_pool_for(a, ());
        store.create_pool_for(b, ());
        assert_eq!(store.pool_of(a), Some(PoolId(1)));
        assert_eq!(store.pool_of(b), Some(PoolId(2)));
        assert_eq!(store.latest_pool(), Some(PoolId(2)));
    }

    #[test]
    fn reclamation_drops_empty_pools() {
        let [a, b] = tokens();
        let mut store = SharedDatum::with_reclamation();
        store.create_pool_for(a, String::from("team"));
        store.join_latest_pool(b);
        assert_eq!(store.leave(a), "team");
        assert_eq!(store.pool_count(), 1);
        assert_eq!(store.leave(b), "team");
        assert_eq!(store.pool_count(), 0);
        assert_eq!(store.latest_pool(), None);
        assert!(store.join_latest_pool(a).is_none());
    }

    #[test]
    fn reclamation_on_move_between_pools() {
        let [a] = tokens();
        let mut store = SharedDatum::with_reclamation();
        store.create_pool_for(a, 1);
        store.create_pool_for(a, 2);
        assert_eq!(store.pool_count(), 1);
        assert_eq!(store.pool_of(a), Some(PoolId(2)));
    }

    #[test]
    fn pool_ids_stop_at_counter_end() {
        let [a, b] = tokens();
        let mut store = SharedDatum::new();
        store.next_pool = Some(u64::MAX);
        assert_eq!(store.create_pool_for(a, 1), Some(&mut 1));
        assert_eq!(store.pool_of(a), Some(PoolId(u64::MAX)));

        assert!(store.create_pool_for(b, 2).is_none());
        assert!(store.create_pool_for(a, 3).is_none());
        assert_eq!(store.pool_count(), 1);
        assert_eq!(store.pool_of(a), Some(PoolId(u64::MAX)));
        assert_eq!(store.pool_of(b), None);
        assert!(store.join_latest_pool(b).is_some());
        assert_eq!(*store.read_or_default(b), 1);
    }

    #[test]
    fn explicit_default_for_unmapped_tokens() {
        let [a, b] = tokens();
        let mut store = SharedDatum::with_default(-1);
        assert!(!store.reclaims_empty_pools());
        assert_eq!(*store.read_or_default(a), -1);
        store.create_pool_for(a, 4);
        assert_eq!(*store.read_or_default(b), -1);
        assert_eq!(store.leave(b), -1);
        assert_eq!(*store.read_or_default(a), 4);
    }

    #[test]
    fn reclamation_flag_reflects_constructor() {
        assert!(SharedDatum::<u8>::with_reclamation().reclaims_empty_pools());
        assert!(!SharedDatum::<u8>::new().reclaims_empty_pools());
    }

    #[test]
    fn rejoining_same_pool_keeps_count() {
        let [a] = tokens();
        let mut store = SharedDatum::new();
        store.create_pool_for(a, 1);
        store.join_latest_pool(a);
        assert_eq!(store.member_count(PoolId(1)), 1);
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn member_counts_match_assignments(
                ops in proptest::collection::vec((1u64..8, 0u8..3), 1..60),
            ) {
                let mut store = SharedDatum::new();
                for (raw, op) in ops {
                    let token = Token::from_raw(raw);
                    match op {
                        0 => { store.create_pool_for(token, raw); }
                        1 => { store.join_latest_pool(token); }
                        _ => { store.leave(token); }
                    }
                }
                let pools: Vec<PoolId> = store.pools.keys().copied().collect();
                let total: usize = pools.iter().map(|&p| store.member_count(p)).sum();
                prop_assert_eq!(total, store.assignments.len());
                for p in pools {
                    prop_assert_eq!(store.member_count(p), store.members_of(p).count());
                }
            }

            #[test]
            fn every_pool_member_sees_same_value(
                joiners in 1usize..10,
                value in any::<i32>(),
            ) {
                let mut store = SharedDatum::new();
                let creator = Token::from_raw(1);
                store.create_pool_for(creator, value);
                for raw in 2..(2 + joiners as u64) {
                    store.join_latest_pool(Token::from_raw(raw));
                }
                for raw in 1..(2 + joiners as u64) {
                    prop_assert_eq!(*store.read_or_default(Token::from_raw(raw)), value);
                }
            }
        }
    }
}
