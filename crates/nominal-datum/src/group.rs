//! [`StaticDatum`]: one value shared by an explicit group of tokens.

use indexmap::IndexSet;
use nominal_core::{DatumRead, DatumWrite, Membership, Token};

/// A single value plus the set of tokens allowed to reach it.
///
/// There is no per-token copy: a write through any member is seen by every
/// other member. Non-members read the store's default. The owning code path
/// can reach the shared value directly with [`shared`](StaticDatum::shared)
/// and [`shared_mut`](StaticDatum::shared_mut) regardless of membership.
#[derive(Clone, Debug)]
pub struct StaticDatum<T> {
    value: T,
    members: IndexSet<Token>,
    default: T,
}

impl<T: Default> StaticDatum<T> {
    /// Create a group with no members holding `value`.
    pub fn new(value: T) -> Self {
        Self::with_default(value, T::default())
    }
}

impl<T> StaticDatum<T> {
    /// Create a group with an explicit default for non-members.
    pub fn with_default(value: T, default: T) -> Self {
        Self {
            value,
            members: IndexSet::new(),
            default,
        }
    }

    /// Add `token` to the group. Returns `true` if newly added.
    pub fn subscribe(&mut self, token: Token) -> bool {
        token.is_valid() && self.members.insert(token)
    }

    /// Remove `token` from the group. Removing a non-member is a no-op.
    pub fn unsubscribe(&mut self, token: Token) -> bool {
        self.members.shift_remove(&token)
    }

    /// Whether `token` is a member.
    pub fn contains(&self, token: Token) -> bool {
        self.members.contains(&token)
    }

    /// The shared value if `token` is a member.
    pub fn get(&self, token: Token) -> Option<&T> {
        self.contains(token).then_some(&self.value)
    }

    /// Mutable access to the shared value if `token` is a member.
    pub fn get_mut(&mut self, token: Token) -> Option<&mut T> {
        if self.contains(token) {
            Some(&mut self.value)
        } else {
            None
        }
    }

    /// The shared value if `token` is a member, else the default.
    pub fn read_or_default(&self, token: Token) -> &T {
        self.get(token).unwrap_or(&self.default)
    }

    /// The shared value, irrespective of membership.
    pub fn shared(&self) -> &T {
        &self.value
    }

    /// Mutable access to the shared value, irrespective of membership.
    pub fn shared_mut(&mut self) -> &mut T {
        &mut self.value
    }

    /// Replace the shared value, returning the previous one.
    pub fn set(&mut self, value: T) -> T {
        std::mem::replace(&mut self.value, value)
    }

    /// Iterate over members in subscription order.
    pub fn members(&self) -> impl Iterator<Item = Token> + '_ {
        self.members.iter().copied()
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the group has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Consume the group, returning the shared value.
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T: Default> Default for StaticDatum<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> DatumRead for StaticDatum<T> {
    type Value = T;

    fn get(&self, token: Token) -> Option<&T> {
        StaticDatum::get(self, token)
    }

    fn default_value(&self) -> &T {
        &self.default
    }
}

impl<T> DatumWrite for StaticDatum<T> {
    fn get_mut(&mut self, token: Token) -> Option<&mut T> {
        StaticDatum::get_mut(self, token)
    }
}

impl<T> Membership for StaticDatum<T> {
    fn subscribe(&mut self, token: Token) -> bool {
        StaticDatum::subscribe(self, token)
    }

    fn unsubscribe(&mut self, token: Token) -> bool {
        StaticDatum::unsubscribe(self, token)
    }

    fn is_subscribed(&self, token: Token) -> bool {
        self.contains(token)
    }

    fn subscriber_count(&self) -> usize {
        self.len()
    }
}
