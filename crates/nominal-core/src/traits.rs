//! Seam traits between tokens, stores, and behaviors.

use crate::token::Token;

/// Token-keyed read access to a store.
///
/// Reads are total: a token with no access to the store sees a fixed
/// default value rather than an error. Use [`get`](DatumRead::get) when
/// "absent" and "equal to default" must be told apart.
pub trait DatumRead {
    /// The value type held by the store.
    type Value;

    /// The value `token` has access to, if any.
    ///
    /// Always `None` for [`Token::NONE`].
    fn get(&self, token: Token) -> Option<&Self::Value>;

    /// The store's fixed default value.
    fn default_value(&self) -> &Self::Value;

    /// The value `token` has access to, or the store's default.
    fn read_or_default(&self, token: Token) -> &Self::Value {
        self.get(token).unwrap_or_else(|| self.default_value())
    }
}

/// Token-keyed mutable access to a store.
///
/// There is no mutable counterpart to
/// [`read_or_default`](DatumRead::read_or_default); the default is never
/// writable through a token.
pub trait DatumWrite: DatumRead {
    /// Mutable access to the value `token` has access to, if any.
    fn get_mut(&mut self, token: Token) -> Option<&mut Self::Value>;
}

/// Attaching and detaching a value for a token.
pub trait Associate: DatumRead {
    /// Give `token` access to `value`, replacing whatever it had.
    ///
    /// Returns the stored value, or `None` if `token` is [`Token::NONE`],
    /// in which case the store is unchanged.
    fn associate(&mut self, token: Token, value: Self::Value) -> Option<&mut Self::Value>;

    /// Revoke `token`'s access, returning the value it had access to.
    ///
    /// Returns the store's default if `token` had no access. Never fails.
    fn dissociate(&mut self, token: Token) -> Self::Value;
}

/// Membership of tokens in a set.
///
/// Implemented by group-shared stores and by behaviors.
pub trait Membership {
    /// Add `token`. Returns `true` if it was not already a member.
    ///
    /// [`Token::NONE`] is never admitted.
    fn subscribe(&mut self, token: Token) -> bool;

    /// Remove `token`. Returns `true` if it was a member; removing a
    /// non-member is a no-op.
    fn unsubscribe(&mut self, token: Token) -> bool;

    /// Whether `token` is currently a member.
    fn is_subscribed(&self, token: Token) -> bool;

    /// Number of current members.
    fn subscriber_count(&self) -> usize;
}
