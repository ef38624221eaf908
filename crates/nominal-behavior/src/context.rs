//! Execution context passed to a behavior's callable.
//!
//! [`Context`] names the token a callable is running for and resolves store
//! access against it.

use nominal_core::{DatumRead, DatumWrite, Token};

/// The token a callable is acting as.
///
/// Built by the dispatcher for each call. Unlike the behavior's recorded
/// current context, a `Context` cannot be overwritten by a later dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Context {
    token: Token,
}

impl Context {
    /// Construct a context for `token`.
    ///
    /// Typically called by the dispatcher, not by callables.
    pub fn new(token: Token) -> Self {
        Self { token }
    }

    /// The token this call runs for.
    pub fn token(&self) -> Token {
        self.token
    }

    /// Read the context token's value from `store`, or the store's default.
    pub fn read<'s, S: DatumRead + ?Sized>(&self, store: &'s S) -> &'s S::Value {
        store.read_or_default(self.token)
    }

    /// The context token's value in `store`, if it has access.
    pub fn get<'s, S: DatumRead + ?Sized>(&self, store: &'s S) -> Option<&'s S::Value> {
        store.get(self.token)
    }

    /// Mutable access to the context token's value in `store`, if it has access.
    pub fn get_mut<'s, S: DatumWrite + ?Sized>(&self, store: &'s mut S) -> Option<&'s mut S::Value> {
        store.get_mut(self.token)
    }
}
