//! [`SolitaryDatum`]: one value owned by at most one token at a time.

use nominal_core::{Associate, DatumRead, DatumWrite, Token};

/// A single value bound to at most one owner.
///
/// Only the current owner reads the value; everyone else, and everyone
/// while the store is unbound, reads the default. Rebinding replaces the
/// owner in one step.
#[derive(Clone, Debug)]
pub struct SolitaryDatum<T> {
    value: T,
    owner: Token,
    default: T,
}

impl<T: Default> SolitaryDatum<T> {
    /// Create an unbound store holding `value`.
    pub fn new(value: T) -> Self {
        Self::with_default(value, T::default())
    }
}

impl<T> SolitaryDatum<T> {
    /// Create an unbound store with an explicit default for non-owners.
    pub fn with_default(value: T, default: T) -> Self {
        Self {
            value,
            owner: Token::NONE,
            default,
        }
    }

    /// Make `token` the owner, replacing any previous owner.
    ///
    /// Returns the value, now owned by `token`. Binding
    /// [`Token::NONE`] unbinds the store and returns `None`.
    pub fn bind(&mut self, token: Token) -> Option<&mut T> {
        let previous = std::mem::replace(&mut self.owner, token);
        if previous != token {
            tracing::trace!(from = previous.id(), to = token.id(), "rebound solitary datum");
        }
        if token.is_valid() {
            Some(&mut self.value)
        } else {
            None
        }
    }

    /// Clear the owner, returning the previous one.
    pub fn unbind(&mut self) -> Option<Token> {
        let previous = std::mem::replace(&mut self.owner, Token::NONE);
        previous.is_valid().then_some(previous)
    }

    /// The current owner, if bound.
    pub fn owner(&self) -> Option<Token> {
        self.owner.is_valid().then_some(self.owner)
    }

    /// Whether `token` is the current owner.
    pub fn is_owned_by(&self, token: Token) -> bool {
        token.is_valid() && self.owner == token
    }

    /// The value if `token` owns it.
    pub fn get(&self, token: Token) -> Option<&T> {
        self.is_owned_by(token).then_some(&self.value)
    }

    /// Mutable access to the value if `token` owns it.
    pub fn get_mut(&mut self, token: Token) -> Option<&mut T> {
        if self.is_owned_by(token) {
            Some(&mut self.value)
        } else {
            None
        }
    }

    /// The value if `token` owns it, else the default.
    pub fn read_or_default(&self, token: Token) -> &T {
        self.get(token).unwrap_or(&self.default)
    }

    /// Overwrite the value regardless of the owner, returning the old one.
    pub fn set(&mut self, value: T) -> T {
        std::mem::replace(&mut self.value, value)
    }

    /// Consume the store, returning the value.
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T: Default> Default for SolitaryDatum<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> DatumRead for SolitaryDatum<T> {
    type Value = T;

    fn get(&self, token: Token) -> Option<&T> {
        SolitaryDatum::get(self, token)
    }

    fn default_value(&self) -> &T {
        &self.default
    }
}

impl<T> DatumWrite for SolitaryDatum<T> {
    fn get_mut(&mut self, token: Token) -> Option<&mut T> {
        SolitaryDatum::get_mut(self, token)
    }
}

impl<T: Clone> Associate for SolitaryDatum<T> {
    /// Bind `token` and store `value` in one step.
    fn associate(&mut self, token: Token, value: T) -> Option<&mut T> {
        if !token.is_valid() {
            return None;
        }
        self.value = value;
        self.bind(token)
    }

    /// Unbind if `token` is the owner, returning a copy of the value.
    ///
    /// The value itself stays in the store for the next owner.
    fn dissociate(&mut self, token: Token) -> T {
        if self.is_owned_by(token) {
            self.owner = Token::NONE;
            self.value.clone()
        } else {
            self.default.clone()
        }
    }
}
