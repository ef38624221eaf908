//! [`Datum`]: one independent value per token.

use indexmap::IndexMap;
use nominal_core::{Associate, DatumRead, DatumWrite, Token};

/// A per-token map of values.
///
/// Entries are created on first [`associate`](Datum::associate) and kept in
/// insertion order. Reading a token with no entry, including
/// [`Token::NONE`], yields the store's default without creating anything.
#[derive(Clone, Debug)]
pub struct Datum<T> {
    entries: IndexMap<Token, T>,
    default: T,
}

impl<T: Default> Datum<T> {
    /// Create an empty store whose default is `T::default()`.
    pub fn new() -> Self {
        Self::with_default(T::default())
    }
}

impl<T> Datum<T> {
    /// Create an empty store with an explicit default value.
    pub fn with_default(default: T) -> Self {
        Self {
            entries: IndexMap::new(),
            default,
        }
    }

    /// Write `value` for `token`, replacing any previous entry.
    ///
    /// A no-op returning `None` for [`Token::NONE`].
    pub fn associate(&mut self, token: Token, value: T) -> Option<&mut T> {
        if !token.is_valid() {
            return None;
        }
        let slot = match self.entries.entry(token) {
            indexmap::map::Entry::Occupied(mut e) => {
                e.insert(value);
                e.into_mut()
            }
            indexmap::map::Entry::Vacant(e) => e.insert(value),
        };
        Some(slot)
    }

    /// The value for `token`, if it has an entry.
    pub fn get(&self, token: Token) -> Option<&T> {
        self.entries.get(&token)
    }

    /// Mutable access to the value for `token`, if it has an entry.
    pub fn get_mut(&mut self, token: Token) -> Option<&mut T> {
        self.entries.get_mut(&token)
    }

    /// The value for `token`, or the default.
    pub fn read_or_default(&self, token: Token) -> &T {
        self.entries.get(&token).unwrap_or(&self.default)
    }

    /// Remove the entry for `token` and return it, if there was one.
    pub fn remove(&mut self, token: Token) -> Option<T> {
        self.entries.shift_remove(&token)
    }

    /// Whether `token` has an entry.
    pub fn contains(&self, token: Token) -> bool {
        self.entries.contains_key(&token)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(token, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (Token, &T)> {
        self.entries.iter().map(|(&token, value)| (token, value))
    }

    /// Drop every entry. The default is kept.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<T: Clone> Datum<T> {
    /// Remove the entry for `token`, returning it or a copy of the default.
    ///
    /// Removing an absent entry is a no-op.
    pub fn dissociate(&mut self, token: Token) -> T {
        self.remove(token).unwrap_or_else(|| self.default.clone())
    }
}

impl<T: Default> Default for Datum<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DatumRead for Datum<T> {
    type Value = T;

    fn get(&self, token: Token) -> Option<&T> {
        Datum::get(self, token)
    }

    fn default_value(&self) -> &T {
        &self.default
    }
}

impl<T> DatumWrite for Datum<T> {
    fn get_mut(&mut self, token: Token) -> Option<&mut T> {
        Datum::get_mut(self, token)
    }
}

impl<T: Clone> Associate for Datum<T> {
    fn associate(&mut self, token: Token, value: T) -> Option<&mut T> {
        Datum::associate(self, token, value)
    }

    fn dissociate(&mut self, token: Token) -> T {
        Datum::dissociate(self, token)
    }
}
