//! The [`Behavior`] dispatcher and the [`Dispatch`] handle returned by lookup.
//!
//! # Dispatch states
//!
//! A behavior starts with no current context. A lookup of a subscribed
//! token binds the context to that token and yields a callable handle; a
//! lookup of anything else leaves the context untouched and yields an inert
//! handle whose call does nothing.
//!
//! ```text
//! unbound ──lookup(subscribed t)──► bound(t) ──lookup(subscribed u)──► bound(u)
//!    │                                 │
//!    └──lookup(other)──► unbound       └──lookup(other)──► bound(t)
//! ```

use std::fmt;

use indexmap::IndexSet;
use nominal_core::{DatumRead, DatumWrite, Membership, Token};

use crate::context::Context;
use crate::error::BehaviorError;

/// A boxed callable run by a [`Behavior`].
///
/// `A` is the argument type (use a tuple for several arguments, `()` for
/// none) and `R` the return type.
pub type Callable<A, R> = Box<dyn FnMut(&Context, A) -> R>;

const DEFAULT_NAME: &str = "behavior";

/// A callable plus the set of tokens it runs for.
///
/// Subscribers are kept in subscription order and
/// [`broadcast`](Behavior::broadcast) visits them in that order. Callers
/// should not rely on it: the contract is one call per subscriber.
///
/// # Examples
///
/// ```
/// use nominal_behavior::Behavior;
/// use nominal_core::TokenGenerator;
///
/// let mut tokens = TokenGenerator::new();
/// let t = tokens.create().unwrap();
///
/// let mut double = Behavior::new(|_ctx, x: i32| x * 2).with_name("double");
/// double.subscribe(t);
///
/// assert_eq!(double.invoke_for(t, 21).unwrap(), Some(42));
/// assert_eq!(double.current_context(), Some(t));
/// ```
pub struct Behavior<A = (), R = ()> {
    name: String,
    callable: Option<Callable<A, R>>,
    subscribers: IndexSet<Token>,
    /// Token of the most recent successful lookup; `Token::NONE` until then.
    current: Token,
}

impl<A, R> Behavior<A, R> {
    /// Wrap `callable` with no subscribers.
    pub fn new<F>(callable: F) -> Self
    where
        F: FnMut(&Context, A) -> R + 'static,
    {
        Self {
            name: DEFAULT_NAME.to_string(),
            callable: Some(Box::new(callable)),
            subscribers: IndexSet::new(),
            current: Token::NONE,
        }
    }

    /// A behavior with no callable.
    ///
    /// Subscription works as usual, but any dispatch to a subscribed token
    /// fails with [`BehaviorError::UnsetCallable`] until
    /// [`set_callable`](Behavior::set_callable) is called.
    pub fn unset() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            callable: None,
            subscribers: IndexSet::new(),
            current: Token::NONE,
        }
    }

    /// Set the name used in log events and errors.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// The behavior's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Install or replace the callable.
    pub fn set_callable<F>(&mut self, callable: F)
    where
        F: FnMut(&Context, A) -> R + 'static,
    {
        self.callable = Some(Box::new(callable));
    }

    /// Whether a callable is installed.
    pub fn is_set(&self) -> bool {
        self.callable.is_some()
    }

    /// Subscribe `token`. Returns `true` if newly subscribed.
    pub fn subscribe(&mut self, token: Token) -> bool {
        token.is_valid() && self.subscribers.insert(token)
    }

    /// Unsubscribe `token`. Unsubscribing a non-member is a no-op.
    ///
    /// The current context is left as it was, even if it names `token`.
    pub fn unsubscribe(&mut self, token: Token) -> bool {
        self.subscribers.shift_remove(&token)
    }

    /// Whether `token` is subscribed.
    pub fn is_subscribed(&self, token: Token) -> bool {
        self.subscribers.contains(&token)
    }

    /// Iterate over subscribers in subscription order.
    pub fn subscribers(&self) -> impl Iterator<Item = Token> + '_ {
        self.subscribers.iter().copied()
    }

    /// Number of subscribers.
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// Whether there are no subscribers.
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// The token of the most recent successful lookup.
    ///
    /// Overwritten by every successful lookup and every step of a
    /// broadcast, so it is only meaningful right after one of those.
    pub fn current_context(&self) -> Option<Token> {
        self.current.is_valid().then_some(self.current)
    }

    /// Look up `token`.
    ///
    /// If `token` is subscribed, the current context becomes `token` and the
    /// returned handle calls the stored callable. Otherwise the context is
    /// unchanged and the handle is inert.
    pub fn lookup(&mut self, token: Token) -> Dispatch<'_, A, R> {
        if !self.subscribers.contains(&token) {
            tracing::trace!(behavior = %self.name, token = token.id(), "inert lookup");
            return Dispatch { bound: None };
        }
        self.current = token;
        Dispatch {
            bound: Some(Bound {
                context: Context::new(token),
                behavior: &self.name,
                callable: self.callable.as_mut(),
            }),
        }
    }

    /// Look up `token` and call the result with `args`.
    ///
    /// Returns `Ok(None)` with no side effect if `token` is not subscribed.
    /// The current context stays at `token` after the call.
    pub fn invoke_for(&mut self, token: Token, args: A) -> Result<Option<R>, BehaviorError> {
        self.lookup(token).call(args)
    }

    /// Read the current context's value from `store`, or the default.
    pub fn read<'s, S: DatumRead + ?Sized>(&self, store: &'s S) -> &'s S::Value {
        store.read_or_default(self.current)
    }

    /// Mutable access to the current context's value in `store`.
    pub fn get_mut<'s, S: DatumWrite + ?Sized>(
        &self,
        store: &'s mut S,
    ) -> Option<&'s mut S::Value> {
        store.get_mut(self.current)
    }
}

impl<A: Clone, R> Behavior<A, R> {
    /// Call the callable once for every subscriber.
    ///
    /// The current context is set to each subscriber before its call and
    /// is left at the last one visited. Returns each subscriber's result.
    /// With no subscribers nothing is called, even if the callable is unset.
    pub fn broadcast(&mut self, args: A) -> Result<Vec<(Token, R)>, BehaviorError> {
        if self.subscribers.is_empty() {
            return Ok(Vec::new());
        }
        let Some(callable) = self.callable.as_mut() else {
            tracing::warn!(behavior = %self.name, "broadcast on unset behavior");
            return Err(BehaviorError::UnsetCallable {
                behavior: self.name.clone(),
            });
        };
        tracing::debug!(
            behavior = %self.name,
            subscribers = self.subscribers.len(),
            "broadcast"
        );
        let mut results = Vec::with_capacity(self.subscribers.len());
        for &token in &self.subscribers {
            self.current = token;
            let ctx = Context::new(token);
            results.push((token, callable(&ctx, args.clone())));
        }
        Ok(results)
    }
}

impl<A, R> Membership for Behavior<A, R> {
    fn subscribe(&mut self, token: Token) -> bool {
        Behavior::subscribe(self, token)
    }

    fn unsubscribe(&mut self, token: Token) -> bool {
        Behavior::unsubscribe(self, token)
    }

    fn is_subscribed(&self, token: Token) -> bool {
        Behavior::is_subscribed(self, token)
    }

    fn subscriber_count(&self) -> usize {
        self.len()
    }
}

impl<A, R> fmt::Debug for Behavior<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Behavior")
            .field("name", &self.name)
            .field("set", &self.is_set())
            .field("subscribers", &self.subscribers)
            .field("current", &self.current)
            .finish()
    }
}

struct Bound<'a, A, R> {
    context: Context,
    behavior: &'a str,
    callable: Option<&'a mut Callable<A, R>>,
}

/// The result of [`Behavior::lookup`]: either bound to a subscribed token
/// or inert.
#[must_use]
pub struct Dispatch<'a, A, R> {
    bound: Option<Bound<'a, A, R>>,
}

impl<A, R> Dispatch<'_, A, R> {
    /// Whether this handle will run the callable.
    pub fn is_bound(&self) -> bool {
        self.bound.is_some()
    }

    /// The context the call will run in, if bound.
    pub fn context(&self) -> Option<Context> {
        self.bound.as_ref().map(|b| b.context)
    }

    /// Run the call.
    ///
    /// An inert handle returns `Ok(None)` and does nothing. A bound handle
    /// on a behavior with no callable fails with
    /// [`BehaviorError::UnsetCallable`].
    pub fn call(self, args: A) -> Result<Option<R>, BehaviorError> {
        let Some(bound) = self.bound else {
            return Ok(None);
        };
        let Some(callable) = bound.callable else {
            tracing::warn!(behavior = bound.behavior, "dispatch on unset behavior");
            return Err(BehaviorError::UnsetCallable {
                behavior: bound.behavior.to_string(),
            });
        };
        Ok(Some(callable(&bound.context, args)))
    }
}
