//! Reusable fixtures for behavior tests.

use std::cell::RefCell;
use std::rc::Rc;

use nominal_core::Token;

/// Shared record of `(token, args)` pairs, one per callable invocation.
///
/// Cloning shares the underlying log, so one clone can be moved into a
/// callable while the test keeps another for assertions.
#[derive(Debug)]
pub struct CallLog<A> {
    calls: Rc<RefCell<Vec<(Token, A)>>>,
}

impl<A> CallLog<A> {
    pub fn new() -> Self {
        Self {
            calls: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Append one invocation.
    pub fn record(&self, token: Token, args: A) {
        self.calls.borrow_mut().push((token, args));
    }

    /// Number of invocations recorded.
    pub fn count(&self) -> usize {
        self.calls.borrow().len()
    }

    /// Tokens in invocation order.
    pub fn tokens(&self) -> Vec<Token> {
        self.calls.borrow().iter().map(|(t, _)| *t).collect()
    }

    /// How many times `token` was invoked for.
    pub fn count_for(&self, token: Token) -> usize {
        self.calls.borrow().iter().filter(|(t, _)| *t == token).count()
    }

    /// Forget every recorded invocation.
    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }
}

impl<A: Clone> CallLog<A> {
    /// Snapshot of every invocation in order.
    pub fn calls(&self) -> Vec<(Token, A)> {
        self.calls.borrow().clone()
    }
}

impl<A> Clone for CallLog<A> {
    fn clone(&self) -> Self {
        Self {
            calls: Rc::clone(&self.calls),
        }
    }
}

impl<A> Default for CallLog<A> {
    fn default() -> Self {
        Self::new()
    }
}
