//! Behavior dispatch errors.

use thiserror::Error;

/// Errors from running a [`Behavior`](crate::Behavior).
///
/// Dispatching to an unsubscribed token is not an error; it is a no-op.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BehaviorError {
    /// A subscribed token was dispatched to, but the behavior was built
    /// without a callable.
    #[error("behavior '{behavior}' has no callable set")]
    UnsetCallable {
        /// Name of the behavior.
        behavior: String,
    },
}
