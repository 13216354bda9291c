//! Errors raised while building a dispatcher or dispatching a call.
//!
//! Construction failures ([`ConfigError`]) surface from
//! [`Dispatcher::coerce`](crate::Dispatcher::coerce) and abort the whole
//! build. Dispatch failures ([`DispatchError`]) surface from
//! [`Dispatcher::call`](crate::Dispatcher::call) and only affect that call.
//! Handler and observer errors pass through transparently so callers see the
//! original message and can downcast the boxed value.

use thiserror::Error;

use crate::config::TargetRole;
use crate::name::ActionName;

/// Error type returned by handlers, observers, and resolvers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while coercing configuration into a dispatcher.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration entry does not name a handler.
    #[error("action '{action}' has no handler configured")]
    MissingHandler {
        /// Action whose entry is incomplete.
        action: ActionName,
    },

    /// A handler or observer reference could not be resolved.
    #[error("cannot resolve {role} reference '{reference}' for action '{action}': {source}")]
    Unresolvable {
        /// Action whose entry holds the reference.
        action: ActionName,
        /// Whether the reference names a handler or an observer.
        role: TargetRole,
        /// Reference as written in the configuration.
        reference: String,
        /// Failure reported by the resolver.
        #[source]
        source: BoxError,
    },

    /// A configuration key does not form a valid action name.
    #[error("invalid action name '{name}': {message}")]
    InvalidName {
        /// Key as written in the configuration.
        name: String,
        /// Description of the problem.
        message: String,
    },

    /// Two configuration keys normalise to the same action name.
    #[error("action '{action}' is configured more than once")]
    DuplicateAction {
        /// Name shared by the conflicting keys.
        action: ActionName,
    },
}

impl ConfigError {
    /// Creates a missing handler error.
    #[must_use]
    pub const fn missing_handler(action: ActionName) -> Self {
        Self::MissingHandler { action }
    }

    /// Creates an unresolvable reference error.
    #[must_use]
    pub fn unresolvable(
        action: ActionName,
        role: TargetRole,
        reference: impl Into<String>,
        source: BoxError,
    ) -> Self {
        Self::Unresolvable {
            action,
            role,
            reference: reference.into(),
            source,
        }
    }

    /// Creates an invalid name error.
    #[must_use]
    pub fn invalid_name(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidName {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates a duplicate action error.
    #[must_use]
    pub const fn duplicate_action(action: ActionName) -> Self {
        Self::DuplicateAction { action }
    }
}

/// Errors raised while dispatching a single call.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No action is registered under the requested name.
    #[error("no action registered under '{name}'")]
    UnknownAction {
        /// Name that was looked up.
        name: String,
    },

    /// The handler failed before producing a response.
    #[error(transparent)]
    Handler(BoxError),

    /// An observer failed after the handler produced a response.
    #[error(transparent)]
    Observer(BoxError),
}

impl DispatchError {
    /// Creates an unknown action error.
    #[must_use]
    pub fn unknown_action(name: impl Into<String>) -> Self {
        Self::UnknownAction { name: name.into() }
    }

    /// Returns the callback error carried by [`DispatchError::Handler`] or
    /// [`DispatchError::Observer`].
    #[must_use]
    pub fn callback_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Self::Handler(source) | Self::Observer(source) => Some(source.as_ref()),
            Self::UnknownAction { .. } => None,
        }
    }
}

/// Errors raised by the bundled resolvers.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// No callable is registered under the reference.
    #[error("no {role} registered as '{reference}'")]
    NotRegistered {
        /// Kind of callable that was requested.
        role: TargetRole,
        /// Reference that was looked up.
        reference: String,
    },

    /// A callable is already registered under the reference.
    #[error("{role} '{reference}' is already registered")]
    AlreadyRegistered {
        /// Kind of callable being registered.
        role: TargetRole,
        /// Reference that collided.
        reference: String,
    },

    /// References were used but no resolver was supplied.
    #[error("cannot resolve {role} reference '{reference}' without a resolver")]
    NoResolver {
        /// Kind of callable that was requested.
        role: TargetRole,
        /// Reference that could not be resolved.
        reference: String,
    },
}
