//! Name-keyed routing of calls to registered actions.
//!
//! The [`Dispatcher`] is built once from a [`DispatcherConfig`] and never
//! changes afterwards. Each [`Dispatcher::call`] builds a fresh [`Request`],
//! runs the named [`Action`], and returns the handler's response without
//! judging it.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use once_cell::sync::OnceCell;
use tracing::debug;

use crate::action::Action;
use crate::config::DispatcherConfig;
use crate::envelope::{Request, Response};
use crate::error::{ConfigError, DispatchError};
use crate::name::{ActionName, normalise};
use crate::resolve::Resolver;

/// Tracing target for dispatch operations.
pub(crate) const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");

/// Immutable registry of actions and the router over it.
///
/// A dispatcher holds no mutable state besides the lazily computed name set,
/// so it can be shared across threads and called concurrently.
///
/// # Example
///
/// ```
/// use std::sync::{Arc, Mutex};
///
/// use switchyard::{
///     ActionConfig, DispatchError, Dispatcher, DispatcherConfig, NoResolver, Request, Response,
///     handler_fn, observer_fn,
/// };
///
/// let notified = Arc::new(Mutex::new(0));
/// let counter = Arc::clone(&notified);
///
/// let config = DispatcherConfig::new().with_action(
///     "greet",
///     ActionConfig::new()
///         .with_handler(handler_fn(|request: &Request<String, ()>| {
///             Ok(request.success(format!("hi from {}", request.env())))
///         }))
///         .with_observer(observer_fn(move |_: &Response<String, (), String>| {
///             *counter.lock().expect("lock") += 1;
///             Ok(())
///         })),
/// );
///
/// let dispatcher = Dispatcher::coerce(config, &NoResolver).expect("valid configuration");
/// let response = dispatcher
///     .call("greet", (), "eu-west".to_owned())
///     .expect("greet is registered");
/// assert_eq!(response.output(), "hi from eu-west");
/// assert_eq!(*notified.lock().expect("lock"), 1);
///
/// let unknown = dispatcher.call("farewell", (), "eu-west".to_owned());
/// assert!(matches!(unknown, Err(DispatchError::UnknownAction { .. })));
/// ```
pub struct Dispatcher<E, I, O> {
    actions: HashMap<ActionName, Action<E, I, O>>,
    names: OnceCell<BTreeSet<ActionName>>,
}

impl<E, I, O> Dispatcher<E, I, O> {
    /// Creates a dispatcher over already coerced actions.
    #[must_use]
    pub const fn new(actions: HashMap<ActionName, Action<E, I, O>>) -> Self {
        Self {
            actions,
            names: OnceCell::new(),
        }
    }

    /// Invokes the action registered under `name`.
    ///
    /// The name is normalised the same way configuration keys are, a new
    /// [`Request`] is built from `env` and `input`, and the action's response
    /// is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::UnknownAction`] if no action is registered
    /// under `name`; no handler or observer runs in that case. Handler and
    /// observer failures are returned as [`DispatchError::Handler`] and
    /// [`DispatchError::Observer`].
    pub fn call(&self, name: &str, input: I, env: E) -> Result<Response<E, I, O>, DispatchError> {
        let action = self.fetch(name)?;
        debug!(target: DISPATCH_TARGET, action = normalise(name), "dispatching action");
        let response = action.call(&Request::new(env, input))?;
        debug!(
            target: DISPATCH_TARGET,
            action = normalise(name),
            success = response.is_success(),
            "action completed"
        );
        Ok(response)
    }

    /// Returns the names of all registered actions.
    ///
    /// The set is computed on first use and reused afterwards.
    #[must_use]
    pub fn action_names(&self) -> &BTreeSet<ActionName> {
        self.names
            .get_or_init(|| self.actions.keys().cloned().collect())
    }

    /// Returns the action registered under `name`.
    #[must_use]
    pub fn action(&self, name: &str) -> Option<&Action<E, I, O>> {
        self.actions.get(normalise(name))
    }

    /// Returns `true` when an action is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.action(name).is_some()
    }

    /// Returns the number of registered actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns `true` when no actions are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    fn fetch(&self, name: &str) -> Result<&Action<E, I, O>, DispatchError> {
        self.action(name)
            .ok_or_else(|| DispatchError::unknown_action(normalise(name)))
    }
}

impl<E: 'static, I: 'static, O: 'static> Dispatcher<E, I, O> {
    /// Builds a dispatcher from configuration.
    ///
    /// Every key is normalised into an [`ActionName`] and every entry is
    /// coerced into an [`Action`], resolving references through `resolver`.
    /// The first invalid entry aborts construction.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidName`] or
    /// [`ConfigError::DuplicateAction`] for unusable keys,
    /// [`ConfigError::MissingHandler`] for entries without a handler, and
    /// [`ConfigError::Unresolvable`] for references the resolver rejects.
    pub fn coerce<R>(config: DispatcherConfig<E, I, O>, resolver: &R) -> Result<Self, ConfigError>
    where
        R: Resolver<E, I, O> + ?Sized,
    {
        let mut actions = HashMap::with_capacity(config.len());
        for (raw, entry) in config {
            let name = ActionName::parse(&raw)?;
            if actions.contains_key(&name) {
                return Err(ConfigError::duplicate_action(name));
            }
            let action = Action::coerce(&name, entry, resolver)?;
            actions.insert(name, action);
        }
        debug!(target: DISPATCH_TARGET, actions = actions.len(), "dispatcher configured");
        Ok(Self::new(actions))
    }
}

impl<E, I, O> Clone for Dispatcher<E, I, O> {
    fn clone(&self) -> Self {
        Self {
            actions: self.actions.clone(),
            names: self.names.clone(),
        }
    }
}

impl<E, I, O> fmt::Debug for Dispatcher<E, I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("actions", self.action_names())
            .finish()
    }
}
