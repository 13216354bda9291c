//! Registry entries binding one handler to its observers.
//!
//! An [`Action`] is what a dispatcher stores under each name. Calling it runs
//! the handler to completion, notifies the observer with the resulting
//! response, and hands that same response back to the caller.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::config::{ActionConfig, coerce_handler};
use crate::dispatcher::DISPATCH_TARGET;
use crate::envelope::{Request, Response};
use crate::error::{ConfigError, DispatchError};
use crate::handler::Handler;
use crate::name::ActionName;
use crate::observer::Observer;
use crate::resolve::Resolver;

/// A handler paired with the observer notified after it runs.
///
/// Actions are immutable and cheap to clone; clones share the same handler
/// and observer.
pub struct Action<E, I, O> {
    handler: Arc<dyn Handler<E, I, O>>,
    observer: Arc<dyn Observer<E, I, O>>,
}

impl<E, I, O> Action<E, I, O> {
    /// Creates an action from a resolved handler and observer.
    #[must_use]
    pub const fn new(
        handler: Arc<dyn Handler<E, I, O>>,
        observer: Arc<dyn Observer<E, I, O>>,
    ) -> Self {
        Self { handler, observer }
    }

    /// Runs the handler, then notifies the observer with its response.
    ///
    /// The response is returned exactly as the handler produced it.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Handler`] if the handler fails, in which case
    /// the observer is not notified, or [`DispatchError::Observer`] if the
    /// observer fails.
    pub fn call(&self, request: &Request<E, I>) -> Result<Response<E, I, O>, DispatchError> {
        let response = self
            .handler
            .call(request)
            .map_err(DispatchError::Handler)?;
        self.observer
            .call(&response)
            .map_err(DispatchError::Observer)?;
        Ok(response)
    }
}

impl<E: 'static, I: 'static, O: 'static> Action<E, I, O> {
    /// Coerces one configuration entry into an action.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingHandler`] if the entry has no handler
    /// and [`ConfigError::Unresolvable`] if a reference cannot be resolved.
    /// Observer references are resolved before the handler reference.
    pub fn coerce<R>(
        name: &ActionName,
        config: ActionConfig<E, I, O>,
        resolver: &R,
    ) -> Result<Self, ConfigError>
    where
        R: Resolver<E, I, O> + ?Sized,
    {
        let (handler_target, observer_targets) = config.into_parts();
        let observer_count = observer_targets.len();
        if handler_target.is_none() {
            return Err(ConfigError::missing_handler(name.clone()));
        }
        let observer = observer_targets.coerce(name, resolver)?;
        let handler = coerce_handler(handler_target, name, resolver)?;
        debug!(
            target: DISPATCH_TARGET,
            action = name.as_str(),
            observers = observer_count,
            "coerced action"
        );
        Ok(Self::new(handler, observer))
    }
}

impl<E, I, O> Clone for Action<E, I, O> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            observer: Arc::clone(&self.observer),
        }
    }
}

impl<E, I, O> fmt::Debug for Action<E, I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action").finish_non_exhaustive()
    }
}
