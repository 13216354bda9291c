//! Reference resolution for configuration targets.
//!
//! Configuration may name handlers and observers by reference (for example
//! `"billing.charge_card"`). During coercion the dispatcher hands each
//! reference to a [`Resolver`] supplied by the embedding application and
//! never interprets the string itself. [`CallableRegistry`] is a ready-made
//! resolver backed by explicit registrations; [`NoResolver`] rejects every
//! reference for purely programmatic configurations.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::config::TargetRole;
use crate::error::{BoxError, ResolveError};
use crate::handler::Handler;
use crate::observer::Observer;

/// Tracing target for resolver operations.
const RESOLVE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::resolve");

/// Turns configuration references into callables.
pub trait Resolver<E, I, O> {
    /// Resolves a handler reference.
    ///
    /// # Errors
    ///
    /// Returns an error when the reference does not name a handler.
    fn resolve_handler(&self, reference: &str) -> Result<Arc<dyn Handler<E, I, O>>, BoxError>;

    /// Resolves an observer reference.
    ///
    /// # Errors
    ///
    /// Returns an error when the reference does not name an observer.
    fn resolve_observer(&self, reference: &str)
    -> Result<Arc<dyn Observer<E, I, O>>, BoxError>;
}

/// Resolver that rejects every reference.
///
/// Use it when every configuration target is already a callable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoResolver;

impl<E, I, O> Resolver<E, I, O> for NoResolver {
    fn resolve_handler(&self, reference: &str) -> Result<Arc<dyn Handler<E, I, O>>, BoxError> {
        Err(Box::new(ResolveError::NoResolver {
            role: TargetRole::Handler,
            reference: reference.to_owned(),
        }))
    }

    fn resolve_observer(
        &self,
        reference: &str,
    ) -> Result<Arc<dyn Observer<E, I, O>>, BoxError> {
        Err(Box::new(ResolveError::NoResolver {
            role: TargetRole::Observer,
            reference: reference.to_owned(),
        }))
    }
}

/// Resolver backed by explicitly registered callables.
///
/// Handlers and observers live in separate namespaces, so the same reference
/// may name one of each. Registering a reference twice within a namespace is
/// rejected.
///
/// # Example
///
/// ```
/// use switchyard::{CallableRegistry, Request, Resolver, TracingObserver, handler_fn};
///
/// let mut registry = CallableRegistry::<(), u32, u32>::new();
/// registry
///     .register_handler("math.double", handler_fn(|request: &Request<(), u32>| {
///         Ok(request.success(request.input() * 2))
///     }))
///     .expect("first registration");
/// registry
///     .register_observer("audit.trace", TracingObserver)
///     .expect("first registration");
///
/// assert!(registry.resolve_handler("math.double").is_ok());
/// assert!(registry.resolve_observer("math.double").is_err());
/// ```
pub struct CallableRegistry<E, I, O> {
    handlers: HashMap<String, Arc<dyn Handler<E, I, O>>>,
    observers: HashMap<String, Arc<dyn Observer<E, I, O>>>,
}

impl<E, I, O> CallableRegistry<E, I, O> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            observers: HashMap::new(),
        }
    }

    /// Registers a handler under `reference`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::AlreadyRegistered`] if a handler is already
    /// registered under the same reference.
    pub fn register_handler(
        &mut self,
        reference: impl Into<String>,
        handler: impl Handler<E, I, O> + 'static,
    ) -> Result<(), ResolveError> {
        let callable: Arc<dyn Handler<E, I, O>> = Arc::new(handler);
        register(
            &mut self.handlers,
            TargetRole::Handler,
            reference.into(),
            callable,
        )
    }

    /// Registers an observer under `reference`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::AlreadyRegistered`] if an observer is already
    /// registered under the same reference.
    pub fn register_observer(
        &mut self,
        reference: impl Into<String>,
        observer: impl Observer<E, I, O> + 'static,
    ) -> Result<(), ResolveError> {
        let callable: Arc<dyn Observer<E, I, O>> = Arc::new(observer);
        register(
            &mut self.observers,
            TargetRole::Observer,
            reference.into(),
            callable,
        )
    }

    /// Returns `true` when a handler is registered under `reference`.
    #[must_use]
    pub fn contains_handler(&self, reference: &str) -> bool {
        self.handlers.contains_key(reference)
    }

    /// Returns `true` when an observer is registered under `reference`.
    #[must_use]
    pub fn contains_observer(&self, reference: &str) -> bool {
        self.observers.contains_key(reference)
    }
}

fn register<T: ?Sized>(
    callables: &mut HashMap<String, Arc<T>>,
    role: TargetRole,
    reference: String,
    callable: Arc<T>,
) -> Result<(), ResolveError> {
    if callables.contains_key(&reference) {
        return Err(ResolveError::AlreadyRegistered { role, reference });
    }
    debug!(target: RESOLVE_TARGET, %role, reference = reference.as_str(), "registered callable");
    callables.insert(reference, callable);
    Ok(())
}

fn lookup<T: ?Sized>(
    callables: &HashMap<String, Arc<T>>,
    role: TargetRole,
    reference: &str,
) -> Result<Arc<T>, BoxError> {
    callables.get(reference).cloned().ok_or_else(|| {
        Box::new(ResolveError::NotRegistered {
            role,
            reference: reference.to_owned(),
        }) as BoxError
    })
}

impl<E, I, O> Resolver<E, I, O> for CallableRegistry<E, I, O> {
    fn resolve_handler(&self, reference: &str) -> Result<Arc<dyn Handler<E, I, O>>, BoxError> {
        lookup(&self.handlers, TargetRole::Handler, reference)
    }

    fn resolve_observer(
        &self,
        reference: &str,
    ) -> Result<Arc<dyn Observer<E, I, O>>, BoxError> {
        lookup(&self.observers, TargetRole::Observer, reference)
    }
}

impl<E, I, O> Default for CallableRegistry<E, I, O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, I, O> fmt::Debug for CallableRegistry<E, I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut handlers: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        let mut observers: Vec<&str> = self.observers.keys().map(String::as_str).collect();
        handlers.sort_unstable();
        observers.sort_unstable();
        f.debug_struct("CallableRegistry")
            .field("handlers", &handlers)
            .field("observers", &observers)
            .finish()
    }
}
