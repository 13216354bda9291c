//! Observers notified after a handler produces a response.
//!
//! An [`Observer`] receives a shared reference to the response, so it can
//! record, audit, or emit events but never alter what the caller sees. An
//! [`ObserverChain`] fans one response out to several observers in order and
//! stops at the first failure.

use std::fmt;
use std::sync::Arc;

use tracing::info;

use crate::envelope::Response;
use crate::error::BoxError;

/// Tracing target for observer events.
pub(crate) const OBSERVER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::observer");

/// A side-effecting sink notified with every response of an action.
pub trait Observer<E, I, O>: Send + Sync {
    /// Handles a response produced by the action's handler.
    ///
    /// # Errors
    ///
    /// Returns an error when the observer's side effect fails. The error
    /// reaches the dispatcher's caller and the response is discarded.
    fn call(&self, response: &Response<E, I, O>) -> Result<(), BoxError>;
}

/// Observer backed by a closure. Built with [`observer_fn`].
#[derive(Clone, Copy)]
pub struct ObserverFn<F> {
    f: F,
}

/// Adapts a closure into an [`Observer`].
///
/// ```
/// use switchyard::{Observer, Request, Response, observer_fn};
///
/// let audit = observer_fn(|response: &Response<(), (), u8>| {
///     assert!(response.is_success());
///     Ok(())
/// });
/// audit.call(&Request::new((), ()).success(1)).expect("observer succeeds");
/// ```
pub fn observer_fn<E, I, O, F>(f: F) -> ObserverFn<F>
where
    F: Fn(&Response<E, I, O>) -> Result<(), BoxError> + Send + Sync,
{
    ObserverFn { f }
}

impl<E, I, O, F> Observer<E, I, O> for ObserverFn<F>
where
    F: Fn(&Response<E, I, O>) -> Result<(), BoxError> + Send + Sync,
{
    fn call(&self, response: &Response<E, I, O>) -> Result<(), BoxError> {
        (self.f)(response)
    }
}

impl<F> fmt::Debug for ObserverFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverFn").finish_non_exhaustive()
    }
}

/// Observer that accepts every response and does nothing.
///
/// Actions configured without observers use this.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoopObserver;

impl<E, I, O> Observer<E, I, O> for NoopObserver {
    fn call(&self, _response: &Response<E, I, O>) -> Result<(), BoxError> {
        Ok(())
    }
}

/// Ordered fan-out to several observers.
///
/// Members are notified in insertion order with the same response. The first
/// member to fail stops the chain; later members are not notified. An empty
/// chain is a valid no-op.
///
/// # Example
///
/// ```
/// use std::sync::{Arc, Mutex};
///
/// use switchyard::{Observer, ObserverChain, Request, Response, observer_fn};
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let (first, second) = (Arc::clone(&seen), Arc::clone(&seen));
///
/// let chain: ObserverChain<(), (), u8> = ObserverChain::new()
///     .with(observer_fn(move |_: &Response<(), (), u8>| {
///         first.lock().expect("lock").push("first");
///         Ok(())
///     }))
///     .with(observer_fn(move |_: &Response<(), (), u8>| {
///         second.lock().expect("lock").push("second");
///         Ok(())
///     }));
///
/// chain.call(&Request::new((), ()).success(1)).expect("chain succeeds");
/// assert_eq!(*seen.lock().expect("lock"), ["first", "second"]);
/// ```
pub struct ObserverChain<E, I, O> {
    observers: Vec<Arc<dyn Observer<E, I, O>>>,
}

impl<E, I, O> ObserverChain<E, I, O> {
    /// Creates an empty chain.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    /// Appends an observer to the end of the chain.
    #[must_use]
    pub fn with(mut self, observer: impl Observer<E, I, O> + 'static) -> Self {
        self.push(Arc::new(observer));
        self
    }

    /// Appends a shared observer to the end of the chain.
    pub fn push(&mut self, observer: Arc<dyn Observer<E, I, O>>) {
        self.observers.push(observer);
    }

    /// Returns the number of observers in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Returns `true` when the chain has no observers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl<E, I, O> Default for ObserverChain<E, I, O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, I, O> Clone for ObserverChain<E, I, O> {
    fn clone(&self) -> Self {
        Self {
            observers: self.observers.clone(),
        }
    }
}

impl<E, I, O> fmt::Debug for ObserverChain<E, I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverChain")
            .field("len", &self.observers.len())
            .finish()
    }
}

impl<E, I, O> FromIterator<Arc<dyn Observer<E, I, O>>> for ObserverChain<E, I, O> {
    fn from_iter<T: IntoIterator<Item = Arc<dyn Observer<E, I, O>>>>(iter: T) -> Self {
        Self {
            observers: iter.into_iter().collect(),
        }
    }
}

impl<E, I, O> Observer<E, I, O> for ObserverChain<E, I, O> {
    fn call(&self, response: &Response<E, I, O>) -> Result<(), BoxError> {
        self.observers
            .iter()
            .try_for_each(|observer| observer.call(response))
    }
}

/// Observer that records every response as a structured `tracing` event.
///
/// Events are emitted at `INFO` under the `switchyard::observer` target with
/// the response variant and the `Debug` form of its output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TracingObserver;

impl<E, I, O: fmt::Debug> Observer<E, I, O> for TracingObserver {
    fn call(&self, response: &Response<E, I, O>) -> Result<(), BoxError> {
        info!(
            target: OBSERVER_TARGET,
            success = response.is_success(),
            output = ?response.output(),
            "action completed"
        );
        Ok(())
    }
}
