//! Handler contract for use-case implementations.

use std::fmt;

use crate::envelope::{Request, Response};
use crate::error::BoxError;

/// A use-case implementation invoked with a [`Request`].
///
/// Handlers answer through [`Request::success`] or [`Request::error`]. An
/// `Err` means the handler could not produce any response; it reaches the
/// dispatcher's caller unchanged and no observer is notified.
///
/// # Example
///
/// ```
/// use switchyard::{BoxError, Handler, Request, Response};
///
/// struct Greet;
///
/// impl Handler<(), String, String> for Greet {
///     fn call(&self, request: &Request<(), String>) -> Result<Response<(), String, String>, BoxError> {
///         Ok(request.success(format!("hello, {}", request.input())))
///     }
/// }
/// ```
pub trait Handler<E, I, O>: Send + Sync {
    /// Runs the use case for `request`.
    ///
    /// # Errors
    ///
    /// Returns an error when the handler cannot produce a response.
    fn call(&self, request: &Request<E, I>) -> Result<Response<E, I, O>, BoxError>;
}

/// Handler backed by a closure. Built with [`handler_fn`].
#[derive(Clone, Copy)]
pub struct HandlerFn<F> {
    f: F,
}

/// Adapts a closure into a [`Handler`].
///
/// ```
/// use switchyard::{Handler, Request, handler_fn};
///
/// let double = handler_fn(|request: &Request<(), u32>| Ok(request.success(request.input() * 2)));
/// let response = double.call(&Request::new((), 21)).expect("handler succeeds");
/// assert_eq!(response.output(), &42);
/// ```
pub fn handler_fn<E, I, O, F>(f: F) -> HandlerFn<F>
where
    F: Fn(&Request<E, I>) -> Result<Response<E, I, O>, BoxError> + Send + Sync,
{
    HandlerFn { f }
}

impl<E, I, O, F> Handler<E, I, O> for HandlerFn<F>
where
    F: Fn(&Request<E, I>) -> Result<Response<E, I, O>, BoxError> + Send + Sync,
{
    fn call(&self, request: &Request<E, I>) -> Result<Response<E, I, O>, BoxError> {
        (self.f)(request)
    }
}

impl<F> fmt::Debug for HandlerFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerFn").finish_non_exhaustive()
    }
}
