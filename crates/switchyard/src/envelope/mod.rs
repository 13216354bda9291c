//! Request and response envelopes carried through a single dispatch.
//!
//! A [`Request`] pairs the caller's application environment with the input
//! for one use case. Handlers answer it through [`Request::success`] or
//! [`Request::error`], which produce a [`Response`] holding a handle back to
//! the originating request. Both types are immutable once built.

use std::fmt;
use std::sync::Arc;

#[derive(Debug)]
struct Envelope<E, I> {
    env: E,
    input: I,
}

/// Immutable envelope of the application environment and a use-case input.
///
/// Cloning a request clones a handle to the same envelope; the environment
/// and input are never copied. [`Request::ptr_eq`] tells handles to the same
/// envelope apart from equal-but-distinct requests.
///
/// # Example
///
/// ```
/// use switchyard::Request;
///
/// let request = Request::new("production", 42_u32);
/// let response = request.success("done");
///
/// assert!(response.request().ptr_eq(&request));
/// assert_eq!(response.input(), &42);
/// assert_eq!(response.output(), &"done");
/// ```
pub struct Request<E, I> {
    inner: Arc<Envelope<E, I>>,
}

impl<E, I> Request<E, I> {
    /// Creates a request from an environment and an input.
    #[must_use]
    pub fn new(env: E, input: I) -> Self {
        Self {
            inner: Arc::new(Envelope { env, input }),
        }
    }

    /// Returns the application environment.
    #[must_use]
    pub fn env(&self) -> &E {
        &self.inner.env
    }

    /// Returns the use-case input.
    #[must_use]
    pub fn input(&self) -> &I {
        &self.inner.input
    }

    /// Builds a successful response answering this request.
    #[must_use]
    pub fn success<O>(&self, output: O) -> Response<E, I, O> {
        Response::Success {
            request: self.clone(),
            output,
        }
    }

    /// Builds a failed response answering this request.
    #[must_use]
    pub fn error<O>(&self, output: O) -> Response<E, I, O> {
        Response::Failure {
            request: self.clone(),
            output,
        }
    }

    /// Returns `true` when both handles refer to the same envelope.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<E, I> Clone for Request<E, I> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E: fmt::Debug, I: fmt::Debug> fmt::Debug for Request<E, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("env", self.env())
            .field("input", self.input())
            .finish()
    }
}

impl<E: PartialEq, I: PartialEq> PartialEq for Request<E, I> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || (self.env() == other.env() && self.input() == other.input())
    }
}

impl<E: Eq, I: Eq> Eq for Request<E, I> {}

/// Outcome of a handler invocation.
///
/// The variant is fixed when the response is built and is the only thing
/// distinguishing success from failure; both carry the originating request
/// and an output payload.
#[derive(Debug, PartialEq, Eq)]
pub enum Response<E, I, O> {
    /// The use case completed successfully.
    Success {
        /// Request this response answers.
        request: Request<E, I>,
        /// Result produced by the handler.
        output: O,
    },
    /// The use case completed with a domain failure.
    Failure {
        /// Request this response answers.
        request: Request<E, I>,
        /// Error payload produced by the handler.
        output: O,
    },
}

impl<E, I, O> Response<E, I, O> {
    /// Returns `true` for [`Response::Success`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns `true` for [`Response::Failure`].
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        !self.is_success()
    }

    /// Returns the request this response answers.
    #[must_use]
    pub const fn request(&self) -> &Request<E, I> {
        match self {
            Self::Success { request, .. } | Self::Failure { request, .. } => request,
        }
    }

    /// Returns the environment of the originating request.
    #[must_use]
    pub fn env(&self) -> &E {
        self.request().env()
    }

    /// Returns the input of the originating request.
    #[must_use]
    pub fn input(&self) -> &I {
        self.request().input()
    }

    /// Returns the output payload.
    #[must_use]
    pub const fn output(&self) -> &O {
        match self {
            Self::Success { output, .. } | Self::Failure { output, .. } => output,
        }
    }

    /// Consumes the response and returns the output payload.
    #[must_use]
    pub fn into_output(self) -> O {
        match self {
            Self::Success { output, .. } | Self::Failure { output, .. } => output,
        }
    }

    /// Transforms the output while keeping the variant and request.
    ///
    /// Useful for wrapping handler output in a presenter before it reaches
    /// the caller.
    ///
    /// ```
    /// use switchyard::Request;
    ///
    /// let request = Request::new((), ());
    /// let wrapped = request.error(404_u16).map_output(|code| format!("status {code}"));
    ///
    /// assert!(wrapped.is_failure());
    /// assert_eq!(wrapped.output(), "status 404");
    /// ```
    #[must_use]
    pub fn map_output<P>(self, f: impl FnOnce(O) -> P) -> Response<E, I, P> {
        match self {
            Self::Success { request, output } => Response::Success {
                request,
                output: f(output),
            },
            Self::Failure { request, output } => Response::Failure {
                request,
                output: f(output),
            },
        }
    }
}

impl<E, I, O: Clone> Clone for Response<E, I, O> {
    fn clone(&self) -> Self {
        match self {
            Self::Success { request, output } => Self::Success {
                request: request.clone(),
                output: output.clone(),
            },
            Self::Failure { request, output } => Self::Failure {
                request: request.clone(),
                output: output.clone(),
            },
        }
    }
}
