//! Name-keyed action dispatch for application use cases.
//!
//! The `switchyard` crate decouples callers (a web controller, a CLI command,
//! a job runner) from the handlers that implement individual use cases. A
//! [`Dispatcher`] is built once from a declarative [`DispatcherConfig`] and
//! routes each call by name to the registered [`Action`], which runs the
//! handler and then notifies its observers.
//!
//! # Architecture
//!
//! ```text
//! caller ─► Dispatcher::call(name, input, env)
//!               │
//!               ▼ Request::new(env, input)
//!           Action::call(&request)
//!               │
//!               ├─► Handler::call(&request) ─► Response (Success | Failure)
//!               │
//!               └─► Observer::call(&response)   (chain fans out in order)
//!               │
//!               ▼
//!           Response returned unchanged
//! ```
//!
//! Handlers build their [`Response`] through [`Request::success`] or
//! [`Request::error`], so every response carries the request it answers.
//! Configuration may name handlers and observers directly or by reference; a
//! caller-supplied [`Resolver`] turns references into callables during
//! [`Dispatcher::coerce`]. Coercion is atomic: any invalid entry aborts
//! construction.
//!
//! # Example
//!
//! ```
//! use switchyard::{ActionConfig, Dispatcher, DispatcherConfig, NoResolver, Request, handler_fn};
//!
//! let config = DispatcherConfig::new().with_action(
//!     "greet",
//!     ActionConfig::new().with_handler(handler_fn(|request: &Request<(), String>| {
//!         Ok(request.success(format!("hello, {}", request.input())))
//!     })),
//! );
//!
//! let dispatcher = Dispatcher::coerce(config, &NoResolver).expect("valid configuration");
//! let response = dispatcher
//!     .call("greet", "ada".to_owned(), ())
//!     .expect("greet is registered");
//!
//! assert!(response.is_success());
//! assert_eq!(response.output(), "hello, ada");
//! ```

pub mod action;
pub mod config;
pub mod dispatcher;
pub mod envelope;
pub mod error;
pub mod handler;
pub mod name;
pub mod observer;
pub mod resolve;

#[cfg(test)]
mod tests;

pub use self::action::Action;
pub use self::config::{ActionConfig, DispatcherConfig, ObserverSpec, Target, TargetRole};
pub use self::dispatcher::Dispatcher;
pub use self::envelope::{Request, Response};
pub use self::error::{BoxError, ConfigError, DispatchError, ResolveError};
pub use self::handler::{Handler, HandlerFn, handler_fn};
pub use self::name::ActionName;
pub use self::observer::{
    NoopObserver, Observer, ObserverChain, ObserverFn, TracingObserver, observer_fn,
};
pub use self::resolve::{CallableRegistry, NoResolver, Resolver};
