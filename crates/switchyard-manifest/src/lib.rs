//! Declarative action manifests for `switchyard` dispatchers.
//!
//! An [`ActionManifest`] is a YAML or JSON document mapping action names to
//! handler and observer references:
//!
//! ```yaml
//! greet:
//!   action: app.greet
//!   observer: [audit.log, metrics.count]
//! farewell:
//!   action: app.farewell
//!   observer: audit.log
//! ```
//!
//! The manifest never interprets references. It converts into a
//! [`switchyard::DispatcherConfig`] whose targets are all references, and a
//! caller-supplied [`switchyard::Resolver`] turns them into callables when
//! the dispatcher is built. Validation therefore happens in one place,
//! [`switchyard::Dispatcher::coerce`], whichever way configuration arrives.
//!
//! # Example
//!
//! ```
//! use switchyard::{CallableRegistry, Request, handler_fn};
//! use switchyard_manifest::ActionManifest;
//!
//! let manifest = ActionManifest::from_yaml_str("greet:\n  action: app.greet\n")
//!     .expect("valid manifest");
//!
//! let mut registry = CallableRegistry::<(), String, String>::new();
//! registry
//!     .register_handler("app.greet", handler_fn(|request: &Request<(), String>| {
//!         Ok(request.success(format!("hello, {}", request.input())))
//!     }))
//!     .expect("first registration");
//!
//! let dispatcher = manifest.coerce(&registry).expect("references resolve");
//! let response = dispatcher
//!     .call("greet", "ada".to_owned(), ())
//!     .expect("greet is registered");
//! assert_eq!(response.output(), "hello, ada");
//! ```

pub mod error;
pub mod manifest;

#[cfg(test)]
mod tests;

pub use self::error::ManifestError;
pub use self::manifest::{ActionEntry, ActionManifest, ObserverRefs};
