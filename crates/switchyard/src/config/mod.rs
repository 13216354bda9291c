//! Declarative dispatcher configuration and its coercion.
//!
//! A [`DispatcherConfig`] maps raw action names to [`ActionConfig`] entries.
//! Each entry names a handler and zero or more observers, either directly as
//! callables or as string references that a [`Resolver`] turns into
//! callables. Nothing is validated until
//! [`Dispatcher::coerce`](crate::Dispatcher::coerce) runs, so configuration
//! can be assembled from any source (code, a manifest file, a test fixture)
//! and checked in one place.

use std::fmt;
use std::sync::Arc;

use strum::Display;

use crate::error::{BoxError, ConfigError};
use crate::handler::Handler;
use crate::name::ActionName;
use crate::observer::{NoopObserver, Observer, ObserverChain};
use crate::resolve::Resolver;

/// Which side of an action a target fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum TargetRole {
    /// The use-case handler.
    Handler,
    /// An observer notified with the handler's response.
    Observer,
}

/// A callable supplied directly or by reference.
pub enum Target<T: ?Sized> {
    /// A ready-to-use callable.
    Callable(Arc<T>),
    /// A name resolved into a callable during coercion.
    Reference(String),
}

impl<E, I, O> Target<dyn Handler<E, I, O>> {
    /// Wraps a handler as a callable target.
    #[must_use]
    pub fn handler(handler: impl Handler<E, I, O> + 'static) -> Self {
        Self::Callable(Arc::new(handler))
    }
}

impl<E, I, O> Target<dyn Observer<E, I, O>> {
    /// Wraps an observer as a callable target.
    #[must_use]
    pub fn observer(observer: impl Observer<E, I, O> + 'static) -> Self {
        Self::Callable(Arc::new(observer))
    }
}

impl<T: ?Sized> Target<T> {
    /// Creates a reference target.
    #[must_use]
    pub fn reference(reference: impl Into<String>) -> Self {
        Self::Reference(reference.into())
    }

    /// Returns the reference when this target is not yet a callable.
    #[must_use]
    pub fn as_reference(&self) -> Option<&str> {
        match self {
            Self::Callable(_) => None,
            Self::Reference(reference) => Some(reference),
        }
    }

    /// Turns the target into a callable, resolving references with
    /// `resolve`.
    fn coerce(
        self,
        action: &ActionName,
        role: TargetRole,
        resolve: impl FnOnce(&str) -> Result<Arc<T>, BoxError>,
    ) -> Result<Arc<T>, ConfigError> {
        match self {
            Self::Callable(callable) => Ok(callable),
            Self::Reference(reference) => resolve(&reference).map_err(|source| {
                ConfigError::unresolvable(action.clone(), role, reference, source)
            }),
        }
    }
}

impl<T: ?Sized> From<Arc<T>> for Target<T> {
    fn from(callable: Arc<T>) -> Self {
        Self::Callable(callable)
    }
}

impl<T: ?Sized> From<&str> for Target<T> {
    fn from(reference: &str) -> Self {
        Self::reference(reference)
    }
}

impl<T: ?Sized> From<String> for Target<T> {
    fn from(reference: String) -> Self {
        Self::Reference(reference)
    }
}

impl<T: ?Sized> fmt::Debug for Target<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Callable(_) => f.write_str("Callable(..)"),
            Self::Reference(reference) => f.debug_tuple("Reference").field(reference).finish(),
        }
    }
}

/// Observer targets for one action.
pub enum ObserverSpec<E, I, O> {
    /// No observers; coerced to [`NoopObserver`].
    None,
    /// A single observer, used directly.
    One(Target<dyn Observer<E, I, O>>),
    /// Several observers, coerced to an [`ObserverChain`] in this order.
    Many(Vec<Target<dyn Observer<E, I, O>>>),
}

impl<E, I, O> ObserverSpec<E, I, O> {
    /// Returns the number of configured observer targets.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::None => 0,
            Self::One(_) => 1,
            Self::Many(targets) => targets.len(),
        }
    }

    /// Returns `true` when no observer targets are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends a target, promoting `None` to `One` and `One` to `Many`.
    fn push(self, target: Target<dyn Observer<E, I, O>>) -> Self {
        match self {
            Self::None => Self::One(target),
            Self::One(existing) => Self::Many(vec![existing, target]),
            Self::Many(mut targets) => {
                targets.push(target);
                Self::Many(targets)
            }
        }
    }

    /// Coerces the targets into a single notification target.
    pub(crate) fn coerce<R>(
        self,
        action: &ActionName,
        resolver: &R,
    ) -> Result<Arc<dyn Observer<E, I, O>>, ConfigError>
    where
        R: Resolver<E, I, O> + ?Sized,
        E: 'static,
        I: 'static,
        O: 'static,
    {
        let coerce_one = |target: Target<dyn Observer<E, I, O>>| {
            target.coerce(action, TargetRole::Observer, |reference| {
                resolver.resolve_observer(reference)
            })
        };
        match self {
            Self::None => Ok(Arc::new(NoopObserver)),
            Self::One(target) => coerce_one(target),
            Self::Many(targets) => {
                let chain = targets
                    .into_iter()
                    .map(coerce_one)
                    .collect::<Result<ObserverChain<E, I, O>, _>>()?;
                Ok(Arc::new(chain))
            }
        }
    }
}

impl<E, I, O> Default for ObserverSpec<E, I, O> {
    fn default() -> Self {
        Self::None
    }
}

impl<E, I, O> fmt::Debug for ObserverSpec<E, I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::One(target) => f.debug_tuple("One").field(target).finish(),
            Self::Many(targets) => f.debug_tuple("Many").field(targets).finish(),
        }
    }
}

/// Configuration for a single action.
///
/// # Example
///
/// ```
/// use switchyard::{ActionConfig, Request, TracingObserver, handler_fn};
///
/// let config = ActionConfig::new()
///     .with_handler(handler_fn(|request: &Request<(), u32>| Ok(request.success(*request.input()))))
///     .with_observer(TracingObserver)
///     .with_observer_ref("audit.log");
///
/// assert!(config.has_handler());
/// assert_eq!(config.observers().len(), 2);
/// ```
pub struct ActionConfig<E, I, O> {
    action: Option<Target<dyn Handler<E, I, O>>>,
    observer: ObserverSpec<E, I, O>,
}

impl<E, I, O> ActionConfig<E, I, O> {
    /// Creates an entry with neither handler nor observers.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            action: None,
            observer: ObserverSpec::None,
        }
    }

    /// Sets the handler target, replacing any previous one.
    #[must_use]
    pub fn with_action(mut self, target: impl Into<Target<dyn Handler<E, I, O>>>) -> Self {
        self.action = Some(target.into());
        self
    }

    /// Sets a callable handler.
    #[must_use]
    pub fn with_handler(self, handler: impl Handler<E, I, O> + 'static) -> Self {
        self.with_action(Target::handler(handler))
    }

    /// Sets a handler reference for the resolver.
    #[must_use]
    pub fn with_handler_ref(self, reference: impl Into<String>) -> Self {
        self.with_action(Target::reference(reference))
    }

    /// Appends an observer target.
    #[must_use]
    pub fn with_observer_target(mut self, target: impl Into<Target<dyn Observer<E, I, O>>>) -> Self {
        self.observer = self.observer.push(target.into());
        self
    }

    /// Appends a callable observer.
    #[must_use]
    pub fn with_observer(self, observer: impl Observer<E, I, O> + 'static) -> Self {
        self.with_observer_target(Target::observer(observer))
    }

    /// Appends an observer reference for the resolver.
    #[must_use]
    pub fn with_observer_ref(self, reference: impl Into<String>) -> Self {
        self.with_observer_target(Target::reference(reference))
    }

    /// Replaces the observer targets.
    #[must_use]
    pub fn with_observers(mut self, observers: ObserverSpec<E, I, O>) -> Self {
        self.observer = observers;
        self
    }

    /// Returns `true` when a handler target is configured.
    #[must_use]
    pub const fn has_handler(&self) -> bool {
        self.action.is_some()
    }

    /// Returns the configured observer targets.
    #[must_use]
    pub const fn observers(&self) -> &ObserverSpec<E, I, O> {
        &self.observer
    }

    /// Splits the entry into its handler and observer targets.
    pub(crate) fn into_parts(
        self,
    ) -> (Option<Target<dyn Handler<E, I, O>>>, ObserverSpec<E, I, O>) {
        (self.action, self.observer)
    }
}

impl<E, I, O> Default for ActionConfig<E, I, O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, I, O> fmt::Debug for ActionConfig<E, I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionConfig")
            .field("action", &self.action)
            .field("observer", &self.observer)
            .finish()
    }
}

/// Coerces a handler target into a callable.
pub(crate) fn coerce_handler<E, I, O, R>(
    handler: Option<Target<dyn Handler<E, I, O>>>,
    action: &ActionName,
    resolver: &R,
) -> Result<Arc<dyn Handler<E, I, O>>, ConfigError>
where
    R: Resolver<E, I, O> + ?Sized,
{
    let target = handler.ok_or_else(|| ConfigError::missing_handler(action.clone()))?;
    target.coerce(action, TargetRole::Handler, |reference| {
        resolver.resolve_handler(reference)
    })
}

/// Raw mapping from action names to their configuration.
///
/// Keys are kept as written; normalisation and duplicate detection happen
/// during [`Dispatcher::coerce`](crate::Dispatcher::coerce).
pub struct DispatcherConfig<E, I, O> {
    entries: Vec<(String, ActionConfig<E, I, O>)>,
}

impl<E, I, O> DispatcherConfig<E, I, O> {
    /// Creates an empty configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Adds an entry and returns the configuration.
    #[must_use]
    pub fn with_action(mut self, name: impl Into<String>, config: ActionConfig<E, I, O>) -> Self {
        self.insert(name, config);
        self
    }

    /// Adds an entry.
    pub fn insert(&mut self, name: impl Into<String>, config: ActionConfig<E, I, O>) {
        self.entries.push((name.into(), config));
    }

    /// Returns the number of entries, before normalisation.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no entries are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the raw keys in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}

impl<E, I, O> Default for DispatcherConfig<E, I, O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, I, O> fmt::Debug for DispatcherConfig<E, I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(name, config)| (name, config)))
            .finish()
    }
}

impl<E, I, O, K: Into<String>> FromIterator<(K, ActionConfig<E, I, O>)>
    for DispatcherConfig<E, I, O>
{
    fn from_iter<T: IntoIterator<Item = (K, ActionConfig<E, I, O>)>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(name, config)| (name.into(), config))
                .collect(),
        }
    }
}

impl<E, I, O> IntoIterator for DispatcherConfig<E, I, O> {
    type Item = (String, ActionConfig<E, I, O>);
    type IntoIter = std::vec::IntoIter<(String, ActionConfig<E, I, O>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
