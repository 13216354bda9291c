//! Manifest documents and their conversion into dispatcher configuration.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use switchyard::{ActionConfig, Dispatcher, DispatcherConfig, ObserverSpec, Resolver, Target};
use tracing::debug;

use crate::error::ManifestError;

/// Tracing target for manifest operations.
const MANIFEST_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::manifest");

/// Observer references for one action: a single reference or a list.
///
/// A single reference is used directly; a list always becomes an ordered
/// observer chain, even when it holds one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ObserverRefs {
    /// One observer reference.
    One(String),
    /// Observer references notified in this order.
    Many(Vec<String>),
}

impl ObserverRefs {
    /// Returns the references in notification order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        match self {
            Self::One(reference) => std::slice::from_ref(reference),
            Self::Many(references) => references,
        }
    }

    fn append(existing: Option<Self>, reference: String) -> Self {
        let Some(refs) = existing else {
            return Self::One(reference);
        };
        match refs {
            Self::One(first) => Self::Many(vec![first, reference]),
            Self::Many(mut references) => {
                references.push(reference);
                Self::Many(references)
            }
        }
    }

    fn into_spec<E, I, O>(self) -> ObserverSpec<E, I, O> {
        match self {
            Self::One(reference) => ObserverSpec::One(Target::Reference(reference)),
            Self::Many(references) => {
                ObserverSpec::Many(references.into_iter().map(Target::Reference).collect())
            }
        }
    }
}

/// Manifest entry for a single action.
///
/// Both keys are optional when parsing. An entry without `action` is
/// reported as a missing handler when the dispatcher is built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActionEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    observer: Option<ObserverRefs>,
}

impl ActionEntry {
    /// Creates an entry with neither handler nor observers.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            action: None,
            observer: None,
        }
    }

    /// Sets the handler reference.
    #[must_use]
    pub fn with_action(mut self, reference: impl Into<String>) -> Self {
        self.action = Some(reference.into());
        self
    }

    /// Appends an observer reference.
    #[must_use]
    pub fn with_observer(mut self, reference: impl Into<String>) -> Self {
        self.observer = Some(ObserverRefs::append(self.observer.take(), reference.into()));
        self
    }

    /// Returns the handler reference.
    #[must_use]
    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    /// Returns the observer references.
    #[must_use]
    pub const fn observer(&self) -> Option<&ObserverRefs> {
        self.observer.as_ref()
    }

    fn into_config<E, I, O>(self) -> ActionConfig<E, I, O> {
        let mut config = ActionConfig::new();
        if let Some(reference) = self.action {
            config = config.with_handler_ref(reference);
        }
        if let Some(observers) = self.observer {
            config = config.with_observers(observers.into_spec());
        }
        config
    }
}

/// A parsed manifest mapping action names to entries.
///
/// Keys are kept as written. A document repeating a key is rejected while
/// parsing, whatever its format. Normalisation and detection of keys that
/// collide once trimmed happen when the dispatcher is built, exactly as for
/// programmatic configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ActionManifest {
    actions: BTreeMap<String, ActionEntry>,
}

impl ActionManifest {
    /// Creates an empty manifest.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            actions: BTreeMap::new(),
        }
    }

    /// Parses a YAML manifest.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Yaml`] if the document is malformed or does
    /// not have the manifest shape.
    pub fn from_yaml_str(source: &str) -> Result<Self, ManifestError> {
        let manifest: Self = serde_saphyr::from_str(source)?;
        debug!(
            target: MANIFEST_TARGET,
            actions = manifest.len(),
            format = "yaml",
            "parsed manifest"
        );
        Ok(manifest)
    }

    /// Parses a JSON manifest.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Json`] if the document is malformed or does
    /// not have the manifest shape.
    pub fn from_json_str(source: &str) -> Result<Self, ManifestError> {
        let manifest: Self = serde_json::from_str(source)?;
        debug!(
            target: MANIFEST_TARGET,
            actions = manifest.len(),
            format = "json",
            "parsed manifest"
        );
        Ok(manifest)
    }

    /// Adds or replaces an entry and returns the manifest.
    #[must_use]
    pub fn with_action(mut self, name: impl Into<String>, entry: ActionEntry) -> Self {
        self.actions.insert(name.into(), entry);
        self
    }

    /// Returns the entry stored under the raw key `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ActionEntry> {
        self.actions.get(name)
    }

    /// Returns the raw keys in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns `true` when the manifest has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Converts the manifest into dispatcher configuration.
    ///
    /// Every handler and observer becomes a reference target.
    #[must_use]
    pub fn into_config<E, I, O>(self) -> DispatcherConfig<E, I, O> {
        self.actions
            .into_iter()
            .map(|(name, entry)| (name, entry.into_config()))
            .collect()
    }

    /// Builds a dispatcher, resolving references through `resolver`.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Config`] if any entry lacks a handler, uses
    /// an invalid or duplicate name, or holds a reference the resolver
    /// rejects.
    pub fn coerce<E, I, O, R>(self, resolver: &R) -> Result<Dispatcher<E, I, O>, ManifestError>
    where
        E: 'static,
        I: 'static,
        O: 'static,
        R: Resolver<E, I, O> + ?Sized,
    {
        Ok(Dispatcher::coerce(self.into_config(), resolver)?)
    }
}

impl<'de> Deserialize<'de> for ActionManifest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ManifestVisitor)
    }
}

/// Collects manifest entries, refusing repeated keys.
struct ManifestVisitor;

impl<'de> Visitor<'de> for ManifestVisitor {
    type Value = ActionManifest;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a map of action names to action entries")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut actions = BTreeMap::new();
        while let Some((name, entry)) = access.next_entry::<String, ActionEntry>()? {
            match actions.entry(name) {
                Entry::Occupied(slot) => {
                    return Err(de::Error::custom(format_args!(
                        "duplicate action key `{}`",
                        slot.key()
                    )));
                }
                Entry::Vacant(slot) => {
                    slot.insert(entry);
                }
            }
        }
        Ok(ActionManifest { actions })
    }
}

impl FromIterator<(String, ActionEntry)> for ActionManifest {
    fn from_iter<T: IntoIterator<Item = (String, ActionEntry)>>(iter: T) -> Self {
        Self {
            actions: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests;
