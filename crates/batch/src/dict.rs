//! Named-tensor dictionary.

use std::collections::BTreeMap;

use crate::{BatchError, Tensor};

/// An ordered dictionary of tensors keyed by dotted paths, e.g.
/// `agents.observation.obs_self`. Dotted keys flatten the nested grouping the
/// exchange protocol uses, while keeping iteration order deterministic.
#[derive(Clone, Debug, Default)]
pub struct Batch {
    entries: BTreeMap<String, Tensor>,
}

impl Batch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a tensor, replacing any previous entry under the same key.
    pub fn insert(&mut self, key: impl Into<String>, tensor: Tensor) {
        self.entries.insert(key.into(), tensor);
    }

    /// Looks up a tensor by key.
    ///
    /// # Errors
    /// Returns [`BatchError::MissingKey`] if no entry exists.
    pub fn get(&self, key: &str) -> Result<&Tensor, BatchError> {
        self.entries
            .get(key)
            .ok_or_else(|| BatchError::MissingKey(key.to_owned()))
    }

    /// Mutable lookup by key.
    ///
    /// # Errors
    /// Returns [`BatchError::MissingKey`] if no entry exists.
    pub fn get_mut(&mut self, key: &str) -> Result<&mut Tensor, BatchError> {
        self.entries
            .get_mut(key)
            .ok_or_else(|| BatchError::MissingKey(key.to_owned()))
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Tensor)> {
        self.entries.iter().map(|(k, t)| (k.as_str(), t))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Moves every entry of `other` into `self`, replacing duplicates.
    pub fn merge(&mut self, other: Batch) {
        self.entries.extend(other.entries);
    }
}
