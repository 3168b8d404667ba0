//! The settings store: a flat key/value map that remembers, per key, whether
//! the current value was set explicitly or filled in as a default.
//!
//! This is the contract every layer is written against. Layer authors call
//! [`set`](SettingsStore::set) for the values they actively choose and
//! [`set_default`](SettingsStore::set_default) for fallbacks, and the store
//! guarantees that a default never displaces an explicit choice, no matter
//! how many generic layers run afterward.

use std::collections::{BTreeMap, BTreeSet};

use toml::Value;

use crate::error::LayerfigError;

/// A key/value store over [`toml::Value`] with explicit/default tracking.
///
/// Invariant: the defaulted set is always a subset of the stored keys. A key
/// is defaulted iff no [`set`](Self::set) has occurred since
/// [`set_default`](Self::set_default) last established its value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsStore {
    values: BTreeMap<String, Value>,
    defaulted: BTreeSet<String>,
}

impl SettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a setting. A missing key is a configuration error naming the
    /// key; loading is one-shot and fail-fast, so callers propagate it.
    pub fn get(&self, key: &str) -> Result<&Value, LayerfigError> {
        self.values
            .get(key)
            .ok_or_else(|| LayerfigError::MissingSetting(key.to_string()))
    }

    /// Look up a setting without treating absence as an error.
    pub fn peek(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// String accessor for settings that must be text (paths, names).
    pub fn get_str(&self, key: &str) -> Result<&str, LayerfigError> {
        self.get(key)?
            .as_str()
            .ok_or_else(|| LayerfigError::InvalidValue {
                key: key.to_string(),
                reason: "expected a string".into(),
            })
    }

    /// Boolean accessor for flag settings.
    pub fn get_bool(&self, key: &str) -> Result<bool, LayerfigError> {
        self.get(key)?
            .as_bool()
            .ok_or_else(|| LayerfigError::InvalidValue {
                key: key.to_string(),
                reason: "expected a boolean".into(),
            })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Write a value unconditionally. The key becomes explicit.
    pub fn set<V: Into<Value>>(&mut self, key: &str, value: V) {
        self.defaulted.remove(key);
        self.values.insert(key.to_string(), value.into());
    }

    /// Write a value only if the key is absent, marking it defaulted.
    ///
    /// Returns the value now in the store: the existing one (untouched, status
    /// unchanged) if the key was present, the newly inserted one otherwise.
    pub fn set_default<V: Into<Value>>(&mut self, key: &str, value: V) -> &Value {
        if !self.values.contains_key(key) {
            self.values.insert(key.to_string(), value.into());
            self.defaulted.insert(key.to_string());
        }
        &self.values[key]
    }

    /// True iff the key is present and its value was last written by
    /// [`set`](Self::set) rather than [`set_default`](Self::set_default).
    pub fn explicit(&self, key: &str) -> bool {
        self.values.contains_key(key) && !self.defaulted.contains(key)
    }

    /// True iff the key is present only via [`set_default`](Self::set_default).
    pub fn is_default(&self, key: &str) -> bool {
        self.defaulted.contains(key)
    }

    /// Copy every key absent from `self` out of `other`, carrying its
    /// defaulted status along. Keys already present in `self` are left
    /// untouched regardless of either side's status: a more specific store
    /// resolves first and its choices win over anything merged in later.
    pub fn merge_from(&mut self, other: &SettingsStore) {
        for (key, value) in &other.values {
            if !self.values.contains_key(key) {
                self.values.insert(key.clone(), value.clone());
                if other.defaulted.contains(key) {
                    self.defaulted.insert(key.clone());
                }
            }
        }
    }

    /// Check that every listed key is present, reporting all absentees at once.
    pub fn require<I, S>(&self, keys: I) -> Result<(), LayerfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut missing: Vec<String> = keys
            .into_iter()
            .filter(|k| !self.values.contains_key(k.as_ref()))
            .map(|k| k.as_ref().to_string())
            .collect();
        match missing.len() {
            0 => Ok(()),
            1 => Err(LayerfigError::MissingSetting(missing.remove(0))),
            _ => Err(LayerfigError::MissingSettings(missing)),
        }
    }

    /// Append items to a list-valued setting, keeping it flat and unique.
    ///
    /// The current value seeds the list: absent means empty, a scalar becomes
    /// a single element, an array is taken as-is. Appended items that are
    /// themselves arrays are spliced in (one level); duplicates are dropped,
    /// first occurrence winning. The result is stored as an explicit value.
    pub fn append_unique<I>(&mut self, key: &str, items: I)
    where
        I: IntoIterator<Item = Value>,
    {
        let mut list: Vec<Value> = match self.values.remove(key) {
            None => Vec::new(),
            Some(Value::Array(existing)) => existing,
            Some(scalar) => vec![scalar],
        };
        for item in items {
            match item {
                Value::Array(nested) => {
                    for value in nested {
                        push_unique(&mut list, value);
                    }
                }
                value => push_unique(&mut list, value),
            }
        }
        self.defaulted.remove(key);
        self.values.insert(key.to_string(), Value::Array(list));
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Flatten into a plain table for the host application to consume.
    /// Explicit/default tracking ends here.
    pub fn into_table(self) -> toml::Table {
        self.values.into_iter().collect()
    }
}

fn push_unique(list: &mut Vec<Value>, value: Value) {
    if !list.contains(&value) {
        list.push(value);
    }
}
