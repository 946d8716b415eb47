//! Flat record of the choices made for one produced configuration
//!
//! Every summary-visible site contributes one entry keyed by its name. When
//! a name is already taken the entry is stored as `name$N`, where `N` counts
//! the entries already recorded under `name` or `name$...`.

use crate::value::{Value, ValueMap};
use serde::Serialize;

/// Separator between a repeated key and its disambiguating counter
pub const DUPLICATE_SEPARATOR: char = '$';

/// Chosen value per summary-visible site, in traversal order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Decisions {
    entries: ValueMap,
}

impl Decisions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `value` under `key` or its first free disambiguated form.
    /// Returns the key actually used.
    pub fn record(&mut self, key: &str, value: Value) -> String {
        let key = self.free_key(key);
        self.entries.insert(key.clone(), value);
        key
    }

    fn free_key(&self, key: &str) -> String {
        if !self.entries.contains_key(key) {
            return key.to_string();
        }
        let prefix = format!("{}{}", key, DUPLICATE_SEPARATOR);
        let taken = self
            .entries
            .keys()
            .filter(|existing| existing.as_str() == key || existing.starts_with(&prefix))
            .count();
        format!("{}{}", prefix, taken)
    }

    /// Records every entry of `inner`, in key order
    pub fn merge(&mut self, inner: Decisions) {
        let mut entries: Vec<(String, Value)> = inner.entries.into_iter().collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        for (key, value) in entries {
            self.record(&key, value);
        }
    }

    /// Returns a copy of `self` with `inner` merged in
    pub fn merged(&self, inner: Decisions) -> Decisions {
        let mut decisions = self.clone();
        decisions.merge(inner);
        decisions
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.entries.iter()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Value> {
        self.entries.keys()
    }

    pub fn as_map(&self) -> &ValueMap {
        &self.entries
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.entries)
    }
}

/// Merges the decisions of a nested pass into those of its enclosing pass
pub fn merge_decisions(outer: &Decisions, inner: Decisions) -> Decisions {
    outer.merged(inner)
}

impl<'a> IntoIterator for &'a Decisions {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl From<Decisions> for Value {
    fn from(decisions: Decisions) -> Self {
        decisions.into_value()
    }
}
