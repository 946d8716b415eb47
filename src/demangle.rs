//! Marker parsing
//!
//! Rewrites a raw document into the [`ParamNode`] template and measures how
//! deeply varying markers are nested in it.
//!
//! A key starting with the marker is a varying site:
//!
//! - a mapping value holds one candidate per sub-key, the sub-key naming the
//!   context label(s) of that candidate (`a|b` for several labels);
//! - a sequence value holds unconditional candidates, one per element.
//!
//! Candidate values are kept raw. Markers inside them, and any marker left
//! on a key after the first one is stripped, are resolved by a later pass.

use crate::error::ConfigError;
use crate::node::{Aggregate, Alternatives, Candidate, ParamNode};
use crate::value::Value;
use std::collections::BTreeMap;
use tracing::warn;

/// Separator between alternative labels in a sub-key
pub const LABEL_SEPARATOR: char = '|';

/// Rewrites `document` into a template, using `marker` to find varying keys
pub fn demangle(document: &Value, marker: &str) -> Result<ParamNode, ConfigError> {
    Demangler::new(marker)?.demangle(document)
}

/// Number of consecutive leading occurrences of `marker` in `key`
pub fn marker_depth(key: &str, marker: &str) -> usize {
    if marker.is_empty() {
        return 0;
    }
    let mut depth = 0;
    let mut rest = key;
    while let Some(stripped) = rest.strip_prefix(marker) {
        depth += 1;
        rest = stripped;
    }
    depth
}

/// Number of expansion passes `document` needs.
///
/// For every key this is its own marker depth plus the degree of its value;
/// the document's degree is the maximum over all keys. Zero means the
/// document has exactly one expansion, itself.
pub fn degree(document: &Value, marker: &str) -> usize {
    match document {
        Value::Object(map) => map
            .iter()
            .map(|(key, value)| marker_depth(key, marker) + degree(value, marker))
            .max()
            .unwrap_or(0),
        Value::Array(items) => items
            .iter()
            .map(|value| degree(value, marker))
            .max()
            .unwrap_or(0),
        _ => 0,
    }
}

/// Marker parser for one marker string
#[derive(Debug, Clone, Copy)]
pub struct Demangler<'m> {
    marker: &'m str,
}

impl<'m> Demangler<'m> {
    pub fn new(marker: &'m str) -> Result<Self, ConfigError> {
        if marker.is_empty() {
            return Err(ConfigError::EmptyMarker);
        }
        Ok(Self { marker })
    }

    pub fn marker(&self) -> &'m str {
        self.marker
    }

    /// Walks the document structurally, turning marked keys into sites
    pub fn demangle(&self, value: &Value) -> Result<ParamNode, ConfigError> {
        match value {
            Value::Object(map) => {
                let mut keys: Vec<&String> = map.keys().collect();
                keys.sort();

                let mut children = BTreeMap::new();
                for key in keys {
                    let value = &map[key.as_str()];
                    let (name, node) = match key.strip_prefix(self.marker) {
                        Some(name) => (
                            name,
                            ParamNode::Alternatives(self.alternatives(key, name, value)?),
                        ),
                        None => (key.as_str(), self.demangle(value)?),
                    };
                    if children.insert(name.to_string(), node).is_some() {
                        warn!(key = %key, name, "keys collide after demangling; later key wins");
                    }
                }
                Ok(ParamNode::Aggregate(Aggregate::mapping(children)))
            }
            Value::Array(items) => {
                let children = items
                    .iter()
                    .map(|item| self.demangle(item))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(ParamNode::Aggregate(Aggregate::sequence(children)))
            }
            other => Ok(ParamNode::Fixed(other.clone())),
        }
    }

    /// Builds the site for marked `key`, whose name without one marker is `name`
    fn alternatives(
        &self,
        key: &str,
        name: &str,
        value: &Value,
    ) -> Result<Alternatives, ConfigError> {
        // Only the last remaining marker makes a site visible in the summary
        let visible = !name.starts_with(self.marker);

        let candidates = match value {
            Value::Object(map) => {
                let mut entries: Vec<(&String, &Value)> = map.iter().collect();
                entries.sort_by(|a, b| a.0.cmp(b.0));
                entries
                    .into_iter()
                    .map(|(labels, value)| {
                        Candidate::labelled(labels.split(LABEL_SEPARATOR), value.clone())
                    })
                    .collect()
            }
            Value::Array(items) => vec![Candidate::unconditional(items.to_vec())],
            other => return Err(ConfigError::invalid_marked_value(key, other)),
        };

        Ok(Alternatives::new(name, visible, candidates))
    }
}
