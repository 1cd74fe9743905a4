//! Ordered key→value store underpinning every map-like slot in the tree.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::chainable::{Chainable, OrderHint, Orderable};
use crate::error::{value_kind, ConfigError, Result};
use crate::merge::merge_values;

/// Ordered key→value configuration slot.
///
/// Keys keep their insertion order; values that request a `before`/`after`
/// placement (via [`Orderable`]) are relocated when the map is read through
/// [`entries`](ChainedMap::entries) or [`values`](ChainedMap::values).
/// Mutation never reorders anything — order is resolved fresh on every read.
#[derive(Debug, Clone)]
pub struct ChainedMap<V> {
    store: IndexMap<String, V>,
}

impl<V> Default for ChainedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> ChainedMap<V> {
    pub fn new() -> Self {
        Self {
            store: IndexMap::new(),
        }
    }

    /// Upsert. An existing value under `key` is overwritten silently.
    pub fn set(&mut self, key: impl Into<String>, value: V) -> &mut Self {
        self.store.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.store.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.store.get_mut(key)
    }

    pub fn has(&self, key: &str) -> bool {
        self.store.contains_key(key)
    }

    /// Return the value under `key`, inserting `factory()` first if absent.
    /// The factory runs at most once per key.
    pub fn get_or_compute(
        &mut self,
        key: impl Into<String>,
        factory: impl FnOnce() -> V,
    ) -> &mut V {
        self.store.entry(key.into()).or_insert_with(factory)
    }

    /// Remove `key` if present; absent keys are not an error.
    pub fn delete(&mut self, key: &str) -> &mut Self {
        self.store.shift_remove(key);
        self
    }

    pub fn clear(&mut self) -> &mut Self {
        self.store.clear();
        self
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.store.keys().map(String::as_str)
    }
}

impl<V: Orderable> ChainedMap<V> {
    /// Total key order: natural insertion order adjusted by every resolvable
    /// `before`/`after` hint. Hints whose anchor is not currently present
    /// are ignored.
    fn resolved_order(&self) -> Vec<String> {
        let mut order: Vec<String> = self.store.keys().cloned().collect();

        for name in self.store.keys() {
            match self.store[name].order_hint() {
                OrderHint::Natural => {}
                OrderHint::Before(anchor) => {
                    if order.contains(&anchor) {
                        relocate(&mut order, name, &anchor, 0);
                    } else {
                        tracing::trace!(key = %name, %anchor, "before-anchor absent, keeping natural order");
                    }
                }
                OrderHint::After(anchor) => {
                    if order.contains(&anchor) {
                        relocate(&mut order, name, &anchor, 1);
                    } else {
                        tracing::trace!(key = %name, %anchor, "after-anchor absent, keeping natural order");
                    }
                }
            }
        }

        order
    }

    /// The key→value view in resolved order, or `None` when the map is
    /// empty (so callers can omit the slot entirely).
    pub fn entries(&self) -> Option<IndexMap<&str, &V>> {
        if self.store.is_empty() {
            return None;
        }

        Some(
            self.resolved_order()
                .into_iter()
                .filter_map(|key| {
                    self.store
                        .get_key_value(key.as_str())
                        .map(|(key, value)| (key.as_str(), value))
                })
                .collect(),
        )
    }

    /// Just the values, in resolved order.
    pub fn values(&self) -> Vec<&V> {
        self.resolved_order()
            .into_iter()
            .filter_map(|key| self.store.get(key.as_str()))
            .collect()
    }
}

/// Statically declared shorthand setters: one method per recognized option
/// key, writing through the node's `options` map. This keeps each sub-tree's
/// vocabulary a declarative list while staying fully type-checked.
macro_rules! shorthands {
    ($( $(#[$meta:meta])* $name:ident => $key:literal ),+ $(,)?) => {
        $(
            $(#[$meta])*
            pub fn $name(&mut self, value: impl Into<::serde_json::Value>) -> &mut Self {
                self.options.set($key, value.into());
                self
            }
        )+
    };
}
pub(crate) use shorthands;

fn relocate(order: &mut Vec<String>, name: &str, anchor: &str, offset: usize) {
    if let Some(from) = order.iter().position(|key| key == name) {
        let moved = order.remove(from);
        if let Some(to) = order.iter().position(|key| key == anchor) {
            order.insert(to + offset, moved);
        } else {
            order.insert(from, moved);
        }
    }
}

impl ChainedMap<Value> {
    /// Overlay `source` onto this map.
    ///
    /// Per incoming key (unless listed in `omit`): a scalar incoming value,
    /// or a key this map does not hold yet, is written through [`set`];
    /// otherwise the stored and incoming structures deep-merge (objects
    /// recurse, arrays concatenate). First set wins structurally, later
    /// merges blend.
    pub fn merge(&mut self, source: &Value, omit: &[&str]) -> Result<&mut Self> {
        let Some(incoming) = source.as_object() else {
            return Err(ConfigError::MalformedMerge {
                found: value_kind(source),
            });
        };

        for (key, value) in incoming {
            if omit.contains(&key.as_str()) {
                continue;
            }

            let structural = value.is_object() || value.is_array();
            if !structural || !self.has(key) {
                self.set(key.clone(), value.clone());
            } else if let Some(existing) = self.store.get_mut(key) {
                merge_values(existing, value);
            }
        }

        Ok(self)
    }

    /// Materialize to a plain object in resolved order; `None` when empty.
    pub fn to_config(&self) -> Option<Value> {
        self.entries().map(|entries| {
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key.to_owned(), value.clone()))
                    .collect::<Map<String, Value>>(),
            )
        })
    }
}

impl<V> Chainable for ChainedMap<V> {}
