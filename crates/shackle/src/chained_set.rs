//! Ordered, duplicate-preserving sequence for list-like configuration slots.

use serde_json::Value;

use crate::chainable::{Chainable, Orderable};

/// Ordered sequence node for list-like slots (entry files, resolve
/// extensions, allowed hosts). Deliberately not a mathematical set: adding
/// the same value twice keeps both occurrences.
#[derive(Debug, Clone)]
pub struct ChainedSet<V> {
    store: Vec<V>,
}

impl<V> Default for ChainedSet<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> ChainedSet<V> {
    pub fn new() -> Self {
        Self { store: Vec::new() }
    }

    /// Append a value.
    pub fn add(&mut self, value: impl Into<V>) -> &mut Self {
        self.store.push(value.into());
        self
    }

    /// Insert a value at the front.
    pub fn prepend(&mut self, value: impl Into<V>) -> &mut Self {
        self.store.insert(0, value.into());
        self
    }

    pub fn clear(&mut self) -> &mut Self {
        self.store.clear();
        self
    }

    /// Append every value from `values`, preserving their order.
    pub fn merge(&mut self, values: impl IntoIterator<Item = V>) -> &mut Self {
        self.store.extend(values);
        self
    }

    pub fn values(&self) -> &[V] {
        &self.store
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

impl<V: PartialEq> ChainedSet<V> {
    pub fn has(&self, value: &V) -> bool {
        self.store.contains(value)
    }

    /// Remove every occurrence equal to `value`; absent values are not an
    /// error.
    pub fn delete(&mut self, value: &V) -> &mut Self {
        self.store.retain(|stored| stored != value);
        self
    }
}

impl ChainedSet<Value> {
    /// Materialize to a plain array; `None` when empty.
    pub fn to_config(&self) -> Option<Value> {
        if self.store.is_empty() {
            None
        } else {
            Some(Value::Array(self.store.clone()))
        }
    }
}

impl<V> Chainable for ChainedSet<V> {}
impl<V> Orderable for ChainedSet<V> {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn add_preserves_order_and_duplicates() {
        let mut set: ChainedSet<Value> = ChainedSet::new();
        set.add("a").add("b").add("a");
        assert_eq!(set.values(), &[json!("a"), json!("b"), json!("a")]);
    }

    #[test]
    fn prepend_inserts_at_front() {
        let mut set: ChainedSet<Value> = ChainedSet::new();
        set.add("b").prepend("a");
        assert_eq!(set.values(), &[json!("a"), json!("b")]);
    }

    #[test]
    fn delete_removes_every_occurrence() {
        let mut set: ChainedSet<Value> = ChainedSet::new();
        set.add("a").add("b").add("a").delete(&json!("a"));
        assert_eq!(set.values(), &[json!("b")]);
        set.delete(&json!("missing"));
        assert_eq!(set.values(), &[json!("b")]);
    }

    #[test]
    fn merge_appends_in_order() {
        let mut set: ChainedSet<Value> = ChainedSet::new();
        set.add("a").merge([json!("b"), json!("c")]);
        assert_eq!(set.values(), &[json!("a"), json!("b"), json!("c")]);
    }

    #[test]
    fn empty_set_materializes_to_none() {
        let set: ChainedSet<Value> = ChainedSet::new();
        assert!(set.to_config().is_none());
    }
}
