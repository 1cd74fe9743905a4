//! Fluent-composition helpers shared by every node in the builder tree.

use serde_json::Value;

/// Shared fluent surface for builder nodes.
///
/// Every node type in the tree implements this. `batch` scopes a multi-step
/// mutation inline; `when`/`when_else` express conditional mutation without
/// breaking a chain. The JS-era `end()` navigation has no equivalent here:
/// sub-trees are public fields of their owner and every mutator returns
/// `&mut Self`, so the parent never goes out of reach.
pub trait Chainable {
    /// Run `f` against this node, then continue chaining.
    fn batch(&mut self, f: impl FnOnce(&mut Self)) -> &mut Self
    where
        Self: Sized,
    {
        f(self);
        self
    }

    /// Run `then` only when `condition` holds.
    fn when(&mut self, condition: bool, then: impl FnOnce(&mut Self)) -> &mut Self
    where
        Self: Sized,
    {
        if condition {
            then(self);
        }
        self
    }

    /// Run exactly one of `then` / `otherwise` depending on `condition`.
    fn when_else(
        &mut self,
        condition: bool,
        then: impl FnOnce(&mut Self),
        otherwise: impl FnOnce(&mut Self),
    ) -> &mut Self
    where
        Self: Sized,
    {
        if condition {
            then(self);
        } else {
            otherwise(self);
        }
        self
    }
}

/// Placement request attached to a stored value, resolved at read time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OrderHint {
    /// Keep the natural insertion position.
    #[default]
    Natural,
    /// Place immediately before the named sibling, if present.
    Before(String),
    /// Place immediately after the named sibling, if present.
    After(String),
}

/// Values stored in a [`ChainedMap`](crate::ChainedMap) expose their
/// placement request through this trait. Plain values have none; nodes such
/// as plugins and rules carry one settable via `before(..)` / `after(..)`.
pub trait Orderable {
    fn order_hint(&self) -> OrderHint {
        OrderHint::Natural
    }
}

impl Orderable for Value {}
impl Orderable for String {}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter(u32);
    impl Chainable for Counter {}

    #[test]
    fn batch_applies_and_returns_self() {
        let mut c = Counter(0);
        c.batch(|c| c.0 += 2).batch(|c| c.0 += 3);
        assert_eq!(c.0, 5);
    }

    #[test]
    fn when_runs_exactly_one_arm() {
        let mut c = Counter(0);
        c.when(true, |c| c.0 += 1);
        c.when(false, |c| c.0 += 10);
        c.when_else(false, |c| c.0 += 10, |c| c.0 += 2);
        assert_eq!(c.0, 3);
    }
}
