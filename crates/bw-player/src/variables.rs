//! Live variable bindings for a playthrough.

use std::collections::BTreeMap;
use std::sync::Arc;

use bw_story::{Variable, VariableValue};

/// Variable name to value. Ordered so exports are stable.
pub type VariableMap = BTreeMap<String, VariableValue>;

/// An immutable copy of the bindings at one point in time.
pub type Snapshot = Arc<VariableMap>;

/// The mutable overlay of current variable values.
///
/// Values are not checked against their declared type on write.
#[derive(Debug, Clone, Default)]
pub struct VariableStore {
    values: VariableMap,
}

impl VariableStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard all bindings and bind each declaration to its initial value.
    pub fn seed(&mut self, declarations: &[Variable]) {
        self.values = declarations
            .iter()
            .map(|v| (v.name.clone(), v.initial.clone()))
            .collect();
    }

    /// Current value of a variable, if bound.
    pub fn get(&self, name: &str) -> Option<&VariableValue> {
        self.values.get(name)
    }

    /// Bind a value, returning the previous one.
    pub fn set(&mut self, name: impl Into<String>, value: VariableValue) -> Option<VariableValue> {
        self.values.insert(name.into(), value)
    }

    /// Take an immutable snapshot of the current bindings.
    pub fn snapshot(&self) -> Snapshot {
        Arc::new(self.values.clone())
    }

    /// Replace every binding with those in `snapshot`.
    pub fn restore(&mut self, snapshot: &Snapshot) {
        self.values = VariableMap::clone(snapshot);
    }

    /// All bindings.
    pub fn as_map(&self) -> &VariableMap {
        &self.values
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Remove every binding.
    pub fn clear(&mut self) {
        self.values.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declarations() -> Vec<Variable> {
        vec![Variable::new("health", 100), Variable::new("name", "Ada")]
    }

    #[test]
    fn seed_binds_initial_values() {
        let mut store = VariableStore::new();
        store.seed(&declarations());
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("health"), Some(&VariableValue::Number(100.0)));
        assert!(store.get("missing").is_none());
    }

    #[test]
    fn seed_discards_previous_bindings() {
        let mut store = VariableStore::new();
        store.set("stray", VariableValue::Boolean(true));
        store.seed(&declarations());
        assert!(store.get("stray").is_none());
    }

    #[test]
    fn set_ignores_declared_type() {
        let mut store = VariableStore::new();
        store.seed(&declarations());
        let previous = store.set("health", VariableValue::from("lots"));
        assert_eq!(previous, Some(VariableValue::Number(100.0)));
        assert_eq!(store.get("health"), Some(&VariableValue::from("lots")));
    }

    #[test]
    fn snapshot_is_unaffected_by_later_writes() {
        let mut store = VariableStore::new();
        store.seed(&declarations());
        let snap = store.snapshot();
        store.set("health", VariableValue::from(1));
        assert_eq!(snap.get("health"), Some(&VariableValue::Number(100.0)));

        store.restore(&snap);
        assert_eq!(store.get("health"), Some(&VariableValue::Number(100.0)));
    }
}
