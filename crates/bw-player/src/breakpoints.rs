//! Breakpoints: passages that pause playback whenever they are entered.

use std::collections::BTreeSet;

use bw_story::PassageId;

/// A set of flagged passages.
#[derive(Debug, Clone, Default)]
pub struct Breakpoints {
    passages: BTreeSet<PassageId>,
}

impl Breakpoints {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flag or unflag a passage. Returns whether it is flagged afterwards.
    pub fn toggle(&mut self, passage: PassageId) -> bool {
        if self.passages.remove(&passage) {
            false
        } else {
            self.passages.insert(passage);
            true
        }
    }

    /// Flag a passage.
    pub fn insert(&mut self, passage: PassageId) {
        self.passages.insert(passage);
    }

    /// Whether a passage is flagged.
    pub fn contains(&self, passage: &PassageId) -> bool {
        self.passages.contains(passage)
    }

    /// Flagged passages in ID order.
    pub fn iter(&self) -> impl Iterator<Item = &PassageId> {
        self.passages.iter()
    }

    /// The underlying set.
    pub fn as_set(&self) -> &BTreeSet<PassageId> {
        &self.passages
    }

    /// Number of flagged passages.
    pub fn len(&self) -> usize {
        self.passages.len()
    }

    /// Whether nothing is flagged.
    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_adds_then_removes() {
        let mut bp = Breakpoints::new();
        let cellar = PassageId::from("cellar");

        assert!(bp.toggle(cellar.clone()));
        assert!(bp.contains(&cellar));
        assert!(!bp.toggle(cellar.clone()));
        assert!(!bp.contains(&cellar));
        assert!(bp.is_empty());
    }

    #[test]
    fn iterates_in_id_order() {
        let mut bp = Breakpoints::new();
        bp.insert(PassageId::from("b"));
        bp.insert(PassageId::from("a"));
        bp.insert(PassageId::from("b"));
        let ids: Vec<_> = bp.iter().map(PassageId::as_str).collect();
        assert_eq!(ids, ["a", "b"]);
        assert_eq!(bp.len(), 2);
    }
}
