//! Replayable history of visited steps.
//!
//! The log only grows at the tail or is truncated to a shorter length. Steps
//! are never edited once recorded, and each carries the variable snapshot
//! taken when its passage was entered, which is what makes jumping back
//! exact. Visit counts are maintained alongside so they always equal the
//! number of steps per passage.

use std::collections::{HashMap, HashSet};

use bw_story::{ChoiceId, PassageId};
use serde::{Deserialize, Serialize};

use crate::variables::Snapshot;

/// One entry in a playthrough: a passage visit and the variables at entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// Position in the history, starting at 0.
    pub index: usize,
    /// The passage entered.
    pub passage_id: PassageId,
    /// Title of that passage when it was entered.
    pub passage_title: String,
    /// The choice that led here. `None` for the first step.
    pub choice_id: Option<ChoiceId>,
    /// Label of that choice.
    pub choice_text: Option<String>,
    /// When the step was entered, in epoch milliseconds.
    pub timestamp: i64,
    /// Variables as they were on entry. Not exported.
    #[serde(skip)]
    pub snapshot: Snapshot,
}

/// Append/truncate log of steps with per-passage visit counts.
#[derive(Debug, Clone, Default)]
pub struct History {
    steps: Vec<Step>,
    visits: HashMap<PassageId, usize>,
}

impl History {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step and return its index, which is the previous length.
    pub fn record(
        &mut self,
        passage_id: PassageId,
        passage_title: impl Into<String>,
        choice: Option<(ChoiceId, String)>,
        timestamp: i64,
        snapshot: Snapshot,
    ) -> usize {
        let (choice_id, choice_text) = match choice {
            Some((id, text)) => (Some(id), Some(text)),
            None => (None, None),
        };
        let index = self.steps.len();
        *self.visits.entry(passage_id.clone()).or_default() += 1;
        self.steps.push(Step {
            index,
            passage_id,
            passage_title: passage_title.into(),
            choice_id,
            choice_text,
            timestamp,
            snapshot,
        });
        index
    }

    /// Drop the last step unless it is the only one.
    pub fn undo(&mut self) -> bool {
        if self.steps.len() <= 1 {
            return false;
        }
        self.truncate(self.steps.len() - 1);
        true
    }

    /// Keep only the first `len` steps.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.steps.len() {
            return;
        }
        for step in self.steps.drain(len..) {
            if let Some(count) = self.visits.get_mut(&step.passage_id) {
                *count -= 1;
                if *count == 0 {
                    self.visits.remove(&step.passage_id);
                }
            }
        }
    }

    /// Remove every step.
    pub fn clear(&mut self) {
        self.steps.clear();
        self.visits.clear();
    }

    /// All steps, oldest first.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// A step by index.
    pub fn get(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    /// The most recent step.
    pub fn last(&self) -> Option<&Step> {
        self.steps.last()
    }

    /// The first step.
    pub fn first(&self) -> Option<&Step> {
        self.steps.first()
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether no steps are recorded.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Visits per passage.
    pub fn visit_counts(&self) -> &HashMap<PassageId, usize> {
        &self.visits
    }

    /// Visits to one passage.
    pub fn visit_count(&self, passage: &PassageId) -> usize {
        self.visits.get(passage).copied().unwrap_or(0)
    }

    /// Distinct passages visited, in order of first visit.
    pub fn visited_passages(&self) -> Vec<PassageId> {
        let mut seen = HashSet::new();
        self.steps
            .iter()
            .filter(|s| seen.insert(&s.passage_id))
            .map(|s| s.passage_id.clone())
            .collect()
    }
}
