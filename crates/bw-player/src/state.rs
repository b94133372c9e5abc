//! The player's overlay state and its read-only projections.
//!
//! Only [`Player`](crate::Player) commands mutate this. Everything here is a
//! pure function over the current state, suitable for a UI to observe.

use std::collections::{BTreeSet, HashMap, VecDeque};

use bw_story::{Choice, PassageId, VariableValue};

use crate::breakpoints::Breakpoints;
use crate::error::{ErrorEntry, ErrorLog};
use crate::history::{History, Step};
use crate::timer::Timer;
use crate::variables::{VariableMap, VariableStore};

/// Coarse playback phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No playthrough in progress.
    Inactive,
    /// Playing, timer running.
    Running,
    /// Playing, timer stopped (manually or by a breakpoint).
    Paused,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Inactive => write!(f, "inactive"),
            Self::Running => write!(f, "running"),
            Self::Paused => write!(f, "paused"),
        }
    }
}

/// The mutable overlay a player keeps on top of a story.
#[derive(Debug, Clone)]
pub struct PlayerState {
    pub(crate) active: bool,
    pub(crate) paused: bool,
    pub(crate) current_passage: Option<PassageId>,
    pub(crate) available_choices: Vec<Choice>,
    pub(crate) variables: VariableStore,
    pub(crate) history: History,
    pub(crate) breakpoints: Breakpoints,
    pub(crate) debug_mode: bool,
    pub(crate) errors: ErrorLog,
    pub(crate) timer: Timer,
}

impl PlayerState {
    pub(crate) fn new(debug_mode: bool, max_errors: usize, breakpoints: Breakpoints) -> Self {
        Self {
            active: false,
            paused: false,
            current_passage: None,
            available_choices: Vec::new(),
            variables: VariableStore::new(),
            history: History::new(),
            breakpoints,
            debug_mode,
            errors: ErrorLog::new(max_errors),
            timer: Timer::new(),
        }
    }

    /// Drop the playthrough, keeping breakpoints and debug mode.
    pub(crate) fn clear_playthrough(&mut self) {
        self.active = false;
        self.paused = false;
        self.current_passage = None;
        self.available_choices.clear();
        self.variables.clear();
        self.history.clear();
        self.errors.clear();
        self.timer.reset();
    }

    /// Whether a playthrough is in progress.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether playback is paused.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// The current phase.
    pub fn phase(&self) -> Phase {
        match (self.active, self.paused) {
            (false, _) => Phase::Inactive,
            (true, false) => Phase::Running,
            (true, true) => Phase::Paused,
        }
    }

    /// The passage the reader is on.
    pub fn current_passage_id(&self) -> Option<&PassageId> {
        self.current_passage.as_ref()
    }

    /// Choices offered by the current passage.
    pub fn available_choices(&self) -> &[Choice] {
        &self.available_choices
    }

    /// Current variable bindings.
    pub fn variables(&self) -> &VariableMap {
        self.variables.as_map()
    }

    /// Current value of one variable.
    pub fn variable(&self, name: &str) -> Option<&VariableValue> {
        self.variables.get(name)
    }

    /// Recorded steps, oldest first.
    pub fn history(&self) -> &[Step] {
        self.history.steps()
    }

    /// Visits per passage in the current history.
    pub fn visited_counts(&self) -> &HashMap<PassageId, usize> {
        self.history.visit_counts()
    }

    /// Visits to one passage in the current history.
    pub fn visit_count(&self, passage: &PassageId) -> usize {
        self.history.visit_count(passage)
    }

    /// Flagged passages.
    pub fn breakpoints(&self) -> &BTreeSet<PassageId> {
        self.breakpoints.as_set()
    }

    /// Whether a passage is flagged.
    pub fn has_breakpoint(&self, passage: &PassageId) -> bool {
        self.breakpoints.contains(passage)
    }

    /// Whether debug mode is on.
    pub fn debug_mode(&self) -> bool {
        self.debug_mode
    }

    /// Recorded errors, oldest first.
    pub fn errors(&self) -> &VecDeque<ErrorEntry> {
        self.errors.entries()
    }

    /// Play time as of `now_ms`, excluding paused intervals.
    pub fn duration_at(&self, now_ms: i64) -> i64 {
        if self.active {
            self.timer.elapsed_ms(now_ms)
        } else {
            0
        }
    }

    /// Whether any step is recorded.
    pub fn has_history(&self) -> bool {
        !self.history.is_empty()
    }

    /// Whether `undo` would succeed.
    pub fn can_undo(&self) -> bool {
        self.history.len() > 1
    }

    /// Number of distinct passages visited.
    pub fn unique_passages_visited(&self) -> usize {
        self.history.visit_counts().len()
    }

    /// Distinct passages visited, in order of first visit.
    pub fn passages_visited(&self) -> Vec<PassageId> {
        self.history.visited_passages()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_is_inactive_and_empty() {
        let state = PlayerState::new(false, 10, Breakpoints::new());
        assert_eq!(state.phase(), Phase::Inactive);
        assert!(state.current_passage_id().is_none());
        assert!(!state.has_history());
        assert!(!state.can_undo());
        assert_eq!(state.unique_passages_visited(), 0);
        assert_eq!(state.duration_at(10_000), 0);
    }

    #[test]
    fn phase_follows_flags() {
        let mut state = PlayerState::new(false, 10, Breakpoints::new());
        state.active = true;
        assert_eq!(state.phase(), Phase::Running);
        state.paused = true;
        assert_eq!(state.phase(), Phase::Paused);
        assert_eq!(state.phase().to_string(), "paused");
    }

    #[test]
    fn clear_playthrough_keeps_authoring_settings() {
        let mut breakpoints = Breakpoints::new();
        breakpoints.insert(PassageId::from("cellar"));
        let mut state = PlayerState::new(true, 10, breakpoints);
        state.active = true;
        state.current_passage = Some(PassageId::from("start"));

        state.clear_playthrough();

        assert_eq!(state.phase(), Phase::Inactive);
        assert!(state.current_passage_id().is_none());
        assert!(state.debug_mode());
        assert!(state.has_breakpoint(&PassageId::from("cellar")));
    }
}
