//! Change notifications.
//!
//! Listeners run synchronously after a command has fully applied, in the
//! order they subscribed. They see the state through a shared reference and
//! cannot mutate it.

use bw_story::{ChoiceId, PassageId};

use crate::state::PlayerState;

/// What a command changed.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// A story was loaded; any previous playthrough was discarded.
    StoryLoaded,
    /// A playthrough began.
    Started {
        /// The first passage.
        passage: PassageId,
    },
    /// The playthrough was discarded.
    Stopped,
    /// The playthrough was reseeded from its first passage.
    Restarted {
        /// The first passage.
        passage: PassageId,
    },
    /// The reader followed a choice.
    Navigated {
        /// Passage left.
        from: PassageId,
        /// Passage entered.
        to: PassageId,
        /// Choice followed.
        choice: ChoiceId,
    },
    /// The entered passage is a breakpoint; playback is now paused.
    BreakpointHit {
        /// The flagged passage.
        passage: PassageId,
    },
    /// The last step was dropped.
    Undone {
        /// The passage now current.
        passage: PassageId,
    },
    /// History was rewound to a step.
    Jumped {
        /// The step now last.
        index: usize,
    },
    /// Playback paused.
    Paused,
    /// Playback resumed.
    Resumed,
    /// A variable was written.
    VariableSet {
        /// Variable name.
        name: String,
    },
    /// A breakpoint was added or removed.
    BreakpointToggled {
        /// The passage.
        passage: PassageId,
        /// Whether it is flagged now.
        enabled: bool,
    },
    /// Debug mode was switched.
    DebugModeToggled {
        /// The new setting.
        enabled: bool,
    },
    /// A recoverable error was logged.
    ErrorRecorded,
    /// The error log was emptied.
    ErrorsCleared,
}

/// Handle returned by [`Player::subscribe`](crate::Player::subscribe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// A change listener.
pub type Listener = Box<dyn FnMut(&PlayerEvent, &PlayerState)>;

/// Registered listeners.
#[derive(Default)]
pub(crate) struct Observers {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl Observers {
    pub(crate) fn subscribe(&mut self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    pub(crate) fn notify(&mut self, event: &PlayerEvent, state: &PlayerState) {
        for (_, listener) in &mut self.listeners {
            listener(event, state);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
