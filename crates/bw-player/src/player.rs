//! The playback engine.
//!
//! `Player` owns a private overlay on top of a shared, read-only [`Story`]:
//! variable bindings, a step history, breakpoints, a pause-aware timer, and
//! an error log. UI code drives it through the commands below and observes
//! it through [`Player::state`] or by subscribing to change events.

use std::sync::Arc;

use bw_story::{Choice, ChoiceId, Passage, PassageId, Story, VariableValue};
use tracing::{debug, info, warn};

use crate::breakpoints::Breakpoints;
use crate::clock::{Clock, SystemClock};
use crate::config::PlayerConfig;
use crate::error::{ErrorEntry, PlayerError, PlayerResult};
use crate::observer::{Observers, PlayerEvent, SubscriptionId};
use crate::recorder::Playthrough;
use crate::render::render_content;
use crate::state::PlayerState;

/// A single simulated reader of a story.
pub struct Player {
    story: Option<Arc<Story>>,
    state: PlayerState,
    clock: Box<dyn Clock>,
    observers: Observers,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    /// Create a player with default configuration and the wall clock.
    pub fn new() -> Self {
        Self::with_config(PlayerConfig::default())
    }

    /// Create a player with the given configuration and the wall clock.
    pub fn with_config(config: PlayerConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }

    /// Create a player reading time from `clock`.
    pub fn with_clock(config: PlayerConfig, clock: impl Clock + 'static) -> Self {
        let mut breakpoints = Breakpoints::new();
        for passage in config.breakpoints {
            breakpoints.insert(passage);
        }
        Self {
            story: None,
            state: PlayerState::new(config.debug_mode, config.max_errors, breakpoints),
            clock: Box::new(clock),
            observers: Observers::default(),
        }
    }

    // -----------------------------------------------------------------------
    // Observation
    // -----------------------------------------------------------------------

    /// The overlay state and its projections.
    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    /// The loaded story.
    pub fn story(&self) -> Option<&Story> {
        self.story.as_deref()
    }

    /// The passage the reader is on.
    pub fn current_passage(&self) -> Option<&Passage> {
        let id = self.state.current_passage_id()?;
        self.story.as_ref()?.passage(id)
    }

    /// Choices offered by the current passage.
    pub fn available_choices(&self) -> &[Choice] {
        self.state.available_choices()
    }

    /// The current passage's text with variables substituted.
    pub fn current_text(&self) -> Option<String> {
        self.current_passage()
            .map(|p| render_content(&p.content, self.state.variables()))
    }

    /// Current value of a variable.
    pub fn variable(&self, name: &str) -> Option<&VariableValue> {
        self.state.variable(name)
    }

    /// Whether a passage is flagged as a breakpoint.
    pub fn has_breakpoint(&self, passage: &PassageId) -> bool {
        self.state.has_breakpoint(passage)
    }

    /// Play time so far, excluding pauses.
    pub fn duration_ms(&self) -> i64 {
        self.state.duration_at(self.clock.now_ms())
    }

    /// Register a listener called after every state-changing command.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&PlayerEvent, &PlayerState) + 'static,
    ) -> SubscriptionId {
        self.observers.subscribe(Box::new(listener))
    }

    /// Remove a listener. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.observers.len()
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Load a story, discarding any playthrough in progress.
    ///
    /// A running session is stopped first (observers see `Stopped` before
    /// `StoryLoaded`): its history refers to passages of the old story.
    /// Breakpoints and debug mode are kept.
    pub fn load_story(&mut self, story: impl Into<Arc<Story>>) {
        self.stop();
        let story = story.into();
        info!(title = %story.title, passages = story.passage_count(), "story loaded");
        self.story = Some(story);
        self.emit(PlayerEvent::StoryLoaded);
    }

    /// Begin a playthrough at `passage`, or at the story's start passage.
    ///
    /// Does nothing if a playthrough is already in progress.
    pub fn start(&mut self, passage: Option<PassageId>) -> PlayerResult<()> {
        if self.state.active {
            debug!("start ignored: already active");
            return Ok(());
        }
        let passage = self.begin(passage)?;
        info!(passage = %passage, "playthrough started");
        self.emit(PlayerEvent::Started { passage });
        Ok(())
    }

    /// Discard the playthrough and return to inactive, whatever the phase.
    ///
    /// Errors left by a failed `start` are cleared too. Observers are only
    /// notified when a playthrough was actually in progress.
    pub fn stop(&mut self) {
        let was_active = self.state.active;
        self.state.clear_playthrough();
        if was_active {
            info!("playthrough stopped");
            self.emit(PlayerEvent::Stopped);
        }
    }

    /// Reseed variables and history from the playthrough's first passage.
    ///
    /// While inactive this starts from the story's start passage.
    pub fn restart(&mut self) -> PlayerResult<()> {
        let origin = self.state.history.first().map(|s| s.passage_id.clone());
        let was_active = self.state.active;

        self.state.clear_playthrough();
        let passage = self.begin(origin)?;
        info!(passage = %passage, "playthrough restarted");
        if was_active {
            self.emit(PlayerEvent::Restarted { passage });
        } else {
            self.emit(PlayerEvent::Started { passage });
        }
        Ok(())
    }

    /// Seed a fresh playthrough at `passage` and mark it running.
    fn begin(&mut self, passage: Option<PassageId>) -> PlayerResult<PassageId> {
        let story = Arc::clone(self.story.as_ref().ok_or(PlayerError::NoStory)?);
        let id = passage.unwrap_or_else(|| story.start_passage.clone());
        let Some(entry) = story.passage(&id) else {
            return Err(self.record_error(PlayerError::UnknownPassage(id)));
        };

        let now = self.clock.now_ms();
        self.state.variables.seed(&story.variables);
        self.state.history.clear();
        self.state.history.record(
            entry.id.clone(),
            entry.title.clone(),
            None,
            now,
            self.state.variables.snapshot(),
        );
        self.state.errors.clear();
        self.state.timer.start(now);
        self.state.active = true;
        self.state.paused = false;
        self.state.current_passage = Some(entry.id.clone());
        self.state.available_choices = entry.choices.clone();
        Ok(entry.id.clone())
    }

    // -----------------------------------------------------------------------
    // Pause / resume
    // -----------------------------------------------------------------------

    /// Pause playback and stop the timer.
    pub fn pause(&mut self) {
        if !self.state.active || self.state.paused {
            return;
        }
        self.halt();
        debug!(duration_ms = self.state.timer.accumulated_ms(), "paused");
        self.emit(PlayerEvent::Paused);
    }

    /// Resume playback and restart the timer.
    pub fn resume(&mut self) {
        if !self.state.active || !self.state.paused {
            return;
        }
        self.state.timer.resume(self.clock.now_ms());
        self.state.paused = false;
        debug!("resumed");
        self.emit(PlayerEvent::Resumed);
    }

    /// Pause if running, resume if paused.
    pub fn toggle_pause(&mut self) {
        if self.state.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    fn halt(&mut self) {
        self.state.timer.pause(self.clock.now_ms());
        self.state.paused = true;
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    /// Follow one of the current passage's choices.
    ///
    /// On success returns the index of the new step. An unknown choice or a
    /// choice whose target does not exist is recorded in the error log and
    /// leaves the player where it was. Entering a breakpoint pauses playback.
    pub fn make_choice(&mut self, choice_id: &ChoiceId) -> PlayerResult<usize> {
        if !self.state.active {
            return Err(PlayerError::Inactive);
        }
        let story = Arc::clone(self.story.as_ref().ok_or(PlayerError::NoStory)?);
        let from = self
            .state
            .current_passage
            .clone()
            .ok_or(PlayerError::Inactive)?;

        let Some(choice) = self
            .state
            .available_choices
            .iter()
            .find(|c| &c.id == choice_id)
            .cloned()
        else {
            return Err(self.record_error(PlayerError::InvalidChoice {
                choice: choice_id.clone(),
                passage: from,
            }));
        };

        let Some(target) = story.passage(&choice.target) else {
            return Err(self.record_error(PlayerError::DanglingTarget {
                choice: choice.id,
                target: choice.target,
            }));
        };

        let index = self.state.history.record(
            target.id.clone(),
            target.title.clone(),
            Some((choice.id.clone(), choice.text.clone())),
            self.clock.now_ms(),
            self.state.variables.snapshot(),
        );
        self.state.current_passage = Some(target.id.clone());
        self.state.available_choices = target.choices.clone();
        debug!(from = %from, to = %target.id, step = index, "navigated");

        let hit = self.state.breakpoints.contains(&target.id);
        if hit && !self.state.paused {
            self.halt();
        }

        self.emit(PlayerEvent::Navigated {
            from,
            to: target.id.clone(),
            choice: choice.id,
        });
        if hit {
            info!(passage = %target.id, "breakpoint hit");
            self.emit(PlayerEvent::BreakpointHit {
                passage: target.id.clone(),
            });
        }
        Ok(index)
    }

    /// Step back one passage. The first step can never be undone.
    ///
    /// Variables are left as they are; use [`Player::jump_to_step`] to
    /// restore them from a snapshot.
    pub fn undo(&mut self) -> bool {
        if !self.state.active || !self.state.history.undo() {
            return false;
        }
        let Some(passage) = self.state.history.last().map(|s| s.passage_id.clone()) else {
            return false;
        };
        self.enter(&passage);
        debug!(passage = %passage, "undone");
        self.emit(PlayerEvent::Undone { passage });
        true
    }

    /// Rewind to step `index`, dropping later steps and restoring the
    /// variables captured when that step was entered.
    ///
    /// Returns `false` and changes nothing if `index` is out of range.
    pub fn jump_to_step(&mut self, index: usize) -> bool {
        self.try_jump_to_step(index).is_ok()
    }

    /// [`Player::jump_to_step`] with the reason for failure.
    pub fn try_jump_to_step(&mut self, index: usize) -> PlayerResult<()> {
        if !self.state.active {
            return Err(PlayerError::Inactive);
        }
        let Some(step) = self.state.history.get(index) else {
            return Err(PlayerError::StepOutOfRange {
                index,
                len: self.state.history.len(),
            });
        };
        let passage = step.passage_id.clone();
        let snapshot = Arc::clone(&step.snapshot);

        self.state.history.truncate(index + 1);
        self.state.variables.restore(&snapshot);
        self.enter(&passage);
        debug!(passage = %passage, step = index, "jumped");
        self.emit(PlayerEvent::Jumped { index });
        Ok(())
    }

    /// Make `passage` current and refresh the available choices.
    fn enter(&mut self, passage: &PassageId) {
        self.state.available_choices = self
            .story
            .as_ref()
            .and_then(|s| s.passage(passage))
            .map(|p| p.choices.clone())
            .unwrap_or_default();
        self.state.current_passage = Some(passage.clone());
    }

    // -----------------------------------------------------------------------
    // Variables
    // -----------------------------------------------------------------------

    /// Bind a variable, with no type check against its declaration.
    ///
    /// Returns `false` while inactive, when there are no bindings to change.
    pub fn set_variable(&mut self, name: impl Into<String>, value: impl Into<VariableValue>) -> bool {
        if !self.state.active {
            return false;
        }
        let name = name.into();
        let value = value.into();
        debug!(name = %name, value = %value, "variable set");
        self.state.variables.set(name.clone(), value);
        self.emit(PlayerEvent::VariableSet { name });
        true
    }

    // -----------------------------------------------------------------------
    // Debugging
    // -----------------------------------------------------------------------

    /// Flag or unflag a passage as a breakpoint. Returns whether it is
    /// flagged afterwards.
    pub fn toggle_breakpoint(&mut self, passage: impl Into<PassageId>) -> bool {
        let passage = passage.into();
        let enabled = self.state.breakpoints.toggle(passage.clone());
        debug!(passage = %passage, enabled, "breakpoint toggled");
        self.emit(PlayerEvent::BreakpointToggled { passage, enabled });
        enabled
    }

    /// Switch debug mode. Returns the new setting.
    pub fn toggle_debug_mode(&mut self) -> bool {
        self.state.debug_mode = !self.state.debug_mode;
        let enabled = self.state.debug_mode;
        self.emit(PlayerEvent::DebugModeToggled { enabled });
        enabled
    }

    /// Empty the error log.
    pub fn clear_errors(&mut self) {
        if self.state.errors.is_empty() {
            return;
        }
        self.state.errors.clear();
        self.emit(PlayerEvent::ErrorsCleared);
    }

    fn record_error(&mut self, error: PlayerError) -> PlayerError {
        if let Some(kind) = error.kind() {
            warn!(error = %error, "playback error");
            self.state.errors.push(ErrorEntry {
                kind,
                message: error.to_string(),
                passage: self.state.current_passage.clone(),
                timestamp: self.clock.now_ms(),
            });
            self.emit(PlayerEvent::ErrorRecorded);
        }
        error
    }

    // -----------------------------------------------------------------------
    // Recording
    // -----------------------------------------------------------------------

    /// Capture the history and final state.
    pub fn get_playthrough(&self) -> Playthrough {
        let title = self.story.as_ref().map(|s| s.title.as_str()).unwrap_or("");
        Playthrough::capture(&self.state, title, self.clock.now_ms())
    }

    /// Capture the playthrough as JSON.
    pub fn export_playthrough(&self) -> PlayerResult<String> {
        self.get_playthrough().to_json()
    }

    fn emit(&mut self, event: PlayerEvent) {
        self.observers.notify(&event, &self.state);
    }
}
