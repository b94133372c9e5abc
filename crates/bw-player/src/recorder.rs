//! Playthrough recording and export.
//!
//! A [`Playthrough`] is a read-only projection of the player's history and
//! final state. Building one has no side effects, so it can be taken at any
//! time, including while inactive.

use bw_story::PassageId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PlayerResult;
use crate::history::Step;
use crate::state::PlayerState;
use crate::variables::VariableMap;

/// Where and when a playthrough was recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaythroughMetadata {
    /// Title of the story played.
    pub story_title: String,
    /// When the record was taken.
    pub recorded_at: DateTime<Utc>,
}

/// State at the moment of recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalState {
    /// Variable bindings.
    pub variables: VariableMap,
    /// Distinct passages visited, in order of first visit.
    pub passages_visited: Vec<PassageId>,
    /// Whether the reader is on an ending (a passage with no choices).
    pub completed: bool,
    /// Play time excluding pauses.
    pub duration_ms: i64,
}

/// A recorded playthrough: every step plus the final state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playthrough {
    /// Recording metadata.
    pub metadata: PlaythroughMetadata,
    /// Steps in the order they were taken.
    pub steps: Vec<Step>,
    /// State at recording time.
    pub final_state: FinalState,
}

impl Playthrough {
    /// Capture the current state.
    pub fn capture(state: &PlayerState, story_title: &str, now_ms: i64) -> Self {
        Self {
            metadata: PlaythroughMetadata {
                story_title: story_title.to_string(),
                recorded_at: DateTime::from_timestamp_millis(now_ms).unwrap_or_default(),
            },
            steps: state.history().to_vec(),
            final_state: FinalState {
                variables: state.variables().clone(),
                passages_visited: state.passages_visited(),
                completed: state.is_active() && state.available_choices().is_empty(),
                duration_ms: state.duration_at(now_ms),
            },
        }
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> PlayerResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read back an exported playthrough.
    pub fn from_json(json: &str) -> PlayerResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Render the trail as markdown.
    pub fn export_markdown(&self) -> String {
        let mut out = format!("# Playthrough: {}\n\n", self.metadata.story_title);
        out.push_str(&format!(
            "*Recorded {}*\n\n",
            self.metadata.recorded_at.to_rfc3339()
        ));

        out.push_str("## Steps\n\n");
        for step in &self.steps {
            match &step.choice_text {
                Some(choice) => out.push_str(&format!(
                    "{}. **{}** ← \"{choice}\"\n",
                    step.index + 1,
                    step.passage_title
                )),
                None => out.push_str(&format!(
                    "{}. **{}** (start)\n",
                    step.index + 1,
                    step.passage_title
                )),
            }
        }
        out.push('\n');

        let state = &self.final_state;
        out.push_str("## Final State\n\n");
        out.push_str(&format!(
            "- **Completed:** {}\n",
            if state.completed { "yes" } else { "no" }
        ));
        out.push_str(&format!(
            "- **Duration:** {:.1}s\n",
            state.duration_ms as f64 / 1000.0
        ));
        out.push_str(&format!(
            "- **Passages visited:** {}\n",
            state.passages_visited.len()
        ));
        if !state.variables.is_empty() {
            out.push_str("\n### Variables\n\n");
            for (name, value) in &state.variables {
                out.push_str(&format!("- `{name}` = {value}\n"));
            }
        }
        out
    }
}
