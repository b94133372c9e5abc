use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{StoryError, StoryResult};
use crate::ids::{ChoiceId, PassageId};
use crate::passage::{Choice, Passage};
use crate::variable::Variable;

/// The story graph: passages keyed by ID, a start passage, and variable
/// declarations.
///
/// Playback never mutates a story; the player keeps its own overlay of
/// variable values and history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    /// Display title, used in recorded playthroughs.
    #[serde(default)]
    pub title: String,
    /// Passage a playthrough begins on unless told otherwise.
    pub start_passage: PassageId,
    /// All passages, keyed by their ID.
    #[serde(default)]
    pub passages: HashMap<PassageId, Passage>,
    /// Variable declarations, in declaration order.
    #[serde(default)]
    pub variables: Vec<Variable>,
}

impl Story {
    /// Create an empty story that will start at `start_passage`.
    pub fn new(title: impl Into<String>, start_passage: impl Into<PassageId>) -> Self {
        Self {
            title: title.into(),
            start_passage: start_passage.into(),
            passages: HashMap::new(),
            variables: Vec::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Editing
    // -----------------------------------------------------------------------

    /// Add a passage. Fails if the ID is already taken.
    pub fn add_passage(&mut self, passage: Passage) -> StoryResult<()> {
        if self.passages.contains_key(&passage.id) {
            return Err(StoryError::DuplicatePassage(passage.id));
        }
        self.passages.insert(passage.id.clone(), passage);
        Ok(())
    }

    /// Builder form of [`Story::add_passage`].
    pub fn with_passage(mut self, passage: Passage) -> StoryResult<Self> {
        self.add_passage(passage)?;
        Ok(self)
    }

    /// Declare a variable. Fails if the name is already declared.
    pub fn declare_variable(&mut self, variable: Variable) -> StoryResult<()> {
        if self.variable(&variable.name).is_some() {
            return Err(StoryError::DuplicateVariable(variable.name));
        }
        self.variables.push(variable);
        Ok(())
    }

    /// Builder form of [`Story::declare_variable`].
    pub fn with_variable(mut self, variable: Variable) -> StoryResult<Self> {
        self.declare_variable(variable)?;
        Ok(self)
    }

    // -----------------------------------------------------------------------
    // Lookup
    // -----------------------------------------------------------------------

    /// Get a passage by ID.
    pub fn passage(&self, id: &PassageId) -> Option<&Passage> {
        self.passages.get(id)
    }

    /// Whether a passage with this ID exists.
    pub fn contains_passage(&self, id: &PassageId) -> bool {
        self.passages.contains_key(id)
    }

    /// Get a variable declaration by name.
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Find a choice on a given passage.
    pub fn choice(&self, passage: &PassageId, choice: &ChoiceId) -> Option<&Choice> {
        self.passage(passage).and_then(|p| p.choice(choice))
    }

    /// Number of passages.
    pub fn passage_count(&self) -> usize {
        self.passages.len()
    }

    /// Number of choices across all passages.
    pub fn choice_count(&self) -> usize {
        self.passages.values().map(|p| p.choices.len()).sum()
    }

    // -----------------------------------------------------------------------
    // JSON
    // -----------------------------------------------------------------------

    /// Parse a story from JSON and verify its structural invariants.
    pub fn from_json(json: &str) -> StoryResult<Self> {
        let story: Self = serde_json::from_str(json)?;
        story.verify()?;
        Ok(story)
    }

    /// Load a story from a JSON file.
    pub fn load(path: &Path) -> StoryResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| StoryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Serialize the story as pretty-printed JSON.
    pub fn to_json(&self) -> StoryResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Unique passage IDs and variable names. Serde cannot enforce either.
    fn verify(&self) -> StoryResult<()> {
        for (key, passage) in &self.passages {
            if key != &passage.id {
                return Err(StoryError::PassageKeyMismatch {
                    key: key.clone(),
                    id: passage.id.clone(),
                });
            }
        }

        let mut names = HashSet::new();
        for variable in &self.variables {
            if !names.insert(variable.name.as_str()) {
                return Err(StoryError::DuplicateVariable(variable.name.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variable::VariableValue;

    fn two_room_story() -> Story {
        Story::new("Two Rooms", "start")
            .with_passage(
                Passage::new("start", "Start").with_choice(Choice::new("go", "Go", "second")),
            )
            .unwrap()
            .with_passage(
                Passage::new("second", "Second").with_choice(Choice::new("back", "Back", "start")),
            )
            .unwrap()
            .with_variable(Variable::new("health", 100))
            .unwrap()
    }

    #[test]
    fn build_and_lookup() {
        let story = two_room_story();
        assert_eq!(story.passage_count(), 2);
        assert_eq!(story.choice_count(), 2);
        assert!(story.contains_passage(&PassageId::from("second")));
        assert_eq!(
            story
                .choice(&PassageId::from("start"), &ChoiceId::from("go"))
                .map(|c| c.text.as_str()),
            Some("Go")
        );
        assert_eq!(
            story.variable("health").map(|v| &v.initial),
            Some(&VariableValue::Number(100.0))
        );
    }

    #[test]
    fn duplicate_passage_rejected() {
        let mut story = two_room_story();
        let err = story.add_passage(Passage::new("start", "Again")).unwrap_err();
        assert!(matches!(err, StoryError::DuplicatePassage(id) if id.as_str() == "start"));
    }

    #[test]
    fn duplicate_variable_rejected() {
        let mut story = two_room_story();
        let err = story
            .declare_variable(Variable::new("health", 5))
            .unwrap_err();
        assert!(matches!(err, StoryError::DuplicateVariable(name) if name == "health"));
    }

    #[test]
    fn json_roundtrip() {
        let story = two_room_story();
        let json = story.to_json().unwrap();
        assert!(json.contains("\"startPassage\""));
        let back = Story::from_json(&json).unwrap();
        assert_eq!(back.title, "Two Rooms");
        assert_eq!(back.passage_count(), 2);
        assert_eq!(back.variables, story.variables);
    }

    #[test]
    fn json_key_mismatch_rejected() {
        let json = r#"{
            "startPassage": "a",
            "passages": { "a": { "id": "b", "title": "B" } }
        }"#;
        let err = Story::from_json(json).unwrap_err();
        assert!(matches!(err, StoryError::PassageKeyMismatch { .. }));
    }

    #[test]
    fn json_duplicate_variables_rejected() {
        let json = r#"{
            "startPassage": "a",
            "passages": { "a": { "id": "a", "title": "A" } },
            "variables": [
                { "name": "x", "type": "number", "initial": 1 },
                { "name": "x", "type": "number", "initial": 2 }
            ]
        }"#;
        assert!(matches!(
            Story::from_json(json),
            Err(StoryError::DuplicateVariable(_))
        ));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(Story::from_json("{"), Err(StoryError::Json(_))));
    }

    #[test]
    fn load_missing_file() {
        let err = Story::load(Path::new("/nonexistent/story.json")).unwrap_err();
        assert!(err.to_string().contains("cannot read"));
    }
}
