use serde::{Deserialize, Serialize};

use crate::ids::{ChoiceId, PassageId};

/// A node of story text with zero or more outgoing choices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passage {
    /// Unique identifier for this passage.
    pub id: PassageId,
    /// Short title shown in the editor and in recorded steps.
    pub title: String,
    /// Template text; `{{name}}` placeholders refer to variables.
    #[serde(default)]
    pub content: String,
    /// Outgoing choices, in display order.
    #[serde(default)]
    pub choices: Vec<Choice>,
}

impl Passage {
    /// Create an empty passage.
    pub fn new(id: impl Into<PassageId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: String::new(),
            choices: Vec::new(),
        }
    }

    /// Set the template text.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Append a choice.
    pub fn with_choice(mut self, choice: Choice) -> Self {
        self.choices.push(choice);
        self
    }

    /// Find one of this passage's choices by ID.
    pub fn choice(&self, id: &ChoiceId) -> Option<&Choice> {
        self.choices.iter().find(|c| &c.id == id)
    }

    /// A passage without choices ends the story.
    pub fn is_ending(&self) -> bool {
        self.choices.is_empty()
    }
}

/// A labeled edge from one passage to another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    /// Identifier, unique within the owning passage.
    pub id: ChoiceId,
    /// Label shown to the reader.
    pub text: String,
    /// Destination passage. May not exist in the story (a dangling link).
    pub target: PassageId,
}

impl Choice {
    /// Create a choice leading to `target`.
    pub fn new(
        id: impl Into<ChoiceId>,
        text: impl Into<String>,
        target: impl Into<PassageId>,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            target: target.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passage_builder() {
        let passage = Passage::new("start", "The Gate")
            .with_content("You stand before a gate.")
            .with_choice(Choice::new("open", "Open it", "courtyard"))
            .with_choice(Choice::new("leave", "Walk away", "road"));

        assert_eq!(passage.title, "The Gate");
        assert_eq!(passage.choices.len(), 2);
        assert!(!passage.is_ending());
        assert_eq!(
            passage.choice(&ChoiceId::from("leave")).map(|c| &c.target),
            Some(&PassageId::from("road"))
        );
        assert!(passage.choice(&ChoiceId::from("fly")).is_none());
    }

    #[test]
    fn passage_without_choices_is_ending() {
        assert!(Passage::new("end", "The End").is_ending());
    }

    #[test]
    fn content_and_choices_default_when_missing() {
        let passage: Passage = serde_json::from_str(r#"{"id":"p","title":"P"}"#).unwrap();
        assert!(passage.content.is_empty());
        assert!(passage.choices.is_empty());
    }
}
