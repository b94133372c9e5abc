//! Static integrity checks over a story graph.
//!
//! These run without playing the story. They find links that point nowhere,
//! passages the reader can never reach, and declarations whose initial value
//! disagrees with their declared type. Playback performs its own checks at
//! transition time; these exist so an author can see problems up front.

use std::collections::{HashSet, VecDeque};

use crate::ids::PassageId;
use crate::story::Story;

/// A problem found while checking a story.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityWarning {
    /// The passage or variable the warning is about.
    pub subject: String,
    /// A human-readable description of the problem.
    pub message: String,
    /// Whether playback would fail on this (true) or merely be odd (false).
    pub is_error: bool,
}

impl std::fmt::Display for IntegrityWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = if self.is_error { "error" } else { "warning" };
        write!(f, "{level}: {}: {}", self.subject, self.message)
    }
}

/// Check a story for integrity problems.
///
/// Results are sorted by subject so output is stable across runs.
pub fn check_story(story: &Story) -> Vec<IntegrityWarning> {
    let mut warnings = Vec::new();

    if !story.contains_passage(&story.start_passage) {
        warnings.push(IntegrityWarning {
            subject: format!("story '{}'", story.title),
            message: format!("start passage \"{}\" does not exist", story.start_passage),
            is_error: true,
        });
    }

    check_links(story, &mut warnings);
    check_reachability(story, &mut warnings);
    check_variables(story, &mut warnings);

    warnings.sort_by(|a, b| a.subject.cmp(&b.subject).then(a.message.cmp(&b.message)));
    warnings
}

/// Dangling targets and repeated choice IDs.
fn check_links(story: &Story, warnings: &mut Vec<IntegrityWarning>) {
    for passage in story.passages.values() {
        let mut seen = HashSet::new();
        for choice in &passage.choices {
            if !seen.insert(&choice.id) {
                warnings.push(IntegrityWarning {
                    subject: format!("passage \"{}\"", passage.id),
                    message: format!("choice id \"{}\" is used more than once", choice.id),
                    is_error: false,
                });
            }
            if !story.contains_passage(&choice.target) {
                warnings.push(IntegrityWarning {
                    subject: format!("passage \"{}\"", passage.id),
                    message: format!(
                        "choice \"{}\" leads to missing passage \"{}\"",
                        choice.id, choice.target
                    ),
                    is_error: true,
                });
            }
        }
    }
}

fn check_reachability(story: &Story, warnings: &mut Vec<IntegrityWarning>) {
    if !story.contains_passage(&story.start_passage) {
        return;
    }

    let mut reached: HashSet<&PassageId> = HashSet::new();
    let mut queue = VecDeque::from([&story.start_passage]);
    reached.insert(&story.start_passage);

    while let Some(id) = queue.pop_front() {
        let Some(passage) = story.passage(id) else {
            continue;
        };
        for choice in &passage.choices {
            if story.contains_passage(&choice.target) && reached.insert(&choice.target) {
                queue.push_back(&choice.target);
            }
        }
    }

    for id in story.passages.keys() {
        if !reached.contains(id) {
            warnings.push(IntegrityWarning {
                subject: format!("passage \"{id}\""),
                message: "not reachable from the start passage".to_string(),
                is_error: false,
            });
        }
    }
}

fn check_variables(story: &Story, warnings: &mut Vec<IntegrityWarning>) {
    for variable in &story.variables {
        let actual = variable.initial.value_type();
        if actual != variable.ty {
            warnings.push(IntegrityWarning {
                subject: format!("variable \"{}\"", variable.name),
                message: format!(
                    "declared as {} but initial value is a {actual}",
                    variable.ty
                ),
                is_error: false,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passage::{Choice, Passage};
    use crate::variable::{Variable, VariableType, VariableValue};

    fn base_story() -> Story {
        Story::new("Test", "start")
            .with_passage(
                Passage::new("start", "Start").with_choice(Choice::new("go", "Go", "end")),
            )
            .unwrap()
            .with_passage(Passage::new("end", "End"))
            .unwrap()
    }

    #[test]
    fn clean_story_has_no_warnings() {
        assert!(check_story(&base_story()).is_empty());
    }

    #[test]
    fn missing_start_passage() {
        let mut story = base_story();
        story.start_passage = PassageId::from("nowhere");
        let warnings = check_story(&story);
        assert!(
            warnings
                .iter()
                .any(|w| w.is_error && w.message.contains("start passage \"nowhere\""))
        );
    }

    #[test]
    fn dangling_link_is_error() {
        let story = base_story()
            .with_passage(
                Passage::new("orphan", "Orphan").with_choice(Choice::new("x", "X", "void")),
            )
            .unwrap();
        let warnings = check_story(&story);
        let dangling: Vec<_> = warnings
            .iter()
            .filter(|w| w.message.contains("missing passage \"void\""))
            .collect();
        assert_eq!(dangling.len(), 1);
        assert!(dangling[0].is_error);
    }

    #[test]
    fn unreachable_passage_is_warning() {
        let story = base_story()
            .with_passage(Passage::new("island", "Island"))
            .unwrap();
        let warnings = check_story(&story);
        assert_eq!(warnings.len(), 1);
        assert!(!warnings[0].is_error);
        assert_eq!(warnings[0].subject, "passage \"island\"");
        assert_eq!(
            warnings[0].to_string(),
            "warning: passage \"island\": not reachable from the start passage"
        );
    }

    #[test]
    fn duplicate_choice_ids() {
        let mut story = base_story();
        if let Some(start) = story.passages.get_mut(&PassageId::from("start")) {
            start.choices.push(Choice::new("go", "Go again", "end"));
        }
        let warnings = check_story(&story);
        assert!(warnings.iter().any(|w| w.message.contains("used more than once")));
    }

    #[test]
    fn mistyped_initial_value() {
        let story = base_story()
            .with_variable(Variable {
                name: "gold".to_string(),
                ty: VariableType::Number,
                initial: VariableValue::String("lots".to_string()),
            })
            .unwrap();
        let warnings = check_story(&story);
        assert_eq!(warnings.len(), 1);
        assert_eq!(
            warnings[0].message,
            "declared as number but initial value is a string"
        );
    }
}
