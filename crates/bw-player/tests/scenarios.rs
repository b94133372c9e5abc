//! End-to-end playback scenarios driven through the public API.

use bw_player::{ErrorKind, ManualClock, Phase, Player, PlayerConfig, PlayerEvent, Playthrough};
use bw_story::{Choice, ChoiceId, Passage, PassageId, Story, Variable, VariableValue};

const LOOP_STORY: &str = r#"{
  "title": "Loop",
  "startPassage": "start",
  "passages": {
    "start": {
      "id": "start",
      "title": "Start",
      "content": "You have {{health}} health.",
      "choices": [{ "id": "go", "text": "Go", "target": "second" }]
    },
    "second": {
      "id": "second",
      "title": "Second",
      "content": "Somewhere else.",
      "choices": [
        { "id": "back", "text": "Back", "target": "start" },
        { "id": "rest", "text": "Rest", "target": "camp" }
      ]
    },
    "camp": { "id": "camp", "title": "Camp", "content": "The end." }
  },
  "variables": [
    { "name": "health", "type": "number", "initial": 100 },
    { "name": "name", "type": "string", "initial": "Ada" }
  ]
}"#;

fn loop_story() -> Story {
    Story::from_json(LOOP_STORY).unwrap()
}

fn player_at(start_ms: i64) -> (Player, ManualClock) {
    let clock = ManualClock::new(start_ms);
    let mut player = Player::with_clock(PlayerConfig::default(), clock.clone());
    player.load_story(loop_story());
    (player, clock)
}

fn choose(player: &mut Player, id: &str) {
    player.make_choice(&ChoiceId::from(id)).unwrap();
}

fn current(player: &Player) -> &str {
    player
        .state()
        .current_passage_id()
        .map(PassageId::as_str)
        .unwrap_or("")
}

#[test]
fn start_second_loop_counts_visits() {
    let (mut p, _) = player_at(0);
    p.start(None).unwrap();

    choose(&mut p, "go");
    assert_eq!(current(&p), "second");
    assert_eq!(p.state().visit_count(&PassageId::from("second")), 1);

    choose(&mut p, "back");
    assert_eq!(current(&p), "start");
    assert_eq!(p.state().visit_count(&PassageId::from("start")), 2);
    assert_eq!(p.state().unique_passages_visited(), 2);
    assert_eq!(p.state().history().len(), 3);
}

#[test]
fn jump_to_first_step_restores_initial_values() {
    let (mut p, _) = player_at(0);
    p.start(None).unwrap();
    p.set_variable("health", 50);
    assert!(p.jump_to_step(0));
    assert_eq!(p.variable("health"), Some(&VariableValue::Number(100.0)));
}

#[test]
fn nonexistent_choice_logs_one_validation_error() {
    let (mut p, _) = player_at(0);
    p.start(None).unwrap();

    assert!(p.make_choice(&ChoiceId::from("nonexistent-id")).is_err());
    let errors = p.state().errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::Validation);
    assert_eq!(current(&p), "start");
}

#[test]
fn undo_restores_position_but_keeps_variables() {
    let (mut p, _) = player_at(0);
    p.start(None).unwrap();
    let before: Vec<_> = p.available_choices().to_vec();

    choose(&mut p, "go");
    p.set_variable("name", "Grace");
    assert!(p.undo());

    assert_eq!(current(&p), "start");
    assert_eq!(p.available_choices(), before.as_slice());
    assert_eq!(p.variable("name"), Some(&VariableValue::from("Grace")));
}

#[test]
fn export_round_trips_history() {
    let (mut p, clock) = player_at(1_700_000_000_000);
    p.start(None).unwrap();
    clock.advance(1_500);
    choose(&mut p, "go");
    clock.advance(1_500);
    choose(&mut p, "back");
    choose(&mut p, "go");

    let json = p.export_playthrough().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let steps = value["steps"].as_array().unwrap();
    assert_eq!(steps.len(), p.state().history().len());
    assert!(steps[0]["choiceId"].is_null());
    assert_eq!(steps[2]["choiceText"], "Back");
    assert!(steps[0].get("snapshot").is_none());

    let mut visited: Vec<&str> = value["finalState"]["passagesVisited"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|v| v.as_str())
        .collect();
    visited.sort_unstable();
    assert_eq!(visited, ["second", "start"]);
    assert_eq!(value["finalState"]["durationMs"], 3_000);
    assert_eq!(value["finalState"]["variables"]["health"], 100.0);

    let back = Playthrough::from_json(&json).unwrap();
    assert_eq!(back.metadata.story_title, "Loop");
    assert_eq!(back.steps.len(), 4);
}

#[test]
fn breakpoint_in_loop_pauses_every_entry() {
    let (mut p, _) = player_at(0);
    p.toggle_breakpoint("second");
    p.start(None).unwrap();

    for _ in 0..4 {
        choose(&mut p, "go");
        assert_eq!(p.state().phase(), Phase::Paused);
        choose(&mut p, "back");
        p.resume();
        assert_eq!(p.state().phase(), Phase::Running);
    }
}

#[test]
fn duration_is_pause_aware_and_resets() {
    let (mut p, clock) = player_at(5_000);
    p.start(None).unwrap();

    clock.advance(2_000);
    p.pause();
    clock.advance(60_000);
    assert_eq!(p.duration_ms(), 2_000);

    p.resume();
    clock.advance(1_000);
    assert_eq!(p.duration_ms(), 3_000);

    p.restart().unwrap();
    assert_eq!(p.duration_ms(), 0);
    clock.advance(10);
    assert_eq!(p.duration_ms(), 10);

    p.stop();
    assert_eq!(p.duration_ms(), 0);
}

#[test]
fn reaching_an_ending_marks_completed() {
    let (mut p, _) = player_at(0);
    p.start(None).unwrap();
    choose(&mut p, "go");
    choose(&mut p, "rest");

    assert!(p.available_choices().is_empty());
    let record = p.get_playthrough();
    assert!(record.final_state.completed);
    assert!(record.export_markdown().contains("3. **Camp** ← \"Rest\""));
}

#[test]
fn dangling_link_is_refused() {
    let story = Story::new("Broken", "a")
        .with_passage(Passage::new("a", "A").with_choice(Choice::new("jump", "Jump", "nowhere")))
        .unwrap();
    let mut p = Player::new();
    p.load_story(story);
    p.start(None).unwrap();

    assert!(p.make_choice(&ChoiceId::from("jump")).is_err());
    assert_eq!(current(&p), "a");
    assert_eq!(p.state().errors()[0].kind, ErrorKind::Validation);
}

#[test]
fn stop_discards_errors_from_a_failed_start() {
    let (mut p, _) = player_at(0);
    assert!(p.start(Some(PassageId::from("nowhere"))).is_err());
    assert_eq!(p.state().errors().len(), 1);

    p.stop();
    assert!(p.state().errors().is_empty());
    assert_eq!(p.state().phase(), Phase::Inactive);
}

#[test]
fn loading_a_new_story_resets_the_session() {
    let (mut p, _) = player_at(0);
    p.toggle_breakpoint("second");
    p.start(None).unwrap();
    choose(&mut p, "go");

    let other = Story::new("Other", "only")
        .with_passage(Passage::new("only", "Only"))
        .unwrap()
        .with_variable(Variable::new("coins", 3))
        .unwrap();
    p.load_story(other);

    assert_eq!(p.state().phase(), Phase::Inactive);
    assert!(p.state().history().is_empty());
    assert!(p.has_breakpoint(&PassageId::from("second")));

    p.start(None).unwrap();
    assert_eq!(p.variable("coins"), Some(&VariableValue::Number(3.0)));
    assert!(p.variable("health").is_none());
}

#[test]
fn observers_follow_the_session() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let (mut p, _) = player_at(0);
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    p.subscribe(move |event, _| sink.borrow_mut().push(event.clone()));

    p.start(None).unwrap();
    choose(&mut p, "go");
    p.undo();
    p.stop();
    p.stop();

    assert_eq!(
        *events.borrow(),
        vec![
            PlayerEvent::Started {
                passage: PassageId::from("start")
            },
            PlayerEvent::Navigated {
                from: PassageId::from("start"),
                to: PassageId::from("second"),
                choice: ChoiceId::from("go"),
            },
            PlayerEvent::Undone {
                passage: PassageId::from("start")
            },
            PlayerEvent::Stopped,
        ]
    );
}
