use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use bw_player::{Player, PlayerConfig, PlayerEvent};
use bw_story::VariableValue;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

const HELP: &str = "\
Playback:
  <number>              Follow the numbered choice
  undo                  Step back one passage (variables are kept)
  jump <step>           Rewind to a history step, restoring its variables
  restart               Start over from the first passage
  pause | resume        Stop or restart the clock
  toggle                Pause if running, resume if paused

Variables:
  set <name> <value>    Bind a variable (true/false, a number, or text)
  get <name>            Show one variable
  vars                  Show all variables

Debugging:
  break <passage>       Toggle a breakpoint on a passage
  debug                 Toggle debug mode (show variables after each step)
  history               Show the steps taken so far
  errors                Show recorded errors
  clear                 Clear recorded errors
  status                Show session status

  export [file]         Export the playthrough as JSON
  help                  Show this help
  quit                  Exit";

pub fn run(
    path: &Path,
    start: Option<&str>,
    breakpoints: &[String],
    debug: bool,
) -> Result<(), String> {
    let story = super::load_with_warnings(path)?;
    let title = story.title.clone();

    let config = breakpoints
        .iter()
        .fold(PlayerConfig::default().with_debug_mode(debug), |config, id| {
            config.with_breakpoint(id.as_str())
        });
    let mut player = super::start_player(story, config, start)?;

    player.subscribe(|event, _| {
        if let PlayerEvent::BreakpointHit { passage } = event {
            println!(
                "  {} at \"{passage}\". Type 'resume' to continue.",
                "Breakpoint".red().bold()
            );
        }
    });

    println!("  {} {title}", "Playing".bold());
    println!("  Type a choice number, 'help' for commands, 'quit' to exit.\n");
    println!("{}\n", describe(&player));

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break, // EOF
            Err(e) => return Err(e.to_string()),
            _ => {}
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match input.parse::<Input>() {
            Ok(Input::Quit) => break,
            Ok(command) => match execute(&mut player, command) {
                Ok(output) => {
                    if !output.is_empty() {
                        println!("{output}\n");
                    }
                }
                Err(e) => println!("{}\n", e.yellow()),
            },
            Err(e) => println!("{}\n", e.yellow()),
        }
    }

    let state = player.state();
    println!(
        "  Session ended: {}, {} visited, {}.",
        super::plural(state.history().len(), "step"),
        super::plural(state.unique_passages_visited(), "passage"),
        seconds(player.duration_ms())
    );
    Ok(())
}

/// One line of REPL input.
#[derive(Debug, Clone, PartialEq)]
enum Input {
    Choose(usize),
    Undo,
    Jump(usize),
    Pause,
    Resume,
    Toggle,
    Set(String, VariableValue),
    Get(String),
    Vars,
    History,
    Break(String),
    Debug,
    Errors,
    Clear,
    Status,
    Restart,
    Export(Option<PathBuf>),
    Help,
    Quit,
}

impl FromStr for Input {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(n) = trimmed.parse::<usize>() {
            return Ok(Self::Choose(n));
        }

        let (cmd, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (trimmed, ""),
        };
        let required = |usage: &str| {
            if rest.is_empty() {
                Err(format!("usage: {usage}"))
            } else {
                Ok(rest.to_string())
            }
        };

        match cmd.to_lowercase().as_str() {
            "undo" | "u" => Ok(Self::Undo),
            "jump" | "j" => rest
                .parse()
                .map(Self::Jump)
                .map_err(|_| "usage: jump <step>".to_string()),
            "pause" => Ok(Self::Pause),
            "resume" => Ok(Self::Resume),
            "toggle" => Ok(Self::Toggle),
            "set" => {
                let (name, value) = rest
                    .split_once(char::is_whitespace)
                    .ok_or("usage: set <name> <value>")?;
                Ok(Self::Set(name.to_string(), VariableValue::parse(value.trim())))
            }
            "get" => required("get <name>").map(Self::Get),
            "vars" => Ok(Self::Vars),
            "history" => Ok(Self::History),
            "break" => required("break <passage>").map(Self::Break),
            "debug" => Ok(Self::Debug),
            "errors" => Ok(Self::Errors),
            "clear" => Ok(Self::Clear),
            "status" => Ok(Self::Status),
            "restart" => Ok(Self::Restart),
            "export" => Ok(Self::Export(
                (!rest.is_empty()).then(|| PathBuf::from(rest)),
            )),
            "help" | "?" => Ok(Self::Help),
            "quit" | "q" | "exit" => Ok(Self::Quit),
            other => Err(format!("unknown command '{other}' (type 'help')")),
        }
    }
}

fn execute(player: &mut Player, input: Input) -> Result<String, String> {
    match input {
        Input::Choose(n) => {
            let choice = n
                .checked_sub(1)
                .and_then(|i| player.available_choices().get(i))
                .map(|c| c.id.clone())
                .ok_or_else(|| format!("no choice {n} here"))?;
            player.make_choice(&choice).map_err(|e| e.to_string())?;
            Ok(describe(player))
        }
        Input::Undo => {
            if player.undo() {
                Ok(describe(player))
            } else {
                Err("nothing to undo".into())
            }
        }
        Input::Jump(step) => {
            player.try_jump_to_step(step).map_err(|e| e.to_string())?;
            Ok(describe(player))
        }
        Input::Pause => {
            player.pause();
            Ok(format!("  {}", player.state().phase()))
        }
        Input::Resume => {
            player.resume();
            Ok(format!("  {}", player.state().phase()))
        }
        Input::Toggle => {
            player.toggle_pause();
            Ok(format!("  {}", player.state().phase()))
        }
        Input::Set(name, value) => {
            let shown = format!("  {name} = {value}");
            if player.set_variable(name, value) {
                Ok(shown)
            } else {
                Err("playback is not active".into())
            }
        }
        Input::Get(name) => player
            .variable(&name)
            .map(|value| format!("  {name} = {value}"))
            .ok_or_else(|| format!("unknown variable '{name}'")),
        Input::Vars => Ok(variables_table(player)),
        Input::History => Ok(history_table(player)),
        Input::Break(passage) => {
            let known = player
                .story()
                .is_some_and(|s| s.contains_passage(&passage.as_str().into()));
            let enabled = player.toggle_breakpoint(passage.as_str());
            let mut out = format!(
                "  Breakpoint {} \"{passage}\"",
                if enabled { "set on" } else { "removed from" }
            );
            if !known {
                out.push_str(" (no such passage)");
            }
            Ok(out)
        }
        Input::Debug => {
            let on = player.toggle_debug_mode();
            Ok(format!("  Debug mode {}", if on { "on" } else { "off" }))
        }
        Input::Errors => {
            let errors = player.state().errors();
            if errors.is_empty() {
                return Ok("  No errors.".into());
            }
            let lines: Vec<String> = errors.iter().map(|e| format!("  {e}")).collect();
            Ok(lines.join("\n"))
        }
        Input::Clear => {
            player.clear_errors();
            Ok("  Errors cleared.".into())
        }
        Input::Status => Ok(status(player)),
        Input::Restart => {
            player.restart().map_err(|e| e.to_string())?;
            Ok(describe(player))
        }
        Input::Export(None) => player.export_playthrough().map_err(|e| e.to_string()),
        Input::Export(Some(path)) => {
            let json = player.export_playthrough().map_err(|e| e.to_string())?;
            fs::write(&path, json).map_err(|e| format!("cannot write {}: {e}", path.display()))?;
            Ok(format!(
                "  Exported {} to {}",
                super::plural(player.state().history().len(), "step"),
                path.display()
            ))
        }
        Input::Help => Ok(HELP.to_string()),
        Input::Quit => Ok(String::new()),
    }
}

/// The current passage: title, rendered text, and numbered choices.
fn describe(player: &Player) -> String {
    let Some(passage) = player.current_passage() else {
        return "  (not playing)".into();
    };

    let mut out = format!("  {}\n", passage.title.bold());
    if let Some(text) = player.current_text() {
        for line in text.lines() {
            out.push_str(&format!("  {line}\n"));
        }
    }
    out.push('\n');

    let choices = player.available_choices();
    if choices.is_empty() {
        out.push_str(&format!("  {}", "(The End)".dimmed()));
    } else {
        let lines: Vec<String> = choices
            .iter()
            .enumerate()
            .map(|(i, c)| format!("  {}. {}", i + 1, c.text))
            .collect();
        out.push_str(&lines.join("\n"));
    }

    let state = player.state();
    if state.is_paused() {
        out.push_str(&format!("\n  {}", "[paused]".cyan()));
    }
    if state.debug_mode() {
        let vars: Vec<String> = state
            .variables()
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        out.push_str(&format!("\n  {} {}", "vars:".dimmed(), vars.join(", ")));
    }
    out
}

fn status(player: &Player) -> String {
    let state = player.state();
    let passage = state
        .current_passage_id()
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".into());
    let breakpoints: Vec<String> = state.breakpoints().iter().map(|p| p.to_string()).collect();

    let mut out = format!(
        "  Phase: {} | Passage: {passage} | Steps: {} | Unique passages: {} | Time: {}\n",
        state.phase(),
        state.history().len(),
        state.unique_passages_visited(),
        seconds(player.duration_ms()),
    );
    out.push_str(&format!(
        "  Breakpoints: {} | Debug: {} | Errors: {} | Can undo: {}",
        if breakpoints.is_empty() {
            "none".to_string()
        } else {
            breakpoints.join(", ")
        },
        if state.debug_mode() { "on" } else { "off" },
        state.errors().len(),
        if state.can_undo() { "yes" } else { "no" },
    ));
    out
}

fn variables_table(player: &Player) -> String {
    let variables = player.state().variables();
    if variables.is_empty() {
        return "  No variables.".into();
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Type", "Value"]);
    for (name, value) in variables {
        table.add_row(vec![
            name.clone(),
            value.value_type().to_string(),
            value.to_string(),
        ]);
    }
    table.to_string()
}

fn history_table(player: &Player) -> String {
    let history = player.state().history();
    let Some(first) = history.first() else {
        return "  No history.".into();
    };

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Step", "Passage", "Via", "At"]);
    for step in history {
        table.add_row(vec![
            step.index.to_string(),
            step.passage_title.clone(),
            step.choice_text.clone().unwrap_or_else(|| "(start)".into()),
            format!("+{}", seconds(step.timestamp - first.timestamp)),
        ]);
    }
    table.to_string()
}

fn seconds(ms: i64) -> String {
    format!("{:.1}s", ms as f64 / 1000.0)
}
