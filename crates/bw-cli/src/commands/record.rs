use std::fs;
use std::path::Path;

use bw_player::PlayerConfig;
use bw_story::ChoiceId;
use tracing::debug;

pub fn run(
    path: &Path,
    choices: &[String],
    start: Option<&str>,
    format: &str,
    output: Option<&Path>,
) -> Result<(), String> {
    let story = super::load_with_warnings(path)?;
    let mut player = super::start_player(story, PlayerConfig::default(), start)?;

    for (i, id) in choices.iter().enumerate() {
        let choice = ChoiceId::from(id.trim());
        player
            .make_choice(&choice)
            .map_err(|e| format!("choice {} of {}: {e}", i + 1, choices.len()))?;
        debug!(choice = %choice, "scripted choice applied");
    }

    let rendered = match format {
        "json" => player.export_playthrough().map_err(|e| e.to_string())?,
        "markdown" | "md" => player.get_playthrough().export_markdown(),
        other => return Err(format!("unknown format '{other}'. Use: json, markdown")),
    };

    match output {
        Some(file) => {
            fs::write(file, &rendered)
                .map_err(|e| format!("cannot write {}: {e}", file.display()))?;
            println!(
                "  Recorded {} to {}",
                super::plural(player.state().history().len(), "step"),
                file.display()
            );
        }
        None => println!("{rendered}"),
    }

    Ok(())
}
