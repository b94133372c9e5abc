pub mod check;
pub mod play;
pub mod record;

use std::path::Path;

use bw_player::{Player, PlayerConfig};
use bw_story::{IntegrityWarning, PassageId, Story, check_story};
use colored::Colorize;
use tracing::info;

/// Load a story file, mapping failures to a printable message.
fn load_story(path: &Path) -> Result<Story, String> {
    let story = Story::load(path).map_err(|e| format!("cannot load story: {e}"))?;
    info!(path = %path.display(), passages = story.passage_count(), "story file read");
    Ok(story)
}

/// Load a story and print its integrity warnings. Broken links are not
/// fatal here: the player refuses them at runtime.
fn load_with_warnings(path: &Path) -> Result<Story, String> {
    let story = load_story(path)?;
    print_warnings(&check_story(&story));
    Ok(story)
}

/// Create a player with `story` loaded and started.
fn start_player(
    story: Story,
    config: PlayerConfig,
    start: Option<&str>,
) -> Result<Player, String> {
    let mut player = Player::with_config(config);
    player.load_story(story);
    player
        .start(start.map(PassageId::from))
        .map_err(|e| format!("cannot start: {e}"))?;
    Ok(player)
}

/// Print integrity warnings to stderr.
fn print_warnings(warnings: &[IntegrityWarning]) {
    for warning in warnings {
        let line = warning.to_string();
        if warning.is_error {
            eprintln!("  {}", line.red());
        } else {
            eprintln!("  {}", line.yellow());
        }
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}
