use std::path::Path;

use bw_story::check_story;

pub fn run(path: &Path) -> Result<(), String> {
    let story = super::load_story(path)?;
    let warnings = check_story(&story);
    super::print_warnings(&warnings);

    let errors = warnings.iter().filter(|w| w.is_error).count();
    let minor = warnings.len() - errors;

    if errors > 0 {
        eprintln!(
            "  {}, {}",
            super::plural(errors, "error"),
            super::plural(minor, "warning")
        );
        return Err("story check failed".into());
    }

    if minor > 0 {
        println!("  {} for '{}'.", super::plural(minor, "warning"), story.title);
    } else {
        println!("  All checks passed for '{}'.", story.title);
    }
    println!(
        "  {}, {}, {}",
        super::plural(story.passage_count(), "passage"),
        super::plural(story.choice_count(), "choice"),
        super::plural(story.variables.len(), "variable"),
    );

    Ok(())
}
