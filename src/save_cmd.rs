use std::io::{IsTerminal as _, Read as _};

use noteerr::config::{Config, clamp_threshold};
use noteerr::entry::{CandidateEntry, NewEntry};
use noteerr::shell;
use noteerr::similarity::find_similar_entries;
use noteerr::store::EntryStore;
use noteerr::text::{first_line, format_tags, parse_tags, truncate};

use crate::output;

/// Error text stored when nothing else was captured.
const FALLBACK_ERROR: &str = "Command failed";

/// Maximum number of duplicates previewed before asking to save anyway, oldest first.
const MAX_PREVIEW: usize = 3;

#[derive(clap::Args)]
#[allow(clippy::struct_excessive_bools)] // CLI flags are naturally booleans
pub struct SaveArgs {
    /// Note about the failure or how you fixed it
    #[arg(default_value = "")]
    notes: String,
    /// Command that failed (auto-detected from shell history if omitted)
    #[arg(short, long, env = "NOTEERR_COMMAND", hide_env_values = true)]
    command: Option<String>,
    /// Error message (read from stdin if omitted)
    #[arg(short, long, env = "NOTEERR_ERROR", hide_env_values = true)]
    error: Option<String>,
    /// Exit code of the failed command (defaults to $NOTEERR_EXIT_CODE or 1)
    #[arg(long, allow_hyphen_values = true)]
    exit_code: Option<i32>,
    /// Comma-separated tags (e.g. git,npm,docker)
    #[arg(short, long)]
    tags: Option<String>,
    /// Project name (prompted for when omitted in an interactive terminal)
    #[arg(short, long)]
    project: Option<String>,
    /// Save even if a similar error already exists
    #[arg(short, long)]
    force: bool,
    /// Never prompt; use an empty project when --project is omitted
    #[arg(long)]
    no_prompt: bool,
    /// Similarity threshold for duplicate detection (0.0 to 1.0)
    #[arg(long, value_parser = parse_threshold)]
    threshold: Option<f64>,
}

fn parse_threshold(s: &str) -> Result<f64, String> {
    let value: f64 = s.trim().parse().map_err(|e| format!("{e}"))?;
    if !value.is_finite() {
        return Err(format!("threshold must be a number between 0.0 and 1.0, got '{s}'"));
    }
    Ok(value)
}

fn resolve_command(explicit: Option<String>) -> Option<String> {
    explicit
        .filter(|c| !c.trim().is_empty())
        .or_else(shell::last_command)
}

fn resolve_error(explicit: Option<String>) -> anyhow::Result<String> {
    if let Some(e) = explicit.filter(|e| !e.is_empty()) {
        return Ok(e);
    }
    let stdin = std::io::stdin();
    if !stdin.is_terminal() {
        let mut piped = String::new();
        stdin.lock().read_to_string(&mut piped)?;
        let piped = piped.trim();
        if !piped.is_empty() {
            return Ok(piped.to_owned());
        }
    }
    Ok(FALLBACK_ERROR.to_owned())
}

fn prompt_project(store: &EntryStore) -> anyhow::Result<String> {
    let existing = store.get_all_projects()?;
    if !existing.is_empty() {
        eprintln!("\nAvailable projects:");
        for (i, project) in existing.iter().enumerate() {
            eprintln!("  {}. {project}", i + 1);
        }
        eprintln!("  (or enter a new project name)");
    }
    let answer: String = dialoguer::Input::new()
        .with_prompt("Project name (press Enter to skip)")
        .allow_empty(true)
        .interact_text()?;
    let answer = answer.trim();
    // Accept a list number as shorthand for an existing project.
    if let Ok(n) = answer.parse::<usize>()
        && let Some(project) = n.checked_sub(1).and_then(|i| existing.get(i))
    {
        return Ok(project.clone());
    }
    Ok(answer.to_owned())
}

pub fn cmd_save(store: &EntryStore, config: &Config, args: SaveArgs) -> anyhow::Result<i32> {
    let Some(command) = resolve_command(args.command) else {
        eprintln!("[noteerr] could not detect the last command, use --command");
        return Ok(1);
    };
    let error = resolve_error(args.error)?;
    let exit_code = args.exit_code.unwrap_or_else(shell::last_exit_code);
    let directory = std::env::current_dir()
        .map(|d| d.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tags = args.tags.as_deref().map(parse_tags).unwrap_or_default();

    let project = match args.project {
        Some(p) => p.trim().to_owned(),
        None if !args.no_prompt && output::is_interactive() => prompt_project(store)?,
        None => String::new(),
    };

    if !args.force {
        let threshold = args
            .threshold
            .map_or_else(|| config.similarity_threshold(), clamp_threshold);
        let candidate = CandidateEntry::new(command.as_str(), error.as_str());
        let similar = find_similar_entries(store, &candidate, threshold)?;
        if !similar.is_empty() {
            eprintln!("\n[noteerr] found {} similar error(s):", similar.len());
            for entry in similar.iter().take(MAX_PREVIEW) {
                output::print_entry_preview(entry);
            }
            if !output::confirm("Save anyway?", false)? {
                eprintln!("[noteerr] skipped, error not saved (use --force to save duplicates)");
                return Ok(0);
            }
        }
    }

    let entry = store.add_entry(
        NewEntry::new(command, error, exit_code, directory)
            .notes(args.notes)
            .tags(tags)
            .project(project),
    )?;

    println!("\u{2713} Saved error #{}", entry.id);
    println!("  Command: {}", truncate(&entry.command, 60));
    println!("  Error: {}", truncate(first_line(&entry.error), 60));
    if !entry.project.is_empty() {
        println!("  Project: {}", entry.project);
    }
    if !entry.notes.is_empty() {
        println!("  Notes: {}", entry.notes);
    }
    if !entry.tags.is_empty() {
        println!("  Tags: {}", format_tags(&entry.tags));
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_parser_accepts_finite_values() {
        assert_eq!(parse_threshold("0.4"), Ok(0.4));
        assert_eq!(parse_threshold(" 1 "), Ok(1.0));
    }

    #[test]
    fn threshold_parser_rejects_non_finite_and_garbage() {
        assert!(parse_threshold("NaN").is_err());
        assert!(parse_threshold("inf").is_err());
        assert!(parse_threshold("-infinity").is_err());
        assert!(parse_threshold("high").is_err());
    }
}
