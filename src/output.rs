use std::io::IsTerminal as _;

use noteerr::entry::ErrorEntry;
use noteerr::text::{first_line, format_tags, truncate};

/// Print a Serialize value as pretty JSON, logging errors to stderr.
pub fn print_json(value: &(impl serde::Serialize + ?Sized)) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("[noteerr] JSON serialization error: {e}"),
    }
}

/// Whether we can ask the user questions.
pub fn is_interactive() -> bool {
    std::io::stdin().is_terminal() && std::io::stderr().is_terminal()
}

/// Ask a yes/no question on stderr. Non-interactive sessions answer `false`.
pub fn confirm(prompt: &str, default: bool) -> anyhow::Result<bool> {
    if !is_interactive() {
        return Ok(false);
    }
    Ok(dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}

/// One-line-per-entry table: ID, command, first error line, project, date, tags.
pub fn print_entry_table(entries: &[ErrorEntry]) {
    println!(
        "{:<6}  {:<25}  {:<30}  {:<12}  {:<10}  TAGS",
        "ID", "COMMAND", "ERROR", "PROJECT", "DATE"
    );
    println!(
        "{:-<6}  {:-<25}  {:-<30}  {:-<12}  {:-<10}  {:-<4}",
        "", "", "", "", "", ""
    );
    for entry in entries {
        let project = if entry.project.is_empty() {
            "-".to_owned()
        } else {
            truncate(&entry.project, 12)
        };
        println!(
            "{:<6}  {:<25}  {:<30}  {:<12}  {:<10}  {}",
            entry.id,
            truncate(&entry.command, 25),
            truncate(first_line(&entry.error), 30),
            project,
            entry.short_date(),
            format_tags(&entry.tags)
        );
    }
}

/// Short preview used when warning about duplicates.
pub fn print_entry_preview(entry: &ErrorEntry) {
    eprintln!("  #{}: {}", entry.id, truncate(&entry.command, 50));
    eprintln!("       {}", truncate(first_line(&entry.error), 50));
    if !entry.notes.is_empty() {
        eprintln!("       Note: {}", truncate(&entry.notes, 50));
    }
}
