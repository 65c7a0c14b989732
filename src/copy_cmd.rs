use std::fmt::Write as _;

use noteerr::entry::ErrorEntry;
use noteerr::runner;
use noteerr::store::EntryStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CopyFormat {
    Text,
    Markdown,
    Json,
}

/// Which entry to copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CopyTarget {
    Latest,
    Id(u64),
}

/// Clipboard programs tried in order, with the arguments that make them read stdin.
const CLIPBOARD_TOOLS: &[(&str, &[&str])] = &[
    ("pbcopy", &[]),
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
    ("clip", &[]),
];

const USAGE: &str = "use: copy <id>, copy latest, copy error <id>, or copy latest error";

fn parse_id(s: &str) -> Result<CopyTarget, String> {
    if s.eq_ignore_ascii_case("latest") {
        return Ok(CopyTarget::Latest);
    }
    s.parse()
        .map(CopyTarget::Id)
        .map_err(|_| format!("invalid error ID: '{s}'"))
}

/// Accepts `<id>`, `latest`, `error <id|latest>`, and `latest error`.
fn parse_target(what: &str, specifier: Option<&str>) -> Result<CopyTarget, String> {
    match specifier {
        None => parse_id(what),
        Some(spec) if what.eq_ignore_ascii_case("error") => parse_id(spec),
        Some(spec)
            if what.eq_ignore_ascii_case("latest") && spec.eq_ignore_ascii_case("error") =>
        {
            Ok(CopyTarget::Latest)
        }
        Some(_) => Err(format!("invalid syntax, {USAGE}")),
    }
}

fn render(entry: &ErrorEntry, format: CopyFormat) -> anyhow::Result<String> {
    let mut out = String::new();
    match format {
        CopyFormat::Json => out = serde_json::to_string_pretty(entry)?,
        CopyFormat::Markdown => {
            writeln!(out, "# Error #{}\n", entry.id)?;
            writeln!(out, "**Command:** `{}`", entry.command)?;
            writeln!(out, "**Exit Code:** {}", entry.exit_code)?;
            writeln!(out, "**Directory:** `{}`", entry.directory)?;
            writeln!(out, "**Timestamp:** {}", entry.formatted_timestamp())?;
            if !entry.project.is_empty() {
                writeln!(out, "**Project:** {}", entry.project)?;
            }
            if !entry.tags.is_empty() {
                writeln!(out, "**Tags:** {}", entry.tags.join(", "))?;
            }
            if !entry.notes.is_empty() {
                writeln!(out, "\n**Notes:** {}", entry.notes)?;
            }
            write!(out, "\n## Error Output\n\n```\n{}\n```", entry.error)?;
        }
        CopyFormat::Text => {
            writeln!(out, "Error #{}", entry.id)?;
            writeln!(out, "Command: {}", entry.command)?;
            writeln!(out, "Exit Code: {}", entry.exit_code)?;
            writeln!(out, "Directory: {}", entry.directory)?;
            writeln!(out, "Timestamp: {}", entry.formatted_timestamp())?;
            if !entry.project.is_empty() {
                writeln!(out, "Project: {}", entry.project)?;
            }
            if !entry.tags.is_empty() {
                writeln!(out, "Tags: {}", entry.tags.join(", "))?;
            }
            if !entry.notes.is_empty() {
                writeln!(out, "Notes: {}", entry.notes)?;
            }
            write!(out, "\nError Output:\n{}", entry.error)?;
        }
    }
    Ok(out)
}

/// Pipe `content` into the first clipboard program on PATH.
///
/// Returns `Ok(false)` when no tool is installed, and the tool's error when it fails.
fn copy_to_clipboard(content: &str) -> anyhow::Result<bool> {
    copy_with_tools(CLIPBOARD_TOOLS, content)
}

fn copy_with_tools(tools: &[(&str, &[&str])], content: &str) -> anyhow::Result<bool> {
    for (program, args) in tools {
        if let Ok(path) = which::which(program) {
            tracing::debug!(program, "copying via clipboard tool");
            runner::pipe_to(&path, args, content)?;
            return Ok(true);
        }
    }
    Ok(false)
}

/// Copy to the clipboard, printing `content` on stdout when that is not possible.
fn deliver(copied: anyhow::Result<bool>, id: u64, content: &str) {
    match copied {
        Ok(true) => eprintln!("[noteerr] \u{2713} copied error #{id} to clipboard"),
        Ok(false) => {
            eprintln!("[noteerr] no clipboard tool found, printing instead");
            println!("{content}");
        }
        Err(e) => {
            eprintln!("[noteerr] clipboard copy failed ({e:#}), printing instead");
            println!("{content}");
        }
    }
}

pub fn cmd_copy(
    store: &EntryStore,
    what: &str,
    specifier: Option<&str>,
    format: CopyFormat,
    stdout: bool,
) -> anyhow::Result<i32> {
    let target = match parse_target(what, specifier) {
        Ok(t) => t,
        Err(msg) => {
            eprintln!("[noteerr] {msg}");
            return Ok(1);
        }
    };

    let entry = match target {
        CopyTarget::Latest => store.get_all_entries()?.pop(),
        CopyTarget::Id(id) => store.get_entry_by_id(id)?,
    };
    let Some(entry) = entry else {
        match target {
            CopyTarget::Latest => eprintln!("[noteerr] no errors logged yet"),
            CopyTarget::Id(id) => eprintln!("[noteerr] error #{id} not found"),
        }
        return Ok(1);
    };

    let content = render(&entry, format)?;
    if stdout {
        println!("{content}");
        return Ok(0);
    }
    deliver(copy_to_clipboard(&content), entry.id, &content);
    Ok(0)
}
