use noteerr::entry::ErrorEntry;
use noteerr::store::EntryStore;
use noteerr::text::format_tags;

use crate::output::{print_entry_table, print_json};

pub struct ListOptions {
    pub limit: usize,
    pub tag: Option<String>,
    pub project: Option<String>,
    pub all: bool,
    pub json: bool,
}

pub fn cmd_list(store: &EntryStore, opts: &ListOptions) -> anyhow::Result<i32> {
    let mut entries = match &opts.project {
        Some(project) => {
            let entries = store.get_entries_by_project(project)?;
            if entries.is_empty() && !opts.json {
                eprintln!("[noteerr] no errors found for project '{project}'");
                return Ok(0);
            }
            entries
        }
        None => store.get_all_entries()?,
    };
    if let Some(tag) = &opts.tag {
        entries.retain(|e| e.tags.iter().any(|t| t == tag));
    }

    if entries.is_empty() {
        if opts.json {
            print_json(&entries);
        } else {
            eprintln!("[noteerr] no errors logged yet");
        }
        return Ok(0);
    }

    entries.reverse();
    let total = entries.len();
    if !opts.all {
        entries.truncate(opts.limit);
    }

    if opts.json {
        print_json(&entries);
        return Ok(0);
    }

    if let Some(project) = &opts.project {
        println!("Recent errors - project: {project}\n");
    }
    print_entry_table(&entries);
    if !opts.all && total > entries.len() {
        eprintln!(
            "\n[noteerr] showing {} most recent of {total} entries, use --all to see everything",
            entries.len()
        );
    }
    Ok(0)
}

pub fn cmd_search(store: &EntryStore, query: &str, limit: usize, json: bool) -> anyhow::Result<i32> {
    let mut entries = store.search_entries(query)?;
    entries.reverse();
    entries.truncate(limit);

    if json {
        print_json(&entries);
        return Ok(0);
    }

    if entries.is_empty() {
        eprintln!("[noteerr] no errors found matching '{query}'");
        return Ok(0);
    }

    eprintln!("[noteerr] found {} error(s) matching '{query}'", entries.len());
    print_entry_table(&entries);
    Ok(0)
}

pub fn cmd_show(store: &EntryStore, id: u64, json: bool) -> anyhow::Result<i32> {
    let Some(entry) = store.get_entry_by_id(id)? else {
        eprintln!("[noteerr] error #{id} not found");
        return Ok(1);
    };

    if json {
        print_json(&entry);
        return Ok(0);
    }

    print_details(&entry);
    eprintln!("\n[noteerr] tip: use 'noteerr copy {id}' to copy this error to the clipboard");
    Ok(0)
}

fn print_details(entry: &ErrorEntry) {
    println!("Error #{}", entry.id);
    println!("Command: {}", entry.command);
    println!("Exit Code: {}", entry.exit_code);
    println!("Directory: {}", entry.directory);
    println!("Timestamp: {}", entry.formatted_timestamp());
    if !entry.project.is_empty() {
        println!("Project: {}", entry.project);
    }
    if !entry.tags.is_empty() {
        println!("Tags: {}", format_tags(&entry.tags));
    }
    if !entry.notes.is_empty() {
        println!("Notes: {}", entry.notes);
    }
    println!("\n--- Error Output ---");
    println!("{}", entry.error);
}
