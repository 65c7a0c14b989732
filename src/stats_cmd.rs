use noteerr::entry::ErrorEntry;
use noteerr::store::{EntryStore, Statistics};
use noteerr::text::truncate;

use crate::output::print_json;

pub fn cmd_stats(store: &EntryStore, tag: Option<&str>, json: bool) -> anyhow::Result<i32> {
    let entries = match tag {
        Some(tag) => store.get_entries_by_tag(tag)?,
        None => store.get_all_entries()?,
    };
    let stats = Statistics::from_entries(&entries);

    if json {
        print_json(&stats);
        return Ok(0);
    }

    if stats.total_count == 0 {
        match tag {
            Some(tag) => eprintln!("[noteerr] no errors found with tag '{tag}'"),
            None => eprintln!("[noteerr] no errors logged yet"),
        }
        return Ok(0);
    }

    match tag {
        Some(tag) => println!("Error statistics for tag '{tag}'\n"),
        None => println!("Error statistics\n"),
    }
    println!("{:<22}{}", "Total errors logged", stats.total_count);
    if let Some(common) = &stats.most_common_command {
        println!(
            "{:<22}{} ({} times)",
            "Most common command", common.command, common.count
        );
    }
    if let Some(recent) = &stats.most_recent {
        println!(
            "{:<22}#{} - {} ({})",
            "Most recent error",
            recent.id,
            truncate(&recent.command, 40),
            recent.short_date()
        );
    }

    if !stats.tag_counts.is_empty() {
        let mut tags = stats.tag_counts.clone();
        // Stable sort: equal counts keep first-seen order.
        tags.sort_by(|a, b| b.1.cmp(&a.1));
        println!("\nTags:");
        for (tag, count) in tags {
            println!("  {tag}: {count}");
        }
    }
    Ok(0)
}

pub fn cmd_projects(store: &EntryStore) -> anyhow::Result<i32> {
    let projects = store.get_all_projects()?;
    if projects.is_empty() {
        eprintln!("[noteerr] no projects found, add --project when saving errors");
        return Ok(0);
    }

    let width = projects.iter().map(String::len).max().unwrap_or(7).max(7);
    println!("{:<width$}  {:>6}  LATEST ERROR", "PROJECT", "ERRORS");
    println!("{:-<width$}  {:->6}  {:-<12}", "", "", "");
    for project in &projects {
        let entries = store.get_entries_by_project(project)?;
        let latest = entries.last().map_or_else(|| "-".to_owned(), ErrorEntry::short_date);
        println!("{project:<width$}  {:>6}  {latest}", entries.len());
    }
    Ok(0)
}
