use noteerr::store::EntryStore;
use noteerr::text::{format_tags, parse_tags};

use crate::output;

pub fn cmd_annotate(
    store: &EntryStore,
    id: u64,
    notes: &str,
    tags: Option<&str>,
) -> anyhow::Result<i32> {
    let tags = tags.map(parse_tags);
    if !store.update_entry(id, Some(notes), tags.as_deref())? {
        eprintln!("[noteerr] error #{id} not found");
        return Ok(1);
    }

    println!("\u{2713} Updated error #{id}");
    println!("  Notes: {notes}");
    if let Some(tags) = &tags {
        println!("  Tags: {}", format_tags(tags));
    }
    Ok(0)
}

pub fn cmd_delete(store: &EntryStore, id: u64, yes: bool) -> anyhow::Result<i32> {
    if !yes && !output::confirm(&format!("Delete error #{id}?"), false)? {
        eprintln!("[noteerr] not deleted (pass --yes to skip confirmation)");
        return Ok(1);
    }
    if !store.delete_entry(id)? {
        eprintln!("[noteerr] error #{id} not found");
        return Ok(1);
    }
    println!("\u{2713} Deleted error #{id}");
    Ok(0)
}

pub fn cmd_clear(store: &EntryStore, yes: bool) -> anyhow::Result<i32> {
    if !yes && !output::confirm("Delete ALL errors?", false)? {
        eprintln!("[noteerr] nothing deleted (pass --yes to skip confirmation)");
        return Ok(1);
    }
    let count = store.clear_all()?;
    println!("\u{2713} Deleted {count} error(s)");
    Ok(0)
}
