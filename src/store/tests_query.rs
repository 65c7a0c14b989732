use super::*;
use tempfile::TempDir;

fn temp_store() -> (TempDir, EntryStore) {
    let dir = TempDir::new().expect("tempdir");
    let store = EntryStore::open(dir.path().join("errors.json")).expect("open store");
    (dir, store)
}

fn add_full(store: &EntryStore, cmd: &str, err: &str, notes: &str, tags: &[&str], project: &str) {
    store
        .add_entry(
            NewEntry::new(cmd, err, 1, "/work")
                .notes(notes)
                .tags(tags.iter().map(|t| (*t).to_owned()).collect())
                .project(project),
        )
        .expect("add entry");
}

fn ids(entries: &[ErrorEntry]) -> Vec<u64> {
    entries.iter().map(|e| e.id).collect()
}

// --- search_entries ---

#[test]
fn search_matches_command_case_insensitively() {
    let (_dir, store) = temp_store();
    add_full(&store, "NPM install", "boom", "", &[], "");
    add_full(&store, "cargo build", "boom", "", &[], "");
    assert_eq!(ids(&store.search_entries("npm").expect("search")), vec![1]);
}

#[test]
fn search_matches_error_and_notes() {
    let (_dir, store) = temp_store();
    add_full(&store, "a", "Permission Denied", "", &[], "");
    add_full(&store, "b", "x", "fixed with chmod", &[], "");
    add_full(&store, "c", "y", "", &[], "");
    assert_eq!(ids(&store.search_entries("permission").expect("search")), vec![1]);
    assert_eq!(ids(&store.search_entries("CHMOD").expect("search")), vec![2]);
}

#[test]
fn search_matches_tag_even_when_command_and_error_do_not() {
    let (_dir, store) = temp_store();
    add_full(&store, "yarn add", "network timeout", "", &["npm"], "");
    add_full(&store, "yarn add", "network timeout", "", &["yarn"], "");
    assert_eq!(ids(&store.search_entries("npm").expect("search")), vec![1]);
}

#[test]
fn search_matches_tag_substring() {
    let (_dir, store) = temp_store();
    add_full(&store, "x", "y", "", &["Docker-Compose"], "");
    assert_eq!(ids(&store.search_entries("docker").expect("search")), vec![1]);
}

#[test]
fn search_preserves_store_order() {
    let (_dir, store) = temp_store();
    add_full(&store, "git push", "a", "", &[], "");
    add_full(&store, "ls", "b", "", &[], "");
    add_full(&store, "git pull", "c", "", &[], "");
    assert_eq!(ids(&store.search_entries("git").expect("search")), vec![1, 3]);
}

#[test]
fn search_with_no_match_is_empty() {
    let (_dir, store) = temp_store();
    add_full(&store, "ls", "x", "", &[], "");
    assert!(store.search_entries("kubectl").expect("search").is_empty());
}

// --- get_entries_by_project / get_entries_by_tag ---

#[test]
fn project_filter_is_case_insensitive_exact() {
    let (_dir, store) = temp_store();
    add_full(&store, "a", "x", "", &[], "MyApp");
    add_full(&store, "b", "x", "", &[], "myapp");
    add_full(&store, "c", "x", "", &[], "MyApp2");
    add_full(&store, "d", "x", "", &[], "");
    assert_eq!(ids(&store.get_entries_by_project("MYAPP").expect("by project")), vec![1, 2]);
}

#[test]
fn tag_filter_requires_exact_tag() {
    let (_dir, store) = temp_store();
    add_full(&store, "a", "x", "", &["git"], "");
    add_full(&store, "b", "x", "", &["github"], "");
    add_full(&store, "c", "x", "", &["Git"], "");
    assert_eq!(ids(&store.get_entries_by_tag("git").expect("by tag")), vec![1]);
}

// --- get_all_projects ---

#[test]
fn projects_are_deduplicated_sorted_and_skip_empty() {
    let (_dir, store) = temp_store();
    add_full(&store, "a", "x", "", &[], "zeta");
    add_full(&store, "b", "x", "", &[], "");
    add_full(&store, "c", "x", "", &[], "alpha");
    add_full(&store, "d", "x", "", &[], "zeta");
    add_full(&store, "e", "x", "", &[], "mid");
    assert_eq!(
        store.get_all_projects().expect("projects"),
        vec!["alpha", "mid", "zeta"]
    );
}

#[test]
fn projects_on_empty_store_is_empty() {
    let (_dir, store) = temp_store();
    assert!(store.get_all_projects().expect("projects").is_empty());
}

// --- get_statistics ---

#[test]
fn statistics_on_empty_store() {
    let (_dir, store) = temp_store();
    let stats = store.get_statistics().expect("stats");
    assert_eq!(stats.total_count, 0);
    assert!(stats.most_common_command.is_none());
    assert!(stats.most_recent.is_none());
    assert!(stats.tag_counts.is_empty());
}

#[test]
fn statistics_bucket_by_first_word() {
    let (_dir, store) = temp_store();
    add_full(&store, "git push", "x", "", &["git"], "");
    add_full(&store, "npm test", "x", "", &["npm", "ci"], "");
    add_full(&store, "git pull --rebase", "x", "", &["git"], "");
    add_full(&store, "  git   status", "x", "", &[], "");

    let stats = store.get_statistics().expect("stats");
    assert_eq!(stats.total_count, 4);
    assert_eq!(
        stats.most_common_command,
        Some(CommandCount {
            command: "git".to_owned(),
            count: 3
        })
    );
    assert_eq!(stats.most_recent.map(|e| e.id), Some(4));
    assert_eq!(
        stats.tag_counts,
        vec![
            ("git".to_owned(), 2),
            ("npm".to_owned(), 1),
            ("ci".to_owned(), 1)
        ]
    );
}

#[test]
fn statistics_tie_goes_to_first_inserted() {
    let (_dir, store) = temp_store();
    add_full(&store, "npm install", "x", "", &[], "");
    add_full(&store, "git push", "x", "", &[], "");
    add_full(&store, "git pull", "x", "", &[], "");
    add_full(&store, "npm test", "x", "", &[], "");

    let stats = store.get_statistics().expect("stats");
    assert_eq!(
        stats.most_common_command,
        Some(CommandCount {
            command: "npm".to_owned(),
            count: 2
        })
    );
}

#[test]
fn statistics_empty_command_counts_as_unknown() {
    let (_dir, store) = temp_store();
    add_full(&store, "   ", "x", "", &[], "");
    let stats = store.get_statistics().expect("stats");
    assert_eq!(
        stats.most_common_command.map(|c| c.command),
        Some("unknown".to_owned())
    );
}

#[test]
fn statistics_over_filtered_subset() {
    let (_dir, store) = temp_store();
    add_full(&store, "git push", "x", "", &["net"], "");
    add_full(&store, "curl example.com", "x", "", &["net"], "");
    add_full(&store, "ls", "x", "", &[], "");
    let subset = store.get_entries_by_tag("net").expect("by tag");
    let stats = Statistics::from_entries(&subset);
    assert_eq!(stats.total_count, 2);
    assert_eq!(stats.most_recent.map(|e| e.id), Some(2));
}
