use std::collections::BTreeSet;

use super::EntryStore;
use super::types::Statistics;
use crate::entry::ErrorEntry;

impl EntryStore {
    /// Case-insensitive substring search over command, error, notes and tags.
    ///
    /// Results keep store order; callers reverse for most-recent-first.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read.
    pub fn search_entries(&self, query: &str) -> anyhow::Result<Vec<ErrorEntry>> {
        let needle = query.to_lowercase();
        Ok(self
            .get_all_entries()?
            .into_iter()
            .filter(|e| matches_query(e, &needle))
            .collect())
    }

    /// Entries whose project equals `project`, ignoring case.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read.
    pub fn get_entries_by_project(&self, project: &str) -> anyhow::Result<Vec<ErrorEntry>> {
        let wanted = project.to_lowercase();
        Ok(self
            .get_all_entries()?
            .into_iter()
            .filter(|e| e.project.to_lowercase() == wanted)
            .collect())
    }

    /// Entries carrying exactly `tag`.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read.
    pub fn get_entries_by_tag(&self, tag: &str) -> anyhow::Result<Vec<ErrorEntry>> {
        Ok(self
            .get_all_entries()?
            .into_iter()
            .filter(|e| e.tags.iter().any(|t| t == tag))
            .collect())
    }

    /// Distinct non-empty project names, sorted.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read.
    pub fn get_all_projects(&self) -> anyhow::Result<Vec<String>> {
        let projects: BTreeSet<String> = self
            .get_all_entries()?
            .into_iter()
            .map(|e| e.project)
            .filter(|p| !p.is_empty())
            .collect();
        Ok(projects.into_iter().collect())
    }

    /// # Errors
    /// Returns an error if the store cannot be read.
    pub fn get_statistics(&self) -> anyhow::Result<Statistics> {
        Ok(Statistics::from_entries(&self.get_all_entries()?))
    }
}

fn matches_query(entry: &ErrorEntry, needle: &str) -> bool {
    entry.command.to_lowercase().contains(needle)
        || entry.error.to_lowercase().contains(needle)
        || entry.notes.to_lowercase().contains(needle)
        || entry.tags.iter().any(|t| t.to_lowercase().contains(needle))
}
