//! Flat-file JSON store of error entries.
//!
//! The whole document is read, mutated in memory and written back on every
//! operation. A missing or malformed file reads as the empty document.

mod queries;
mod types;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::entry::{ErrorEntry, NewEntry, now_timestamp};

pub use types::{CommandCount, Statistics};

/// First id handed out by an empty store.
const FIRST_ID: u64 = 1;

const fn first_id() -> u64 {
    FIRST_ID
}

/// On-disk layout: `{"entries": [...], "next_id": N}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Document {
    #[serde(default)]
    pub entries: Vec<ErrorEntry>,
    #[serde(default = "first_id")]
    pub next_id: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_id: FIRST_ID,
        }
    }
}

/// Handle to the backing JSON file. Construct once and pass by reference.
#[derive(Debug, Clone)]
pub struct EntryStore {
    path: PathBuf,
}

impl EntryStore {
    /// Open (or create) the store at `path`.
    ///
    /// Creates the parent directory if needed and writes an empty document
    /// when the file does not exist yet.
    ///
    /// # Errors
    /// Returns an error if the directory or initial file cannot be created.
    pub fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create data dir {}", parent.display()))?;
        }
        let store = Self { path };
        if !store.path.exists() {
            store.write_document(&Document::default())?;
        }
        Ok(store)
    }

    /// Open the store at the resolved default location.
    ///
    /// # Errors
    /// Returns an error if no location can be determined or the file cannot be created.
    pub fn open_default(config: &crate::config::Config) -> anyhow::Result<Self> {
        let path = crate::paths::data_file(config)
            .ok_or_else(|| anyhow::anyhow!("cannot determine noteerr data file path"))?;
        Self::open(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn read_document(&self) -> anyhow::Result<Document> {
        let bytes = match std::fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Document::default()),
            Err(e) => {
                return Err(e).with_context(|| format!("read {}", self.path.display()));
            }
        };
        match serde_json::from_slice::<Document>(&bytes) {
            Ok(doc) => Ok(doc),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "malformed entry store, treating as empty"
                );
                Ok(Document::default())
            }
        }
    }

    /// Write the whole document: temp file in the same directory, then rename.
    pub(crate) fn write_document(&self, doc: &Document) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(doc).context("serialize entry store")?;
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, json)
            .with_context(|| format!("write {}", tmp_path.display()))?;
        std::fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("replace {}", self.path.display()))?;
        tracing::debug!(
            path = %self.path.display(),
            entries = doc.entries.len(),
            next_id = doc.next_id,
            "entry store written"
        );
        Ok(())
    }

    /// Append a new entry, assigning the next id and the current timestamp.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read or written.
    pub fn add_entry(&self, new: NewEntry) -> anyhow::Result<ErrorEntry> {
        let mut doc = self.read_document()?;
        // A hand-edited next_id must never hand out an id that is already taken.
        let max_id = doc.entries.iter().map(|e| e.id).max().unwrap_or(0);
        let id = doc.next_id.max(max_id + 1);
        let entry = ErrorEntry::from_new(id, now_timestamp(), new);
        doc.entries.push(entry.clone());
        doc.next_id = id + 1;
        self.write_document(&doc)?;
        Ok(entry)
    }

    /// All entries in creation order.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read.
    pub fn get_all_entries(&self) -> anyhow::Result<Vec<ErrorEntry>> {
        Ok(self.read_document()?.entries)
    }

    /// # Errors
    /// Returns an error if the store cannot be read.
    pub fn get_entry_by_id(&self, id: u64) -> anyhow::Result<Option<ErrorEntry>> {
        Ok(self
            .read_document()?
            .entries
            .into_iter()
            .find(|e| e.id == id))
    }

    /// Replace notes and/or tags. Returns `false` when `id` is not in the store.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read or written.
    pub fn update_entry(
        &self,
        id: u64,
        notes: Option<&str>,
        tags: Option<&[String]>,
    ) -> anyhow::Result<bool> {
        let mut doc = self.read_document()?;
        let Some(entry) = doc.entries.iter_mut().find(|e| e.id == id) else {
            return Ok(false);
        };
        if let Some(notes) = notes {
            notes.clone_into(&mut entry.notes);
        }
        if let Some(tags) = tags {
            entry.tags = tags.to_vec();
        }
        self.write_document(&doc)?;
        Ok(true)
    }

    /// Remove one entry. Returns `false` when `id` is not in the store.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read or written.
    pub fn delete_entry(&self, id: u64) -> anyhow::Result<bool> {
        let mut doc = self.read_document()?;
        let before = doc.entries.len();
        doc.entries.retain(|e| e.id != id);
        if doc.entries.len() == before {
            return Ok(false);
        }
        self.write_document(&doc)?;
        Ok(true)
    }

    /// Remove every entry and reset the id counter. Returns the number removed.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read or written.
    pub fn clear_all(&self) -> anyhow::Result<usize> {
        let count = self.read_document()?.entries.len();
        self.write_document(&Document::default())?;
        Ok(count)
    }
}


#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests_query;
