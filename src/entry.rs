//! Error entry model shared by the store, the similarity engine and the CLI.

use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// Timestamp layout written for new entries: local time, microsecond precision, no offset.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// A recorded failed command with its error context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    pub id: u64,
    pub timestamp: String,
    pub command: String,
    pub error: String,
    pub exit_code: i32,
    pub directory: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub notes: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub project: String,
}

/// Fields supplied by the caller when adding an entry. The store assigns `id` and `timestamp`.
#[derive(Debug, Clone, Default)]
pub struct NewEntry {
    pub command: String,
    pub error: String,
    pub exit_code: i32,
    pub directory: String,
    pub notes: String,
    pub tags: Vec<String>,
    pub project: String,
}

impl NewEntry {
    pub fn new(
        command: impl Into<String>,
        error: impl Into<String>,
        exit_code: i32,
        directory: impl Into<String>,
    ) -> Self {
        Self {
            command: command.into(),
            error: error.into(),
            exit_code,
            directory: directory.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    #[must_use]
    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    #[must_use]
    pub fn project(mut self, project: impl Into<String>) -> Self {
        self.project = project.into();
        self
    }
}

/// A not-yet-saved `(command, error)` pair checked for duplicates before saving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateEntry {
    pub command: String,
    pub error: String,
}

impl CandidateEntry {
    pub fn new(command: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            error: error.into(),
        }
    }
}

/// The fields the similarity engine compares.
pub trait Comparable {
    fn command(&self) -> &str;
    fn error(&self) -> &str;
}

impl Comparable for ErrorEntry {
    fn command(&self) -> &str {
        &self.command
    }

    fn error(&self) -> &str {
        &self.error
    }
}

impl Comparable for CandidateEntry {
    fn command(&self) -> &str {
        &self.command
    }

    fn error(&self) -> &str {
        &self.error
    }
}

impl ErrorEntry {
    /// Build a stored entry from caller-supplied fields.
    pub(crate) fn from_new(id: u64, timestamp: String, new: NewEntry) -> Self {
        Self {
            id,
            timestamp,
            command: new.command,
            error: new.error,
            exit_code: new.exit_code,
            directory: new.directory,
            notes: new.notes,
            tags: new.tags,
            project: new.project,
        }
    }

    /// `YYYY-MM-DD HH:MM:SS`, or the raw timestamp when it cannot be parsed.
    pub fn formatted_timestamp(&self) -> String {
        parse_timestamp(&self.timestamp).map_or_else(
            || self.timestamp.clone(),
            |dt| dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        )
    }

    /// `YYYY-MM-DD`, or the first ten characters of the raw timestamp.
    pub fn short_date(&self) -> String {
        parse_timestamp(&self.timestamp).map_or_else(
            || self.timestamp.chars().take(10).collect(),
            |dt| dt.format("%Y-%m-%d").to_string(),
        )
    }
}

/// Current local time in the layout used for stored entries.
pub fn now_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

fn parse_timestamp(ts: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(ts)
                .ok()
                .map(|dt| dt.naive_local())
        })
}

/// Treat an explicit JSON `null` the same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
