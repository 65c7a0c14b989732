use serde::Serialize;

use crate::entry::ErrorEntry;

/// Bucket name used when a command has no first word.
const UNKNOWN_COMMAND: &str = "unknown";

/// The most frequent program name and how often it failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandCount {
    pub command: String,
    pub count: usize,
}

/// Aggregate view over a set of entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub total_count: usize,
    pub most_common_command: Option<CommandCount>,
    pub most_recent: Option<ErrorEntry>,
    /// Tag occurrence counts, in order of first appearance.
    pub tag_counts: Vec<(String, usize)>,
}

impl Statistics {
    /// Compute statistics over `entries`, which must be in creation order.
    ///
    /// Commands are bucketed by their first whitespace-delimited word. When two
    /// buckets share the highest count, the one seen first wins.
    pub fn from_entries(entries: &[ErrorEntry]) -> Self {
        let mut command_counts: Vec<(String, usize)> = Vec::new();
        let mut tag_counts: Vec<(String, usize)> = Vec::new();

        for entry in entries {
            let program = entry
                .command
                .split_whitespace()
                .next()
                .unwrap_or(UNKNOWN_COMMAND);
            bump(&mut command_counts, program);
            for tag in &entry.tags {
                bump(&mut tag_counts, tag);
            }
        }

        // Strict `>` keeps the earliest bucket on ties.
        let mut best: Option<&(String, usize)> = None;
        for bucket in &command_counts {
            if best.is_none_or(|b| bucket.1 > b.1) {
                best = Some(bucket);
            }
        }

        Self {
            total_count: entries.len(),
            most_common_command: best.map(|(command, count)| CommandCount {
                command: command.clone(),
                count: *count,
            }),
            most_recent: entries.last().cloned(),
            tag_counts,
        }
    }
}

fn bump(counts: &mut Vec<(String, usize)>, key: &str) {
    if let Some(slot) = counts.iter_mut().find(|(k, _)| k == key) {
        slot.1 += 1;
    } else {
        counts.push((key.to_owned(), 1));
    }
}
