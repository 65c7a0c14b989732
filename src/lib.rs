pub mod config;
pub mod entry;
pub mod paths;
pub mod runner;
pub mod shell;
pub mod similarity;
pub mod store;
pub mod text;

pub use entry::{CandidateEntry, Comparable, ErrorEntry, NewEntry};
pub use store::{CommandCount, EntryStore, Statistics};
