//! Data models for FileShare Hub

mod file_record;
mod identity;

pub(crate) use file_record::file_extension;
pub use file_record::{FileRecord, StatsSnapshot};
pub use identity::{namespace_of, Identity};
