#![deny(missing_docs)]
//! Core of a classic two-pane file manager, without any UI.
//!
//! - Directory listing order: `.` and `..` first, then directories, links and
//!   files, by name, extension, size, time or name length.
//! - Mark sets with range toggling, mark-all and regex marking.
//! - Archive rule registry producing pack/unpack shell commands.
//! - `%` command templates (`%C`, `%M`, `%T`, ...) expanded with POSIX quoting.
//! - [`Listing`]: per-view state tying these together, driven by
//!   [`ListingEvent`]s, with an optional change hook for hosts.
//!
//! The crate never executes commands and only touches the disk through the
//! [`FileSystem`] trait. With the default `tracing` feature, operations emit
//! `tracing` events (`event = "sort.applied"`, `"archive.resolved"`, ...);
//! install a subscriber in the host to see them.

mod archive;
mod config;
mod core;
mod entry;
mod fs;
mod history;
mod listing;
mod marks;
pub mod shell;
mod sort;
mod template;

pub use archive::{ArchiveRegistry, ArchiveRule, ArchiveRuleSpec, builtin_rule_specs};
pub use config::CommanderConfig;
pub use core::{CommanderError, ParseSortError, SortConfig, SortDirection, SortKey};
pub use entry::{Entry, EntryFacts, EntryKind, LinkTarget, PARENT_NAME, SELF_NAME, classify};
pub use fs::{FileSystem, FsEntry, FsMetadata, StdFileSystem, read_listing};
pub use history::{DEFAULT_HISTORY_CAPACITY, DirHistory};
pub use listing::{Listing, ListingChange, ListingEvent};
pub use marks::{MarkSet, name_pattern, narrow_to_pattern};
pub use sort::{compare_entries, sort_entries, sort_entries_in_place};
pub use template::{CommandTemplate, ExpandContext, Macro, expand};
