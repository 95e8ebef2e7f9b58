//! Multi-level listing comparator.
//!
//! Levels, first difference wins:
//! 1. `.` then `..` then everything else (never reversed).
//! 2. Type bucket: directories, links to directories, files and links to
//!    files, then dangling links and other kinds. Reversed when descending.
//! 3. The configured key. Reversed when descending.
//! 4. Case-sensitive name, always ascending.

use std::cmp::Ordering;

use crate::core::{SortConfig, SortKey};
use crate::entry::{Entry, EntryKind, LinkTarget};

fn special_rank(kind: EntryKind) -> u8 {
    match kind {
        EntryKind::SpecialSelf => 0,
        EntryKind::SpecialParent => 1,
        _ => 2,
    }
}

fn type_bucket(kind: EntryKind) -> u8 {
    match kind {
        EntryKind::Directory => 0,
        EntryKind::Symlink(LinkTarget::Directory) => 1,
        EntryKind::RegularFile | EntryKind::Symlink(LinkTarget::File) => 2,
        _ => 3,
    }
}

/// Name segments split on `.`, last segment first.
fn reversed_segments(name: &str) -> impl Iterator<Item = &str> {
    name.rsplit('.')
}

/// Length of the full path in characters.
fn path_chars(entry: &Entry) -> usize {
    entry.path.to_string_lossy().chars().count()
}

fn compare_key(a: &Entry, b: &Entry, key: SortKey) -> Ordering {
    match key {
        SortKey::Name => a.name.cmp(&b.name),
        SortKey::Extension => reversed_segments(&a.name).cmp(reversed_segments(&b.name)),
        // `None` orders before any value.
        SortKey::Time => a.modified.cmp(&b.modified),
        SortKey::Size => a.size.cmp(&b.size),
        SortKey::Length => path_chars(a).cmp(&path_chars(b)),
    }
}

/// Compare two entries under `config`.
pub fn compare_entries(a: &Entry, b: &Entry, config: SortConfig) -> Ordering {
    special_rank(a.kind)
        .cmp(&special_rank(b.kind))
        .then_with(|| {
            config
                .direction
                .apply(type_bucket(a.kind).cmp(&type_bucket(b.kind)))
        })
        .then_with(|| config.direction.apply(compare_key(a, b, config.key)))
        .then_with(|| a.name.cmp(&b.name))
}

/// Sort entries in place (stable).
pub fn sort_entries_in_place(entries: &mut [Entry], config: SortConfig) {
    entries.sort_by(|a, b| compare_entries(a, b, config));
    trace_sort_applied(config, entries.len());
}

/// Sort entries and return them.
pub fn sort_entries(mut entries: Vec<Entry>, config: SortConfig) -> Vec<Entry> {
    sort_entries_in_place(&mut entries, config);
    entries
}

#[cfg(feature = "tracing")]
fn trace_sort_applied(config: SortConfig, entries: usize) {
    tracing::trace!(
        event = "sort.applied",
        key = config.key.as_str(),
        direction = config.direction.as_str(),
        entries,
        "listing sorted"
    );
}

#[cfg(not(feature = "tracing"))]
fn trace_sort_applied(_config: SortConfig, _entries: usize) {}
