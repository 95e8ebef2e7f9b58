use indexmap::IndexSet;
use regex::Regex;

use crate::core::CommanderError;
use crate::entry::Entry;

/// Marked entry names of one listing view.
///
/// Names are unique within a listing, so they identify entries. Marks keep the
/// order in which they were set. `.` and `..` are never markable.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MarkSet {
    names: IndexSet<String>,
}

impl MarkSet {
    /// Create an empty mark set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of marks.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether nothing is marked.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Marked names in mark order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Whether `entry` is marked.
    pub fn is_marked(&self, entry: &Entry) -> bool {
        !entry.is_special() && self.names.contains(&entry.name)
    }

    /// Drop every mark.
    pub fn clear(&mut self) {
        self.names.clear();
    }

    fn mark(&mut self, entry: &Entry) -> bool {
        !entry.is_special() && self.names.insert(entry.name.clone())
    }

    fn unmark(&mut self, entry: &Entry) -> bool {
        self.names.shift_remove(&entry.name)
    }

    /// Flip the mark of the entry at `index`. Specials and out-of-range
    /// indices are ignored.
    pub fn toggle_one(&mut self, entries: &[Entry], index: usize) {
        let Some(entry) = entries.get(index) else {
            return;
        };
        if entry.is_special() {
            return;
        }
        if !self.unmark(entry) {
            self.mark(entry);
        }
    }

    /// Toggle the half-open range `from..to`.
    ///
    /// If anything markable in the range is unmarked, the gaps are filled and
    /// existing marks stay. Only a fully marked range is cleared.
    pub fn toggle_range(&mut self, entries: &[Entry], from: usize, to: usize) {
        let to = to.min(entries.len());
        if from >= to {
            return;
        }
        let range = &entries[from..to];
        let any_unmarked = range
            .iter()
            .any(|e| !e.is_special() && !self.names.contains(&e.name));
        if any_unmarked {
            for e in range {
                self.mark(e);
            }
        } else {
            for e in range {
                self.unmark(e);
            }
        }
    }

    /// [`Self::toggle_range`] over the whole listing.
    pub fn toggle_all(&mut self, entries: &[Entry]) {
        self.toggle_range(entries, 0, entries.len());
    }

    /// Clear all marks if anything in the listing is marked; otherwise mark
    /// every non-special entry, skipping directories unless
    /// `include_directories` is set.
    pub fn mark_or_unmark_all(&mut self, entries: &[Entry], include_directories: bool) {
        if entries.iter().any(|e| self.is_marked(e)) {
            self.clear();
            return;
        }
        for e in entries {
            if !include_directories && e.kind.is_dir_like() {
                continue;
            }
            self.mark(e);
        }
    }

    /// Flip every non-special entry.
    pub fn invert(&mut self, entries: &[Entry]) {
        for e in entries {
            if !self.unmark(e) {
                self.mark(e);
            }
        }
    }

    /// Mark every non-special entry whose name matches `pattern`.
    ///
    /// Returns the number of newly marked entries.
    pub fn mark_matching(&mut self, entries: &[Entry], pattern: &Regex) -> usize {
        entries
            .iter()
            .filter(|e| pattern.is_match(&e.name))
            .filter(|e| self.mark(e))
            .count()
    }

    /// Unmark every entry whose name matches `pattern`.
    ///
    /// Returns the number of removed marks.
    pub fn unmark_matching(&mut self, entries: &[Entry], pattern: &Regex) -> usize {
        entries
            .iter()
            .filter(|e| pattern.is_match(&e.name))
            .filter(|e| self.unmark(e))
            .count()
    }

    /// Forget marks whose name is no longer in the listing.
    pub fn retain_listed(&mut self, entries: &[Entry]) {
        self.names
            .retain(|name| entries.iter().any(|e| !e.is_special() && e.name == *name));
    }

    /// Marked entries in listing order.
    pub fn narrow_to_marked<'a>(&self, entries: &'a [Entry]) -> Vec<&'a Entry> {
        entries.iter().filter(|e| self.is_marked(e)).collect()
    }

    /// Marked entries, or the entry at `cursor` when nothing in the listing is
    /// marked. Specials are never returned.
    pub fn marked_or_current<'a>(&self, entries: &'a [Entry], cursor: usize) -> Vec<&'a Entry> {
        let marked = self.narrow_to_marked(entries);
        if !marked.is_empty() {
            return marked;
        }
        entries
            .get(cursor)
            .filter(|e| !e.is_special())
            .into_iter()
            .collect()
    }
}

/// Non-special entries whose name matches `pattern`, in listing order.
pub fn narrow_to_pattern<'a>(entries: &'a [Entry], pattern: &Regex) -> Vec<&'a Entry> {
    entries
        .iter()
        .filter(|e| !e.is_special() && pattern.is_match(&e.name))
        .collect()
}

/// Compile a name pattern for the regex marking commands.
pub fn name_pattern(pattern: &str) -> Result<Regex, CommanderError> {
    Regex::new(pattern).map_err(|source| CommanderError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}
