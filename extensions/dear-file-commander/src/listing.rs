use std::path::{Path, PathBuf};

use regex::Regex;

use crate::archive::ArchiveRegistry;
use crate::config::CommanderConfig;
use crate::core::{CommanderError, SortConfig, SortKey};
use crate::entry::{Entry, EntryKind};
use crate::fs::{FileSystem, read_listing};
use crate::history::DirHistory;
use crate::marks::MarkSet;
use crate::sort::sort_entries_in_place;
use crate::template::{CommandTemplate, ExpandContext};

/// Input event for driving a listing without UI coupling.
#[derive(Clone, Debug)]
pub enum ListingEvent {
    /// Move the cursor to an index (clamped).
    SetCursor(usize),
    /// Flip the mark under the cursor and advance the cursor.
    ToggleMarkAtCursor,
    /// Flip the mark at an index.
    ToggleMark(usize),
    /// Fill-then-clear toggle of `from..to`.
    ToggleRange {
        /// First index.
        from: usize,
        /// One past the last index.
        to: usize,
    },
    /// Fill-then-clear toggle of the whole listing.
    ToggleAll,
    /// Clear all marks, or mark everything when nothing is marked.
    MarkOrUnmarkAll,
    /// Flip every mark.
    InvertMarks,
    /// Mark entries whose name matches.
    MarkMatching(Regex),
    /// Unmark entries whose name matches.
    UnmarkMatching(Regex),
    /// Replace the sort configuration.
    SetSort(SortConfig),
    /// Sort by a key; the active key flips direction.
    SortBy(SortKey),
    /// Flip the sort direction.
    ReverseSort,
    /// Advance to the next sort key, keeping the direction.
    CycleSortKey,
}

/// Notification passed to the change hook.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListingChange {
    /// Entries were re-ordered.
    Sorted(SortConfig),
    /// The mark set changed.
    MarksChanged {
        /// Number of marks afterwards.
        marked: usize,
    },
    /// A new directory was loaded; marks were reset.
    DirectoryChanged(PathBuf),
}

type ChangeHookFn = dyn FnMut(&ListingChange) + 'static;

struct ChangeHook {
    inner: Box<ChangeHookFn>,
}

impl std::fmt::Debug for ChangeHook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeHook").finish_non_exhaustive()
    }
}

/// State of one listing view: directory, ordered entries, sort configuration,
/// marks, cursor and history.
///
/// Hosts own one `Listing` per view and feed it entries from their
/// filesystem collaborator. Marks belong to the directory and are reset
/// whenever another directory is loaded.
#[derive(Debug)]
pub struct Listing {
    cwd: PathBuf,
    entries: Vec<Entry>,
    sort: SortConfig,
    marks: MarkSet,
    cursor: usize,
    history: DirHistory,
    mark_all_includes_dirs: bool,
    archives: ArchiveRegistry,
    change_hook: Option<ChangeHook>,
}

impl Listing {
    /// Create an empty listing from configuration.
    pub fn new(config: &CommanderConfig) -> Result<Self, CommanderError> {
        Ok(Self {
            cwd: PathBuf::new(),
            entries: Vec::new(),
            sort: config.sort,
            marks: MarkSet::new(),
            cursor: 0,
            history: DirHistory::new(config.history_capacity),
            mark_all_includes_dirs: config.mark_all_includes_dirs,
            archives: config.archive_registry()?,
            change_hook: None,
        })
    }

    /// Current directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Entries in display order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Active sort configuration.
    pub fn sort_config(&self) -> SortConfig {
        self.sort
    }

    /// Current marks.
    pub fn marks(&self) -> &MarkSet {
        &self.marks
    }

    /// Cursor index.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Entry under the cursor.
    pub fn current_entry(&self) -> Option<&Entry> {
        self.entries.get(self.cursor)
    }

    /// Navigation history.
    pub fn history(&self) -> &DirHistory {
        &self.history
    }

    /// Archive rules used by pack/unpack commands.
    pub fn archives(&self) -> &ArchiveRegistry {
        &self.archives
    }

    /// Installs a hook notified after sorting, marking and directory changes.
    pub fn set_change_hook<F>(&mut self, hook: F)
    where
        F: FnMut(&ListingChange) + 'static,
    {
        self.change_hook = Some(ChangeHook {
            inner: Box::new(hook),
        });
    }

    /// Removes the change hook.
    pub fn clear_change_hook(&mut self) {
        self.change_hook = None;
    }

    fn notify(&mut self, change: ListingChange) {
        if let Some(hook) = self.change_hook.as_mut() {
            (hook.inner)(&change);
        }
    }

    /// Show `entries` as the contents of `dir`.
    ///
    /// Marks are reset and the directory is recorded in history. When moving
    /// to the parent directory the cursor lands on the directory just left.
    pub fn change_dir(&mut self, dir: impl Into<PathBuf>, entries: Vec<Entry>) {
        let dir = dir.into();
        self.history.visit(dir.clone());
        self.replace_dir(dir, entries);
    }

    fn replace_dir(&mut self, dir: PathBuf, entries: Vec<Entry>) {
        let came_from = (self.cwd.parent() == Some(dir.as_path()))
            .then(|| self.cwd.file_name().map(|n| n.to_string_lossy().to_string()))
            .flatten();
        self.cwd = dir;
        self.entries = entries;
        self.marks.clear();
        sort_entries_in_place(&mut self.entries, self.sort);
        self.cursor = came_from
            .and_then(|name| self.position_of(&name))
            .unwrap_or(0);
        trace_listing_chdir(&self.cwd, self.entries.len());
        self.notify(ListingChange::DirectoryChanged(self.cwd.clone()));
    }

    /// Read `dir` through `fs` and show it.
    pub fn load(&mut self, fs: &dyn FileSystem, dir: &Path) -> Result<(), CommanderError> {
        let entries = read_listing(fs, dir)?;
        self.change_dir(dir, entries);
        Ok(())
    }

    /// Open the entry at `index`: `..` goes to the parent, `.` reloads and
    /// directories (or links to them) are loaded. Returns `false` for files.
    pub fn enter(&mut self, fs: &dyn FileSystem, index: usize) -> Result<bool, CommanderError> {
        let Some(entry) = self.entries.get(index) else {
            return Ok(false);
        };
        let target = match entry.kind {
            EntryKind::SpecialSelf => {
                self.reload(fs)?;
                return Ok(true);
            }
            EntryKind::SpecialParent => match self.cwd.parent() {
                Some(parent) => parent.to_path_buf(),
                None => return Ok(false),
            },
            kind if kind.is_dir_like() => entry.path.clone(),
            _ => return Ok(false),
        };
        self.load(fs, &target)?;
        Ok(true)
    }

    /// Re-read the current directory, keeping marks that still exist and the
    /// cursor on the same name.
    pub fn reload(&mut self, fs: &dyn FileSystem) -> Result<(), CommanderError> {
        let entries = read_listing(fs, &self.cwd)?;
        self.refresh(entries);
        Ok(())
    }

    /// Replace the entries of the current directory, keeping surviving marks.
    pub fn refresh(&mut self, entries: Vec<Entry>) {
        let focused = self.current_entry().map(|e| e.name.clone());
        let before = self.marks.len();
        self.entries = entries;
        self.marks.retain_listed(&self.entries);
        sort_entries_in_place(&mut self.entries, self.sort);
        self.cursor = focused
            .and_then(|name| self.position_of(&name))
            .unwrap_or_else(|| self.cursor.min(self.entries.len().saturating_sub(1)));
        if self.marks.len() != before {
            self.notify_marks();
        }
    }

    /// Go back in history, reading the directory through `fs`. On error the
    /// view and its history are left unchanged.
    pub fn back(&mut self, fs: &dyn FileSystem) -> Result<bool, CommanderError> {
        let Some(dir) = self.history.back().map(Path::to_path_buf) else {
            return Ok(false);
        };
        match read_listing(fs, &dir) {
            Ok(entries) => {
                self.replace_dir(dir, entries);
                Ok(true)
            }
            Err(err) => {
                // Step back onto the directory still shown.
                self.history.forward();
                Err(err.into())
            }
        }
    }

    /// Go forward in history, reading the directory through `fs`. On error
    /// the view and its history are left unchanged.
    pub fn forward(&mut self, fs: &dyn FileSystem) -> Result<bool, CommanderError> {
        let Some(dir) = self.history.forward().map(Path::to_path_buf) else {
            return Ok(false);
        };
        match read_listing(fs, &dir) {
            Ok(entries) => {
                self.replace_dir(dir, entries);
                Ok(true)
            }
            Err(err) => {
                // Step back onto the directory still shown.
                self.history.back();
                Err(err.into())
            }
        }
    }

    fn position_of(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name)
    }

    /// Apply one event.
    pub fn handle_event(&mut self, event: ListingEvent) {
        match event {
            ListingEvent::SetCursor(index) => {
                self.cursor = index.min(self.entries.len().saturating_sub(1));
            }
            ListingEvent::ToggleMarkAtCursor => {
                let before = self.marks.len();
                self.marks.toggle_one(&self.entries, self.cursor);
                if self.cursor + 1 < self.entries.len() {
                    self.cursor += 1;
                }
                if self.marks.len() != before {
                    self.notify_marks();
                }
            }
            ListingEvent::ToggleMark(index) => {
                let before = self.marks.len();
                self.marks.toggle_one(&self.entries, index);
                if self.marks.len() != before {
                    self.notify_marks();
                }
            }
            ListingEvent::ToggleRange { from, to } => {
                self.marks.toggle_range(&self.entries, from, to);
                self.notify_marks();
            }
            ListingEvent::ToggleAll => {
                self.marks.toggle_all(&self.entries);
                self.notify_marks();
            }
            ListingEvent::MarkOrUnmarkAll => {
                self.marks
                    .mark_or_unmark_all(&self.entries, self.mark_all_includes_dirs);
                self.notify_marks();
            }
            ListingEvent::InvertMarks => {
                self.marks.invert(&self.entries);
                self.notify_marks();
            }
            ListingEvent::MarkMatching(pattern) => {
                if self.marks.mark_matching(&self.entries, &pattern) > 0 {
                    self.notify_marks();
                }
            }
            ListingEvent::UnmarkMatching(pattern) => {
                if self.marks.unmark_matching(&self.entries, &pattern) > 0 {
                    self.notify_marks();
                }
            }
            ListingEvent::SetSort(sort) => self.apply_sort(sort),
            ListingEvent::SortBy(key) => self.apply_sort(self.sort.toggle_key(key)),
            ListingEvent::ReverseSort => self.apply_sort(self.sort.reversed()),
            ListingEvent::CycleSortKey => {
                self.apply_sort(SortConfig::new(self.sort.key.next(), self.sort.direction))
            }
        }
    }

    fn notify_marks(&mut self) {
        trace_marks_changed(self.marks.len());
        let marked = self.marks.len();
        self.notify(ListingChange::MarksChanged { marked });
    }

    fn apply_sort(&mut self, sort: SortConfig) {
        let focused = self.current_entry().map(|e| e.name.clone());
        self.sort = sort;
        sort_entries_in_place(&mut self.entries, sort);
        if let Some(index) = focused.and_then(|name| self.position_of(&name)) {
            self.cursor = index;
        }
        self.notify(ListingChange::Sorted(sort));
    }

    /// Files a command operates on: the marked entries, or the entry under the
    /// cursor when nothing is marked.
    pub fn target_entries(&self) -> Vec<&Entry> {
        self.marks.marked_or_current(&self.entries, self.cursor)
    }

    /// Expand a command template against the cursor, the targets and the
    /// current directory.
    pub fn expand_command(&self, template: &str) -> Vec<String> {
        let targets: Vec<PathBuf> = self
            .target_entries()
            .into_iter()
            .map(|e| e.path.clone())
            .collect();
        let mut ctx = ExpandContext::new(&self.cwd).marked(&targets);
        if let Some(current) = self.current_entry() {
            ctx = ctx.current(&current.path);
        }
        CommandTemplate::parse(template).expand(&ctx)
    }

    /// Command packing the targets into `archive` (relative to the current
    /// directory or absolute).
    pub fn pack_command(&self, archive: &str) -> Result<String, CommanderError> {
        let targets = self.target_entries();
        let names: Vec<&str> = targets.iter().map(|e| e.name.as_str()).collect();
        self.archives.pack(archive, &names)
    }

    /// Command extracting the archive under the cursor into the current
    /// directory.
    pub fn unpack_command(&self) -> Result<String, CommanderError> {
        let entry = self
            .current_entry()
            .filter(|e| e.kind.is_file_like())
            .ok_or_else(|| {
                CommanderError::UnsupportedArchiveFormat("no archive under the cursor".into())
            })?;
        self.archives.unpack(&entry.name, &[])
    }
}

#[cfg(feature = "tracing")]
fn trace_listing_chdir(dir: &Path, entries: usize) {
    tracing::debug!(
        event = "listing.chdir",
        dir = %dir.display(),
        entries,
        "listing directory changed"
    );
}

#[cfg(not(feature = "tracing"))]
fn trace_listing_chdir(_dir: &Path, _entries: usize) {}

#[cfg(feature = "tracing")]
fn trace_marks_changed(marked: usize) {
    tracing::trace!(event = "marks.changed", marked, "marks changed");
}

#[cfg(not(feature = "tracing"))]
fn trace_marks_changed(_marked: usize) {}
