use std::collections::VecDeque;
use std::path::{Path, PathBuf};

/// Default number of remembered directories.
pub const DEFAULT_HISTORY_CAPACITY: usize = 64;

/// Back/forward directory history of one listing view.
///
/// Kept in memory only. When full, the oldest directory is dropped.
#[derive(Clone, Debug)]
pub struct DirHistory {
    entries: VecDeque<PathBuf>,
    cursor: usize,
    capacity: usize,
}

impl Default for DirHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl DirHistory {
    /// Create an empty history holding at most `capacity` directories
    /// (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            cursor: 0,
            capacity: capacity.max(1),
        }
    }

    /// Number of remembered directories.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been visited.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Directory at the cursor.
    pub fn current(&self) -> Option<&Path> {
        self.entries.get(self.cursor).map(PathBuf::as_path)
    }

    /// Record a visit. Forward history is discarded; revisiting the current
    /// directory is a no-op. Returns whether anything was recorded.
    pub fn visit(&mut self, dir: impl Into<PathBuf>) -> bool {
        let dir = dir.into();
        if self.current() == Some(dir.as_path()) {
            return false;
        }
        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
        }
        self.entries.push_back(dir);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        self.cursor = self.entries.len() - 1;
        true
    }

    /// Whether [`Self::back`] would move.
    pub fn can_back(&self) -> bool {
        self.cursor > 0
    }

    /// Whether [`Self::forward`] would move.
    pub fn can_forward(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Step back and return the new current directory.
    pub fn back(&mut self) -> Option<&Path> {
        if !self.can_back() {
            return None;
        }
        self.cursor -= 1;
        self.current()
    }

    /// Step forward and return the new current directory.
    pub fn forward(&mut self) -> Option<&Path> {
        if !self.can_forward() {
            return None;
        }
        self.cursor += 1;
        self.current()
    }

    /// Distinct directories, most recently recorded first.
    pub fn recent(&self) -> Vec<&Path> {
        let mut out: Vec<&Path> = Vec::new();
        for dir in self.entries.iter().rev() {
            if !out.contains(&dir.as_path()) {
                out.push(dir);
            }
        }
        out
    }
}
