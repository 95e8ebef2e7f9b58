use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Name of the synthetic self entry.
pub const SELF_NAME: &str = ".";
/// Name of the synthetic parent entry.
pub const PARENT_NAME: &str = "..";

/// What a symbolic link resolved to when the listing was read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LinkTarget {
    /// Target is a directory.
    Directory,
    /// Target is a regular file.
    File,
    /// Target exists but is neither a directory nor a regular file.
    Other,
    /// Target does not exist.
    Dangling,
}

/// Classification of one listing entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// The synthetic `.` entry.
    SpecialSelf,
    /// The synthetic `..` entry.
    SpecialParent,
    /// A directory.
    Directory,
    /// A symbolic link, with the advisory classification of its target.
    Symlink(LinkTarget),
    /// A regular file.
    RegularFile,
    /// Anything else (fifo, socket, device).
    Other,
}

impl EntryKind {
    /// Whether this is `.` or `..`.
    pub fn is_special(self) -> bool {
        matches!(self, EntryKind::SpecialSelf | EntryKind::SpecialParent)
    }

    /// Directories and links that resolve to one.
    pub fn is_dir_like(self) -> bool {
        matches!(
            self,
            EntryKind::Directory | EntryKind::Symlink(LinkTarget::Directory)
        )
    }

    /// Regular files and links that resolve to one.
    pub fn is_file_like(self) -> bool {
        matches!(
            self,
            EntryKind::RegularFile | EntryKind::Symlink(LinkTarget::File)
        )
    }
}

/// Raw facts reported by the filesystem collaborator for one entry.
///
/// `is_dir`/`is_file`/`is_symlink` describe the entry itself (no link
/// following); `target` describes what a link resolves to and is ignored for
/// non-links.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EntryFacts {
    /// Entry itself is a directory.
    pub is_dir: bool,
    /// Entry itself is a regular file.
    pub is_file: bool,
    /// Entry itself is a symbolic link.
    pub is_symlink: bool,
    /// Resolved link target; `None` means dangling.
    pub target: Option<LinkTarget>,
}

/// Classify an entry from its name and the collaborator's facts.
///
/// `.` and `..` are recognized by exact name and win over everything else.
pub fn classify(name: &str, facts: &EntryFacts) -> EntryKind {
    match name {
        SELF_NAME => return EntryKind::SpecialSelf,
        PARENT_NAME => return EntryKind::SpecialParent,
        _ => {}
    }
    if facts.is_symlink {
        return EntryKind::Symlink(facts.target.unwrap_or(LinkTarget::Dangling));
    }
    if facts.is_dir {
        EntryKind::Directory
    } else if facts.is_file {
        EntryKind::RegularFile
    } else {
        EntryKind::Other
    }
}

/// One directory listing entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    /// Base name (no parent path). Unique within one listing.
    pub name: String,
    /// Full path.
    pub path: PathBuf,
    /// Classification.
    pub kind: EntryKind,
    /// Size in bytes, when available.
    pub size: Option<u64>,
    /// Last modified time, when available.
    pub modified: Option<SystemTime>,
}

impl Entry {
    /// Create an entry without size/time attributes.
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind,
            size: None,
            modified: None,
        }
    }

    /// Build an entry for `name` inside `dir`, classifying it from `facts`.
    pub fn from_facts(dir: &Path, name: impl Into<String>, facts: &EntryFacts) -> Self {
        let name = name.into();
        let kind = classify(&name, facts);
        let path = dir.join(&name);
        Self::new(name, path, kind)
    }

    /// The synthetic `.` entry of `dir`.
    pub fn special_self(dir: &Path) -> Self {
        Self::new(SELF_NAME, dir.join(SELF_NAME), EntryKind::SpecialSelf)
    }

    /// The synthetic `..` entry of `dir`.
    pub fn special_parent(dir: &Path) -> Self {
        Self::new(PARENT_NAME, dir.join(PARENT_NAME), EntryKind::SpecialParent)
    }

    /// Set the size attribute.
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Set the modified-time attribute.
    pub fn with_modified(mut self, modified: SystemTime) -> Self {
        self.modified = Some(modified);
        self
    }

    /// Whether this is `.` or `..`.
    pub fn is_special(&self) -> bool {
        self.kind.is_special()
    }
}
