use std::path::{Path, PathBuf};

use crate::entry::{Entry, EntryFacts, LinkTarget};

/// Minimal metadata for a path, with links followed.
#[derive(Clone, Debug)]
pub struct FsMetadata {
    /// Whether the path resolves to a directory.
    pub is_dir: bool,
    /// Whether the path resolves to a regular file.
    pub is_file: bool,
    /// Whether the path itself is a symbolic link.
    pub is_symlink: bool,
}

/// Directory entry returned by [`FileSystem::read_dir`].
#[derive(Clone, Debug)]
pub struct FsEntry {
    /// Base name (no parent path)
    pub name: String,
    /// Full path
    pub path: PathBuf,
    /// Type facts used for classification.
    pub facts: EntryFacts,
    /// File size in bytes (files and file-links only; `None` for directories or when unavailable).
    pub size: Option<u64>,
    /// Last modified timestamp (when available).
    pub modified: Option<std::time::SystemTime>,
}

/// Filesystem collaborator.
///
/// The sort/mark/template code never touches the disk; hosts hand it entries
/// produced through this trait (or build [`Entry`] values themselves).
pub trait FileSystem {
    /// List entries of a directory, without `.` and `..`.
    fn read_dir(&self, dir: &Path) -> std::io::Result<Vec<FsEntry>>;
    /// Fetch minimal metadata for a path.
    fn metadata(&self, path: &Path) -> std::io::Result<FsMetadata>;
}

/// Default filesystem implementation using `std::fs`.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdFileSystem;

impl FileSystem for StdFileSystem {
    fn read_dir(&self, dir: &Path) -> std::io::Result<Vec<FsEntry>> {
        let mut out = Vec::new();
        let rd = std::fs::read_dir(dir)?;
        for e in rd {
            let e = match e {
                Ok(v) => v,
                Err(_) => continue,
            };
            let ft = match e.file_type() {
                Ok(v) => v,
                Err(_) => continue,
            };
            let name = e.file_name().to_string_lossy().to_string();
            let path = e.path();
            // Follows links; fails for dangling ones.
            let resolved = std::fs::metadata(&path).ok();
            let target = if ft.is_symlink() {
                resolved.as_ref().map(|m| {
                    if m.is_dir() {
                        LinkTarget::Directory
                    } else if m.is_file() {
                        LinkTarget::File
                    } else {
                        LinkTarget::Other
                    }
                })
            } else {
                None
            };
            let modified = resolved.as_ref().and_then(|m| m.modified().ok());
            let size = resolved.as_ref().filter(|m| m.is_file()).map(|m| m.len());
            out.push(FsEntry {
                name,
                path,
                facts: EntryFacts {
                    is_dir: ft.is_dir(),
                    is_file: ft.is_file(),
                    is_symlink: ft.is_symlink(),
                    target,
                },
                size,
                modified,
            });
        }
        Ok(out)
    }

    fn metadata(&self, path: &Path) -> std::io::Result<FsMetadata> {
        let md = std::fs::metadata(path)?;
        let link_md = std::fs::symlink_metadata(path)?;
        Ok(FsMetadata {
            is_dir: md.is_dir(),
            is_file: md.is_file(),
            is_symlink: link_md.file_type().is_symlink(),
        })
    }
}

/// Read one directory into classified entries, `.` and `..` first.
///
/// Entries come back in collaborator order; sorting is the caller's job.
pub fn read_listing(fs: &dyn FileSystem, dir: &Path) -> std::io::Result<Vec<Entry>> {
    let raw = fs.read_dir(dir)?;
    let mut out = Vec::with_capacity(raw.len() + 2);
    out.push(Entry::special_self(dir));
    out.push(Entry::special_parent(dir));
    for fs_entry in raw {
        let Some(entry) = entry_from_fs(fs_entry, dir) else {
            continue;
        };
        out.push(entry);
    }
    trace_listing_read(dir, out.len());
    Ok(out)
}

fn entry_from_fs(fs_entry: FsEntry, dir: &Path) -> Option<Entry> {
    let name = if fs_entry.name.trim().is_empty() {
        fs_entry
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .filter(|n| !n.is_empty())?
    } else {
        fs_entry.name
    };
    // Collaborators that echo the specials are tolerated; we add our own.
    if name == crate::entry::SELF_NAME || name == crate::entry::PARENT_NAME {
        return None;
    }
    let mut entry = Entry::from_facts(dir, name, &fs_entry.facts);
    if !fs_entry.path.as_os_str().is_empty() {
        entry.path = fs_entry.path;
    }
    if !entry.kind.is_dir_like() {
        entry.size = fs_entry.size;
    }
    entry.modified = fs_entry.modified;
    Some(entry)
}

#[cfg(feature = "tracing")]
fn trace_listing_read(dir: &Path, entries: usize) {
    tracing::trace!(
        event = "listing.read",
        dir = %dir.display(),
        entries,
        "listing read"
    );
}

#[cfg(not(feature = "tracing"))]
fn trace_listing_read(_dir: &Path, _entries: usize) {}
