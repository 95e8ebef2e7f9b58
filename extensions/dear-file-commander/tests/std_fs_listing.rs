use std::path::PathBuf;

use dear_file_commander::{
    ArchiveRegistry, CommanderConfig, EntryKind, Listing, ListingEvent, StdFileSystem,
    read_listing,
};
use pretty_assertions::assert_eq;

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    let pid = std::process::id();
    let t = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    p.push(format!("dear-file-commander-{prefix}-{pid}-{t}"));
    p
}

#[test]
fn std_fs_listing_classifies_and_sorts() {
    let fs = StdFileSystem;
    let dir = unique_temp_dir("listing");
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(dir.join("docs")).unwrap();
    std::fs::write(dir.join("big.bin"), vec![0u8; 64]).unwrap();
    std::fs::write(dir.join("small.txt"), b"hi").unwrap();

    let entries = read_listing(&fs, &dir).unwrap();
    assert_eq!(entries.len(), 5);
    assert_eq!(entries[0].kind, EntryKind::SpecialSelf);
    assert_eq!(entries[1].kind, EntryKind::SpecialParent);

    let mut listing = Listing::new(&CommanderConfig::default()).unwrap();
    listing.load(&fs, &dir).unwrap();
    let names: Vec<&str> = listing.entries().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec![".", "..", "docs", "big.bin", "small.txt"]);
    assert_eq!(listing.entries()[3].size, Some(64));
    assert_eq!(listing.entries()[2].size, None);

    listing.handle_event(ListingEvent::MarkOrUnmarkAll);
    assert_eq!(
        listing.marks().names().collect::<Vec<_>>(),
        vec!["big.bin", "small.txt"]
    );

    std::fs::write(dir.join("new.txt"), b"").unwrap();
    std::fs::remove_file(dir.join("small.txt")).unwrap();
    listing.reload(&fs).unwrap();
    assert_eq!(listing.marks().names().collect::<Vec<_>>(), vec!["big.bin"]);
    assert_eq!(listing.entries().len(), 5);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[cfg(unix)]
#[test]
fn std_fs_symlinks_are_resolved() {
    let fs = StdFileSystem;
    let dir = unique_temp_dir("symlinks");
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(dir.join("real")).unwrap();
    std::fs::write(dir.join("file.txt"), b"x").unwrap();
    std::os::unix::fs::symlink(dir.join("real"), dir.join("to-dir")).unwrap();
    std::os::unix::fs::symlink(dir.join("file.txt"), dir.join("to-file")).unwrap();
    std::os::unix::fs::symlink(dir.join("gone"), dir.join("dangling")).unwrap();

    let mut listing = Listing::new(&CommanderConfig::default()).unwrap();
    listing.load(&fs, &dir).unwrap();
    let kinds: Vec<(&str, EntryKind)> = listing
        .entries()
        .iter()
        .map(|e| (e.name.as_str(), e.kind))
        .collect();
    assert_eq!(
        kinds,
        vec![
            (".", EntryKind::SpecialSelf),
            ("..", EntryKind::SpecialParent),
            ("real", EntryKind::Directory),
            ("to-dir", EntryKind::Symlink(dear_file_commander::LinkTarget::Directory)),
            ("file.txt", EntryKind::RegularFile),
            ("to-file", EntryKind::Symlink(dear_file_commander::LinkTarget::File)),
            ("dangling", EntryKind::Symlink(dear_file_commander::LinkTarget::Dangling)),
        ]
    );

    let registry = ArchiveRegistry::builtin();
    assert!(registry.resolve_path(&fs, &dir.join("real")).is_none());
    assert!(registry.resolve_path(&fs, &dir.join("out.tar.gz")).is_some());

    std::fs::remove_dir_all(&dir).unwrap();
}
