use std::path::{Path, PathBuf};

use dear_file_commander::{
    ArchiveRegistry, CommanderConfig, CommanderError, Entry, EntryKind, ExpandContext, Listing,
    ListingEvent, expand, shell,
};
use pretty_assertions::assert_eq;
use regex::Regex;

#[test]
fn repeating_template_runs_once_per_marked_file() {
    let marked = vec![PathBuf::from("/src/a.c"), PathBuf::from("/src/b.c")];
    let ctx = ExpandContext::new(Path::new("/src"))
        .current(Path::new("/src/a.c"))
        .marked(&marked);
    assert_eq!(
        expand("gcc -c %M -o %XM.o", &ctx),
        vec!["gcc -c a.c -o a.o", "gcc -c b.c -o b.o"]
    );
    assert_eq!(expand("wc -l %T", &ctx), vec!["wc -l a.c b.c"]);
    assert!(expand("rm %M", &ExpandContext::new(Path::new("/src"))).is_empty());
}

#[test]
fn current_file_and_working_dir() {
    let ctx = ExpandContext::new(Path::new("/tmp")).current(Path::new("/tmp/a.txt"));
    assert_eq!(expand("cp %C %P", &ctx), vec!["cp a.txt /tmp"]);
    assert_eq!(expand("echo %M", &ctx), Vec::<String>::new());
}

#[test]
fn expanded_names_are_shell_safe() {
    let marked = vec![PathBuf::from("/w/it's here.txt")];
    let ctx = ExpandContext::new(Path::new("/w")).marked(&marked);
    assert_eq!(expand("cat %M", &ctx), vec![r"cat 'it'\''s here.txt'"]);
    assert_eq!(shell::quote(""), "''");
}

#[test]
fn registry_resolves_compound_suffixes() {
    let reg = ArchiveRegistry::builtin();
    assert_eq!(reg.unpack("backup.tar.bz2", &[]).unwrap(), "tar xjf backup.tar.bz2");
    assert_eq!(reg.unpack("backup.tbz", &[]).unwrap(), "tar xjf backup.tbz");
    assert_eq!(reg.unpack("dump.bz2", &[]).unwrap(), "bunzip2 -k dump.bz2");
    assert_eq!(
        reg.pack("site.tar.zst", &["public"]).unwrap(),
        "tar --zstd -cf site.tar.zst public"
    );
    assert!(matches!(
        reg.pack("photo.jpeg", &["a"]),
        Err(CommanderError::UnsupportedArchiveFormat(_))
    ));
}

#[test]
fn listing_marks_by_pattern_and_packs_them() {
    let dir = Path::new("/proj");
    let mut entries = vec![Entry::special_self(dir), Entry::special_parent(dir)];
    for name in ["main.rs", "lib.rs", "Cargo.toml", "notes.md"] {
        entries.push(Entry::new(name, dir.join(name), EntryKind::RegularFile));
    }
    let mut listing = Listing::new(&CommanderConfig::default()).unwrap();
    listing.change_dir(dir, entries);
    listing.handle_event(ListingEvent::MarkMatching(Regex::new(r"\.rs$").unwrap()));

    assert_eq!(listing.marks().len(), 2);
    assert_eq!(
        listing.pack_command("src.tar.gz").unwrap(),
        "tar czf src.tar.gz lib.rs main.rs"
    );
    assert_eq!(
        listing.expand_command("rustfmt %T"),
        vec!["rustfmt lib.rs main.rs"]
    );

    listing.handle_event(ListingEvent::InvertMarks);
    assert_eq!(
        listing.marks().names().collect::<Vec<_>>(),
        vec!["Cargo.toml", "notes.md"]
    );
}
