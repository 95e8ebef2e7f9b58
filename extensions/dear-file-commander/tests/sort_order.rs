use std::cmp::Ordering;
use std::path::Path;
use std::time::{Duration, SystemTime};

use dear_file_commander::{
    Entry, EntryKind, LinkTarget, SortConfig, SortDirection, SortKey, compare_entries,
    sort_entries,
};
use pretty_assertions::assert_eq;

fn sample() -> Vec<Entry> {
    let dir = Path::new("/data");
    let t0 = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
    let file = |name: &str, size: u64, age: u64| {
        Entry::new(name, dir.join(name), EntryKind::RegularFile)
            .with_size(size)
            .with_modified(t0 + Duration::from_secs(age))
    };
    vec![
        file("notes.txt", 300, 5),
        Entry::new("src", dir.join("src"), EntryKind::Directory),
        Entry::special_parent(dir),
        file("README", 10, 1),
        Entry::new(
            "latest",
            dir.join("latest"),
            EntryKind::Symlink(LinkTarget::Directory),
        ),
        file("archive.tar.gz", 9_000, 3),
        Entry::new("broken", dir.join("broken"), EntryKind::Symlink(LinkTarget::Dangling)),
        Entry::special_self(dir),
        file("a.rs", 120, 9),
        Entry::new("Build", dir.join("Build"), EntryKind::Directory),
    ]
}

fn names(entries: &[Entry]) -> Vec<&str> {
    entries.iter().map(|e| e.name.as_str()).collect()
}

#[test]
fn name_ascending_groups_by_type() {
    let sorted = sort_entries(sample(), SortConfig::default());
    assert_eq!(
        names(&sorted),
        vec![
            ".",
            "..",
            "Build",
            "src",
            "latest",
            "README",
            "a.rs",
            "archive.tar.gz",
            "notes.txt",
            "broken",
        ]
    );
}

#[test]
fn name_descending_reverses_everything_but_specials() {
    let asc = sort_entries(sample(), SortConfig::default());
    let desc = sort_entries(
        sample(),
        SortConfig::new(SortKey::Name, SortDirection::Descending),
    );
    assert_eq!(names(&desc[..2]), vec![".", ".."]);
    let mut expected = names(&asc[2..]);
    expected.reverse();
    assert_eq!(names(&desc[2..]), expected);
}

#[test]
fn every_key_and_direction_is_idempotent() {
    for key in SortKey::ALL {
        for direction in [SortDirection::Ascending, SortDirection::Descending] {
            let config = SortConfig::new(key, direction);
            let once = sort_entries(sample(), config);
            let twice = sort_entries(once.clone(), config);
            assert_eq!(once, twice, "{config}");
            assert_eq!(names(&once[..2]), vec![".", ".."], "{config}");
        }
    }
}

#[test]
fn size_and_time_order_files() {
    let by_size = sort_entries(sample(), SortConfig::new(SortKey::Size, SortDirection::Ascending));
    assert_eq!(
        names(&by_size[5..9]),
        vec!["README", "a.rs", "notes.txt", "archive.tar.gz"]
    );
    let by_time = sort_entries(
        sample(),
        SortConfig::new(SortKey::Time, SortDirection::Descending),
    );
    assert_eq!(names(&by_time[..3]), vec![".", "..", "broken"]);
    assert_eq!(
        names(&by_time[3..7]),
        vec!["a.rs", "notes.txt", "archive.tar.gz", "README"]
    );
}

#[test]
fn comparator_is_a_strict_total_order() {
    let dir = Path::new("/data");
    let mut entries = sample();
    // Same bucket as the other files but with no size or time.
    entries.push(Entry::new("bare.txt", dir.join("bare.txt"), EntryKind::RegularFile));
    entries.push(Entry::new("fifo", dir.join("fifo"), EntryKind::Other));

    for key in SortKey::ALL {
        for direction in [SortDirection::Ascending, SortDirection::Descending] {
            let config = SortConfig::new(key, direction);
            for a in &entries {
                for b in &entries {
                    let ab = compare_entries(a, b, config);
                    let pair = format!("{config}: {} {}", a.name, b.name);
                    assert_eq!(ab, compare_entries(b, a, config).reverse(), "{pair}");
                    assert_eq!(ab == Ordering::Equal, a == b, "{pair}");
                    for c in &entries {
                        if ab == Ordering::Less && compare_entries(b, c, config) == Ordering::Less {
                            assert_eq!(
                                compare_entries(a, c, config),
                                Ordering::Less,
                                "{config}: {} {} {}",
                                a.name,
                                b.name,
                                c.name
                            );
                        }
                    }
                }
            }
        }
    }
}
