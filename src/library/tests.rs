use super::*;
use crate::config::LibrarySettings;
use crate::error::CatalogError;
use crate::testing::{FakeStore, entry, paginate};

fn names(snapshot: &Snapshot) -> Vec<&str> {
    snapshot.tracks().iter().map(|t| t.filename()).collect()
}

fn catalog(store: FakeStore) -> Catalog<FakeStore> {
    Catalog::new(store, &LibrarySettings::default())
}

#[test]
fn refresh_keeps_only_mp3_entries_across_all_pages() {
    let entries = vec![
        entry("1", "one.mp3"),
        entry("2", "two.flac"),
        entry("3", "three.mp3"),
        entry("4", "four.ogg"),
        entry("5", "five.mp3"),
        entry("6", "six.MP3"),
        entry("7", "seven.mp3"),
    ];
    let mut catalog = catalog(FakeStore::granted(paginate(entries, 2)));

    let outcome = catalog.refresh().unwrap();

    assert_eq!(
        outcome,
        RefreshOutcome::Refreshed {
            tracks: 4,
            dropped: 3
        }
    );
    let snap = catalog.snapshot();
    assert_eq!(names(&snap), vec!["five.mp3", "one.mp3", "seven.mp3", "three.mp3"]);
    assert_eq!(catalog.store().queries.len(), 4);
    assert!(catalog.store().queries.iter().all(|q| q.first == 100));
    assert_eq!(catalog.store().queries[1].after.as_deref(), Some("page-1"));
}

#[test]
fn refresh_sorts_case_insensitively() {
    let entries = vec![entry("b", "B.mp3"), entry("a", "a.mp3"), entry("c", "C.mp3")];
    let mut catalog = catalog(FakeStore::granted(paginate(entries, 10)));
    catalog.refresh().unwrap();

    assert_eq!(names(&catalog.snapshot()), vec!["a.mp3", "B.mp3", "C.mp3"]);
}

#[test]
fn refresh_sort_is_stable_for_equal_keys() {
    let entries = vec![
        entry("first", "Same.mp3"),
        entry("z", "zz.mp3"),
        entry("second", "same.mp3"),
        entry("third", "SAME.mp3"),
    ];
    let mut catalog = catalog(FakeStore::granted(paginate(entries, 3)));
    catalog.refresh().unwrap();

    let ids: Vec<String> = catalog
        .snapshot()
        .tracks()
        .iter()
        .map(|t| t.id().to_string())
        .collect();
    assert_eq!(ids, vec!["first", "second", "third", "z"]);
}

#[test]
fn refresh_drops_repeated_ids() {
    let entries = vec![entry("x", "a.mp3"), entry("x", "a.mp3"), entry("y", "b.mp3")];
    let mut catalog = catalog(FakeStore::granted(paginate(entries, 1)));
    catalog.refresh().unwrap();

    assert_eq!(names(&catalog.snapshot()), vec!["a.mp3", "b.mp3"]);
}

#[test]
fn refresh_without_permission_leaves_snapshot_untouched() {
    let entries = vec![entry("a", "a.mp3")];
    let mut catalog = catalog(FakeStore::undetermined(paginate(entries, 10), false));

    assert_eq!(catalog.refresh().unwrap(), RefreshOutcome::PermissionMissing);
    assert!(catalog.snapshot().is_empty());
    assert!(catalog.store().queries.is_empty());

    assert_eq!(catalog.request_permission(), PermissionStatus::Denied);
    assert_eq!(catalog.refresh().unwrap(), RefreshOutcome::PermissionMissing);
    assert_eq!(catalog.snapshot().generation(), 0);
}

#[test]
fn granted_permission_enables_refresh() {
    let entries = vec![entry("a", "a.mp3")];
    let mut catalog = catalog(FakeStore::undetermined(paginate(entries, 10), true));

    assert_eq!(catalog.request_permission(), PermissionStatus::Granted);
    catalog.refresh().unwrap();
    assert_eq!(names(&catalog.snapshot()), vec!["a.mp3"]);
}

#[test]
fn failed_page_keeps_previous_snapshot() {
    let entries = vec![entry("a", "a.mp3"), entry("b", "b.mp3"), entry("c", "c.mp3")];
    let mut catalog = catalog(FakeStore::granted(paginate(entries, 2)));
    catalog.refresh().unwrap();
    let before = catalog.snapshot();

    catalog.store_mut().fail_on_page = Some(1);
    let err = catalog.refresh().unwrap_err();

    assert!(matches!(err, CatalogError::Fetch { page: 1, .. }));
    assert!(std::sync::Arc::ptr_eq(&before, &catalog.snapshot()));
    assert_eq!(names(&catalog.snapshot()), vec!["a.mp3", "b.mp3", "c.mp3"]);
}

#[test]
fn page_with_more_results_but_no_cursor_is_an_error() {
    let page = MediaPage {
        entries: vec![entry("a", "a.mp3")],
        has_next_page: true,
        end_cursor: None,
    };
    let mut catalog = catalog(FakeStore::granted(vec![page]));

    assert!(matches!(
        catalog.refresh(),
        Err(CatalogError::MissingCursor { page: 0 })
    ));
    assert!(catalog.snapshot().is_empty());
}

#[test]
fn each_refresh_publishes_a_new_generation() {
    let entries = vec![entry("a", "a.mp3")];
    let mut catalog = catalog(FakeStore::granted(paginate(entries, 10)));
    let empty = catalog.snapshot();

    catalog.refresh().unwrap();
    let first = catalog.snapshot();
    catalog.refresh().unwrap();
    let second = catalog.snapshot();

    assert_eq!(empty.generation(), 0);
    assert_eq!(first.generation(), 1);
    assert_eq!(second.generation(), 2);
    assert_eq!(first.len(), 1);
}

#[test]
fn step_wraps_at_both_ends() {
    let snap = crate::testing::snapshot(&["a", "b", "c"]);
    assert_eq!(snap.step(2, Direction::Next), Some(0));
    assert_eq!(snap.step(0, Direction::Previous), Some(2));
    assert_eq!(snap.step(1, Direction::Next), Some(2));
    assert_eq!(snap.step(1, Direction::Previous), Some(0));

    let single = crate::testing::snapshot(&["a"]);
    assert_eq!(single.step(0, Direction::Next), Some(0));
    assert_eq!(single.step(0, Direction::Previous), Some(0));

    assert_eq!(crate::testing::snapshot(&[]).step(0, Direction::Next), None);
}

#[test]
fn extensions_setting_accepts_dotted_values() {
    let settings = LibrarySettings {
        extensions: vec![".flac".into(), "mp3".into()],
        ..LibrarySettings::default()
    };
    let entries = vec![entry("1", "a.flac"), entry("2", "b.mp3"), entry("3", "c.ogg")];
    let mut catalog = Catalog::new(FakeStore::granted(paginate(entries, 10)), &settings);
    catalog.refresh().unwrap();

    assert_eq!(names(&catalog.snapshot()), vec!["a.flac", "b.mp3"]);
}
