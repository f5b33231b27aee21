//! Reading through the journal and flushing it to a store.

use bytes::Bytes;
use ecomap_core::{
    apply_header, apply_value_updates, CmpOp, JournalEntry, ObjectId, OmapUpdate, SharedJournal,
    Version,
};
use ecomap_store::{InMemoryOmapStore, OmapStore};
use std::collections::BTreeMap;

fn key(i: u32) -> String {
    format!("key_{i:03}")
}

fn seeded_store(n: u32) -> InMemoryOmapStore {
    let values: BTreeMap<String, Bytes> =
        (1..=n).map(|i| (key(i), Bytes::from("stored"))).collect();
    InMemoryOmapStore::with_values(values, Some(Bytes::from("stored header")))
}

fn insert(counter: u64, keys: &[u32], value: &'static str) -> JournalEntry {
    JournalEntry::new(Version::new(2, counter))
        .with_update(&OmapUpdate::insert(keys.iter().map(|i| (key(*i), value))))
        .unwrap()
}

#[test]
fn overlay_then_flush_then_read_store() {
    let journal = SharedJournal::new();
    let object = ObjectId::new(4, "", "rbd_header.1");
    let mut store = seeded_store(20);

    journal.add_entry(object.clone(), insert(1, &[5, 25], "journal"));
    journal.add_entry(
        object.clone(),
        JournalEntry::new(Version::new(2, 2))
            .with_header("journal header")
            .with_update(&OmapUpdate::remove_range(key(10), Some(key(15))))
            .unwrap()
            .with_update(&OmapUpdate::remove([key(1)]))
            .unwrap(),
    );

    let (before, more) = journal
        .with_journal(|j| j.overlay(&object, &store).get_keys("", 100))
        .unwrap();
    assert!(!more);
    assert_eq!(before.len(), 20 - 1 - 5 + 1);
    assert!(before.contains(&key(25)));
    assert!(!before.contains(&key(12)));

    let (values, ranges) = journal.get_value_updates(&object);
    apply_value_updates(&mut store, &values, &ranges).unwrap();
    apply_header(&mut store, journal.get_updated_header(&object)).unwrap();
    journal.clear(&object);

    let after: Vec<String> = store
        .scan("", 100)
        .unwrap()
        .into_iter()
        .map(|(k, _)| k)
        .collect();
    assert_eq!(after, before);
    assert_eq!(store.get_header().unwrap(), Some(Bytes::from("journal header")));
    assert_eq!(store.get(&key(5)).unwrap(), Some(Bytes::from("journal")));
    assert!(!journal.is_tracked(&object));
}

#[test]
fn overlay_of_untracked_object_is_the_store() {
    let journal: SharedJournal = SharedJournal::new();
    let object = ObjectId::new(4, "", "plain");
    let store = seeded_store(3);

    let (vals, header) = journal.with_journal(|j| {
        let overlay = j.overlay(&object, &store);
        (overlay.get_vals("", "", 10), overlay.get_header())
    });

    assert_eq!(vals.unwrap().0.len(), 3);
    assert_eq!(header.unwrap(), Some(Bytes::from("stored header")));
}

#[test]
fn cleared_omap_reads_empty_header_and_new_keys_only() {
    let journal = SharedJournal::new();
    let object = ObjectId::new(4, "", "cleared");
    let store = seeded_store(10);

    journal.add_entry(object.clone(), JournalEntry::new(Version::new(2, 1)).with_clear(true));
    journal.add_entry(object.clone(), insert(2, &[3], "fresh"));

    let (vals, header) = journal.with_journal(|j| {
        let overlay = j.overlay(&object, &store);
        (overlay.get_vals_by_keys([key(2), key(3)]), overlay.get_header())
    });

    let vals = vals.unwrap();
    assert_eq!(vals.len(), 1);
    assert_eq!(vals[&key(3)], Bytes::from("fresh"));
    assert_eq!(header.unwrap(), Some(Bytes::new()));
}

#[test]
fn compare_sees_pending_updates() {
    let journal = SharedJournal::new();
    let object = ObjectId::new(4, "", "guarded");
    let store = seeded_store(10);

    journal.add_entry(object.clone(), insert(1, &[2], "journal"));
    journal.add_entry(
        object.clone(),
        JournalEntry::new(Version::new(2, 2))
            .with_update(&OmapUpdate::remove_range(key(5), Some(key(8))))
            .unwrap(),
    );

    let mut assertions = BTreeMap::new();
    assertions.insert(key(1), (Bytes::from("stored"), CmpOp::Eq));
    assertions.insert(key(2), (Bytes::from("journal"), CmpOp::Eq));
    assertions.insert(key(6), (Bytes::new(), CmpOp::Eq));
    let held = journal.with_journal(|j| j.overlay(&object, &store).cmp(&assertions));
    assert!(held.unwrap());

    assertions.insert(key(6), (Bytes::from("stored"), CmpOp::Eq));
    let held = journal.with_journal(|j| j.overlay(&object, &store).cmp(&assertions));
    assert!(!held.unwrap());
}
