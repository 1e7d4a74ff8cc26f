use contactdesk_core::{
    ContactFormData, ContactSubmission, MemorySlotStorage, SlotStorage, SlotSubmissionRepository,
    StoreError, SubmissionRepository, SubmissionStore, CONTACT_STORAGE_KEY,
};
use std::collections::HashSet;

fn form(name: &str) -> ContactFormData {
    ContactFormData::new(name, format!("{name}@example.com"), "0500000000", "retail")
}

type MemoryStore<'a> = SubmissionStore<SlotSubmissionRepository<&'a MemorySlotStorage>>;

fn open(slots: &MemorySlotStorage) -> MemoryStore<'_> {
    SubmissionStore::open(SlotSubmissionRepository::new(slots))
}

fn ids(store: &SubmissionStore<impl SubmissionRepository>) -> Vec<String> {
    store.submissions().iter().map(|s| s.id.clone()).collect()
}

#[test]
fn ids_are_pairwise_distinct() {
    let slots = MemorySlotStorage::new();
    let mut store = open(&slots);

    for i in 0..200 {
        store.add(form(&format!("visitor{i}"))).unwrap();
    }

    let unique: HashSet<String> = ids(&store).into_iter().collect();
    assert_eq!(unique.len(), 200);
    assert!(unique.iter().all(|id| !id.is_empty()));
}

#[test]
fn newest_submission_comes_first() {
    let slots = MemorySlotStorage::new();
    let mut store = open(&slots);

    let a = store.add(form("a")).unwrap();
    let b = store.add(form("b")).unwrap();

    assert_eq!(store.submissions(), &[b, a]);
}

#[test]
fn delete_removes_exactly_the_match() {
    let slots = MemorySlotStorage::new();
    let mut store = open(&slots);

    let z = store.add(form("z")).unwrap();
    let y = store.add(form("y")).unwrap();
    let x = store.add(form("x")).unwrap();

    store.delete(&y.id).unwrap();

    assert_eq!(ids(&store), vec![x.id.clone(), z.id.clone()]);
    assert!(store.get(&y.id).is_none());

    let reopened = open(&slots);
    assert_eq!(ids(&reopened), vec![x.id, z.id]);
}

#[test]
fn deleting_unknown_id_is_a_noop() {
    let slots = MemorySlotStorage::new();
    let mut store = open(&slots);
    store.add(form("a")).unwrap();
    store.add(form("b")).unwrap();
    let before = store.submissions().to_vec();
    let persisted_before = slots.get(CONTACT_STORAGE_KEY).unwrap();

    store.delete("nonexistent").unwrap();

    assert_eq!(store.submissions(), before.as_slice());
    assert_eq!(slots.get(CONTACT_STORAGE_KEY).unwrap(), persisted_before);
}

#[test]
fn persisted_submission_survives_restart() {
    let slots = MemorySlotStorage::new();
    let created = {
        let mut store = open(&slots);
        store
            .add(ContactFormData::new("Ali", "a@x.com", "0500000000", "retail"))
            .unwrap()
    };

    let reloaded = open(&slots);

    assert_eq!(reloaded.len(), 1);
    let record = &reloaded.submissions()[0];
    assert_eq!(record, &created);
    assert_eq!(record.name, "Ali");
    assert_eq!(record.email, "a@x.com");
    assert_eq!(record.phone, "0500000000");
    assert_eq!(record.business_field, "retail");
    assert!(!record.id.is_empty());
    assert!(record.created_at_utc().is_some());
}

#[test]
fn rehydrating_from_absent_slot_twice_is_empty() {
    let slots = MemorySlotStorage::new();

    let first = open(&slots);
    let second = open(&slots);

    assert!(first.is_empty());
    assert!(second.is_empty());
    assert!(first.is_synced());
    assert_eq!(slots.get(CONTACT_STORAGE_KEY).unwrap(), None);
}

#[test]
fn corrupt_snapshot_recovers_to_empty() {
    let slots = MemorySlotStorage::new();
    slots.insert_raw(CONTACT_STORAGE_KEY, r#"{"state":{"submissions":"oops"}}"#);

    let mut store = open(&slots);
    assert!(store.is_empty());
    assert!(!store.is_synced());

    let added = store.add(form("fresh")).unwrap();
    assert!(store.is_synced());
    assert_eq!(open(&slots).submissions(), &[added]);
}

#[test]
fn historical_records_stay_unchanged() {
    let slots = MemorySlotStorage::new();
    let mut store = open(&slots);

    let a = store.add(form("a")).unwrap();
    let b = store.add(form("b")).unwrap();
    store.delete(&b.id).unwrap();

    let stored_a: &ContactSubmission = store.get(&a.id).unwrap();
    assert_eq!(stored_a, &a);
    assert_eq!(open(&slots).submissions(), &[a]);
}

#[test]
fn failed_write_keeps_memory_change_and_reports_error() {
    let slots = MemorySlotStorage::new();
    let mut store = open(&slots);
    let kept = store.add(form("kept")).unwrap();

    slots.set_fail_writes(true);
    let err = store.add(form("unsaved")).unwrap_err();

    assert!(matches!(err, StoreError::Persist { operation: "add", .. }));
    assert_eq!(store.len(), 2);
    assert_eq!(store.submissions()[0].name, "unsaved");
    assert!(!store.is_synced());
    assert_eq!(open(&slots).submissions(), &[kept.clone()]);

    slots.set_fail_writes(false);
    store.flush().unwrap();

    assert!(store.is_synced());
    assert_eq!(open(&slots).submissions(), store.submissions());
}

#[test]
fn failed_delete_is_reported() {
    let slots = MemorySlotStorage::new();
    let mut store = open(&slots);
    let a = store.add(form("a")).unwrap();

    slots.set_fail_writes(true);
    let err = store.delete(&a.id).unwrap_err();

    assert!(matches!(err, StoreError::Persist { operation: "delete", .. }));
    assert!(store.is_empty());
    assert_eq!(open(&slots).len(), 1);
}

#[test]
fn caller_input_cannot_choose_identity() {
    let slots = MemorySlotStorage::new();
    let mut store = open(&slots);
    let input = form("a");

    let first = store.add(input.clone()).unwrap();
    let second = store.add(input).unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(first.form_data(), second.form_data());
}
