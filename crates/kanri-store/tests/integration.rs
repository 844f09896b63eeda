use kanri_common_core::{Error, Slug, TaskNumber};
use kanri_entities::{EpicHeader, PrdHeader, TaskHeader, WorkStatus};
use kanri_store::{EntityStore, ProjectConfig};
use tempfile::tempdir;

fn store_in(dir: &tempfile::TempDir) -> EntityStore {
    EntityStore::new(ProjectConfig::new(dir.path()))
}

fn slug(s: &str) -> Slug {
    Slug::validate(s).unwrap()
}

fn task_number(i: u16) -> TaskNumber {
    TaskNumber::new(i).unwrap()
}

#[test]
fn test_init_project_is_idempotent() {
    let dir = tempdir().unwrap();
    let store = store_in(&dir);

    store.init_project().unwrap();
    assert!(store.is_initialized());
    assert!(dir.path().join(".claude/prds").is_dir());
    assert!(dir.path().join(".claude/epics").is_dir());
    assert!(dir.path().join(".claude/memory_bank.md").is_file());

    let memory_before = std::fs::read_to_string(dir.path().join(".claude/memory_bank.md")).unwrap();

    // Second call succeeds and changes nothing.
    store.init_project().unwrap();
    let memory_after = std::fs::read_to_string(dir.path().join(".claude/memory_bank.md")).unwrap();
    assert_eq!(memory_before, memory_after);
}

#[test]
fn test_prd_create_read_delete() {
    let dir = tempdir().unwrap();
    let store = store_in(&dir);
    store.init_project().unwrap();

    let id = slug("payment-redesign");
    let header = PrdHeader::new("payment-redesign");
    store
        .create_prd(&id, &header, "## Problem\n\nCheckout drop-off.\n")
        .unwrap();

    let (read_header, body) = store.read_prd(&id).unwrap();
    assert_eq!(read_header, header);
    assert_eq!(body, "## Problem\n\nCheckout drop-off.\n");

    // Creation is not idempotent.
    let err = store.create_prd(&id, &header, "").unwrap_err();
    assert!(matches!(err, Error::AlreadyExists { kind: "prd", .. }));

    store.delete_prd(&id).unwrap();
    assert!(store.read_prd(&id).unwrap_err().is_not_found());
}

#[test]
fn test_read_missing_prd_is_not_found() {
    let dir = tempdir().unwrap();
    let store = store_in(&dir);
    store.init_project().unwrap();

    let err = store.read_prd(&slug("ghost")).unwrap_err();
    assert!(matches!(err, Error::NotFound { kind: "prd", .. }));
}

#[test]
fn test_task_listing_sorts_numerically() {
    let dir = tempdir().unwrap();
    let store = store_in(&dir);
    store.init_project().unwrap();

    let epic = slug("checkout-flow");
    store
        .create_epic(&epic, &EpicHeader::new("checkout-flow"), "")
        .unwrap();

    // Create out of order, including 010 which sorts before 002
    // lexicographically in a naive string sort of unpadded ids.
    for i in [10u16, 1, 2] {
        store
            .create_task(&epic, task_number(i), &TaskHeader::new(format!("Task {i}")), "")
            .unwrap();
    }

    let listed = store.list_tasks(&epic).unwrap();
    let ids: Vec<String> = listed.iter().map(|n| n.to_string()).collect();
    assert_eq!(ids, vec!["001", "002", "010"]);
}

#[test]
fn test_next_task_number() {
    let dir = tempdir().unwrap();
    let store = store_in(&dir);
    store.init_project().unwrap();

    let epic = slug("checkout-flow");
    store
        .create_epic(&epic, &EpicHeader::new("checkout-flow"), "")
        .unwrap();

    assert_eq!(store.next_task_number(&epic).unwrap(), task_number(1));
    store
        .create_task(&epic, task_number(1), &TaskHeader::new("First"), "")
        .unwrap();
    store
        .create_task(&epic, task_number(2), &TaskHeader::new("Second"), "")
        .unwrap();
    assert_eq!(store.next_task_number(&epic).unwrap(), task_number(3));
}

#[test]
fn test_task_requires_existing_epic() {
    let dir = tempdir().unwrap();
    let store = store_in(&dir);
    store.init_project().unwrap();

    let err = store
        .write_task(
            &slug("ghost-epic"),
            task_number(1),
            &TaskHeader::new("Orphan"),
            "",
        )
        .unwrap_err();
    assert!(matches!(err, Error::NotFound { kind: "epic", .. }));
}

#[test]
fn test_delete_epic_removes_tasks() {
    let dir = tempdir().unwrap();
    let store = store_in(&dir);
    store.init_project().unwrap();

    let epic = slug("checkout-flow");
    store
        .create_epic(&epic, &EpicHeader::new("checkout-flow"), "")
        .unwrap();
    store
        .create_task(&epic, task_number(1), &TaskHeader::new("First"), "")
        .unwrap();

    store.delete_epic(&epic).unwrap();
    assert!(!store.epic_exists(&epic));
    assert!(!store.task_exists(&epic, task_number(1)));
    assert!(store.list_tasks(&epic).unwrap_err().is_not_found());
}

#[test]
fn test_full_rewrite_update_preserves_body() {
    let dir = tempdir().unwrap();
    let store = store_in(&dir);
    store.init_project().unwrap();

    let epic = slug("checkout-flow");
    store
        .create_epic(&epic, &EpicHeader::new("checkout-flow"), "")
        .unwrap();
    let number = task_number(1);
    let mut header = TaskHeader::new("Add payment form");
    store
        .create_task(&epic, number, &header, "## Approach\n\nStripe elements.\n")
        .unwrap();

    header.status = WorkStatus::InProgress;
    let (_, body) = store.read_task(&epic, number).unwrap();
    store.write_task(&epic, number, &header, &body).unwrap();

    let (re_read, re_body) = store.read_task(&epic, number).unwrap();
    assert_eq!(re_read.status, WorkStatus::InProgress);
    assert_eq!(re_body, "## Approach\n\nStripe elements.\n");
}

#[test]
fn test_list_epics_ignores_stray_dirs() {
    let dir = tempdir().unwrap();
    let store = store_in(&dir);
    store.init_project().unwrap();

    store
        .create_epic(&slug("real-epic"), &EpicHeader::new("real-epic"), "")
        .unwrap();
    // A directory without an epic.md is not an epic.
    std::fs::create_dir_all(dir.path().join(".claude/epics/not-an-epic")).unwrap();

    let epics = store.list_epics().unwrap();
    assert_eq!(epics.len(), 1);
    assert_eq!(epics[0].as_str(), "real-epic");
}
