//! Repository integration tests against the in-memory backend.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use campuscare_store::entities::{NewComplaint, NewUser, Priority, Status};
use campuscare_store::repositories::{ComplaintRepository, UserRepository};
use campuscare_store::{DataStore, MemoryStore, StoreChange};

fn new_user(username: &str) -> NewUser {
    NewUser {
        name: "Ann".to_string(),
        username: username.to_string(),
        password: "p".to_string(),
        department: "CS".to_string(),
        created_at: "2026-08-07T10:00:00Z".to_string(),
    }
}

fn new_complaint(student_id: &str, title: &str, timestamp: i64) -> NewComplaint {
    NewComplaint {
        student_id: student_id.to_string(),
        student_name: "Ann".to_string(),
        department: "CS".to_string(),
        category: "Internet".to_string(),
        priority: Priority::Medium,
        title: title.to_string(),
        description: "No connectivity".to_string(),
        status: Status::Pending,
        date: "8/7/2026".to_string(),
        timestamp,
    }
}

#[tokio::test]
async fn test_user_create_and_lookup() {
    let store: Arc<dyn DataStore> = Arc::new(MemoryStore::new());
    let users = UserRepository::new(store);

    let created = users.create(new_user("ann1")).await.unwrap();
    assert!(!created.id.is_empty());

    let found = users.find_by_username("ann1").await.unwrap().unwrap();
    assert_eq!(found.id, created.id);
    assert_eq!(found.password, "p");

    assert!(users.find_by_username("Ann1").await.unwrap().is_none());
    assert_eq!(users.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_user_find_by_id() {
    let store: Arc<dyn DataStore> = Arc::new(MemoryStore::new());
    let users = UserRepository::new(store);

    let created = users.create(new_user("ann1")).await.unwrap();
    let found = users.find_by_id(&created.id).await.unwrap().unwrap();
    assert_eq!(found.username, "ann1");
    assert!(users.find_by_id("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_complaint_scoped_listing() {
    let store: Arc<dyn DataStore> = Arc::new(MemoryStore::new());
    let complaints = ComplaintRepository::new(store);

    complaints
        .create(new_complaint("u1", "Wifi down", 1))
        .await
        .unwrap();
    complaints
        .create(new_complaint("u2", "Cold water", 2))
        .await
        .unwrap();
    complaints
        .create(new_complaint("u1", "Broken chair", 3))
        .await
        .unwrap();

    assert_eq!(complaints.list_all().await.unwrap().len(), 3);

    let owned = complaints.list_for_student("u1").await.unwrap();
    assert_eq!(owned.len(), 2);
    assert!(owned.iter().all(|c| c.student_id == "u1"));
}

#[tokio::test]
async fn test_complaint_status_round_trip() {
    let store: Arc<dyn DataStore> = Arc::new(MemoryStore::new());
    let complaints = ComplaintRepository::new(store);

    let created = complaints
        .create(new_complaint("u1", "Wifi down", 1))
        .await
        .unwrap();
    assert_eq!(created.status, Status::Pending);

    complaints
        .set_status(&created.id, Status::Resolved)
        .await
        .unwrap();
    let fetched = complaints.get_by_id(&created.id).await.unwrap();
    assert_eq!(fetched.status, Status::Resolved);

    // Timestamp and owner are untouched by the partial update.
    assert_eq!(fetched.timestamp, 1);
    assert_eq!(fetched.student_id, "u1");
}

#[tokio::test]
async fn test_complaint_get_missing_errors() {
    let store: Arc<dyn DataStore> = Arc::new(MemoryStore::new());
    let complaints = ComplaintRepository::new(store);

    let err = complaints.get_by_id("missing").await.unwrap_err();
    assert_eq!(err.error_code(), "COMPLAINT_NOT_FOUND");
}

#[tokio::test]
async fn test_watch_sees_repository_mutations() {
    let store: Arc<dyn DataStore> = Arc::new(MemoryStore::new());
    let complaints = ComplaintRepository::new(store);
    let mut changes = complaints.watch();

    let created = complaints
        .create(new_complaint("u1", "Wifi down", 1))
        .await
        .unwrap();
    assert_eq!(changes.recv().await, Some(StoreChange::Changed));

    complaints
        .set_status(&created.id, Status::Resolved)
        .await
        .unwrap();
    assert_eq!(changes.recv().await, Some(StoreChange::Changed));

    complaints.delete(&created.id).await.unwrap();
    assert_eq!(changes.recv().await, Some(StoreChange::Changed));
}
