use std::sync::Arc;

use elements::{ElementKind, ExtractedElement};

use super::*;

fn input(image_url: &str) -> ElementsInput {
    ElementsInput {
        image_url: image_url.to_owned(),
        elements: vec![ExtractedElement::new(ElementKind::Color, "Primary Blue", "#2563eb")],
    }
}

#[tokio::test]
async fn first_id_is_one() {
    let store = MemoryStore::new();
    let record = store.save(input("a")).await;
    assert_eq!(record.id, 1);
    assert_eq!(record.image_url, "a");
}

#[tokio::test]
async fn ids_strictly_increase() {
    let store = MemoryStore::new();
    let mut last = 0;
    for i in 0..10 {
        let record = store.save(input(&format!("img-{i}"))).await;
        assert!(record.id > last, "id {} should exceed {last}", record.id);
        last = record.id;
    }
    assert_eq!(store.count().await, 10);
}

#[tokio::test]
async fn get_returns_equal_record() {
    let store = MemoryStore::new();
    let saved = store.save(input("img")).await;
    let fetched = store.get(saved.id).await.unwrap();
    assert_eq!(fetched, saved);
}

#[tokio::test]
async fn get_unknown_id_is_none() {
    let store = MemoryStore::new();
    assert!(store.get(1).await.is_none());
    store.save(input("img")).await;
    assert!(store.get(0).await.is_none());
    assert!(store.get(2).await.is_none());
    assert!(store.get(u64::MAX).await.is_none());
}

#[tokio::test]
async fn separate_instances_are_isolated() {
    let a = MemoryStore::new();
    let b = MemoryStore::new();
    a.save(input("a1")).await;
    a.save(input("a2")).await;
    let first_b = b.save(input("b1")).await;
    assert_eq!(first_b.id, 1);
    assert_eq!(b.get(2).await, None);
}

#[tokio::test]
async fn stored_record_is_not_affected_by_later_saves() {
    let store = MemoryStore::new();
    let first = store.save(input("first")).await;
    store.save(input("second")).await;
    assert_eq!(store.get(first.id).await.unwrap().image_url, "first");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_saves_get_unique_ids() {
    let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
    let mut handles = Vec::new();
    for i in 0..64 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move { store.save(input(&format!("img-{i}"))).await.id }));
    }

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap());
    }
    ids.sort_unstable();
    let expected: Vec<u64> = (1..=64).collect();
    assert_eq!(ids, expected);
    assert_eq!(store.count().await, 64);
}
