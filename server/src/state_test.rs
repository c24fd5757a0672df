use elements::ElementsInput;

use super::*;

fn input() -> ElementsInput {
    ElementsInput { image_url: "img".into(), elements: Vec::new() }
}

#[tokio::test]
async fn in_memory_state_starts_empty() {
    let state = AppState::in_memory(ServerConfig::default());
    assert_eq!(state.store.count().await, 0);
}

#[tokio::test]
async fn clones_share_one_store() {
    let state = AppState::in_memory(ServerConfig::default());
    let clone = state.clone();
    let record = clone.store.save(input()).await;
    assert_eq!(state.store.get(record.id).await, Some(record));
}

#[tokio::test]
async fn separate_states_do_not_share_ids() {
    let a = AppState::in_memory(ServerConfig::default());
    let b = AppState::in_memory(ServerConfig::default());
    assert_eq!(a.store.save(input()).await.id, 1);
    assert_eq!(b.store.save(input()).await.id, 1);
}
