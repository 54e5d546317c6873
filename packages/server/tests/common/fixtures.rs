//! Test fixtures for creating test data.

use serde_json::{json, Map, Value};
use server_core::domains::resources::models::{LibraryCategory, NewResource, ResourceKind};
use server_core::domains::resources::ResourceStore;
use server_core::common::ResourceId;

/// Turn a `json!({...})` object into a field map.
pub fn fields(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {}", other),
    }
}

pub fn news(title: &str) -> NewResource {
    NewResource::new(ResourceKind::News, fields(json!({ "title": title })))
}

pub fn team_member(name: &str) -> NewResource {
    NewResource::new(ResourceKind::TeamMember, fields(json!({ "name": name })))
}

pub fn partner(name: &str, url: &str) -> NewResource {
    NewResource::new(
        ResourceKind::Partner,
        fields(json!({ "name": name, "url": url })),
    )
}

pub fn library_video(title: &str, url: &str) -> NewResource {
    NewResource::new(
        ResourceKind::LibraryItem(LibraryCategory::Video),
        fields(json!({ "title": title, "url": url })),
    )
}

/// Create `count` news records in `scope` and return their ids in creation order.
pub async fn seed_news(store: &ResourceStore, scope: &str, count: usize) -> Vec<ResourceId> {
    let mut ids = Vec::with_capacity(count);
    for i in 0..count {
        let record = store
            .create(news(&format!("{} #{}", scope, i + 1)).in_scope(scope))
            .await
            .expect("Failed to seed news record");
        ids.push(record.id);
    }
    ids
}
