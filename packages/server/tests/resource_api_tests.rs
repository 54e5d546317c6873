//! HTTP API tests
//!
//! Drives the real router (JWT middleware, admin gateway, envelope mapping)
//! over the in-memory store. Each admin-only endpoint is checked three ways:
//! as admin, as an authenticated non-admin, and without a token.

mod common;

use crate::common::{ApiClient, TestHarness};
use axum::http::StatusCode;
use serde_json::{json, Value};

// ============================================================================
// Test Helpers
// ============================================================================

async fn create_news(client: &ApiClient, title: &str, scope: &str) -> Value {
    client
        .post(
            "/resources",
            json!({ "kind": "news", "scope": scope, "title": title }),
        )
        .await
        .unwrap()
}

fn id_of(record: &Value) -> String {
    record["id"].as_str().expect("record has an id").to_string()
}

fn ids_of(list: &Value) -> Vec<String> {
    list.as_array()
        .expect("list response")
        .iter()
        .map(id_of)
        .collect()
}

// ============================================================================
// Envelope and public reads
// ============================================================================

#[tokio::test]
async fn health_reports_store_backend() {
    let harness = TestHarness::new();

    let result = harness.api().get("/health").await;

    assert_eq!(result.status, StatusCode::OK);
    assert_eq!(result.body["status"], "healthy");
    assert_eq!(result.body["store"]["backend"], "memory");
}

#[tokio::test]
async fn public_list_returns_active_records_in_order() {
    let harness = TestHarness::new();
    let admin = harness.admin();
    let first = create_news(&admin, "First", "home").await;
    let hidden = admin
        .post(
            "/resources",
            json!({ "kind": "news", "scope": "home", "title": "Hidden", "isActive": false }),
        )
        .await
        .unwrap();
    let third = create_news(&admin, "Third", "home").await;

    let result = harness.api().get("/resources?kind=news&scope=home").await;

    assert_eq!(result.status, StatusCode::OK);
    assert!(result.success());
    assert!(result.body.get("error").is_none());
    assert_eq!(ids_of(result.data()), vec![id_of(&first), id_of(&third)]);
    assert_eq!(result.orders(), vec![1, 3]);
    assert!(!ids_of(result.data()).contains(&id_of(&hidden)));
}

#[tokio::test]
async fn full_list_requires_admin() {
    let harness = TestHarness::new();
    let admin = harness.admin();
    create_news(&admin, "Visible", "feed").await;
    admin
        .post(
            "/resources",
            json!({ "kind": "news", "scope": "feed", "title": "Draft", "isActive": false }),
        )
        .await
        .unwrap();

    let anonymous = harness.api().get("/resources?kind=news&scope=feed&all=true").await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
    assert!(!anonymous.success());
    assert!(anonymous.body.get("data").is_none());

    let editor = harness
        .editor()
        .get("/resources?kind=news&scope=feed&all=true")
        .await;
    assert_eq!(editor.status, StatusCode::UNAUTHORIZED);
    assert_eq!(editor.error(), Some("Unauthorized: Admin access required"));

    let full = admin.get("/resources?kind=news&scope=feed&all=true").await;
    assert!(full.success());
    assert_eq!(full.orders(), vec![1, 2]);
}

#[tokio::test]
async fn list_without_kind_is_a_validation_error() {
    let harness = TestHarness::new();

    let missing = harness.api().get("/resources").await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert!(!missing.success());

    let unknown = harness.api().get("/resources?kind=podcast").await;
    assert_eq!(unknown.status, StatusCode::BAD_REQUEST);
    assert!(unknown.error().unwrap_or_default().contains("podcast"));

    let malformed = harness.api().get("/resources?kind=news&all=maybe").await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn library_items_are_partitioned_by_category() {
    let harness = TestHarness::new();
    let admin = harness.admin();
    admin
        .post(
            "/resources",
            json!({ "kind": "libraryItem/video", "title": "Talk", "url": "https://video.example.org/1" }),
        )
        .await
        .unwrap();
    admin
        .post(
            "/resources",
            json!({ "kind": "libraryItem/book", "title": "Handbook" }),
        )
        .await
        .unwrap();

    let videos = harness.api().get("/resources?kind=libraryItem/video").await;
    let data = videos.unwrap();
    assert_eq!(data.as_array().map(Vec::len), Some(1));
    assert_eq!(data[0]["kind"], "libraryItem/video");
    assert_eq!(data[0]["order"], 1);
}

#[tokio::test]
async fn single_record_lookup_hides_inactive_from_public() {
    let harness = TestHarness::new();
    let admin = harness.admin();
    let hidden = admin
        .post(
            "/resources",
            json!({ "kind": "news", "title": "Embargoed", "isActive": false }),
        )
        .await
        .unwrap();
    let id = id_of(&hidden);

    let public = harness.api().get(&format!("/resources?id={}", id)).await;
    assert_eq!(public.status, StatusCode::NOT_FOUND);

    let full = admin.get(&format!("/resources?id={}&all=true", id)).await;
    assert_eq!(full.unwrap()["title"], "Embargoed");
}

// ============================================================================
// Create
// ============================================================================

#[tokio::test]
async fn create_as_admin_succeeds() {
    let harness = TestHarness::new();

    let result = harness
        .admin()
        .post(
            "/resources",
            json!({
                "kind": "partner",
                "scope": "sponsors",
                "name": "Acme",
                "url": "https://acme.example.org",
                "logo": "https://acme.example.org/logo.png"
            }),
        )
        .await;

    assert_eq!(result.status, StatusCode::CREATED);
    let record = result.unwrap();
    assert_eq!(record["kind"], "partner");
    assert_eq!(record["scope"], "sponsors");
    assert_eq!(record["order"], 1);
    assert_eq!(record["isActive"], true);
    assert_eq!(record["isFeatured"], false);
    assert_eq!(record["name"], "Acme");
    assert!(record["createdAt"].is_string());
}

#[tokio::test]
async fn create_as_non_admin_fails() {
    let harness = TestHarness::new();

    let result = harness
        .editor()
        .post("/resources", json!({ "kind": "news", "title": "Nope" }))
        .await;

    assert_eq!(result.status, StatusCode::UNAUTHORIZED);
    assert!(!result.success());

    let listed = harness.admin().get("/resources?kind=news&all=true").await;
    assert_eq!(listed.unwrap(), json!([]));
}

#[tokio::test]
async fn create_unauthenticated_fails() {
    let harness = TestHarness::new();

    let result = harness
        .api()
        .post("/resources", json!({ "kind": "news", "title": "Nope" }))
        .await;
    assert_eq!(result.status, StatusCode::UNAUTHORIZED);
    assert_eq!(result.error(), Some("Unauthorized: Authentication required"));

    // Authorization is checked before the body is looked at
    let malformed = harness.api().post("/resources", json!({ "kind": 7 })).await;
    assert_eq!(malformed.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_with_forged_token_fails() {
    let harness = TestHarness::new();
    let forged = server_core::domains::auth::JwtService::new("other_secret", "test_issuer".into())
        .create_token("mallory", true)
        .unwrap();

    let result = harness
        .api()
        .with_token(forged)
        .post("/resources", json!({ "kind": "news", "title": "Nope" }))
        .await;

    assert_eq!(result.status, StatusCode::UNAUTHORIZED);
    assert_eq!(result.error(), Some("Unauthorized: Invalid or expired token"));
}

#[tokio::test]
async fn create_validates_required_fields() {
    let harness = TestHarness::new();
    let admin = harness.admin();

    let no_title = admin.post("/resources", json!({ "kind": "news" })).await;
    assert_eq!(no_title.status, StatusCode::BAD_REQUEST);
    assert!(!no_title.success());

    let no_url = admin
        .post("/resources", json!({ "kind": "toolkit", "title": "Kit" }))
        .await;
    assert_eq!(no_url.status, StatusCode::BAD_REQUEST);

    let featured_member = admin
        .post(
            "/resources",
            json!({ "kind": "teamMember", "name": "Ada", "isFeatured": true }),
        )
        .await;
    assert_eq!(featured_member.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_rejects_unknown_and_unsafe_fields() {
    let harness = TestHarness::new();
    let admin = harness.admin();

    let typo = admin
        .post("/resources", json!({ "kind": "news", "title": "Ruling", "sumary": "x" }))
        .await;
    assert_eq!(typo.status, StatusCode::BAD_REQUEST);
    assert!(typo.error().unwrap_or_default().contains("sumary"));

    let script_link = admin
        .post(
            "/resources",
            json!({ "kind": "slide", "title": "Donate", "ctaUrl": "javascript:alert(1)" }),
        )
        .await;
    assert_eq!(script_link.status, StatusCode::BAD_REQUEST);

    let listed = admin.get("/resources?kind=news&all=true").await.unwrap();
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn create_after_maximum_order_asks_for_compact() {
    let harness = TestHarness::new();
    let admin = harness.admin();
    admin
        .post(
            "/resources",
            json!({ "kind": "news", "scope": "edge", "title": "Last", "order": i32::MAX }),
        )
        .await
        .unwrap();

    let appended = admin
        .post("/resources", json!({ "kind": "news", "scope": "edge", "title": "Next" }))
        .await;
    assert_eq!(appended.status, StatusCode::BAD_REQUEST);
    assert!(appended.error().unwrap_or_default().contains("compact"));
}

// ============================================================================
// Update and delete
// ============================================================================

#[tokio::test]
async fn update_accepts_a_record_echoed_back() {
    let harness = TestHarness::new();
    let admin = harness.admin();
    let created = create_news(&admin, "Draft", "blog").await;

    let mut echoed = created.clone();
    echoed["title"] = json!("Published");
    let updated = admin.put("/resources", echoed).await.unwrap();

    assert_eq!(updated["title"], "Published");
    assert_eq!(updated["order"], created["order"]);
    assert_eq!(updated["createdAt"], created["createdAt"]);
}

#[tokio::test]
async fn update_rejects_unknown_fields() {
    let harness = TestHarness::new();
    let admin = harness.admin();
    let created = create_news(&admin, "Draft", "blog").await;

    let result = admin
        .put("/resources", json!({ "id": id_of(&created), "headline": "New" }))
        .await;
    assert_eq!(result.status, StatusCode::BAD_REQUEST);

    let unchanged = admin
        .get(&format!("/resources?id={}", id_of(&created)))
        .await
        .unwrap();
    assert_eq!(unchanged["title"], "Draft");
}

#[tokio::test]
async fn update_as_admin_merges_fields() {
    let harness = TestHarness::new();
    let admin = harness.admin();
    let created = create_news(&admin, "Draft", "blog").await;

    let updated = admin
        .put(
            "/resources",
            json!({ "id": id_of(&created), "title": "Published", "isFeatured": true }),
        )
        .await
        .unwrap();

    assert_eq!(updated["title"], "Published");
    assert_eq!(updated["isFeatured"], true);
    assert_eq!(updated["order"], created["order"]);
    assert_eq!(updated["scope"], "blog");
}

#[tokio::test]
async fn update_as_non_admin_fails() {
    let harness = TestHarness::new();
    let created = create_news(&harness.admin(), "Draft", "blog").await;

    let result = harness
        .editor()
        .put("/resources", json!({ "id": id_of(&created), "title": "Hacked" }))
        .await;
    assert_eq!(result.status, StatusCode::UNAUTHORIZED);

    let unchanged = harness
        .api()
        .get(&format!("/resources?id={}", id_of(&created)))
        .await
        .unwrap();
    assert_eq!(unchanged["title"], "Draft");
}

#[tokio::test]
async fn delete_then_lookup_is_not_found() {
    let harness = TestHarness::new();
    let admin = harness.admin();
    let created = create_news(&admin, "Temporary", "tmp").await;
    let id = id_of(&created);

    let unauthenticated = harness.api().delete(&format!("/resources?id={}", id)).await;
    assert_eq!(unauthenticated.status, StatusCode::UNAUTHORIZED);

    let deleted = admin.delete(&format!("/resources?id={}", id)).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body, json!({ "success": true }));

    let lookup = admin.get(&format!("/resources?id={}&all=true", id)).await;
    assert_eq!(lookup.status, StatusCode::NOT_FOUND);

    let update = admin
        .put("/resources", json!({ "id": id, "title": "Again" }))
        .await;
    assert_eq!(update.status, StatusCode::NOT_FOUND);

    let again = admin.delete(&format!("/resources?id={}", id)).await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_requires_valid_id() {
    let harness = TestHarness::new();
    let admin = harness.admin();

    let missing = admin.delete("/resources").await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);

    let garbage = admin.delete("/resources?id=not-a-uuid").await;
    assert_eq!(garbage.status, StatusCode::BAD_REQUEST);
}

// ============================================================================
// Ordering endpoints
// ============================================================================

#[tokio::test]
async fn move_endpoint_swaps_neighbours() {
    let harness = TestHarness::new();
    let admin = harness.admin();
    let a = create_news(&admin, "A", "move").await;
    let b = create_news(&admin, "B", "move").await;
    let c = create_news(&admin, "C", "move").await;

    let result = admin
        .post(
            "/resources/move",
            json!({ "id": id_of(&b), "direction": "up" }),
        )
        .await;

    assert!(result.success());
    assert_eq!(ids_of(result.data()), vec![id_of(&b), id_of(&a), id_of(&c)]);
    assert_eq!(result.orders(), vec![1, 2, 3]);

    let noop = admin
        .post(
            "/resources/move",
            json!({ "id": id_of(&b), "direction": "up" }),
        )
        .await;
    assert_eq!(noop.orders(), vec![1, 2, 3]);
    assert_eq!(ids_of(noop.data()), vec![id_of(&b), id_of(&a), id_of(&c)]);

    let bad_direction = admin
        .post(
            "/resources/move",
            json!({ "id": id_of(&b), "direction": "sideways" }),
        )
        .await;
    assert_eq!(bad_direction.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn reorder_endpoint_applies_arrangement() {
    let harness = TestHarness::new();
    let admin = harness.admin();
    let a = create_news(&admin, "A", "arrange").await;
    let b = create_news(&admin, "B", "arrange").await;
    let c = create_news(&admin, "C", "arrange").await;

    let result = admin
        .post(
            "/resources/reorder",
            json!({
                "kind": "news",
                "scope": "arrange",
                "command": { "type": "arrange", "ids": [id_of(&c), id_of(&a), id_of(&b)] }
            }),
        )
        .await;

    assert!(result.success());
    assert_eq!(ids_of(result.data()), vec![id_of(&c), id_of(&a), id_of(&b)]);

    let swapped = admin
        .post(
            "/resources/reorder",
            json!({
                "kind": "news",
                "scope": "arrange",
                "command": { "type": "swap", "first": id_of(&c), "second": id_of(&b) }
            }),
        )
        .await;
    assert_eq!(ids_of(swapped.data()), vec![id_of(&b), id_of(&a), id_of(&c)]);

    let forbidden = harness
        .editor()
        .post(
            "/resources/reorder",
            json!({ "kind": "news", "scope": "arrange", "command": { "type": "compact" } }),
        )
        .await;
    assert_eq!(forbidden.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn compact_endpoint_closes_gaps_after_delete() {
    let harness = TestHarness::new();
    let admin = harness.admin();
    let a = create_news(&admin, "A", "arbitration").await;
    let b = create_news(&admin, "B", "arbitration").await;
    let c = create_news(&admin, "C", "arbitration").await;

    admin
        .delete(&format!("/resources?id={}", id_of(&b)))
        .await
        .unwrap();

    let gappy = admin
        .get("/resources?kind=news&scope=arbitration&all=true")
        .await;
    assert_eq!(gappy.orders(), vec![1, 3]);

    let compacted = admin
        .post(
            "/resources/compact",
            json!({ "kind": "news", "scope": "arbitration" }),
        )
        .await;
    assert!(compacted.success());
    assert_eq!(ids_of(compacted.data()), vec![id_of(&a), id_of(&c)]);
    assert_eq!(compacted.orders(), vec![1, 2]);

    let unauthenticated = harness
        .api()
        .post(
            "/resources/compact",
            json!({ "kind": "news", "scope": "arbitration" }),
        )
        .await;
    assert_eq!(unauthenticated.status, StatusCode::UNAUTHORIZED);
}
