//! Shared test utilities for Atlas API tests.

// Allow dead_code because helpers are used across different test files, but
// each test binary is analyzed independently.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use atlas_api::http::{create_router, AppState};
use atlas_storage::{CatalogStore, MemoryCatalogStore, NewAnimal, NewCountry};

/// Create a test app with in-memory storage.
///
/// Each call creates a fresh `AppState` wrapping the shared storage, which
/// is the correct pattern for Axum's `oneshot` testing.
pub fn create_test_app(storage: &Arc<MemoryCatalogStore>) -> axum::Router {
    let state = AppState::new(Arc::clone(storage));
    create_router(state)
}

fn request(
    method: &str,
    uri: &str,
    user_id: Option<i64>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user_id) = user_id {
        builder = builder.header("x-user-id", user_id.to_string());
    }
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: axum::Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::json!(null)
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            serde_json::json!({ "raw_body": String::from_utf8_lossy(&bytes).to_string() })
        })
    };
    (status, json)
}

pub async fn get_json(
    app: axum::Router,
    uri: &str,
    user_id: Option<i64>,
) -> (StatusCode, serde_json::Value) {
    send(app, request("GET", uri, user_id, None)).await
}

pub async fn post_json(
    app: axum::Router,
    uri: &str,
    body: serde_json::Value,
    user_id: Option<i64>,
) -> (StatusCode, serde_json::Value) {
    send(app, request("POST", uri, user_id, Some(body))).await
}

pub async fn patch_json(
    app: axum::Router,
    uri: &str,
    body: serde_json::Value,
    user_id: Option<i64>,
) -> (StatusCode, serde_json::Value) {
    send(app, request("PATCH", uri, user_id, Some(body))).await
}

pub async fn delete_json(
    app: axum::Router,
    uri: &str,
    user_id: Option<i64>,
) -> (StatusCode, serde_json::Value) {
    send(app, request("DELETE", uri, user_id, None)).await
}

/// Ids of the seeded organizational fixture.
pub struct Tree {
    pub root: i64,
    pub child: i64,
    pub grandchild: i64,
    pub unrelated: i64,
}

/// Seeds Root → Child → Grandchild plus an unrelated root, one user
/// ("alice", id 1) granted the root, and one user ("eve", id 2) granted the
/// unrelated node.
pub async fn seed_tree(storage: &MemoryCatalogStore) -> Tree {
    let alice = storage.create_user("alice", "alice@example.com").await.unwrap();
    let eve = storage.create_user("eve", "eve@example.com").await.unwrap();

    let root = storage.create_domain("root", None, alice.id).await.unwrap();
    let child = storage
        .create_domain("child", Some(root.id), alice.id)
        .await
        .unwrap();
    let grandchild = storage
        .create_domain("grandchild", Some(child.id), alice.id)
        .await
        .unwrap();
    let unrelated = storage
        .create_domain("unrelated", None, alice.id)
        .await
        .unwrap();

    storage.grant_access(alice.id, root.id, alice.id).await.unwrap();
    storage
        .grant_access(eve.id, unrelated.id, alice.id)
        .await
        .unwrap();

    Tree {
        root: root.id,
        child: child.id,
        grandchild: grandchild.id,
        unrelated: unrelated.id,
    }
}

/// Seeds one country per continent across the fixture's domains.
pub async fn seed_countries(storage: &MemoryCatalogStore, tree: &Tree) {
    for (name, continent, population, domain_id) in [
        ("Nigeria", "africa", 206_139_589, tree.root),
        ("China", "asia", 1_402_112_000, tree.child),
        ("France", "europe", 67_081_000, tree.child),
        ("United States", "northamerica", 331_893_745, tree.grandchild),
        ("Brazil", "southamerica", 212_559_417, tree.grandchild),
        ("Australia", "oceania", 25_687_041, tree.unrelated),
    ] {
        storage
            .create_country(NewCountry {
                name: name.to_string(),
                capital: None,
                population: Some(population),
                area: None,
                currency: None,
                continent: continent.to_string(),
                domain_id: Some(domain_id),
            })
            .await
            .unwrap();
    }
}

/// Seeds a handful of animals in the root domain.
pub async fn seed_animals(storage: &MemoryCatalogStore, tree: &Tree) {
    for (name, species, category) in [
        ("African Elephant", "Loxodonta africana", "mammal"),
        ("Bald Eagle", "Haliaeetus leucocephalus", "bird"),
        ("Komodo Dragon", "Varanus komodoensis", "reptile"),
    ] {
        storage
            .create_animal(NewAnimal {
                name: name.to_string(),
                species: Some(species.to_string()),
                category: category.to_string(),
                habitat: None,
                diet: None,
                conservation_status: None,
                domain_id: Some(tree.root),
            })
            .await
            .unwrap();
    }
}

/// Extracts record names from a paginated `data` array.
pub fn names_of(body: &serde_json::Value) -> Vec<String> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap().to_string())
        .collect()
}
