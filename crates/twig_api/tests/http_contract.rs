use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use twig_api::{router, ApiConfig, AppState};
use twig_core::{StoreRoot, TenantPool};

const BASE: &str = "http://twig.test";

fn app() -> Router {
    let config = ApiConfig::new(BASE, "default").unwrap();
    router(AppState::new(TenantPool::new(StoreRoot::Memory), config))
}

async fn call(
    app: &Router,
    method: Method,
    path: &str,
    actor: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    call_as(app, method, path, actor, None, body).await
}

async fn call_as(
    app: &Router,
    method: Method,
    path: &str,
    actor: Option<&str>,
    tenant: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(actor) = actor {
        builder = builder.header("x-twig-user", actor);
    }
    if let Some(tenant) = tenant {
        builder = builder.header("x-twig-tenant", tenant);
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn model_body(name: &str) -> Value {
    json!({
        "name": name,
        "entities": {
            "ent1": { "class": "ent1", "color": "#008800", "image": "1", "size": "40", "type": "type" },
            "ent2": { "class": "ent2", "image": "2" }
        },
        "commitMessage": "initial commit"
    })
}

async fn create_model(app: &Router, name: &str) -> Value {
    let (status, body) = call(app, Method::POST, "/models", Some("ada"), Some(model_body(name))).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

async fn create_twiglet(app: &Router, name: &str, model: &str) -> Value {
    let (status, body) = call(
        app,
        Method::POST,
        "/twiglets",
        Some("ada"),
        Some(json!({
            "name": name,
            "description": format!("{name} description"),
            "model": model,
            "commitMessage": "initial twiglet"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

#[tokio::test]
async fn ping_reports_version() {
    let app = app();
    let (status, body) = call(&app, Method::GET, "/ping", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ping"], "pong");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn model_create_returns_view_without_commit_message() {
    let app = app();
    let body = create_model(&app, "bsc").await;

    assert_eq!(body["name"], "bsc");
    assert_eq!(body["url"], format!("{BASE}/models/bsc"));
    assert_eq!(body["changelog_url"], format!("{BASE}/models/bsc/changelog"));
    assert!(body["_rev"].is_string());
    assert!(body.get("revision").is_none());
    assert_eq!(body["entities"]["ent2"], json!({ "class": "ent2", "image": "2" }));
    assert!(body.get("commitMessage").is_none());
    assert!(body.get("changelog").is_none());
}

#[tokio::test]
async fn model_get_list_and_changelog() {
    let app = app();
    create_model(&app, "bsc").await;

    let (status, body) = call(&app, Method::GET, "/models/bsc", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entities"]["ent1"]["type"], "type");

    let (status, list) = call(&app, Method::GET, "/models", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list, json!([{ "name": "bsc", "url": format!("{BASE}/models/bsc") }]));

    let (status, log) = call(&app, Method::GET, "/models/bsc/changelog", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let entries = log["changelog"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["message"], "initial commit");
    assert_eq!(entries[0]["actor"], "ada");
}

#[tokio::test]
async fn duplicate_model_is_409() {
    let app = app();
    create_model(&app, "dup").await;
    let (status, body) = call(&app, Method::POST, "/models", Some("ada"), Some(model_body("dup"))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "name_taken");
}

#[tokio::test]
async fn stale_update_is_409_with_current_revision() {
    let app = app();
    let created = create_model(&app, "bsc").await;
    let r1 = created["_rev"].clone();

    let mut update = model_body("bsc");
    update["_rev"] = r1.clone();
    update["commitMessage"] = json!("first edit");
    let (status, first) = call(&app, Method::PUT, "/models/bsc", Some("ada"), Some(update.clone())).await;
    assert_eq!(status, StatusCode::OK, "{first}");
    assert_ne!(first["_rev"], r1);

    update["commitMessage"] = json!("second edit");
    let (status, conflict) = call(&app, Method::PUT, "/models/bsc", Some("grace"), Some(update)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(conflict["error"], "stale_revision");
    assert_eq!(conflict["_rev"], first["_rev"]);

    let (_, log) = call(&app, Method::GET, "/models/bsc/changelog", None, None).await;
    assert_eq!(log["changelog"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn mutating_routes_require_actor_but_reads_do_not() {
    let app = app();
    let (status, body) = call(&app, Method::POST, "/models", None, Some(model_body("bsc"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");

    let (status, _) = call(&app, Method::DELETE, "/models/bsc", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = call(&app, Method::GET, "/models", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn malformed_payloads_are_400() {
    let app = app();
    let (status, body) = call(
        &app,
        Method::POST,
        "/models",
        Some("ada"),
        Some(json!({ "name": "bsc", "entities": {} })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_failed");

    let (status, _) = call(
        &app,
        Method::POST,
        "/models",
        Some("ada"),
        Some(json!({ "name": "a/b", "entities": {}, "commitMessage": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_then_get_and_delete_are_404() {
    let app = app();
    create_model(&app, "x").await;

    let (status, body) = call(&app, Method::DELETE, "/models/x", Some("ada"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = call(&app, Method::GET, "/models/x", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, body) = call(&app, Method::DELETE, "/models/x", Some("ada"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn tenants_are_isolated() {
    let app = app();
    let (status, _) = call_as(&app, Method::POST, "/models", Some("ada"), Some("acme"), Some(model_body("bsc"))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = call_as(&app, Method::GET, "/models/bsc", None, Some("acme"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&app, Method::GET, "/models/bsc", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = call_as(&app, Method::GET, "/models", None, Some("../etc"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_tenant");
}

#[tokio::test]
async fn twiglet_needs_existing_model() {
    let app = app();
    let (status, body) = call(
        &app,
        Method::POST,
        "/twiglets",
        Some("ada"),
        Some(json!({ "name": "t1", "model": "missing", "commitMessage": "init" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn twiglet_clone_copies_graph_and_stays_isolated() {
    let app = app();
    create_model(&app, "bsc").await;
    let a = create_twiglet(&app, "a", "bsc").await;
    assert_eq!(a["model_url"], format!("{BASE}/models/bsc"));

    let (status, a) = call(
        &app,
        Method::PUT,
        "/twiglets/a",
        Some("ada"),
        Some(json!({
            "name": "a",
            "description": "a description",
            "nodes": [{ "a": "node" }],
            "links": [{ "a": "link" }],
            "_rev": a["_rev"],
            "commitMessage": "add graph"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{a}");
    assert_eq!(a["model"], "bsc");

    let (status, b) = call(
        &app,
        Method::POST,
        "/twiglets",
        Some("grace"),
        Some(json!({
            "name": "b",
            "description": "b description",
            "cloneTwiglet": "a",
            "commitMessage": "clone a"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{b}");
    assert_eq!(b["name"], "b");
    assert_eq!(b["description"], "b description");
    assert_eq!(b["nodes"], json!([{ "a": "node" }]));

    let (status, _) = call(
        &app,
        Method::PUT,
        "/twiglets/a",
        Some("ada"),
        Some(json!({
            "name": "a",
            "description": "a description",
            "nodes": [{ "a": "changed" }],
            "links": [],
            "_rev": a["_rev"],
            "commitMessage": "edit graph"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, b) = call(&app, Method::GET, "/twiglets/b", None, None).await;
    assert_eq!(b["nodes"], json!([{ "a": "node" }]));
    assert_eq!(b["links"], json!([{ "a": "link" }]));

    let (_, log) = call(&app, Method::GET, "/twiglets/b/changelog", None, None).await;
    let entries = log["changelog"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["message"], "clone a");
}

#[tokio::test]
async fn clone_from_missing_source_is_404() {
    let app = app();
    let (status, _) = call(
        &app,
        Method::POST,
        "/twiglets",
        Some("ada"),
        Some(json!({ "name": "b", "cloneTwiglet": "nope", "commitMessage": "clone" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn twiglet_rename_moves_url() {
    let app = app();
    create_model(&app, "bsc").await;
    let t = create_twiglet(&app, "old", "bsc").await;

    let (status, renamed) = call(
        &app,
        Method::PUT,
        "/twiglets/old",
        Some("ada"),
        Some(json!({
            "name": "new",
            "description": "renamed",
            "nodes": [],
            "links": [],
            "_rev": t["_rev"],
            "commitMessage": "rename"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{renamed}");
    assert_eq!(renamed["url"], format!("{BASE}/twiglets/new"));

    let (status, _) = call(&app, Method::GET, "/twiglets/old", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, list) = call(&app, Method::GET, "/twiglets", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list, json!([{ "name": "new", "url": format!("{BASE}/twiglets/new") }]));
}
