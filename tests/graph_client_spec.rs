//! GraphClient and GraphPageStore against an in-process fake of the OneNote API.

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use onenote_import::auth::Token;
use onenote_import::graph::{ClientError, GraphClient, GraphPageStore, PageStore};
use onenote_import::models::{ItemError, RemotePageRef};

const GOOD_TOKEN: &str = "good-token";

type Received = Arc<Mutex<Vec<String>>>;

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {}", GOOD_TOKEN))
}

async fn notebooks(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "expired" })));
    }
    (
        StatusCode::OK,
        Json(json!({ "value": [
            { "id": "nb-1", "displayName": "Personal" },
            { "id": "nb-2", "displayName": "Courses" }
        ]})),
    )
}

async fn sections(headers: HeaderMap, Path(notebook_id): Path<String>) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({})));
    }
    if notebook_id == "nb-garbled" {
        return (StatusCode::OK, Json(json!({ "items": [] })));
    }
    if notebook_id != "nb-2" {
        return (StatusCode::NOT_FOUND, Json(json!({ "error": "no such notebook" })));
    }
    (
        StatusCode::OK,
        Json(json!({ "value": [{ "id": "sec-1", "displayName": "Rust 101" }] })),
    )
}

async fn create_page(
    State(received): State<Received>,
    headers: HeaderMap,
    Path(section_id): Path<String>,
    body: String,
) -> Response {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({}))).into_response();
    }
    if section_id != "sec-1" {
        return (StatusCode::NOT_FOUND, Json(json!({ "error": "section not found" }))).into_response();
    }
    if body.contains("REJECT") {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "title rejected" }))).into_response();
    }
    if body.contains("BUSY") {
        return (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "error": "busy" }))).into_response();
    }

    let mut received = received.lock().unwrap();
    let terse = body.contains("TERSE");
    received.push(body);
    let id = format!("page-{}", received.len());

    if terse {
        // Created, but the body carries nothing the client can decode.
        let location = format!("https://graph.example/v1.0/me/onenote/pages/{}", id);
        return (
            StatusCode::CREATED,
            [(header::LOCATION, location)],
            Json(json!({ "self": "no id field" })),
        )
            .into_response();
    }

    (
        StatusCode::CREATED,
        Json(json!({
            "id": id,
            "links": { "oneNoteWebUrl": { "href": format!("https://onenote.example/{}", id) } }
        })),
    )
        .into_response()
}

/// Start the fake API on an ephemeral port.
async fn start_server() -> (String, Received) {
    let received: Received = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/me/onenote/notebooks", get(notebooks))
        .route("/me/onenote/notebooks/{id}/sections", get(sections))
        .route("/me/onenote/sections/{id}/pages", post(create_page))
        .with_state(received.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("No local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    (format!("http://{}", addr), received)
}

fn good() -> Token {
    Token::new(GOOD_TOKEN, 3600)
}

fn stale() -> Token {
    Token::new("stale-token", 3600)
}

mod client {
    use super::*;

    #[tokio::test]
    async fn lists_notebooks() {
        let (url, _) = start_server().await;
        let client = GraphClient::new(url);

        let notebooks = client.list_notebooks(&good()).await.expect("Request failed");
        let names: Vec<&str> = notebooks.iter().map(|n| n.display_name.as_str()).collect();
        assert_eq!(names, vec!["Personal", "Courses"]);
    }

    #[tokio::test]
    async fn finds_containers_ignoring_case() {
        let (url, _) = start_server().await;
        let client = GraphClient::new(url);

        let notebook = client
            .find_notebook_by_name(&good(), "courses")
            .await
            .expect("Request failed")
            .expect("Notebook missing");
        assert_eq!(notebook.id, "nb-2");

        let section = client
            .find_section_by_name(&good(), &notebook.id, "RUST 101")
            .await
            .expect("Request failed");
        assert_eq!(section.map(|s| s.id), Some("sec-1".to_string()));

        let missing = client
            .find_notebook_by_name(&good(), "Work")
            .await
            .expect("Request failed");
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn maps_401_to_unauthorized() {
        let (url, _) = start_server().await;
        let client = GraphClient::new(url);

        let err = client.list_notebooks(&stale()).await.unwrap_err();
        assert!(matches!(err, ClientError::Unauthorized));
    }

    #[tokio::test]
    async fn keeps_undecodable_listings_apart_from_transport_errors() {
        let (url, _) = start_server().await;
        let client = GraphClient::new(url);

        let err = client.list_sections(&good(), "nb-garbled").await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn maps_404_to_not_found() {
        let (url, _) = start_server().await;
        let client = GraphClient::new(url);

        let err = client.list_sections(&good(), "nb-404").await.unwrap_err();
        assert!(matches!(err, ClientError::NotFound(_)));
    }
}

mod page_store {
    use super::*;

    #[tokio::test]
    async fn creates_a_page_with_its_web_url() {
        let (url, received) = start_server().await;
        let store = GraphPageStore::new(GraphClient::new(url), "sec-1");

        let page = store
            .create_page(&good(), None, "1. Week 1", "Rust Fundamentals")
            .await
            .expect("Create failed");

        assert_eq!(page.id, "page-1");
        assert_eq!(page.title, "1. Week 1");
        assert_eq!(page.web_url.as_deref(), Some("https://onenote.example/page-1"));

        let bodies = received.lock().unwrap();
        assert!(bodies[0].contains("<title>1. Week 1</title>"));
        assert!(bodies[0].contains("<p>Rust Fundamentals</p>"));
    }

    #[tokio::test]
    async fn links_child_pages_to_their_parent() {
        let (url, received) = start_server().await;
        let store = GraphPageStore::new(GraphClient::new(url), "sec-1");
        let parent = RemotePageRef {
            id: "page-0".to_string(),
            title: "1. Week 1".to_string(),
            web_url: Some("https://onenote.example/page-0".to_string()),
        };

        store
            .create_page(&good(), Some(&parent), "1.1. A & B", "")
            .await
            .expect("Create failed");

        let bodies = received.lock().unwrap();
        assert!(bodies[0].contains("<h1>1.1. A &amp; B</h1>"));
        assert!(bodies[0].contains("href=\"https://onenote.example/page-0\""));
    }

    #[tokio::test]
    async fn classifies_failures_per_item() {
        let (url, _) = start_server().await;
        let store = GraphPageStore::new(GraphClient::new(url.clone()), "sec-1");

        let expired = store.create_page(&stale(), None, "A", "").await.unwrap_err();
        assert!(matches!(expired, ItemError::AuthExpired(_)));

        let rejected = store.create_page(&good(), None, "REJECT", "").await.unwrap_err();
        assert!(matches!(rejected, ItemError::RemoteRejected(_)));
        assert!(rejected.detail().contains("title rejected"));

        let busy = store.create_page(&good(), None, "BUSY", "").await.unwrap_err();
        assert!(matches!(busy, ItemError::Transient(_)));

        let wrong_section = GraphPageStore::new(GraphClient::new(url), "sec-404");
        let missing = wrong_section.create_page(&good(), None, "A", "").await.unwrap_err();
        assert!(matches!(missing, ItemError::RemoteRejected(_)));
    }

    #[tokio::test]
    async fn records_a_created_page_even_when_the_body_is_unreadable() {
        let (url, received) = start_server().await;
        let store = GraphPageStore::new(GraphClient::new(url), "sec-1");

        let page = store
            .create_page(&good(), None, "TERSE", "")
            .await
            .expect("A 2xx must count as created");

        assert_eq!(page.id, "page-1");
        assert_eq!(page.title, "TERSE");
        assert!(page.web_url.is_none());
        assert_eq!(received.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn network_errors_are_transient() {
        // Nothing listens on port 9 of the loopback interface.
        let store = GraphPageStore::new(GraphClient::new("http://127.0.0.1:9"), "sec-1");

        let err = store.create_page(&good(), None, "A", "").await.unwrap_err();
        assert!(matches!(err, ItemError::Transient(_)));
    }
}
