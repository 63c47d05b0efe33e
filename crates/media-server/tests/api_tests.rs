use media_core::{Entry, Store};
use media_server::{build_router, AppState, DeleteResponse, EntryLookup, ErrorResponse};
use serde_json::{json, Value};
use tempfile::TempDir;

/// Spin up the HTTP server on an OS-assigned port, returning the base URL.
async fn spawn_test_server(temp_dir: &TempDir) -> String {
    let store = Store::open(temp_dir.path().join("media.json")).unwrap();
    let app = build_router(AppState::new(store));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://127.0.0.1:{}", port)
}

fn dune() -> Value {
    json!({
        "name": "Dune",
        "author": "Herbert",
        "date": "01-01-1965",
        "category": "Books"
    })
}

async fn create(client: &reqwest::Client, base: &str, body: Value) -> Entry {
    let resp = client
        .post(format!("{}/media", base))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    resp.json().await.unwrap()
}

#[tokio::test]
async fn dune_scenario() {
    let temp_dir = TempDir::new().unwrap();
    let base = spawn_test_server(&temp_dir).await;
    let client = reqwest::Client::new();

    let created = create(&client, &base, dune()).await;
    assert!(!created.id.is_empty());
    assert_eq!(created.name, "Dune");

    let books: Vec<Entry> = client
        .get(format!("{}/media/category/Books", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(books.contains(&created));

    let resp = client
        .delete(format!("{}/media/{}", base, created.id))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: DeleteResponse = resp.json().await.unwrap();
    assert!(body.success);

    let resp = client
        .get(format!("{}/media/{}", base, created.id))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({}));
}

#[tokio::test]
async fn list_all_returns_created_entries() {
    let temp_dir = TempDir::new().unwrap();
    let base = spawn_test_server(&temp_dir).await;
    let client = reqwest::Client::new();

    let empty: Vec<Entry> = reqwest::get(format!("{}/media", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(empty.is_empty());

    let first = create(&client, &base, dune()).await;
    let second = create(
        &client,
        &base,
        json!({"name": "Alien", "author": "Scott", "date": "25-05-1979", "category": "Movies"}),
    )
    .await;
    assert_ne!(first.id, second.id);

    let all: Vec<Entry> = reqwest::get(format!("{}/media", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all, vec![first, second]);
}

#[tokio::test]
async fn create_missing_field_returns_400() {
    let temp_dir = TempDir::new().unwrap();
    let base = spawn_test_server(&temp_dir).await;
    let client = reqwest::Client::new();

    for field in ["name", "author", "date", "category"] {
        let mut body = dune();
        body.as_object_mut().unwrap().remove(field);

        let resp = client
            .post(format!("{}/media", base))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400, "without {}", field);
        let err: ErrorResponse = resp.json().await.unwrap();
        assert_eq!(err.error, "missing fields");
    }

    let all: Vec<Entry> = reqwest::get(format!("{}/media", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(all.is_empty());
}

#[tokio::test]
async fn create_with_unparsable_body_returns_400() {
    let temp_dir = TempDir::new().unwrap();
    let base = spawn_test_server(&temp_dir).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/media", base))
        .header("content-type", "application/json")
        .body("not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let resp = client
        .post(format!("{}/media", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn category_lookup_ignores_case() {
    let temp_dir = TempDir::new().unwrap();
    let base = spawn_test_server(&temp_dir).await;
    let client = reqwest::Client::new();

    create(&client, &base, dune()).await;

    let upper: Vec<Entry> = reqwest::get(format!("{}/media/category/Books", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let lower: Vec<Entry> = reqwest::get(format!("{}/media/category/books", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(upper.len(), 1);
    assert_eq!(upper, lower);

    let none: Vec<Entry> = reqwest::get(format!("{}/media/category/Magazines", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn search_returns_first_match_or_empty_object() {
    let temp_dir = TempDir::new().unwrap();
    let base = spawn_test_server(&temp_dir).await;
    let client = reqwest::Client::new();

    let first = create(&client, &base, dune()).await;
    create(
        &client,
        &base,
        json!({"name": "DUNE", "author": "Villeneuve", "date": "22-10-2021", "category": "Movies"}),
    )
    .await;

    let found: EntryLookup = reqwest::get(format!("{}/media/search?name=dune", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(found.into_entry(), Some(first));

    let missing: Value = reqwest::get(format!("{}/media/search?name=Emma", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(missing, json!({}));

    let no_param: Value = reqwest::get(format!("{}/media/search", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(no_param, json!({}));
}

#[tokio::test]
async fn delete_unknown_id_returns_404() {
    let temp_dir = TempDir::new().unwrap();
    let base = spawn_test_server(&temp_dir).await;
    let client = reqwest::Client::new();

    create(&client, &base, dune()).await;

    let resp = client
        .delete(format!("{}/media/not-an-id", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: DeleteResponse = resp.json().await.unwrap();
    assert!(!body.success);

    let all: Vec<Entry> = reqwest::get(format!("{}/media", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn created_entries_reach_the_file() {
    let temp_dir = TempDir::new().unwrap();
    let base = spawn_test_server(&temp_dir).await;
    let client = reqwest::Client::new();

    let created = create(&client, &base, dune()).await;

    let content = std::fs::read_to_string(temp_dir.path().join("media.json")).unwrap();
    let on_disk: Value = serde_json::from_str(&content).unwrap();
    assert_eq!(on_disk[created.id.as_str()]["name"], "Dune");

    let reopened = Store::open(temp_dir.path().join("media.json")).unwrap();
    assert_eq!(reopened.get_by_id(&created.id), Some(created));
}

#[tokio::test]
async fn concurrent_creates_are_all_persisted() {
    let temp_dir = TempDir::new().unwrap();
    let base = spawn_test_server(&temp_dir).await;
    let client = reqwest::Client::new();

    let mut tasks = Vec::new();
    for i in 0..16 {
        let client = client.clone();
        let base = base.clone();
        tasks.push(tokio::spawn(async move {
            let body = json!({
                "name": format!("Issue {}", i),
                "author": "Editor",
                "date": "01-01-2020",
                "category": "Magazines"
            });
            create(&client, &base, body).await
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    let reopened = Store::open(temp_dir.path().join("media.json")).unwrap();
    assert_eq!(reopened.len(), 16);
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let temp_dir = TempDir::new().unwrap();
    let base = spawn_test_server(&temp_dir).await;

    let resp = reqwest::get(format!("{}/books", base)).await.unwrap();
    assert_eq!(resp.status(), 404);
}
