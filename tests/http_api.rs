//! End-to-end tests of the HTTP endpoints over a real socket.

use kv_server::ServerConfig;
use reqwest::StatusCode;

mod common;

async fn get(url: String) -> (StatusCode, String) {
    let res = common::client().get(url).send().await.expect("server unreachable");
    (res.status(), res.text().await.unwrap())
}

#[tokio::test]
async fn test_greetings() {
    let server = common::start_server(ServerConfig::default()).await;

    let res = common::client().get(server.url("/")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["content-type"], "application/json");
    assert!(res.headers().contains_key("x-request-id"));
    assert_eq!(res.text().await.unwrap(), r#"{"message":"Hello"}"#);

    let (status, body) = get(server.url("/name?q=World")).await;
    assert_eq!(status, 200);
    assert_eq!(body, r#"{"message":"Hello World!"}"#);

    server.stop().await;
}

#[tokio::test]
async fn test_add_then_get() {
    let server = common::start_server(ServerConfig::default()).await;

    let (status, body) = get(server.url("/add?k=a&v=1")).await;
    assert_eq!(status, 200);
    assert_eq!(body, "Data successfully added");

    let (status, body) = get(server.url("/get?k=a")).await;
    assert_eq!(status, 200);
    assert_eq!(body, r#"{"message":"1"}"#);

    server.stop().await;
}

#[tokio::test]
async fn test_second_add_conflicts() {
    let server = common::start_server(ServerConfig::default()).await;

    get(server.url("/add?k=a&v=1")).await;
    let (status, body) = get(server.url("/add?k=a&v=2")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body.contains("This key:a exists"));

    let (_, body) = get(server.url("/get?k=a")).await;
    assert_eq!(body, r#"{"message":"1"}"#);

    server.stop().await;
}

#[tokio::test]
async fn test_get_missing_key() {
    let server = common::start_server(ServerConfig::default()).await;

    let (status, body) = get(server.url("/get?k=missing")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "Key: 'missing' doesn't exist");

    // The server keeps serving afterwards.
    let (status, _) = get(server.url("/")).await;
    assert_eq!(status, 200);

    server.stop().await;
}

#[tokio::test]
async fn test_values_are_url_decoded() {
    let server = common::start_server(ServerConfig::default()).await;

    let res = common::client()
        .get(server.url("/add"))
        .query(&[("k", "greeting key"), ("v", "hello & goodbye")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    assert_eq!(
        server.store.get("greeting key").await.as_deref(),
        Some("hello & goodbye")
    );

    server.stop().await;
}
