use std::collections::HashMap;

use axum::extract::Query as AxumQuery;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use yuuka_common::item::Query;
use yuuka_common::reqwest::Client;
use yuuka_extractors::prelude::*;

async fn index(AxumQuery(params): AxumQuery<HashMap<String, String>>) -> String {
    if params.get("tags").map(String::as_str) == Some("no_url_first") {
        return match params.get("pid").map(String::as_str) {
            Some("0") => r#"{"@attributes": {"count": 2}, "post": [{"id": 9, "file_url": null}]}"#,
            Some("1") => r#"{
                "@attributes": {"count": 2},
                "post": [{"id": 8, "image": "h.png", "file_url": "http://files/h.png"}]
            }"#,
            _ => r#"{"@attributes": {"count": 2}}"#,
        }
        .to_string();
    }

    if params.get("tags").map(String::as_str) != Some("hayase_yuuka") {
        return r#"{"@attributes": {"count": 0}}"#.to_string();
    }

    let limit = params.get("limit").map(String::as_str);

    match (params.get("pid").map(String::as_str), limit) {
        (Some("0"), Some("1")) => r#"{
            "@attributes": {"count": 3},
            "post": [{"id": 3, "image": "c.png", "file_url": "http://files/c.png"}]
        }"#
        .to_string(),
        (Some("0"), None) => r#"{
            "@attributes": {"count": 3},
            "post": [
                {"id": 3, "image": "c.png", "file_url": "http://files/c.png"},
                {"id": 2, "image": "b.png", "file_url": "http://files/b.png"},
                {"id": 1, "image": "a.png", "file_url": "http://files/a.png"}
            ]
        }"#
        .to_string(),
        _ => r#"{"@attributes": {"count": 3}}"#.to_string(),
    }
}

async fn spawn_server() -> String {
    let app = Router::new()
        .route("/index.php", get(index))
        .route(
            "/down/index.php",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
        )
        .route("/garbage/index.php", get(|| async { "<html>nope</html>" }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn source(base: &str, path: &str) -> GelbooruApi {
    GelbooruApi::new(Client::new(), GelbooruOptions::default())
        .with_endpoint(format!("{}{}", base, path))
}

#[tokio::test]
async fn priming_call_reads_total_count() {
    let base = spawn_server().await;
    let api = source(&base, "/index.php");

    let page = api.fetch(&Query::new("hayase_yuuka"), 0, 1).await.unwrap();

    assert_eq!(page.total, Some(3));
    assert_eq!(page.items.len(), 1);
}

#[tokio::test]
async fn pages_are_enumerated_until_empty() {
    let base = spawn_server().await;
    let api = source(&base, "/index.php");
    let query = Query::new("hayase_yuuka");

    let first = api.fetch(&query, 0, 0).await.unwrap();
    let second = api.fetch(&query, 1, 0).await.unwrap();

    let ids: Vec<u64> = first.items.iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![3, 2, 1]);
    assert_eq!(first.items[2].url, "http://files/a.png");
    assert!(second.is_end());
    assert_eq!(second.total, None);
}

#[tokio::test]
async fn page_without_usable_posts_does_not_end_the_listing() {
    let base = spawn_server().await;
    let api = source(&base, "/index.php");
    let query = Query::new("no_url_first");

    let first = api.fetch(&query, 0, 0).await.unwrap();
    let second = api.fetch(&query, 1, 0).await.unwrap();
    let third = api.fetch(&query, 2, 0).await.unwrap();

    assert!(first.is_empty());
    assert!(!first.is_end());
    assert_eq!(second.items[0].file_name, "h.png");
    assert!(third.is_end());
}

#[tokio::test]
async fn non_success_status_is_upstream_error() {
    let base = spawn_server().await;
    let api = source(&base, "/down/index.php");

    let err = api.fetch(&Query::new("hayase_yuuka"), 0, 0).await.unwrap_err();

    assert!(matches!(
        err,
        ExtractorError::Upstream { status } if status == StatusCode::SERVICE_UNAVAILABLE
    ));
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let base = spawn_server().await;
    let api = source(&base, "/garbage/index.php");

    let err = api.fetch(&Query::new("hayase_yuuka"), 0, 0).await.unwrap_err();

    assert!(matches!(err, ExtractorError::Decode(_)));
}

#[tokio::test]
async fn unreachable_server_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = source(&format!("http://{}", addr), "/index.php");

    let err = api.fetch(&Query::new("hayase_yuuka"), 0, 0).await.unwrap_err();

    assert!(matches!(err, ExtractorError::Transport(_)));
}
