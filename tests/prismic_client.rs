//! Prismic client tests against a mock repository

use serde_json::json;
use space_traveling::config::PrismicConfig;
use space_traveling::prismic::{ContentSource, FetchError, PrismicClient};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DOCUMENT_TYPE_QUERY: &str = r#"[[at(document.type, "post")]]"#;

async fn repository() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "refs": [
                { "id": "master", "ref": "MASTER", "label": "Master", "isMasterRef": true }
            ]
        })))
        .mount(&server)
        .await;

    server
}

fn client(server: &MockServer, access_token: Option<&str>) -> PrismicClient {
    PrismicClient::new(PrismicConfig {
        endpoint: format!("{}/api/v2", server.uri()),
        access_token: access_token.map(str::to_string),
        ..PrismicConfig::default()
    })
    .unwrap()
}

fn document(uid: &str) -> serde_json::Value {
    json!({
        "id": format!("id-{}", uid),
        "uid": uid,
        "type": "post",
        "first_publication_date": "2021-04-19T19:25:28+0000",
        "last_publication_date": "2021-04-19T19:25:28+0000",
        "data": {
            "title": "Como utilizar Hooks",
            "banner": { "url": "https://images.prismic.io/space/banner.png" },
            "author": "Joseph Oliveira",
            "content": [
                { "heading": "Intro", "body": [ { "type": "paragraph", "text": "Hello world", "spans": [] } ] }
            ]
        }
    })
}

#[tokio::test]
async fn test_list_known_identifiers_reads_every_page() {
    let server = repository().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/documents/search"))
        .and(query_param("ref", "MASTER"))
        .and(query_param("q", DOCUMENT_TYPE_QUERY))
        .and(query_param("page", "1"))
        .and(query_param("access_token", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "total_pages": 2,
            "results": [ { "id": "a", "uid": "first" }, { "id": "b", "uid": null } ]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v2/documents/search"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 2,
            "total_pages": 2,
            "results": [ { "id": "c", "uid": "second" } ]
        })))
        .mount(&server)
        .await;

    let uids = client(&server, Some("secret"))
        .list_known_identifiers()
        .await
        .unwrap();
    assert_eq!(uids, vec!["first".to_string(), "second".to_string()]);
}

#[tokio::test]
async fn test_listing_stops_at_total_pages() {
    let server = repository().await;

    // every page claims to be the first of two
    Mock::given(method("GET"))
        .and(path("/api/v2/documents/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "total_pages": 2,
            "results": [ { "id": "a", "uid": "same" } ]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let uids = client(&server, None).list_known_identifiers().await.unwrap();
    assert_eq!(uids, vec!["same".to_string(), "same".to_string()]);
}

#[tokio::test]
async fn test_fetch_by_identifier() {
    let server = repository().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/documents/search"))
        .and(query_param("ref", "MASTER"))
        .and(query_param("q", r#"[[at(my.post.uid, "como-utilizar-hooks")]]"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "total_pages": 1,
            "results": [ document("como-utilizar-hooks") ]
        })))
        .mount(&server)
        .await;

    let post = client(&server, None)
        .fetch_by_identifier("como-utilizar-hooks")
        .await
        .unwrap();
    assert_eq!(post.uid.as_deref(), Some("como-utilizar-hooks"));
    assert_eq!(post.data.author, "Joseph Oliveira");
    assert_eq!(post.data.content.len(), 1);
}

#[tokio::test]
async fn test_fetch_missing_document_is_not_found() {
    let server = repository().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/documents/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "total_pages": 0,
            "results": []
        })))
        .mount(&server)
        .await;

    let err = client(&server, None)
        .fetch_by_identifier("nope")
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_server_error_propagates() {
    let server = repository().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/documents/search"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client(&server, None)
        .list_known_identifiers()
        .await
        .unwrap_err();
    match err {
        FetchError::Status { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_document_is_decode_error() {
    let server = repository().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/documents/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [ { "uid": "x", "data": { "title": "No author" } } ]
        })))
        .mount(&server)
        .await;

    let err = client(&server, None)
        .fetch_by_identifier("x")
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)));
}

#[tokio::test]
async fn test_missing_master_ref() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "refs": [] })))
        .mount(&server)
        .await;

    let err = client(&server, None)
        .list_known_identifiers()
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::NoMasterRef));
}
