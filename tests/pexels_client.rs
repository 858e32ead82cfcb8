//! Pexels client tests against a local mock server.

use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bgremove_web::{PexelsClient, PhotoSearch, SearchError};

const PHOTOS_BODY: &str = r#"{
    "page": 1,
    "per_page": 15,
    "total_results": 3,
    "photos": [
        {"id": 1, "src": {"large": "https://images.pexels.com/1/large.jpg", "small": "https://images.pexels.com/1/small.jpg"}},
        {"id": 2, "src": {"large": "https://images.pexels.com/2/large.jpg", "small": "https://images.pexels.com/2/small.jpg"}},
        {"id": 3, "src": {"large": "https://images.pexels.com/3/large.jpg", "small": "https://images.pexels.com/3/small.jpg"}}
    ]
}"#;

fn client_for(server: &MockServer) -> PexelsClient {
    PexelsClient::new("test-key", format!("{}/v1/search", server.uri()))
}

#[tokio::test]
async fn test_search_sends_credentials_and_parameters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(header("Authorization", "test-key"))
        .and(query_param("query", "dogs"))
        .and(query_param("per_page", "15"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(PHOTOS_BODY, "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let urls = client.search("dogs", 15).await.unwrap();

    assert_eq!(
        urls,
        vec![
            "https://images.pexels.com/1/large.jpg",
            "https://images.pexels.com/2/large.jpg",
            "https://images.pexels.com/3/large.jpg"
        ]
    );
}

#[tokio::test]
async fn test_search_empty_result_set() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"{"photos": [], "total_results": 0}"#, "application/json"),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let urls = client.search("nothing", 15).await.unwrap();
    assert!(urls.is_empty());
}

#[tokio::test]
async fn test_search_preserves_upstream_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.search("dogs", 15).await.unwrap_err();

    match err {
        SearchError::Upstream { status, body } => {
            assert_eq!(status, 429);
            assert_eq!(body, "rate limited");
        },
        other => panic!("expected Upstream error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_search_rejects_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>definitely not json</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.search("dogs", 15).await.unwrap_err();
    assert!(matches!(err, SearchError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_search_connection_refused_is_network_error() {
    // Port that nothing listens on.
    let client = PexelsClient::new("test-key", "http://127.0.0.1:1/v1/search");
    let err = client.search("dogs", 15).await.unwrap_err();
    assert!(matches!(err, SearchError::Network(_)));
}
