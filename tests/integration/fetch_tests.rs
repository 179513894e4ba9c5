//! Fetcher deadline and status tests

use std::time::Duration;
use tsquare::config::HttpConfig;
use tsquare::fetch::{build_http_client, Fetcher};
use tsquare::TsquareError;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher() -> Fetcher {
    let config = HttpConfig {
        timeout_secs: 5,
        connect_timeout_secs: 5,
        https_only: false,
        ..HttpConfig::default()
    };
    Fetcher::new(build_http_client(&config).unwrap())
}

async fn mount_slow_page(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body>late</body></html>")
                .set_delay(Duration::from_millis(1500)),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_short_deadline_fails_with_http_error() {
    let mock_server = MockServer::start().await;
    mount_slow_page(&mock_server).await;

    let url = format!("{}/slow", mock_server.uri());
    let result = fetcher()
        .get_with_deadline(&url, Some(Duration::from_millis(100)))
        .await;

    match result {
        Err(TsquareError::Http { url: failed, source }) => {
            assert_eq!(failed, url);
            assert!(source.is_timeout());
        }
        other => panic!("expected a timeout, got {:?}", other),
    }
}

#[tokio::test]
async fn test_generous_deadline_returns_document() {
    let mock_server = MockServer::start().await;
    mount_slow_page(&mock_server).await;

    let url = format!("{}/slow", mock_server.uri());
    let document = fetcher()
        .get_with_deadline(&url, Some(Duration::from_secs(4)))
        .await
        .unwrap();

    assert_eq!(document.status, 200);
    assert!(document.body.contains("late"));
}

#[tokio::test]
async fn test_get_ok_rejects_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let url = format!("{}/missing", mock_server.uri());
    let fetcher = fetcher();

    let document = fetcher.get(&url).await.unwrap();
    assert!(!document.is_success());

    let result = fetcher.get_ok(&url).await;
    assert!(matches!(result, Err(TsquareError::Status { status: 404, .. })));
}
