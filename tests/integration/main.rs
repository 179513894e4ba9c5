//! Integration tests for the portal client
//!
//! These tests use wiremock to stand in for both the CAS gateway and the
//! portal, and drive the client end-to-end over real HTTP.

mod auth_tests;
mod fetch_tests;

use tsquare::config::{Config, HttpConfig, PortalConfig, ScraperConfig, SsoConfig};
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TGT: &str = "TGT-123-abc";
pub const ST: &str = "ST-456-def";
pub const SESSION_COOKIE: &str = "JSESSIONID=session-1";

/// Creates a test configuration pointing every endpoint at the mock server
pub fn create_test_config(server: &MockServer, backend: &str) -> Config {
    let base = server.uri();
    Config {
        sso: SsoConfig {
            base_url: format!("{}/cas/", base),
            service_url: format!("{}/container", base),
        },
        portal: PortalConfig {
            direct_url: format!("{}/direct/", base),
        },
        http: HttpConfig {
            timeout_secs: 5,
            connect_timeout_secs: 5,
            https_only: false,
            ..HttpConfig::default()
        },
        scraper: ScraperConfig {
            backend: backend.to_string(),
        },
    }
}

/// Body of a successful ticket-granting response
pub fn ticket_form(server: &MockServer) -> String {
    format!(
        r#"<!DOCTYPE HTML PUBLIC "-//IETF//DTD HTML 2.0//EN"><html><head><title>201 Created</title></head><body><h1>TGT Created</h1><form action="{}/cas/rest/tickets/{}" method="POST">Service:<input type="text" name="service" value=""><br><input type="submit" value="Submit"></form></body></html>"#,
        server.uri(),
        TGT
    )
}

/// Mounts a complete, successful login handshake
pub async fn mount_handshake(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/cas/rest/tickets"))
        .and(body_string_contains("username=gburdell3"))
        .respond_with(ResponseTemplate::new(201).set_body_string(ticket_form(server)))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("/cas/rest/tickets/{}", TGT)))
        .and(body_string_contains("service="))
        .respond_with(ResponseTemplate::new(200).set_body_string(ST))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/container"))
        .and(query_param("ticket", ST))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", format!("{}; Path=/", SESSION_COOKIE).as_str())
                .set_body_string("<html><body>Welcome</body></html>"),
        )
        .mount(server)
        .await;
}

/// Mounts the ticket revocation endpoint answering `status`
pub async fn mount_revocation(server: &MockServer, status: u16) {
    Mock::given(method("DELETE"))
        .and(path(format!("/cas/rest/tickets/{}", TGT)))
        .respond_with(ResponseTemplate::new(status))
        .expect(1)
        .mount(server)
        .await;
}

/// Logs in against the mock server with the test user
pub async fn login(server: &MockServer, backend: &str) -> tsquare::TsquareClient {
    tsquare::TsquareClient::login(
        create_test_config(server, backend),
        tsquare::Credentials::new("gburdell3", "hunter2"),
    )
    .await
    .expect("login against mock server failed")
}
