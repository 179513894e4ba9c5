//! Handshake, session and logout tests

use crate::{create_test_config, login, mount_handshake, mount_revocation, ticket_form, SESSION_COOKIE, TGT};
use serde_json::json;
use tsquare::{AuthError, Credentials, TsquareClient, TsquareError};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn try_login(server: &MockServer) -> tsquare::Result<TsquareClient> {
    TsquareClient::login(
        create_test_config(server, "tree"),
        Credentials::new("gburdell3", "hunter2"),
    )
    .await
}

#[tokio::test]
async fn test_login_establishes_session() {
    let mock_server = MockServer::start().await;
    mount_handshake(&mock_server).await;

    let client = login(&mock_server, "tree").await;

    assert!(client.is_authenticated());
    assert_eq!(client.username(), "gburdell3");
    assert_eq!(client.session().ticket().as_str(), TGT);
    assert_eq!(
        client.session().revocation_url(),
        format!("{}/cas/rest/tickets/{}", mock_server.uri(), TGT)
    );
    assert_eq!(client.scraper().name(), "tree");
}

#[tokio::test]
async fn test_invalid_credentials() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/cas/rest/tickets"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&mock_server)
        .await;

    let result = try_login(&mock_server).await;
    assert!(matches!(
        result,
        Err(TsquareError::Authentication(AuthError::InvalidCredentials))
    ));
}

#[tokio::test]
async fn test_unexpected_status_on_login() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/cas/rest/tickets"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let result = try_login(&mock_server).await;
    assert!(matches!(
        result,
        Err(TsquareError::Authentication(AuthError::UnexpectedStatus(503)))
    ));
}

#[tokio::test]
async fn test_login_response_without_ticket() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/cas/rest/tickets"))
        .respond_with(ResponseTemplate::new(201).set_body_string("<html><body>Created</body></html>"))
        .mount(&mock_server)
        .await;

    let result = try_login(&mock_server).await;
    assert!(matches!(
        result,
        Err(TsquareError::Authentication(AuthError::MissingTicket))
    ));
}

#[tokio::test]
async fn test_service_ticket_bad_request_creates_no_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/cas/rest/tickets"))
        .respond_with(ResponseTemplate::new(201).set_body_string(ticket_form(&mock_server)))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("/cas/rest/tickets/{}", TGT)))
        .respond_with(ResponseTemplate::new(400))
        .mount(&mock_server)
        .await;

    // The service ticket is never redeemed
    Mock::given(method("GET"))
        .and(path("/container"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let result = try_login(&mock_server).await;
    assert!(matches!(
        result,
        Err(TsquareError::Authentication(AuthError::BadRequest))
    ));
}

#[tokio::test]
async fn test_service_ticket_unexpected_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/cas/rest/tickets"))
        .respond_with(ResponseTemplate::new(201).set_body_string(ticket_form(&mock_server)))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("/cas/rest/tickets/{}", TGT)))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let result = try_login(&mock_server).await;
    assert!(matches!(
        result,
        Err(TsquareError::Authentication(AuthError::UnexpectedStatus(500)))
    ));
}

#[tokio::test]
async fn test_session_cookie_is_sent_and_password_dropped() {
    let mock_server = MockServer::start().await;
    mount_handshake(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/direct/user/current.json"))
        .and(header("cookie", SESSION_COOKIE))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u-1",
            "eid": "gburdell3",
            "displayName": "George Burdell",
            "email": "gburdell3@example.edu",
            "password": null,
            "type": "student"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = login(&mock_server, "tree").await;
    let user = client.user_info().await.unwrap();

    assert_eq!(user.eid.as_deref(), Some("gburdell3"));
    assert_eq!(user.display_name.as_deref(), Some("George Burdell"));
    assert!(!user.extra.contains_key("password"));
    assert!(user.extra.contains_key("type"));
}

#[tokio::test]
async fn test_logout_revokes_ticket() {
    let mock_server = MockServer::start().await;
    mount_handshake(&mock_server).await;
    mount_revocation(&mock_server, 200).await;

    let client = login(&mock_server, "tree").await;
    client.logout().await.unwrap();

    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn test_logout_succeeds_when_revocation_fails() {
    let mock_server = MockServer::start().await;
    mount_handshake(&mock_server).await;
    mount_revocation(&mock_server, 500).await;

    let client = login(&mock_server, "tree").await;
    client.logout().await.unwrap();
    assert!(!client.is_authenticated());

    // Nothing is requested once logged out
    let result = client.user_info().await;
    assert!(matches!(
        result,
        Err(TsquareError::NotAuthenticated { ref operation }) if operation == "user_info"
    ));

    let result = client.logout().await;
    assert!(matches!(result, Err(TsquareError::NotAuthenticated { .. })));
}

#[tokio::test]
async fn test_redemption_error_status_is_not_fatal() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/cas/rest/tickets"))
        .respond_with(ResponseTemplate::new(201).set_body_string(ticket_form(&mock_server)))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("/cas/rest/tickets/{}", TGT)))
        .respond_with(ResponseTemplate::new(200).set_body_string(crate::ST))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/container"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = try_login(&mock_server).await.unwrap();
    assert!(client.is_authenticated());
    assert_eq!(client.session().ticket().as_str(), TGT);
}
