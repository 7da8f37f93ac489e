//! Drives the full router, session layer included, against a mocked identity provider.

use crate::router::define_routes;
use crate::AppState;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use clap::Parser;
use mockito::{Matcher, Mock, ServerGuard};
use serde_json::{json, Value};
use service::config::Config;
use tower::ServiceExt;

const CLIENT_ORIGIN: &str = "http://localhost:3000";

fn test_app(provider_url: &str) -> Router {
    let config = Config::try_parse_from([
        "pawkce",
        "--auth0-domain",
        "tenant.us.auth0.com",
        "--auth0-client-id",
        "client-123",
        "--auth0-redirect-uri",
        "http://localhost:3001/callback",
        "--auth0-base-url",
        provider_url,
    ])
    .unwrap();
    let provider = service::init_provider(&config).unwrap();
    define_routes(AppState::new(config, &provider))
}

async fn get(app: &Router, uri: &str, cookie: Option<&str>) -> Response {
    let mut request = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        request = request.header(header::COOKIE, cookie);
    }
    app.clone()
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(response: &Response) -> String {
    response.headers()[header::LOCATION]
        .to_str()
        .unwrap()
        .to_string()
}

/// `name=value` part of the session cookie set on `response`.
fn session_cookie(response: &Response) -> String {
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("response should set the session cookie")
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

/// Hits `/login` and returns the session cookie it issued.
async fn start_login(app: &Router) -> String {
    let response = get(app, "/login", None).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    session_cookie(&response)
}

async fn mock_token_endpoint(server: &mut ServerGuard, code: &str, access_token: &str) -> Mock {
    server
        .mock("POST", "/oauth/token")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("grant_type".into(), "authorization_code".into()),
            Matcher::UrlEncoded("code".into(), code.into()),
            Matcher::Regex("code_verifier=[0-9a-f]{128}".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "access_token": access_token }).to_string())
        .create_async()
        .await
}

async fn mock_userinfo(server: &mut ServerGuard, access_token: &str, profile: &Value) -> Mock {
    server
        .mock("GET", "/userinfo")
        .match_header("authorization", format!("Bearer {}", access_token).as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(profile.to_string())
        .create_async()
        .await
}

fn ozzy() -> Value {
    json!({
        "sub": "auth0|ozzy",
        "name": "Ozzy",
        "email": "ozzy@example.com",
        "picture": "https://example.com/ozzy.png"
    })
}

#[tokio::test]
async fn test_profile_without_login_is_unauthenticated() {
    let server = mockito::Server::new_async().await;
    let app = test_app(&server.url());

    let response = get(&app, "/profile", None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_string(response).await, "Not logged in");
}

#[tokio::test]
async fn test_login_redirects_to_authorize_with_pkce_challenge() {
    let server = mockito::Server::new_async().await;
    let app = test_app(&server.url());

    let response = get(&app, "/login", None).await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    let location = location(&response);
    assert!(location.starts_with(&format!("{}/authorize?", server.url())));
    assert!(location.contains("response_type=code"));
    assert!(location.contains("client_id=client-123"));
    assert!(location.contains("code_challenge_method=S256"));
    assert!(location.contains("code_challenge="));
    assert!(!location.contains("code_verifier"));

    let cookie = session_cookie(&response);
    assert!(cookie.starts_with("pawkce.sid="));
}

#[tokio::test]
async fn test_login_callback_profile_logout_flow() {
    let mut server = mockito::Server::new_async().await;
    let app = test_app(&server.url());
    let token_mock = mock_token_endpoint(&mut server, "ABC123", "tok1").await;
    let userinfo_mock = mock_userinfo(&mut server, "tok1", &ozzy()).await;

    let cookie = start_login(&app).await;

    let response = get(&app, "/callback?code=ABC123", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "http://localhost:3000?auth=success");
    token_mock.assert_async().await;

    let response = get(&app, "/profile", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let profile: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(profile, ozzy());
    userinfo_mock.assert_async().await;

    let response = get(&app, "/logout", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), CLIENT_ORIGIN);

    let response = get(&app, "/profile", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_body_is_forwarded_byte_for_byte() {
    let mut server = mockito::Server::new_async().await;
    let app = test_app(&server.url());
    let _token_mock = mock_token_endpoint(&mut server, "ABC123", "tok1").await;
    let upstream = r#"{"sub":"auth0|1","name":"Ozzy","email":"o@x.com","updated_at":"2024","big":12345678901234567890123,"f":1.10}"#;
    let _userinfo_mock = server
        .mock("GET", "/userinfo")
        .match_header("authorization", "Bearer tok1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(upstream)
        .create_async()
        .await;

    let cookie = start_login(&app).await;
    get(&app, "/callback?code=ABC123", Some(&cookie)).await;

    let response = get(&app, "/profile", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json"
    );
    assert_eq!(body_string(response).await, upstream);
}

#[tokio::test]
async fn test_session_cookie_attributes() {
    let server = mockito::Server::new_async().await;
    let app = test_app(&server.url());

    let response = get(&app, "/login", None).await;
    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();

    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));
    assert!(!set_cookie.contains("Secure"));
}

#[tokio::test]
async fn test_rejected_code_stores_no_token() {
    let mut server = mockito::Server::new_async().await;
    let app = test_app(&server.url());
    let _token_mock = server
        .mock("POST", "/oauth/token")
        .with_status(403)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":"invalid_grant","error_description":"Invalid authorization code"}"#)
        .create_async()
        .await;

    let cookie = start_login(&app).await;

    let response = get(&app, "/callback?code=WRONG", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_string(response).await, "Token exchange failed.");

    let response = get(&app, "/profile", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_callback_without_login_fails_without_calling_provider() {
    let mut server = mockito::Server::new_async().await;
    let app = test_app(&server.url());
    let token_mock = server
        .mock("POST", "/oauth/token")
        .expect(0)
        .create_async()
        .await;

    let response = get(&app, "/callback?code=ABC123", None).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_string(response).await, "Token exchange failed.");
    token_mock.assert_async().await;
}

#[tokio::test]
async fn test_callback_with_provider_error_fails() {
    let server = mockito::Server::new_async().await;
    let app = test_app(&server.url());
    let cookie = start_login(&app).await;

    let response = get(
        &app,
        "/callback?error=access_denied&error_description=User%20cancelled",
        Some(&cookie),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let response = get(&app, "/profile", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_verifier_is_single_use() {
    let mut server = mockito::Server::new_async().await;
    let app = test_app(&server.url());
    let token_mock = mock_token_endpoint(&mut server, "ABC123", "tok1").await;

    let cookie = start_login(&app).await;

    let response = get(&app, "/callback?code=ABC123", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::FOUND);

    let response = get(&app, "/callback?code=ABC123", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    token_mock.assert_async().await;
}

#[tokio::test]
async fn test_sessions_are_isolated() {
    let mut server = mockito::Server::new_async().await;
    let app = test_app(&server.url());
    let _token_mock = mock_token_endpoint(&mut server, "ABC123", "tok1").await;
    let _userinfo_mock = mock_userinfo(&mut server, "tok1", &ozzy()).await;

    let first = start_login(&app).await;
    let second = start_login(&app).await;
    assert_ne!(first, second);

    let response = get(&app, "/callback?code=ABC123", Some(&first)).await;
    assert_eq!(response.status(), StatusCode::FOUND);

    let response = get(&app, "/profile", Some(&first)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(&app, "/profile", Some(&second)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_upstream_profile_failure_keeps_token() {
    let mut server = mockito::Server::new_async().await;
    let app = test_app(&server.url());
    let _token_mock = mock_token_endpoint(&mut server, "ABC123", "tok1").await;
    let failing_userinfo = server
        .mock("GET", "/userinfo")
        .with_status(503)
        .with_body("Service Unavailable")
        .create_async()
        .await;

    let cookie = start_login(&app).await;
    get(&app, "/callback?code=ABC123", Some(&cookie)).await;

    let response = get(&app, "/profile", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_string(response).await, "Failed to fetch profile");

    failing_userinfo.remove_async().await;
    let _userinfo_mock = mock_userinfo(&mut server, "tok1", &ozzy()).await;

    let response = get(&app, "/profile", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_logout_without_session_redirects_to_client() {
    let server = mockito::Server::new_async().await;
    let app = test_app(&server.url());

    let response = get(&app, "/logout", None).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), CLIENT_ORIGIN);
}

#[tokio::test]
async fn test_cors_allows_client_origin_with_credentials() {
    let server = mockito::Server::new_async().await;
    let app = test_app(&server.url());

    let request = Request::builder()
        .uri("/profile")
        .header(header::ORIGIN, CLIENT_ORIGIN)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        CLIENT_ORIGIN
    );
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS],
        "true"
    );
}

#[tokio::test]
async fn test_cors_ignores_other_origins() {
    let server = mockito::Server::new_async().await;
    let app = test_app(&server.url());

    let request = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "http://evil.example.com")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}
