#![allow(dead_code)] // not every test binary uses every helper

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use fundra_api::auth::jwt::{generate_access_token, JwtConfig};
use fundra_api::config::ServerConfig;
use fundra_api::handlers::payments::SIGNATURE_HEADER;
use fundra_api::routes;
use fundra_api::state::AppState;
use fundra_core::policy::EnginePolicy;
use fundra_core::roles::{ROLE_ADMIN, ROLE_DONOR, ROLE_PRINCIPAL, ROLE_SCHOOL};
use fundra_core::signing::compute_callback_signature;
use fundra_core::types::DbId;

/// Shared JWT secret used by all tests.
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-that-is-long-enough-for-hmac";

/// Shared payment gateway webhook secret used by all tests.
pub const TEST_WEBHOOK_SECRET: &str = "test-payment-webhook-secret";

/// Build a test `ServerConfig` with safe defaults.
///
/// Configuration is constructed literally rather than from the environment
/// so tests never depend on ambient variables. Policy values are the
/// defaults: approval threshold 50 000, tier schedules 20k/40k/80k by
/// amount and 100/200/400 by items.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 15,
        },
        policy: EnginePolicy::default(),
        payment_webhook_secret: TEST_WEBHOOK_SECRET.to_string(),
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses. The background expiry sweep is
/// not spawned.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();

    let state = AppState {
        pool,
        config: Arc::new(config),
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Token minting
// ---------------------------------------------------------------------------

fn mint_token(user_id: DbId, role: &str, school_id: Option<DbId>) -> String {
    let config = JwtConfig {
        secret: TEST_JWT_SECRET.to_string(),
        access_token_expiry_mins: 15,
    };
    generate_access_token(user_id, role, school_id, &config)
        .expect("token generation should succeed")
}

/// Access token for a platform admin.
pub fn admin_token(user_id: DbId) -> String {
    mint_token(user_id, ROLE_ADMIN, None)
}

/// Access token for school staff scoped to `school_id`.
pub fn school_token(user_id: DbId, school_id: DbId) -> String {
    mint_token(user_id, ROLE_SCHOOL, Some(school_id))
}

/// Access token for the principal of `school_id`.
pub fn principal_token(user_id: DbId, school_id: DbId) -> String {
    mint_token(user_id, ROLE_PRINCIPAL, Some(school_id))
}

/// Access token for a donor.
pub fn donor_token(user_id: DbId) -> String {
    mint_token(user_id, ROLE_DONOR, None)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a GET request without authentication.
pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a GET request with a bearer token.
pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with a JSON body, no authentication.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with a JSON body and a bearer token.
pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a PUT request with a JSON body and a bearer token.
pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    let request = Request::builder()
        .method(Method::PUT)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a DELETE request with a bearer token.
pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST a payment gateway callback with a valid HMAC signature over the
/// exact bytes sent.
pub async fn post_signed_callback(app: Router, body: serde_json::Value) -> Response {
    let payload = body.to_string();
    let signature = compute_callback_signature(TEST_WEBHOOK_SECRET, payload.as_bytes());
    post_callback_with_signature(app, payload, &signature).await
}

/// POST a payment gateway callback with an explicit signature header value.
pub async fn post_callback_with_signature(
    app: Router,
    payload: String,
    signature: &str,
) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/payments/callback")
        .header(CONTENT_TYPE, "application/json")
        .header(SIGNATURE_HEADER, signature)
        .body(Body::from(payload))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
