use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use rtimesheet::auth::{ClerkProvider, IdentityProvider};
use rtimesheet::errors::AppError;
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

const SIGNING_KEY: &str = include_str!("fixtures/session_signing_key.pem");
const FOREIGN_KEY: &str = include_str!("fixtures/foreign_signing_key.pem");
// Public modulus of SIGNING_KEY, base64url.
const SIGNING_KEY_N: &str = "107n-TKy09OC7q0iglocjuvFM6z_PAxoKV6zH4jEdswZX0O2rPZlGmaOkkBixEbQhjdw3PqaTQB5Npvj82q-njk-iPF75bF0mtA0XrI5EMXTI2V7eo_FbtQ-0ZEGBLASFJrbs9eKSh321qzLxXzqQ45AC3rBH3_sNH4rPU2Wv8v7jU6FaQFBIi9dRXf_Ixf_Ma4jsXj-s4ozknD6XHr7KOQgZDeoYVYyHrXTPnN312VgQxuCbLeaF2epo9UVmFjReZdI9455HqhOwSi9cNsF5a3QLmJ1ueL9tZED8T2DiLjW3KWxj33ILWVCgL9kVHudOEV5dXNNjAK-w0Z2PzBp4w";
const KID: &str = "ins_test_key";
const SECRET: &str = "sk_test_local";
const FRONTEND_HOST: &str = "clever-otter-12.clerk.accounts.dev";
const ISSUER: &str = "https://clever-otter-12.clerk.accounts.dev";

#[derive(Serialize)]
struct Claims<'a> {
    sub: &'a str,
    iss: &'a str,
    exp: i64,
}

#[derive(Clone, Default)]
struct Directory {
    jwks_fetches: Arc<AtomicUsize>,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {SECRET}"))
}

async fn jwks(State(dir): State<Directory>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({})));
    }
    dir.jwks_fetches.fetch_add(1, Ordering::SeqCst);
    let body = json!({
        "keys": [{
            "kty": "RSA",
            "use": "sig",
            "alg": "RS256",
            "kid": KID,
            "n": SIGNING_KEY_N,
            "e": "AQAB"
        }]
    });
    (StatusCode::OK, Json(body))
}

async fn user(Path(id): Path<String>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) || id != "user_alice" {
        return (StatusCode::NOT_FOUND, Json(json!({ "errors": [] })));
    }
    let body = json!({
        "id": "user_alice",
        "first_name": "Alice",
        "last_name": "Smith",
        "image_url": "https://img.example.com/alice.png",
        "primary_email_address_id": "idn_1",
        "email_addresses": [
            { "id": "idn_0", "email_address": "old@example.com" },
            { "id": "idn_1", "email_address": "alice@example.com" }
        ]
    });
    (StatusCode::OK, Json(body))
}

/// Local stand-in for the hosted directory; returns its base URL.
async fn spawn_directory(dir: Directory) -> String {
    let app = Router::new()
        .route("/jwks", get(jwks))
        .route("/users/:id", get(user))
        .with_state(dir);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn provider(base: &str) -> ClerkProvider {
    let publishable = format!("pk_test_{}", STANDARD.encode(format!("{FRONTEND_HOST}$")));
    ClerkProvider::new(base, SECRET, &publishable).unwrap()
}

fn token(pem: &str, kid: Option<&str>, iss: &str, exp_offset: i64) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = kid.map(str::to_string);
    let claims = Claims {
        sub: "user_alice",
        iss,
        exp: chrono::Utc::now().timestamp() + exp_offset,
    };
    let key = EncodingKey::from_rsa_pem(pem.as_bytes()).unwrap();
    encode(&header, &claims, &key).unwrap()
}

fn unauthorized<T: std::fmt::Debug>(res: Result<T, AppError>) -> bool {
    matches!(res, Err(AppError::Unauthorized))
}

#[tokio::test]
async fn valid_session_token_yields_subject_and_caches_keys() {
    let dir = Directory::default();
    let base = spawn_directory(dir.clone()).await;
    let clerk = provider(&base);
    assert_eq!(clerk.issuer(), ISSUER);

    let good = token(SIGNING_KEY, Some(KID), ISSUER, 600);
    assert_eq!(clerk.verify_session(&good).await.unwrap(), "user_alice");
    assert_eq!(dir.jwks_fetches.load(Ordering::SeqCst), 1);

    // known kid: served from the cache
    assert_eq!(clerk.verify_session(&good).await.unwrap(), "user_alice");
    assert_eq!(dir.jwks_fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn rejected_session_tokens_are_unauthorized() {
    let dir = Directory::default();
    let base = spawn_directory(dir.clone()).await;
    let clerk = provider(&base);

    let wrong_issuer = token(SIGNING_KEY, Some(KID), "https://evil.example.com", 600);
    assert!(unauthorized(clerk.verify_session(&wrong_issuer).await));

    let bad_signature = token(FOREIGN_KEY, Some(KID), ISSUER, 600);
    assert!(unauthorized(clerk.verify_session(&bad_signature).await));

    let expired = token(SIGNING_KEY, Some(KID), ISSUER, -3600);
    assert!(unauthorized(clerk.verify_session(&expired).await));

    let no_kid = token(SIGNING_KEY, None, ISSUER, 600);
    assert!(unauthorized(clerk.verify_session(&no_kid).await));

    assert!(unauthorized(clerk.verify_session("not-a-jwt").await));

    // the keys were fetched once and kept for the known kid
    assert_eq!(dir.jwks_fetches.load(Ordering::SeqCst), 1);

    // an unknown kid forces one refresh, then fails
    let unknown_kid = token(SIGNING_KEY, Some("ins_rotated"), ISSUER, 600);
    assert!(unauthorized(clerk.verify_session(&unknown_kid).await));
    assert_eq!(dir.jwks_fetches.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn user_lookup_maps_directory_record() {
    let base = spawn_directory(Directory::default()).await;
    let clerk = provider(&base);

    let user = clerk.fetch_user("user_alice").await.unwrap();
    assert_eq!(user.first_name.as_deref(), Some("Alice"));
    assert_eq!(user.primary_email(), Some("alice@example.com"));

    assert!(matches!(
        clerk.fetch_user("user_missing").await,
        Err(AppError::IdentityProvider(_))
    ));
}
