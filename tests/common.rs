#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use rtimesheet::api::{AppState, build_router};
use rtimesheet::auth::StaticIdentityProvider;
use rtimesheet::core::users::UserLogic;
use rtimesheet::db::initialize::init_db;
use rtimesheet::db::pool::DbPool;
use rtimesheet::models::{Contractor, Manager};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

/// CLI command isolated from the user's real config directory.
pub fn rts(config_dir: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("rtimesheet");
    cmd.env("RTIMESHEET_CONFIG_DIR", config_dir)
        .env("NO_COLOR", "1")
        .env_remove("DATABASE_URL")
        .env_remove("CLERK_SECRET_KEY")
        .env_remove("CLERK_PUBLISHABLE_KEY");
    cmd
}

/// Scratch directory plus the path of a not-yet-created database inside it.
pub fn setup_test_db(name: &str) -> (TempDir, String) {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = dir.path().join(format!("{name}.sqlite"));
    (dir, db.to_string_lossy().to_string())
}

pub fn open_db(db_path: &str) -> DbPool {
    let pool = DbPool::new(db_path).expect("open db");
    init_db(&pool.conn).expect("migrate");
    pool
}

pub const TOKEN_A: &str = "tok-alice";
pub const TOKEN_B: &str = "tok-bob";
pub const TOKEN_C: &str = "tok-carol";
pub const TOKEN_M1: &str = "tok-mia";
pub const TOKEN_M2: &str = "tok-noah";
pub const TOKEN_STRANGER: &str = "tok-stranger";
pub const TOKEN_GHOST: &str = "tok-ghost";

/// Two managers; Alice and Bob report to Mia, Carol to Noah.
pub struct Fixture {
    pub dir: TempDir,
    pub db_path: String,
    pub router: Router,
    pub alice: Contractor,
    pub bob: Contractor,
    pub carol: Contractor,
    pub mia: Manager,
    pub noah: Manager,
}

impl Fixture {
    pub fn new() -> Self {
        let (dir, db_path) = setup_test_db("api");
        let mut pool = open_db(&db_path);

        let mia = UserLogic::add_manager(&mut pool, "user_mia").unwrap();
        let noah = UserLogic::add_manager(&mut pool, "user_noah").unwrap();
        let alice = UserLogic::add_contractor(&mut pool, "user_alice", mia.id, 50.0, 40).unwrap();
        let bob = UserLogic::add_contractor(&mut pool, "user_bob", mia.id, 35.5, 20).unwrap();
        // Carol has a row but no directory record at the identity provider.
        let carol = UserLogic::add_contractor(&mut pool, "user_carol", noah.id, 40.0, 30).unwrap();

        let identity = StaticIdentityProvider::new()
            .with_user(TOKEN_A, "user_alice", "Alice Smith", "alice@example.com")
            .with_user(TOKEN_B, "user_bob", "Bob Jones", "bob@example.com")
            .with_token(TOKEN_C, "user_carol")
            .with_user(TOKEN_M1, "user_mia", "Mia Brown", "mia@example.com")
            .with_user(TOKEN_M2, "user_noah", "Noah White", "noah@example.com")
            .with_user(TOKEN_STRANGER, "user_stranger", "Sam Stone", "sam@example.com")
            .with_token(TOKEN_GHOST, "user_ghost");

        let router = build_router(AppState::new(&db_path, Arc::new(identity)));

        Self {
            dir,
            db_path,
            router,
            alice,
            bob,
            carol,
            mia,
            noah,
        }
    }

    pub fn pool(&self) -> DbPool {
        DbPool::new(&self.db_path).expect("open db")
    }

    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(t) = token {
            req = req.header("authorization", format!("Bearer {t}"));
        }
        let req = match body {
            Some(b) => req
                .header("content-type", "application/json")
                .body(Body::from(b.to_string())),
            None => req.body(Body::empty()),
        }
        .unwrap();

        let resp = self.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.call(Method::GET, uri, Some(token), None).await
    }

    /// Create a timesheet as `token` and return its id.
    pub async fn create_timesheet(&self, token: &str) -> i64 {
        let (status, body) = self.call(Method::POST, "/api/timesheets", Some(token), None).await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_i64().unwrap()
    }

    pub async fn add_task(&self, token: &str, timesheet_id: i64, name: &str, hours: f64) -> Value {
        let (status, body) = self
            .call(
                Method::PATCH,
                "/api/timesheets/tasks",
                Some(token),
                Some(serde_json::json!({
                    "timesheetId": timesheet_id,
                    "weekday": "monday",
                    "name": name,
                    "hours": hours,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body
    }

    pub async fn set_status(&self, token: &str, timesheet_id: i64, to: &str) -> (StatusCode, Value) {
        self.call(
            Method::PUT,
            &format!("/api/timesheets/{timesheet_id}/status"),
            Some(token),
            Some(serde_json::json!({ "toStatus": to })),
        )
        .await
    }
}
