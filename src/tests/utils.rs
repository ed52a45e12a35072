use crate::app::App;
use crate::config::AppConfig;
use crate::db::connection::{init_db, Database};
use crate::domain::clock::Clock;
use crate::router::respond;
use astra::{Body, Response};
use chrono::{DateTime, Duration, TimeZone, Utc};
use http::{Method, Request};
use serde_json::Value;
use std::io::Read;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Initialize a fresh test DB using the production schema.
/// Keep the `TempDir` alive for as long as the database is used.
pub fn init_test_db() -> (TempDir, Database) {
    let dir = TempDir::new().expect("create temp dir");
    let db = Database::new(dir.path().join("test.sqlite").to_string_lossy());

    init_db(&db).unwrap_or_else(|e| panic!("Database initialization failed: {e}"));

    (dir, db)
}

pub fn test_epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
}

/// A clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn starting_at(at: DateTime<Utc>) -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(at),
        })
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }

    pub fn set(&self, at: DateTime<Utc>) {
        *self.now.lock().unwrap() = at;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

pub fn test_app() -> (TempDir, App, Arc<ManualClock>) {
    let (dir, db) = init_test_db();
    let clock = ManualClock::starting_at(test_epoch());
    let app = App::new(db, clock.clone(), AppConfig::default().cors_origins);
    (dir, app, clock)
}

/// Run one request through the full server path (errors mapped, CORS added).
pub fn send(app: &App, method: Method, uri: &str, body: Option<Value>) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    respond(builder.body(body).unwrap(), app)
}

/// A body-less request as a browser on `origin` would send it.
pub fn send_from(app: &App, method: Method, uri: &str, origin: &str) -> Response {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header("Origin", origin)
        .body(Body::empty())
        .unwrap();
    respond(req, app)
}

pub fn send_raw(app: &App, method: Method, uri: &str, raw: &str) -> Response {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(raw.to_string()))
        .unwrap();
    respond(req, app)
}

pub fn body_json(resp: Response) -> Value {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    serde_json::from_str(&body).unwrap_or_else(|e| panic!("not JSON ({e}): {body}"))
}
