use crate::router::MAX_BODY_BYTES;
use crate::tests::utils::{body_json, send, send_from, send_raw, test_app};
use astra::Body;
use http::{Method, Request};
use serde_json::json;

#[test]
fn health_answers_ok() {
    let (_dir, app, _clock) = test_app();
    let resp = send(&app, Method::GET, "/health", None);
    assert_eq!(resp.status(), 200);
    assert_eq!(body_json(resp)["status"], "ok");
}

#[test]
fn every_response_echoes_an_allowed_origin() {
    let (_dir, app, _clock) = test_app();

    for (method, uri) in [
        (Method::GET, "/api/carepoints"),
        (Method::GET, "/api/carepoints/12345"),
        (Method::PATCH, "/api/shelters"),
    ] {
        let resp = send_from(&app, method, uri, "http://localhost:5173");
        assert_eq!(
            resp.headers().get("Access-Control-Allow-Origin").unwrap(),
            "http://localhost:5173",
            "missing CORS header on {uri}"
        );
        assert_eq!(resp.headers().get("Vary").unwrap(), "Origin");
    }
}

#[test]
fn each_dev_client_origin_gets_its_own_header() {
    let (_dir, app, _clock) = test_app();

    for origin in ["http://localhost:3000", "http://localhost:5174"] {
        let resp = send_from(&app, Method::GET, "/api/carepoints", origin);
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers().get("Access-Control-Allow-Origin").unwrap(), origin);
    }
}

#[test]
fn unlisted_origin_gets_no_allow_header() {
    let (_dir, app, _clock) = test_app();

    let resp = send_from(&app, Method::GET, "/api/carepoints", "https://evil.example");
    assert_eq!(resp.status(), 200);
    assert!(resp.headers().get("Access-Control-Allow-Origin").is_none());
    assert_eq!(resp.headers().get("Vary").unwrap(), "Origin");

    // No Origin header at all: same-origin or non-browser caller.
    let resp = send(&app, Method::GET, "/api/carepoints", None);
    assert!(resp.headers().get("Access-Control-Allow-Origin").is_none());
}

#[test]
fn preflight_is_204() {
    let (_dir, app, _clock) = test_app();
    let resp = send(&app, Method::OPTIONS, "/api/carepoints/1/updates", None);
    assert_eq!(resp.status(), 204);
    assert!(resp.headers().contains_key("Access-Control-Allow-Methods"));
}

#[test]
fn wrong_method_on_known_path_is_405() {
    let (_dir, app, _clock) = test_app();
    assert_eq!(send(&app, Method::DELETE, "/api/carepoints", None).status(), 405);
    assert_eq!(send(&app, Method::GET, "/api/carepoints/1/updates", None).status(), 405);
    assert_eq!(send(&app, Method::POST, "/api/shelters/1", Some(json!({}))).status(), 405);
}

#[test]
fn unknown_path_is_404() {
    let (_dir, app, _clock) = test_app();
    let resp = send(&app, Method::GET, "/api/kennels", None);
    assert_eq!(resp.status(), 404);
    assert_eq!(body_json(resp)["error"], "Not Found");
}

#[test]
fn malformed_json_is_400() {
    let (_dir, app, _clock) = test_app();
    let resp = send_raw(&app, Method::POST, "/api/carepoints", "{\"title\": \"Station");
    assert_eq!(resp.status(), 400);
    let body = body_json(resp);
    assert!(body["error"].as_str().unwrap().contains("invalid JSON body"));
    assert!(body.get("field").is_none());
}

#[test]
fn non_numeric_id_is_400() {
    let (_dir, app, _clock) = test_app();
    let resp = send(&app, Method::GET, "/api/carepoints/abc", None);
    assert_eq!(resp.status(), 400);
    assert!(body_json(resp)["error"].as_str().unwrap().contains("abc"));
}

#[test]
fn declared_oversized_body_is_413() {
    let (_dir, app, _clock) = test_app();
    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/carepoints")
        .header("Content-Type", "application/json")
        .header("Content-Length", (MAX_BODY_BYTES + 1).to_string())
        .body(Body::from("{}"))
        .unwrap();

    let resp = crate::router::respond(req, &app);
    assert_eq!(resp.status(), 413);
    assert!(body_json(resp)["error"].as_str().unwrap().contains("Payload Too Large"));
}

#[test]
fn streamed_oversized_body_is_413_not_bad_json() {
    let (_dir, app, _clock) = test_app();
    let title = "x".repeat(MAX_BODY_BYTES as usize);
    let raw = json!({
        "title": title,
        "type": "Food",
        "latitude": 0.0,
        "longitude": 0.0,
        "status": "Ok"
    })
    .to_string();

    let resp = send_raw(&app, Method::POST, "/api/carepoints", &raw);
    assert_eq!(resp.status(), 413);
    assert!(app.care_points.list_all().unwrap().is_empty());
}

#[test]
fn body_at_the_limit_is_still_parsed() {
    let (_dir, app, _clock) = test_app();
    let mut raw = json!({
        "title": "Station",
        "type": "Food",
        "latitude": 0.0,
        "longitude": 0.0,
        "status": "Ok"
    })
    .to_string();
    // Pad with JSON whitespace up to the limit exactly.
    raw.push_str(&" ".repeat(MAX_BODY_BYTES as usize - raw.len()));

    let resp = send_raw(&app, Method::POST, "/api/carepoints", &raw);
    assert_eq!(resp.status(), 201);
}
