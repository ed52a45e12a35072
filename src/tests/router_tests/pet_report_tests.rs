use crate::tests::utils::{body_json, send, test_app, test_epoch};
use chrono::Duration;
use http::Method;
use serde_json::{json, Value};

fn lost_dog() -> Value {
    json!({
        "type": "Lost",
        "petType": "Dog",
        "description": "Brown terrier, red collar",
        "latitude": 40.71,
        "longitude": -74.0
    })
}

#[test]
fn new_report_starts_active_and_stamped() {
    let (_dir, app, _clock) = test_app();

    let resp = send(&app, Method::POST, "/api/petreports", Some(lost_dog()));
    assert_eq!(resp.status(), 201);
    let report = body_json(resp);
    assert_eq!(report["status"], "Active");
    assert_eq!(report["petType"], "Dog");
    assert_eq!(report["photoUrl"], Value::Null);
    let created: chrono::DateTime<chrono::Utc> =
        report["createdAt"].as_str().unwrap().parse().unwrap();
    assert_eq!(created, test_epoch());
}

#[test]
fn update_can_resolve_but_keeps_created_at() {
    let (_dir, app, clock) = test_app();
    let report = body_json(send(&app, Method::POST, "/api/petreports", Some(lost_dog())));
    let uri = format!("/api/petreports/{}", report["id"]);

    clock.advance(Duration::days(2));
    let mut edit = lost_dog();
    edit["status"] = json!("Resolved");
    edit["description"] = json!("Found him at the park");
    let resp = send(&app, Method::PUT, &uri, Some(edit));
    assert_eq!(resp.status(), 200);

    let fetched = body_json(send(&app, Method::GET, &uri, None));
    assert_eq!(fetched["status"], "Resolved");
    assert_eq!(fetched["description"], "Found him at the park");
    assert_eq!(fetched["createdAt"], report["createdAt"]);
}

#[test]
fn list_is_newest_first() {
    let (_dir, app, clock) = test_app();
    for desc in ["older", "newer"] {
        let mut body = lost_dog();
        body["description"] = json!(desc);
        send(&app, Method::POST, "/api/petreports", Some(body));
        clock.advance(Duration::hours(1));
    }

    let list = body_json(send(&app, Method::GET, "/api/petreports", None));
    let descs: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["description"].as_str().unwrap())
        .collect();
    assert_eq!(descs, vec!["newer", "older"]);
}

#[test]
fn description_and_photo_limits_are_enforced() {
    let (_dir, app, _clock) = test_app();

    let mut body = lost_dog();
    body["description"] = json!("   ");
    let resp = send(&app, Method::POST, "/api/petreports", Some(body));
    assert_eq!(resp.status(), 400);
    assert_eq!(body_json(resp)["field"], "description");

    let mut body = lost_dog();
    body["photoUrl"] = json!(format!("https://example.org/{}", "p".repeat(500)));
    let resp = send(&app, Method::POST, "/api/petreports", Some(body));
    assert_eq!(resp.status(), 400);
    assert_eq!(body_json(resp)["field"], "photoUrl");
}

#[test]
fn delete_then_get_is_404() {
    let (_dir, app, _clock) = test_app();
    let report = body_json(send(&app, Method::POST, "/api/petreports", Some(lost_dog())));
    let uri = format!("/api/petreports/{}", report["id"]);

    assert_eq!(send(&app, Method::DELETE, &uri, None).status(), 204);
    assert_eq!(send(&app, Method::GET, &uri, None).status(), 404);
    assert_eq!(send(&app, Method::DELETE, &uri, None).status(), 404);
}
