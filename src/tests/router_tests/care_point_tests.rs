use crate::db::store::CarePointStore;
use crate::router::handle;
use crate::tests::utils::{body_json, send, test_app, test_epoch};
use astra::Body;
use chrono::{DateTime, Duration, Utc};
use http::{Method, Request};
use serde_json::{json, Value};

fn station_a() -> Value {
    json!({
        "title": "Station A",
        "type": "Food",
        "latitude": 40.0,
        "longitude": -73.0,
        "status": "Ok"
    })
}

fn parse_time(v: &Value) -> DateTime<Utc> {
    v.as_str().unwrap().parse().unwrap()
}

#[test]
fn create_returns_201_with_location_and_fresh_record() {
    let (_dir, app, _clock) = test_app();

    let resp = send(&app, Method::POST, "/api/carepoints", Some(station_a()));
    assert_eq!(resp.status(), 201);
    let id = {
        let location = resp.headers().get("Location").unwrap().to_str().unwrap().to_string();
        let body = body_json(resp);
        assert_eq!(location, format!("/api/carepoints/{}", body["id"]));
        assert_eq!(body["title"], "Station A");
        assert_eq!(body["type"], "Food");
        assert_eq!(body["status"], "Ok");
        assert_eq!(parse_time(&body["lastUpdatedAt"]), test_epoch());
        body["id"].as_i64().unwrap()
    };

    let resp = send(&app, Method::GET, &format!("/api/carepoints/{id}"), None);
    assert_eq!(resp.status(), 200);
    let body = body_json(resp);
    assert_eq!(body["status"], "Ok");
    assert_eq!(body["updates"], json!([]));
}

#[test]
fn status_update_shows_up_in_head_and_history() {
    let (_dir, app, clock) = test_app();
    let id = body_json(send(&app, Method::POST, "/api/carepoints", Some(station_a())))["id"]
        .as_i64()
        .unwrap();

    clock.advance(Duration::minutes(3));
    let resp = send(
        &app,
        Method::POST,
        &format!("/api/carepoints/{id}/updates"),
        Some(json!({ "note": "refilled", "statusAfterUpdate": "NeedsRefill" })),
    );
    assert_eq!(resp.status(), 200);
    let update = body_json(resp);
    assert_eq!(update["carePointId"], id);
    assert_eq!(update["note"], "refilled");
    assert_eq!(update["statusAfterUpdate"], "NeedsRefill");

    let view = body_json(send(&app, Method::GET, &format!("/api/carepoints/{id}"), None));
    assert_eq!(view["status"], "NeedsRefill");
    assert_eq!(view["lastUpdatedAt"], update["updatedAt"]);
    assert_eq!(view["updates"].as_array().unwrap().len(), 1);
    assert_eq!(view["updates"][0], update);
}

#[test]
fn history_is_newest_first() {
    let (_dir, app, clock) = test_app();
    let id = body_json(send(&app, Method::POST, "/api/carepoints", Some(station_a())))["id"]
        .as_i64()
        .unwrap();

    for status in ["Broken", "NeedsRefill", "Ok"] {
        clock.advance(Duration::seconds(30));
        let resp = send(
            &app,
            Method::POST,
            &format!("/api/carepoints/{id}/updates"),
            Some(json!({ "statusAfterUpdate": status })),
        );
        assert_eq!(resp.status(), 200);
    }

    let view = body_json(send(&app, Method::GET, &format!("/api/carepoints/{id}"), None));
    let statuses: Vec<&str> = view["updates"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["statusAfterUpdate"].as_str().unwrap())
        .collect();
    assert_eq!(statuses, vec!["Ok", "NeedsRefill", "Broken"]);
    assert_eq!(view["status"], "Ok");
}

#[test]
fn status_update_for_unknown_point_is_404() {
    let (_dir, app, _clock) = test_app();

    let resp = send(
        &app,
        Method::POST,
        "/api/carepoints/999/updates",
        Some(json!({ "note": "", "statusAfterUpdate": "Broken" })),
    );
    assert_eq!(resp.status(), 404);

    let count = app.care_points.store().count_care_point_updates(999).unwrap();
    assert_eq!(count, 0);
}

#[test]
fn put_changes_status_but_not_history() {
    let (_dir, app, clock) = test_app();
    let id = body_json(send(&app, Method::POST, "/api/carepoints", Some(station_a())))["id"]
        .as_i64()
        .unwrap();
    clock.advance(Duration::minutes(1));
    send(
        &app,
        Method::POST,
        &format!("/api/carepoints/{id}/updates"),
        Some(json!({ "note": "fine", "statusAfterUpdate": "Ok" })),
    );

    clock.advance(Duration::minutes(1));
    let mut edit = station_a();
    edit["status"] = json!("Broken");
    edit["title"] = json!("Station A (renamed)");
    let resp = send(&app, Method::PUT, &format!("/api/carepoints/{id}"), Some(edit));
    assert_eq!(resp.status(), 200);
    let edited = body_json(resp);
    assert_eq!(edited["status"], "Broken");
    assert_eq!(parse_time(&edited["lastUpdatedAt"]), test_epoch() + Duration::minutes(2));

    let view = body_json(send(&app, Method::GET, &format!("/api/carepoints/{id}"), None));
    assert_eq!(view["status"], "Broken");
    assert_eq!(view["title"], "Station A (renamed)");
    let updates = view["updates"].as_array().unwrap();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0]["statusAfterUpdate"], "Ok");
}

#[test]
fn put_unknown_point_is_404() {
    let (_dir, app, _clock) = test_app();
    let resp = send(&app, Method::PUT, "/api/carepoints/41", Some(station_a()));
    assert_eq!(resp.status(), 404);
}

#[test]
fn delete_twice_is_204_then_404() {
    let (_dir, app, _clock) = test_app();
    let id = body_json(send(&app, Method::POST, "/api/carepoints", Some(station_a())))["id"]
        .as_i64()
        .unwrap();
    send(
        &app,
        Method::POST,
        &format!("/api/carepoints/{id}/updates"),
        Some(json!({ "statusAfterUpdate": "Broken" })),
    );

    let uri = format!("/api/carepoints/{id}");
    assert_eq!(send(&app, Method::DELETE, &uri, None).status(), 204);
    assert_eq!(send(&app, Method::DELETE, &uri, None).status(), 404);
    assert_eq!(send(&app, Method::GET, &uri, None).status(), 404);
    assert_eq!(app.care_points.store().count_care_point_updates(id).unwrap(), 0);
}

#[test]
fn list_is_most_recently_touched_first() {
    let (_dir, app, clock) = test_app();
    let mut ids = Vec::new();
    for title in ["first", "second", "third"] {
        let mut body = station_a();
        body["title"] = json!(title);
        ids.push(body_json(send(&app, Method::POST, "/api/carepoints", Some(body)))["id"].clone());
        clock.advance(Duration::seconds(10));
    }
    // Touch the oldest one.
    send(
        &app,
        Method::POST,
        &format!("/api/carepoints/{}/updates", ids[0]),
        Some(json!({ "statusAfterUpdate": "NeedsRefill" })),
    );

    let list = body_json(send(&app, Method::GET, "/api/carepoints", None));
    let titles: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["first", "third", "second"]);
}

#[test]
fn validation_failures_name_the_field() {
    let (_dir, app, _clock) = test_app();

    let mut body = station_a();
    body["title"] = json!("x".repeat(201));
    let resp = send(&app, Method::POST, "/api/carepoints", Some(body));
    assert_eq!(resp.status(), 400);
    assert_eq!(body_json(resp)["field"], "title");

    let mut body = station_a();
    body["latitude"] = json!(-90.5);
    let resp = send(&app, Method::POST, "/api/carepoints", Some(body));
    assert_eq!(resp.status(), 400);
    assert_eq!(body_json(resp)["field"], "latitude");

    let id = body_json(send(&app, Method::POST, "/api/carepoints", Some(station_a())))["id"]
        .as_i64()
        .unwrap();
    let resp = send(
        &app,
        Method::POST,
        &format!("/api/carepoints/{id}/updates"),
        Some(json!({ "note": "n".repeat(501), "statusAfterUpdate": "Ok" })),
    );
    assert_eq!(resp.status(), 400);
    assert_eq!(body_json(resp)["field"], "note");
}

#[test]
fn unknown_enum_value_is_bad_request() {
    let (_dir, app, _clock) = test_app();
    let mut body = station_a();
    body["status"] = json!("Overflowing");

    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/carepoints")
        .body(Body::from(body.to_string()))
        .unwrap();

    match handle(req, &app) {
        Err(crate::errors::ServerError::BadRequest(msg)) => assert!(msg.contains("invalid JSON body")),
        other => panic!("expected BadRequest, got: {:?}", other.map(|r| r.status())),
    }
}
