use std::io::Read;
use std::time::Instant;

use astra::{Body, Request, Response};
use http::header::{
    HeaderMap, HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_LENGTH, ORIGIN, VARY,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, info};

use crate::app::App;
use crate::errors::ServerError;
use crate::responses::{
    created_response, error_to_response, json_response, no_content, ResultResp,
};

/// Larger request bodies are refused with 413.
pub const MAX_BODY_BYTES: u64 = 64 * 1024;

/// Entry point for the server: never fails, always answers.
pub fn respond(req: Request, app: &App) -> Response {
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let origin = req.headers().get(ORIGIN).cloned();

    let resp = match handle(req, app) {
        Ok(resp) => resp,
        Err(err) => {
            match &err {
                ServerError::DbError(msg) => error!(%method, %path, error = %msg, "storage failure"),
                other => debug!(%method, %path, error = %other, "request rejected"),
            }
            error_to_response(err)
        }
    };
    let resp = with_cors(resp, origin.as_ref(), &app.cors_origins);

    info!(
        %method,
        %path,
        status = resp.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request"
    );
    resp
}

pub fn handle(req: Request, app: &App) -> ResultResp {
    let (parts, body) = req.into_parts();
    let method = parts.method.as_str();
    let segments: Vec<&str> = parts
        .uri
        .path()
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();

    // CORS preflight
    if method == "OPTIONS" {
        return no_content();
    }

    if declared_length(&parts.headers).is_some_and(|n| n > MAX_BODY_BYTES) {
        return Err(ServerError::PayloadTooLarge {
            limit: MAX_BODY_BYTES,
        });
    }

    match segments.as_slice() {
        ["health"] => match method {
            "GET" => json_response(200, &serde_json::json!({ "status": "ok" })),
            _ => Err(ServerError::MethodNotAllowed),
        },

        // ----- Care points -----
        ["api", "carepoints"] => match method {
            "GET" => json_response(200, &app.care_points.list_all()?),
            "POST" => {
                let created = app.care_points.create(read_json(body)?)?;
                created_response(&format!("/api/carepoints/{}", created.id), &created)
            }
            _ => Err(ServerError::MethodNotAllowed),
        },
        ["api", "carepoints", id] => {
            let id = parse_id(id)?;
            match method {
                "GET" => found(app.care_points.get_with_history(id)?),
                "PUT" => found(app.care_points.update_fields(id, read_json(body)?)?),
                "DELETE" => deleted(app.care_points.delete(id)?),
                _ => Err(ServerError::MethodNotAllowed),
            }
        }
        ["api", "carepoints", id, "updates"] => {
            let id = parse_id(id)?;
            match method {
                "POST" => found(app.care_points.record_status_update(id, read_json(body)?)?),
                _ => Err(ServerError::MethodNotAllowed),
            }
        }

        // ----- Pet reports -----
        ["api", "petreports"] => match method {
            "GET" => json_response(200, &app.pet_reports.list()?),
            "POST" => {
                let created = app.pet_reports.create(read_json(body)?)?;
                created_response(&format!("/api/petreports/{}", created.id), &created)
            }
            _ => Err(ServerError::MethodNotAllowed),
        },
        ["api", "petreports", id] => {
            let id = parse_id(id)?;
            match method {
                "GET" => found(app.pet_reports.get(id)?),
                "PUT" => found(app.pet_reports.update(id, read_json(body)?)?),
                "DELETE" => deleted(app.pet_reports.delete(id)?),
                _ => Err(ServerError::MethodNotAllowed),
            }
        }

        // ----- Shelters -----
        ["api", "shelters"] => match method {
            "GET" => json_response(200, &app.shelters.list()?),
            "POST" => {
                let created = app.shelters.create(read_json(body)?)?;
                created_response(&format!("/api/shelters/{}", created.id), &created)
            }
            _ => Err(ServerError::MethodNotAllowed),
        },
        ["api", "shelters", id] => {
            let id = parse_id(id)?;
            match method {
                "GET" => found(app.shelters.get(id)?),
                "PUT" => found(app.shelters.update(id, read_json(body)?)?),
                "DELETE" => deleted(app.shelters.delete(id)?),
                _ => Err(ServerError::MethodNotAllowed),
            }
        }

        _ => Err(ServerError::NotFound),
    }
}

fn parse_id(raw: &str) -> Result<i64, ServerError> {
    raw.parse()
        .map_err(|_| ServerError::BadRequest(format!("invalid id `{raw}`")))
}

fn declared_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

fn read_json<T: DeserializeOwned>(mut body: Body) -> Result<T, ServerError> {
    // One byte past the limit tells an oversized body apart from one that fits exactly.
    let mut buf = Vec::new();
    body.reader()
        .take(MAX_BODY_BYTES + 1)
        .read_to_end(&mut buf)
        .map_err(|e| ServerError::BadRequest(format!("unreadable body: {e}")))?;
    if buf.len() as u64 > MAX_BODY_BYTES {
        return Err(ServerError::PayloadTooLarge {
            limit: MAX_BODY_BYTES,
        });
    }

    serde_json::from_slice(&buf)
        .map_err(|e| ServerError::BadRequest(format!("invalid JSON body: {e}")))
}

fn found<T: Serialize>(value: Option<T>) -> ResultResp {
    match value {
        Some(v) => json_response(200, &v),
        None => Err(ServerError::NotFound),
    }
}

fn deleted(removed: bool) -> ResultResp {
    if removed {
        no_content()
    } else {
        Err(ServerError::NotFound)
    }
}

/// Echoes the request's `Origin` back only when it is on the allow-list.
fn with_cors(mut resp: Response, origin: Option<&HeaderValue>, allowed: &[String]) -> Response {
    let headers = resp.headers_mut();
    if let Some(origin) = origin {
        let listed = origin
            .to_str()
            .is_ok_and(|o| allowed.iter().any(|a| a == o));
        if listed {
            headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
        }
    }
    headers.append(VARY, HeaderValue::from_static("Origin"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, PUT, DELETE, OPTIONS"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    resp
}
