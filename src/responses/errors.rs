// responses/errors.rs
use crate::errors::ServerError;
use astra::{Body, Response, ResponseBuilder};
use serde::Serialize;

pub type ResultResp = Result<Response, ServerError>;

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'a str>,
}

/// Convert a ServerError into a JSON error response
pub fn error_to_response(err: ServerError) -> Response {
    let (status, field) = match &err {
        ServerError::NotFound => (404, None),
        ServerError::MethodNotAllowed => (405, None),
        ServerError::BadRequest(_) => (400, None),
        ServerError::PayloadTooLarge { .. } => (413, None),
        ServerError::Validation(v) => (400, Some(v.field)),
        ServerError::DbError(_) | ServerError::InternalError => (500, None),
    };

    // Storage details stay in the logs.
    let message = match &err {
        ServerError::DbError(_) => "Database Error".to_string(),
        other => other.to_string(),
    };

    let body = serde_json::to_vec(&ErrorBody {
        error: message,
        field,
    })
    .unwrap_or_else(|_| br#"{"error":"Internal Server Error"}"#.to_vec());

    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", mime::APPLICATION_JSON.as_ref())
        .body(Body::from(body))
        .unwrap_or_else(|_| Response::new(Body::from("Internal Server Error")))
}
