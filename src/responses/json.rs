// responses/json.rs
use crate::errors::ServerError;
use crate::responses::ResultResp;
use astra::{Body, ResponseBuilder};
use serde::Serialize;
use tracing::error;

pub fn json_response<T: Serialize>(status: u16, value: &T) -> ResultResp {
    let body = serde_json::to_vec(value).map_err(|e| {
        error!(error = %e, "serialize response body failed");
        ServerError::InternalError
    })?;

    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", mime::APPLICATION_JSON.as_ref())
        .body(Body::from(body))
        .map_err(|_| ServerError::InternalError)
}

/// 201 with a `Location` pointing at the new resource.
pub fn created_response<T: Serialize>(location: &str, value: &T) -> ResultResp {
    let mut resp = json_response(201, value)?;
    let location = location
        .parse::<http::HeaderValue>()
        .map_err(|_| ServerError::InternalError)?;
    resp.headers_mut().insert(http::header::LOCATION, location);
    Ok(resp)
}

pub fn no_content() -> ResultResp {
    ResponseBuilder::new()
        .status(204)
        .body(Body::empty())
        .map_err(|_| ServerError::InternalError)
}
