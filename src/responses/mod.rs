pub mod errors;
pub mod json;

pub use errors::{error_to_response, ResultResp};
pub use json::{created_response, json_response, no_content};
