//! HTTP inbound adapter exposing REST endpoints.

pub mod error;
pub mod health;
pub mod profiles;
pub mod state;
pub mod users;

pub use error::ApiResult;

use actix_web::web;
use serde_json::json;
use tracing::debug;

use crate::domain::Error;

/// JSON extractor configuration shared by every endpoint.
///
/// Bodies are decoded as JSON whatever `Content-Type` the client sends.
/// Malformed bodies and missing or unknown fields are reported as
/// `invalid_request` errors with the `invalid_payload` detail code.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use fitpass::inbound::http::json_config;
///
/// let _app = App::new().app_data(json_config());
/// ```
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .content_type_required(false)
        .error_handler(|err, _req| {
            debug!(error = %err, "rejected request payload");
            Error::invalid_request("Invalid request payload")
                .with_details(json!({ "code": "invalid_payload" }))
                .into()
        })
}
