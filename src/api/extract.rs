use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header, HeaderMap, StatusCode},
};
use serde::de::DeserializeOwned;
use serde_json::error::Category;

use super::request::Validate;
use crate::error::ApiError;

/// JSON body extractor that parses and validates in one step.
///
/// - non-JSON `Content-Type` -> 415
/// - empty body or a body whose shape does not match `T` -> 422
/// - malformed JSON -> 400
/// - field rule violations reported by `Validate` -> 422 with `field_errors`
pub struct ValidJson<T: Validate>(pub T::Output);

impl<T: Validate> std::fmt::Debug for ValidJson<T>
where
    T::Output: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ValidJson").field(&self.0).finish()
    }
}

#[async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let has_content_type = req.headers().contains_key(header::CONTENT_TYPE);
        if has_content_type && !is_json_content_type(req.headers()) {
            return Err(ApiError::unsupported_media_type(
                "Expected request with `Content-Type: application/json`",
            ));
        }

        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                ApiError::payload_too_large(rejection.body_text())
            } else {
                ApiError::bad_request(rejection.body_text())
            }
        })?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(ApiError::invalid_field("body", "request body is required"));
        }
        if !has_content_type {
            return Err(ApiError::unsupported_media_type(
                "Expected request with `Content-Type: application/json`",
            ));
        }

        let payload: T = serde_json::from_slice(&bytes).map_err(|e| match e.classify() {
            Category::Data => ApiError::invalid_field("body", e.to_string()),
            Category::Syntax | Category::Eof | Category::Io => {
                ApiError::invalid_json(format!("Malformed JSON body: {}", e))
            }
        })?;

        payload
            .validate()
            .map(ValidJson)
            .map_err(|field_errors| {
                tracing::debug!("Request validation failed: {:?}", field_errors);
                ApiError::unprocessable_entity("Request validation failed", field_errors)
            })
    }
}

fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(value) = headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let essence = value.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
    essence == "application/json" || (essence.starts_with("application/") && essence.ends_with("+json"))
}
