//! API Error Types
//!
//! Failures of a backend call, categorized by HTTP status the way every page
//! reports them to the user.

use serde_json::Value;
use thiserror::Error;

/// API error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced a response
    #[error("Network error: {0}")]
    Network(String),

    /// The response body did not match the expected shape
    #[error("Invalid response: {0}")]
    Decode(String),

    /// 401 after the refresh-and-retry path was already used
    #[error("Not authenticated")]
    Unauthorized,

    /// Refresh failed or no refresh token was stored; tokens were cleared
    #[error("Session expired")]
    SessionExpired,

    /// 403
    #[error("Permission denied")]
    Forbidden(Option<String>),

    /// 404
    #[error("Not found")]
    NotFound,

    /// 400 with the backend's explanation when it sent one
    #[error("Validation error{}", .0.as_deref().map(|d| format!(": {d}")).unwrap_or_default())]
    Validation(Option<String>),

    /// Any other non-success status
    #[error("API error {status}")]
    Status { status: u16, detail: Option<String> },
}

impl ApiError {
    /// Categorize a non-success response
    pub fn from_response(status: u16, body: &str) -> Self {
        let detail = extract_detail(body);
        match status {
            400 => ApiError::Validation(detail),
            401 => ApiError::Unauthorized,
            403 => ApiError::Forbidden(detail),
            404 => ApiError::NotFound,
            _ => ApiError::Status { status, detail },
        }
    }

    /// HTTP status behind the error, if there was a response
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Network(_) | ApiError::Decode(_) | ApiError::SessionExpired => None,
            ApiError::Unauthorized => Some(401),
            ApiError::Forbidden(_) => Some(403),
            ApiError::NotFound => Some(404),
            ApiError::Validation(_) => Some(400),
            ApiError::Status { status, .. } => Some(*status),
        }
    }

    /// Backend-provided message, if any
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Forbidden(detail)
            | ApiError::Validation(detail)
            | ApiError::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

/// Pull a human message out of a DRF-style error body.
///
/// Looks at `detail`, then the first field error
/// (`{"password": ["too short"]}`), then `error`. A bare list of messages
/// yields its first entry.
pub fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match &value {
        Value::Object(map) => {
            if let Some(Value::String(s)) = map.get("detail") {
                return Some(s.clone());
            }
            map.iter()
                .filter(|(key, _)| key.as_str() != "detail" && key.as_str() != "error")
                .find_map(|(_, v)| first_message(v))
                .or_else(|| match map.get("error") {
                    Some(Value::String(s)) => Some(s.clone()),
                    _ => None,
                })
        }
        other => first_message(other),
    }
}

fn first_message(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(first_message),
        _ => None,
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::from_response(404, ""), ApiError::NotFound);
        assert_eq!(ApiError::from_response(401, "{}"), ApiError::Unauthorized);
        assert!(matches!(ApiError::from_response(403, "{}"), ApiError::Forbidden(None)));
        assert!(matches!(
            ApiError::from_response(500, "<html>"),
            ApiError::Status { status: 500, detail: None }
        ));
    }

    #[test]
    fn test_detail_field() {
        let err = ApiError::from_response(
            400,
            r#"{"detail": "No se puede eliminar: la categoría tiene productos asociados."}"#,
        );
        assert_eq!(
            err.detail(),
            Some("No se puede eliminar: la categoría tiene productos asociados.")
        );
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_field_errors() {
        assert_eq!(
            extract_detail(r#"{"username": ["A user with that username already exists."]}"#),
            Some("A user with that username already exists.".to_string())
        );
        assert_eq!(
            extract_detail(r#"["Stock insuficiente"]"#),
            Some("Stock insuficiente".to_string())
        );
        assert_eq!(extract_detail("not json"), None);
    }

    #[test]
    fn test_field_error_wins_over_error_key() {
        assert_eq!(
            extract_detail(r#"{"error": "generic", "code": ["duplicado"]}"#),
            Some("duplicado".to_string())
        );
        assert_eq!(
            extract_detail(r#"{"error": "Caja ya cerrada"}"#),
            Some("Caja ya cerrada".to_string())
        );
        assert_eq!(
            extract_detail(r#"{"detail": "sin permiso", "code": ["x"]}"#),
            Some("sin permiso".to_string())
        );
    }
}
