//! Endpoint data structures.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::detection::DetectionMode;
use crate::fetch::SiteParser;
use crate::signatures::Category;

/// Shared state for the endpoint
#[derive(Clone)]
pub struct AppState {
    pub parser: Arc<SiteParser>,
    /// Deadline passed to every outbound fetch
    pub timeout: Duration,
}

/// Body of `POST /api/parse-website`
///
/// Fields are optional here so that missing values produce a field-level
/// validation error rather than a generic deserialization failure.
#[derive(Debug, Default, Deserialize)]
pub struct ParseRequest {
    pub url: Option<String>,
    pub mode: Option<String>,
}

impl ParseRequest {
    /// Checks the request shape and returns the raw URL and the parsed mode.
    pub fn validate(&self) -> Result<(String, DetectionMode), Vec<FieldIssue>> {
        let mut issues = Vec::new();

        let url = match self.url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => Some(url.to_string()),
            _ => {
                issues.push(FieldIssue::new("url", "url is required"));
                None
            }
        };

        let mode = match self.mode.as_deref() {
            None => Some(DetectionMode::All),
            Some(raw) => match DetectionMode::from_str(raw) {
                Ok(mode) => Some(mode),
                Err(_) => {
                    issues.push(FieldIssue::new(
                        "mode",
                        "mode must be one of: all, widgets, analytics, messengers",
                    ));
                    None
                }
            },
        };

        match (url, mode) {
            (Some(url), Some(mode)) if issues.is_empty() => Ok((url, mode)),
            _ => Err(issues),
        }
    }
}

/// Query string of `GET /api/signatures`
#[derive(Debug, Default, Deserialize)]
pub struct SignaturesQuery {
    pub category: Option<Category>,
}

/// JSON response for `/health`
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub signatures: usize,
    pub version: &'static str,
}

/// One rejected field of a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

impl FieldIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Error returned for requests rejected before any fetch happens.
///
/// Always a 4xx; detection failures never produce this type.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
    details: Vec<FieldIssue>,
}

#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    details: Vec<FieldIssue>,
}

impl ApiError {
    /// Request body has the wrong shape.
    pub fn validation(details: Vec<FieldIssue>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "VALIDATION_ERROR",
            message: "Invalid request body".to_string(),
            details,
        }
    }

    /// URL could not be normalized.
    pub fn invalid_url(input: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "INVALID_URL",
            message: format!("'{}' is not a valid website address", input),
            details: vec![FieldIssue::new("url", "Invalid URL")],
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorEnvelope {
            error: ErrorBody {
                code: self.code,
                message: self.message,
                details: self.details,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_url_without_mode() {
        let request = ParseRequest {
            url: Some("example.ru".to_string()),
            mode: None,
        };
        assert_eq!(
            request.validate(),
            Ok(("example.ru".to_string(), DetectionMode::All))
        );
    }

    #[test]
    fn test_validate_parses_mode() {
        let request = ParseRequest {
            url: Some("example.ru".to_string()),
            mode: Some("analytics".to_string()),
        };
        assert_eq!(
            request.validate().map(|(_, mode)| mode),
            Ok(DetectionMode::Analytics)
        );
    }

    #[test]
    fn test_validate_reports_every_bad_field() {
        let request = ParseRequest {
            url: Some("   ".to_string()),
            mode: Some("pixels".to_string()),
        };
        let issues = request.validate().expect_err("both fields are invalid");
        let fields: Vec<&str> = issues.iter().map(|i| i.field.as_str()).collect();
        assert_eq!(fields, vec!["url", "mode"]);
    }

    #[test]
    fn test_validate_requires_url() {
        let issues = ParseRequest::default()
            .validate()
            .expect_err("url is required");
        assert_eq!(issues, vec![FieldIssue::new("url", "url is required")]);
    }

    #[test]
    fn test_api_error_status() {
        let response = ApiError::invalid_url("not a url").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
