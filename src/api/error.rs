use thiserror::Error;

/// Failures talking to the analysis backend.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not authenticated or session expired")]
    Unauthorized,
    #[error("Not authorized: {0}")]
    Forbidden(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("Server error (HTTP {status}): {detail}")]
    Server { status: u16, detail: String },
    #[error("Unexpected HTTP {status}: {detail}")]
    Status { status: u16, detail: String },
    #[error("HTTP error: {0}")]
    Transport(String),
    #[error("Invalid response: {0}")]
    Json(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// Whether the backend rejected the credential.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

pub(super) fn map_status_error(code: u16, body: String) -> ApiError {
    let detail = extract_detail(&body);
    match code {
        400 | 422 => ApiError::BadRequest(detail),
        401 => ApiError::Unauthorized,
        403 => ApiError::Forbidden(detail),
        404 => ApiError::NotFound(detail),
        500..=599 => ApiError::Server {
            status: code,
            detail,
        },
        _ => ApiError::Status {
            status: code,
            detail,
        },
    }
}

/// Pull a human readable message out of a FastAPI-style error body.
///
/// Handles `{"detail": "..."}`, validation lists
/// (`{"detail": [{"msg": "..."}]}`) and falls back to the raw body.
pub(super) fn extract_detail(body: &str) -> String {
    let trimmed = body.trim();
    let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) else {
        return trimmed.to_string();
    };
    match value.get("detail") {
        Some(serde_json::Value::String(detail)) => detail.clone(),
        Some(serde_json::Value::Array(items)) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|msg| msg.as_str()))
                .collect();
            if messages.is_empty() {
                trimmed.to_string()
            } else {
                messages.join("; ")
            }
        }
        _ => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_statuses_to_variants() {
        assert!(map_status_error(401, String::new()).is_unauthorized());
        assert!(matches!(
            map_status_error(403, r#"{"detail":"Not authorized"}"#.into()),
            ApiError::Forbidden(detail) if detail == "Not authorized"
        ));
        assert!(matches!(
            map_status_error(502, "bad gateway".into()),
            ApiError::Server { status: 502, .. }
        ));
        assert!(matches!(
            map_status_error(409, String::new()),
            ApiError::Status { status: 409, .. }
        ));
    }

    #[test]
    fn bad_request_carries_server_detail() {
        let err = map_status_error(
            400,
            r#"{"detail":"The user with this username already exists in the system."}"#.into(),
        );
        assert_eq!(
            err.to_string(),
            "The user with this username already exists in the system."
        );
    }

    #[test]
    fn validation_errors_join_messages() {
        let body = r#"{"detail":[{"loc":["body","email"],"msg":"field required"},{"msg":"too short"}]}"#;
        assert_eq!(extract_detail(body), "field required; too short");
    }

    #[test]
    fn non_json_body_is_returned_verbatim() {
        assert_eq!(extract_detail("  Internal Server Error \n"), "Internal Server Error");
    }
}
