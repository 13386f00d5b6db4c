use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Everything that can go wrong between a button press and a status banner.
///
/// The `Display` output is the text shown to the user, so backend messages
/// pass through verbatim.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("{message}")]
    Backend { status: StatusCode, message: String },

    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Unsupported(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

impl ApiError {
    /// Builds a backend error from a non-success response body.
    ///
    /// The backend reports failures as `{"error": ...}` on most routes and as
    /// `{"status": "error", "message": ...}` on the auth routes.
    pub fn from_body(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error.or(b.message))
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("Request failed with status: {}", status));

        ApiError::Backend { status, message }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_field_is_used_verbatim() {
        let err = ApiError::from_body(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"error": "path/not_found/"}"#,
        );
        assert_eq!(err.to_string(), "path/not_found/");
    }

    #[test]
    fn message_field_is_used_when_error_is_missing() {
        let err = ApiError::from_body(
            StatusCode::BAD_REQUEST,
            r#"{"status": "error", "message": "Authorization code missing"}"#,
        );
        assert_eq!(err.to_string(), "Authorization code missing");
    }

    #[test]
    fn unparseable_body_falls_back_to_status() {
        let err = ApiError::from_body(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        assert_eq!(
            err.to_string(),
            "Request failed with status: 502 Bad Gateway"
        );
    }

    #[test]
    fn blank_message_falls_back_to_status() {
        let err = ApiError::from_body(StatusCode::UNAUTHORIZED, r#"{"error": "  "}"#);
        assert!(matches!(
            &err,
            ApiError::Backend { status, .. } if *status == StatusCode::UNAUTHORIZED
        ));
        assert!(err.to_string().contains("401"));
    }
}
