use reqwest::{Response, StatusCode};
use thiserror::Error;

/// Errors raised by a single call to GitHub or Jira
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{service} returned {status}: {body}")]
    Status {
        service: &'static str,
        status: StatusCode,
        body: String,
    },

    /// Jira accepted the request but rejected the deployment.
    /// Displays the joined rejection messages and nothing else.
    #[error("{0}")]
    Rejected(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("An error occurred while retrieving commit messages: {0}")]
    Retrieval(#[source] ApiError),

    #[error("An error occurred while sending deployment info to Jira: {0}")]
    Notification(#[source] ApiError),

    #[error("An error occurred while tagging latest commit: {0}")]
    Tagging(#[source] ApiError),

    #[error("Failed to set up HTTP client: {0}")]
    Client(#[source] ApiError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Environment variable not set: {0}")]
    EnvVar(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Pass successful responses through, turn anything else into [`ApiError::Status`]
pub(crate) async fn check_status(
    service: &'static str,
    response: Response,
) -> std::result::Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Status {
        service,
        status,
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_displays_only_messages() {
        let err = ApiError::Rejected("bad payload".to_string());
        assert_eq!(err.to_string(), "bad payload");
    }

    #[test]
    fn test_stage_errors_carry_prefix() {
        let err = Error::Retrieval(ApiError::Status {
            service: "GitHub",
            status: StatusCode::NOT_FOUND,
            body: "No commit found for SHA: v1".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "An error occurred while retrieving commit messages: GitHub returned 404 Not Found: No commit found for SHA: v1"
        );

        let err = Error::Notification(ApiError::Rejected("bad payload".to_string()));
        assert_eq!(
            err.to_string(),
            "An error occurred while sending deployment info to Jira: bad payload"
        );

        let err = Error::Tagging(ApiError::Rejected("Reference already exists".to_string()));
        assert!(err
            .to_string()
            .starts_with("An error occurred while tagging latest commit: "));
    }

    #[test]
    fn test_client_setup_is_not_a_stage_failure() {
        let decode = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = Error::Client(ApiError::Decode(decode));

        let message = err.to_string();
        assert!(message.starts_with("Failed to set up HTTP client: Invalid response body: "));
        assert!(!message.contains("retrieving commit messages"));
    }
}
