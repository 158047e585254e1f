//! Remote task store client.
//!
//! One `ApiClient` over reqwest; each operation issues exactly one HTTP
//! request and maps the outcome onto [`ApiError`]. No retries (the GitHub
//! branch conflict in [`github`] is the single, bounded exception), no
//! caching, no idempotency keys — at most one attempt per user action, and
//! all state mutation happens in the caller.
//!
//! | Module    | Endpoints                                         |
//! |-----------|---------------------------------------------------|
//! | `tasks`   | /todolist CRUD plus status/hours/sprint patches   |
//! | `sprints` | /sprints and /users                               |
//! | `reports` | /reports KPI and summary endpoints                |
//! | `github`  | /github branch proxy with the 422 conflict retry  |

pub mod github;
pub mod reports;
pub mod sprints;
pub mod tasks;

pub use github::CreatedBranch;

use serde::de::DeserializeOwned;

use crate::errors::ApiError;

/// HTTP client bound to one backend base URL (for example
/// `http://localhost:8080/api`).
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        ApiClient {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Send a request and convert any non-success status into
    /// [`ApiError::Status`], pulling the `message` field out of a JSON
    /// error body when the backend supplies one.
    pub(crate) async fn send(
        &self,
        req: reqwest::RequestBuilder,
        url: &str,
    ) -> Result<reqwest::Response, ApiError> {
        let resp = req.send().await.map_err(|source| ApiError::Transport {
            url: url.to_string(),
            source,
        })?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        let message = extract_message(&body);
        tracing::debug!(%url, status = status.as_u16(), %message, "request rejected");
        Err(ApiError::Status {
            status: status.as_u16(),
            url: url.to_string(),
            message,
        })
    }

    pub(crate) async fn decode<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
        url: &str,
    ) -> Result<T, ApiError> {
        resp.json::<T>().await.map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

/// Best-effort error message from a response body: the `message` field of a
/// JSON object when present, otherwise the trimmed raw body.
fn extract_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = value.get("message").and_then(|m| m.as_str()) {
            return message.to_string();
        }
        if let Some(error) = value.get("error").and_then(|m| m.as_str()) {
            return error.to_string();
        }
    }
    body.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:8080/api/");
        assert_eq!(client.base_url(), "http://localhost:8080/api");
        assert_eq!(client.url("/todolist/3"), "http://localhost:8080/api/todolist/3");
    }

    #[test]
    fn test_extract_message_prefers_json_message_field() {
        assert_eq!(
            extract_message(r#"{"message": "Reference already exists"}"#),
            "Reference already exists"
        );
        assert_eq!(extract_message(r#"{"error": "Failed to fetch branches"}"#),
            "Failed to fetch branches");
    }

    #[test]
    fn test_extract_message_falls_back_to_raw_body() {
        assert_eq!(extract_message("  plain text failure\n"), "plain text failure");
        assert_eq!(extract_message(r#"{"detail": 1}"#), r#"{"detail": 1}"#);
    }
}
