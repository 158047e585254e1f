//! Typed error hierarchy for the sprintdeck client.
//!
//! Two top-level enums cover the two subsystems:
//! - `ApiError` — transport, non-success HTTP status, and decode failures
//!   from the remote store
//! - `BoardError` — client-side guards and view-model failures, wrapping
//!   `ApiError` for the network-backed operations

use thiserror::Error;

/// Errors from a single request/response cycle against the backend.
///
/// Every API operation issues exactly one request; there is no retry and
/// no timeout beyond the HTTP client's defaults, so each variant maps to
/// one observable failure of that single attempt.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("server returned {status} for {url}: {message}")]
    Status {
        status: u16,
        url: String,
        message: String,
    },

    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The create-task contract resolves the new id from a response header
    /// named `location`, not from the body.
    #[error("response from {url} is missing the location header")]
    MissingLocation { url: String },

    #[error("response from {url} carries a malformed location header")]
    BadLocation { url: String },
}

impl ApiError {
    /// HTTP status code, when the failure was a non-success response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors from the task board view-model.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("task {id} is not on the board")]
    UnknownTask { id: i32 },

    /// At most one outstanding mutating request per record. A second
    /// mutation while one is in flight is rejected before any network I/O.
    #[error("task {id} already has a request in flight")]
    MutationInFlight { id: i32 },

    /// Completing a task requires actual hours, checked before any
    /// network call is issued.
    #[error("completing task {id} requires actual hours")]
    MissingActualHours { id: i32 },

    #[error("hours must be a positive number, got {hours}")]
    InvalidHours { hours: f64 },

    #[error("only the task creator or a manager can delete task {id}")]
    NotPermitted { id: i32 },

    #[error(transparent)]
    Api(#[from] ApiError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_status_carries_detail() {
        let err = ApiError::Status {
            status: 404,
            url: "http://localhost/api/todolist/7".into(),
            message: "not found".into(),
        };
        assert!(err.to_string().contains("404"));
        assert!(err.to_string().contains("todolist/7"));
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn api_error_status_is_none_for_other_variants() {
        let err = ApiError::MissingLocation { url: "u".into() };
        assert_eq!(err.status(), None);
    }

    #[test]
    fn board_error_converts_from_api_error() {
        let inner = ApiError::MissingLocation {
            url: "http://localhost/api/todolist".into(),
        };
        let board_err: BoardError = inner.into();
        match &board_err {
            BoardError::Api(ApiError::MissingLocation { url }) => {
                assert!(url.ends_with("/todolist"));
            }
            _ => panic!("Expected BoardError::Api(MissingLocation)"),
        }
    }

    #[test]
    fn board_error_guard_variants_are_matchable() {
        let err = BoardError::MutationInFlight { id: 3 };
        assert!(matches!(err, BoardError::MutationInFlight { id: 3 }));
        let err = BoardError::MissingActualHours { id: 9 };
        assert!(err.to_string().contains("actual hours"));
    }

    #[test]
    fn all_error_types_implement_std_error_trait() {
        fn assert_std_error<E: std::error::Error>(_: &E) {}
        assert_std_error(&ApiError::MissingLocation { url: "u".into() });
        assert_std_error(&BoardError::UnknownTask { id: 1 });
    }
}
