use reqwest::StatusCode;
use thiserror::Error;

use crate::model::leave_request::LeaveStatus;

#[derive(Debug, Error)]
pub enum HrmError {
    /// The request never produced a response (DNS, connect, reset...)
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The local HTTP client could not be built; no request was attempted
    #[error("http client setup: {0}")]
    ClientSetup(reqwest::Error),

    /// Non-2xx response; the body text is kept as the detail
    #[error("request failed ({status}): {body}")]
    RequestFailed { status: StatusCode, body: String },

    #[error("unexpected response body: {0}")]
    Decode(String),

    /// Rejected client-side before any remote call was made
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("leave request cannot move from {from} to {to}")]
    InvalidTransition { from: LeaveStatus, to: LeaveStatus },

    #[error("access denied: {0}")]
    AccessDenied(&'static str),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("not signed in")]
    NotAuthenticated,

    #[error("entity store has not been loaded")]
    StoreNotLoaded,

    #[error("session storage: {0}")]
    Storage(#[from] std::io::Error),

    #[error("serialization: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl HrmError {
    pub fn validation(msg: impl Into<String>) -> Self {
        HrmError::Validation(msg.into())
    }

    /// True for failures reported by the remote side (as opposed to local checks)
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            HrmError::Transport(_) | HrmError::RequestFailed { .. } | HrmError::Decode(_)
        )
    }
}

pub type HrmResult<T> = Result<T, HrmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_setup_is_a_local_failure() {
        let cause = reqwest::Client::new().get("not a url").build().unwrap_err();
        let err = HrmError::ClientSetup(cause);
        assert!(!err.is_remote());
        assert!(err.to_string().starts_with("http client setup"));
    }

    #[test]
    fn remote_failures_are_flagged() {
        let err = HrmError::RequestFailed {
            status: StatusCode::BAD_GATEWAY,
            body: "down".into(),
        };
        assert!(err.is_remote());
        assert!(!HrmError::validation("x").is_remote());
    }
}
