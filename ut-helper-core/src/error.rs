// error taxonomy for the upload/generate workflow

use thiserror::Error;

pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// every way a workflow operation can end without success.
/// none of these are retried and none leave the controller unusable
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    /// missing or malformed input, caught before any network call
    #[error("{0}")]
    Validation(String),

    /// generate was asked for before both uploads were confirmed
    #[error("{0}")]
    Precondition(String),

    /// non-2xx response; `message` is the best-effort detail from the body
    #[error("{message}")]
    Server { status: u16, message: String },

    /// the request never produced a response
    #[error("{0}")]
    Transport(String),

    /// a 2xx response whose body did not have the expected shape
    #[error("unexpected response from backend: {0}")]
    Decode(String),

    /// the same operation is still in flight
    #[error("{0} is already in progress")]
    Busy(&'static str),
}

impl From<reqwest::Error> for WorkflowError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            WorkflowError::Decode(err.to_string())
        } else {
            WorkflowError::Transport(err.to_string())
        }
    }
}
