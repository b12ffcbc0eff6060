use thiserror::Error;

/// Everything that can go wrong talking to the inference server.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    #[error("Ollama not reachable: {0}")]
    Unreachable(String),
    #[error("Server returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Failed to fetch models: {status}")]
    ModelList { status: u16 },
    #[error("Malformed response: {0}")]
    Decode(String),
    #[error("Stream interrupted: {0}")]
    Stream(String),
    #[error("No model selected")]
    NoModelSelected,
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        ChatError::Decode(err.to_string())
    }
}

#[cfg(feature = "ssr")]
impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            ChatError::Status {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else if err.is_decode() {
            ChatError::Decode(err.to_string())
        } else if err.is_body() {
            ChatError::Stream(err.to_string())
        } else {
            ChatError::Unreachable(err.to_string())
        }
    }
}
