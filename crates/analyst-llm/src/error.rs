//! Errors from talking to a chat model

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LLMError>;

#[derive(Error, Debug)]
pub enum LLMError {
    /// Neither OpenAI nor Databricks credentials were found
    #[error("LLM provider not configured: {0}")]
    NotConfigured(String),

    /// 401 or 403
    #[error("LLM endpoint rejected the credentials")]
    Unauthorized,

    /// 429, with the endpoint's explanation
    #[error("LLM endpoint is rate limiting: {0}")]
    RateLimited(String),

    /// 404; Databricks answers this for an unknown serving endpoint
    #[error("No model or serving endpoint named '{0}'")]
    ModelNotFound(String),

    /// Any other non-success status
    #[error("LLM endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The call never produced a response
    #[error("LLM request failed: {0}")]
    RequestFailed(String),

    /// A 2xx answer that could not be turned into a message
    #[error("Malformed LLM response: {0}")]
    MalformedResponse(String),

    #[cfg(feature = "openai")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            LLMError::ModelNotFound("dbrx".to_string()).to_string(),
            "No model or serving endpoint named 'dbrx'"
        );
        assert_eq!(
            LLMError::Status {
                status: 400,
                body: "bad tools".to_string()
            }
            .to_string(),
            "LLM endpoint returned 400: bad tools"
        );
    }
}
