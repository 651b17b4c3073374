/// Failures of a completion call.
#[derive(thiserror::Error, Debug)]
pub enum LlmError {
    #[error("API configuration error: GROQ_API_KEY is not set")]
    MissingApiKey,

    #[error("LLM API error ({status}): {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to send request to LLM API: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid response structure from LLM API: {0}")]
    MalformedResponse(String),
}

impl LlmError {
    /// Configuration errors surface to the caller; everything else is
    /// recovered with a fallback recommendation.
    pub fn is_config(&self) -> bool {
        matches!(self, LlmError::MissingApiKey)
    }
}

pub type LlmResult<T> = Result<T, LlmError>;
