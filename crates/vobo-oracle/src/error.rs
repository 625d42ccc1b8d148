use thiserror::Error;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("api key variable {0} is not set")]
    MissingApiKey(String),

    #[error("oracle transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("oracle returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("oracle returned no choices")]
    EmptyResponse,

    #[error("failed to decode oracle response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("oracle unavailable: {0}")]
    Unavailable(String),
}
