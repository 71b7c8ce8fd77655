use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    #[error("API error: {status} - {body}")]
    UpstreamHttp { status: u16, body: String },

    #[error("Malformed upstream response: {0}")]
    UpstreamResponseMalformed(String),

    #[error("Request to generation API failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl RelayError {
    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::MalformedRequest(_) => "malformed_request",
            RelayError::UpstreamHttp { .. } => "upstream_http",
            RelayError::UpstreamResponseMalformed(_) => "upstream_response_malformed",
            RelayError::Transport(_) => "unknown",
        }
    }
}

pub type RelayResult<T> = Result<T, RelayError>;
