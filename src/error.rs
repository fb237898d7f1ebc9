use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("provider API error ({status}): {body}")]
    Provider { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to parse response: {0}")]
    Parse(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Failures that are scoped to one provider branch during fan-out.
    /// These degrade that branch's contribution instead of aborting the call.
    pub fn is_provider_failure(&self) -> bool {
        matches!(self, Error::Provider { .. } | Error::Transport(_))
    }
}
