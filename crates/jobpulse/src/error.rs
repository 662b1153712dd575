use itertools::Itertools;
use thiserror::Error;

/// Coarse classification of a [`JobPulseError`], for callers that only need to
/// decide how to react (show a form error, offer a retry, report a bug).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Transport,
    Api,
    Format,
    Config,
    Store,
    Other,
}

#[derive(Error, Debug)]
pub enum JobPulseError {
    #[error("Invalid search input: {}", .0.iter().join("; "))]
    Validation(Vec<crate::search::InvalidInput>),
    #[error("Transport error: {0}")]
    Transport(#[from] crate::transport::TransportError),
    #[error("API error: {message} (status: {status})")]
    Api { status: String, message: String },
    #[error(transparent)]
    Format(#[from] crate::model::FormatError),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Storage error: {0}")]
    Store(#[from] crate::store::StoreError),
    #[error("Init Logging error: {0}")]
    InitLoggingError(#[from] tracing_subscriber::filter::ParseError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl JobPulseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Transport(_) => ErrorKind::Transport,
            Self::Api { .. } => ErrorKind::Api,
            Self::Format(_) => ErrorKind::Format,
            Self::ConfigError(_) | Self::InitLoggingError(_) => ErrorKind::Config,
            Self::Store(_) => ErrorKind::Store,
            Self::Other(_) => ErrorKind::Other,
        }
    }

    /// Only network-level failures are worth retrying.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Transport
    }
}

pub type Result<T> = std::result::Result<T, JobPulseError>;
