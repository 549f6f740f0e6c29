use thiserror::Error;

/// Failures that prevented a request from reaching the server or completing
/// at the transport level.
#[derive(Error, Debug)]
pub enum UrlError {
    #[error("invalid URL: {0}")]
    Invalid(#[from] url::ParseError),

    #[error("{0}")]
    Transport(#[source] reqwest::Error),
}

/// Every way fetching the article list can fail.
///
/// The variants are mutually exclusive and listed in the order the pipeline
/// detects them.
#[derive(Error, Debug)]
pub enum Error {
    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Response error: server returned status {0}")]
    Response(u16),

    #[error("Decoding error: {0}")]
    Decoding(#[source] serde_json::Error),

    #[error("Unknown error: {0}")]
    Generic(String),
}

/// Fieldless mirror of [`Error`], handy for matching and display decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Url,
    Response,
    Decoding,
    Generic,
}

impl Error {
    /// Status reported when the server's status code cannot be read.
    pub const DEFAULT_STATUS: u16 = 500;

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Url(_) => ErrorKind::Url,
            Error::Response(_) => ErrorKind::Response,
            Error::Decoding(_) => ErrorKind::Decoding,
            Error::Generic(_) => ErrorKind::Generic,
        }
    }

    /// Status code carried by a [`Error::Response`].
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Response(status) => Some(*status),
            _ => None,
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::Url(UrlError::Invalid(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        match err.classify() {
            serde_json::error::Category::Io => Error::Generic(err.to_string()),
            _ => Error::Decoding(err),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_status() {
            let status = err
                .status()
                .map(|s| s.as_u16())
                .unwrap_or(Self::DEFAULT_STATUS);
            Error::Response(status)
        } else if err.is_decode() {
            Error::Generic(format!("failed to decode response: {}", err))
        } else if err.is_builder()
            || err.is_timeout()
            || err.is_connect()
            || err.is_request()
            || err.is_body()
        {
            Error::Url(UrlError::Transport(err))
        } else {
            Error::Generic(err.to_string())
        }
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::Generic(format!("background task failed: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
