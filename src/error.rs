// Error types for rfiscan
// A transport failure is never conflated with a negative detection

use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum Error {
    /// The target or script URL could not be parsed. Raised before any
    /// network activity happens.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The request could not be completed (connection refused, DNS failure,
    /// timeout). Distinct from "not vulnerable".
    #[error("transport failure for {url}: {message}")]
    Transport { url: String, message: String },
}

impl Error {
    pub(crate) fn transport(url: &Url, err: reqwest::Error) -> Self {
        Error::Transport {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}
