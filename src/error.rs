//! Error types for trip planning.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// An input location could not be geocoded. A client input error.
    #[error("address could not be resolved: {0}")]
    InvalidAddress(String),

    /// The upstream map/geo service failed. Distinct from client errors.
    #[error("geo service failure: {0}")]
    GeoService(String),

    /// The requested trip cannot be completed within cycle/duty rules.
    /// A property of the request, not a system fault.
    #[error("duty limit exceeded: {0}")]
    DutyLimitExceeded(String),

    /// Malformed request or leg data.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::GeoService(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
