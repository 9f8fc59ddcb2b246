use reqwest::StatusCode;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by station and measurement calls.
///
/// Every call returns a `Result` instead of logging and handing back a
/// possibly-error-shaped body; callers match on the variant when they need to
/// distinguish an API rejection from a transport fault.
#[derive(Debug, Error)]
pub enum Error {
    /// The API answered with an unexpected status code. `body` carries the
    /// (truncated) response text, which for OpenWeather is usually a JSON
    /// object with a `message` field.
    #[error("{what} failed with status {status}: {body}")]
    Api {
        what: &'static str,
        status: StatusCode,
        body: String,
    },

    /// The request never produced a usable response (connect failure, broken
    /// stream, TLS trouble).
    #[error("transport error talking to OpenWeather")]
    Http(#[from] reqwest::Error),

    /// The response had a success status but its body did not match the
    /// expected shape.
    #[error("failed to decode OpenWeather response")]
    Json(#[from] serde_json::Error),

    /// No station id is bound and none was passed explicitly.
    #[error("no station id bound; pass one explicitly or call set_station_id first")]
    MissingStationId,

    /// A single-record query came back with an empty array.
    #[error("measurement query returned no records")]
    NoMeasurements,
}
