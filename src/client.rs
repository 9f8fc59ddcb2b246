//! Shared client context: HTTP client, API key and the bound station id that
//! the station manager and the measurement client both see.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use reqwest::{Client, Response, StatusCode};
use tracing::warn;

use crate::error::{Error, Result};

pub(crate) const BASE_API_URL: &str = "http://api.openweathermap.org/data/3.0";

/// The `appid` query pair appended to every request.
pub(crate) fn appid(api_key: &str) -> [(&'static str, &str); 1] {
    [("appid", api_key)]
}

/// Context shared between [`crate::Station`] and [`crate::Measurements`].
/// Rebinding the station id through either handle is visible to both.
#[derive(Debug)]
pub(crate) struct Shared {
    pub http: Client,
    pub api_key: String,
    base_url: String,
    station_id: Mutex<Option<String>>,
}

impl Shared {
    pub fn new(api_key: String, station_id: Option<String>) -> Arc<Self> {
        Arc::new(Self {
            http: Client::new(),
            api_key,
            base_url: BASE_API_URL.to_string(),
            station_id: Mutex::new(station_id),
        })
    }

    pub fn stations_url(&self) -> String {
        format!("{}/stations", self.base_url)
    }

    pub fn station_url(&self, station_id: &str) -> String {
        format!("{}/stations/{station_id}", self.base_url)
    }

    pub fn measurements_url(&self) -> String {
        format!("{}/measurements", self.base_url)
    }

    fn slot(&self) -> MutexGuard<'_, Option<String>> {
        self.station_id.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn station_id(&self) -> Option<String> {
        self.slot().clone()
    }

    pub fn set_station_id(&self, station_id: String) {
        *self.slot() = Some(station_id);
    }

    /// Capture a server-assigned id, but never clobber an explicit binding.
    pub fn bind_if_unset(&self, station_id: &str) {
        let mut slot = self.slot();
        if slot.is_none() {
            *slot = Some(station_id.to_owned());
        }
    }

    /// Explicit id wins over the bound one; neither present is an error.
    pub fn resolve_station_id(&self, explicit: Option<&str>) -> Result<String> {
        match explicit {
            Some(id) => Ok(id.to_owned()),
            None => self.station_id().ok_or(Error::MissingStationId),
        }
    }
}

/// Read the body and require the expected status, turning anything else into
/// [`Error::Api`] with the (truncated) response text attached.
pub(crate) async fn ensure_status(
    res: Response,
    expected: StatusCode,
    what: &'static str,
) -> Result<String> {
    let status = res.status();
    let body = res.text().await?;

    if status != expected {
        warn!(%status, what, "OpenWeather request failed");
        return Err(Error::Api {
            what,
            status,
            body: truncate_body(&body),
        });
    }

    Ok(body)
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
