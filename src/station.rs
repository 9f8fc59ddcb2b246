//! Station manager: CRUD over the `stations` collection.

use std::sync::Arc;

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use crate::client::{Shared, appid, ensure_status};
use crate::error::Result;
use crate::measurements::Measurements;
use crate::model::{StationInfo, StationParams, StationPatch};

/// Client for managing personal weather stations.
///
/// A `Station` carries the API key and an optional bound station id. The id is
/// shared with the [`Measurements`] handle returned by [`Station::measurements`],
/// so binding it here (explicitly or through a successful [`Station::register`])
/// also targets subsequent measurement calls.
#[derive(Debug)]
pub struct Station {
    shared: Arc<Shared>,
    measurements: Measurements,
}

#[derive(Debug, Deserialize)]
struct Registered {
    #[serde(alias = "ID")]
    id: String,
}

impl Station {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::build(api_key.into(), None)
    }

    pub fn with_station_id(api_key: impl Into<String>, station_id: impl Into<String>) -> Self {
        Self::build(api_key.into(), Some(station_id.into()))
    }

    fn build(api_key: String, station_id: Option<String>) -> Self {
        let shared = Shared::new(api_key, station_id);
        let measurements = Measurements::from_shared(Arc::clone(&shared));
        Self { shared, measurements }
    }

    /// Measurement client bound to the same API key and station id.
    pub fn measurements(&self) -> Measurements {
        self.measurements.clone()
    }

    /// Register a new station and return the server-assigned id. If no station
    /// id is bound yet, the new id becomes the bound one.
    pub async fn register(&self, params: &StationParams) -> Result<String> {
        debug!(external_id = %params.external_id, "registering station");

        let res = self
            .shared
            .http
            .post(self.shared.stations_url())
            .query(&appid(&self.shared.api_key))
            .json(params)
            .send()
            .await?;

        let body = ensure_status(res, StatusCode::CREATED, "station registration").await?;
        let registered: Registered = serde_json::from_str(&body)?;

        self.shared.bind_if_unset(&registered.id);
        Ok(registered.id)
    }

    /// Fetch the full record for the given station, or the bound one.
    pub async fn info(&self, station_id: Option<&str>) -> Result<StationInfo> {
        let id = self.shared.resolve_station_id(station_id)?;
        debug!(station_id = %id, "fetching station info");

        let res = self
            .shared
            .http
            .get(self.shared.station_url(&id))
            .query(&appid(&self.shared.api_key))
            .send()
            .await?;

        let body = ensure_status(res, StatusCode::OK, "station info").await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Partially update a station: the current record is fetched, the patch's
    /// set fields overlaid, and the merged record submitted as a full
    /// replacement.
    pub async fn update(&self, station_id: Option<&str>, patch: &StationPatch) -> Result<StationInfo> {
        let id = self.shared.resolve_station_id(station_id)?;
        let current = self.info(Some(&id)).await?;
        let merged = patch.merged_over(&current);
        debug!(station_id = %id, "updating station");

        let res = self
            .shared
            .http
            .put(self.shared.station_url(&id))
            .query(&appid(&self.shared.api_key))
            .json(&merged)
            .send()
            .await?;

        let body = ensure_status(res, StatusCode::OK, "station update").await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Delete the given station, or the bound one.
    pub async fn delete(&self, station_id: Option<&str>) -> Result<()> {
        let id = self.shared.resolve_station_id(station_id)?;
        debug!(station_id = %id, "deleting station");

        let res = self
            .shared
            .http
            .delete(self.shared.station_url(&id))
            .query(&appid(&self.shared.api_key))
            .send()
            .await?;

        ensure_status(res, StatusCode::NO_CONTENT, "station deletion").await?;
        Ok(())
    }

    /// List every station owned by the API key.
    pub async fn all_stations(&self) -> Result<Vec<StationInfo>> {
        let res = self
            .shared
            .http
            .get(self.shared.stations_url())
            .query(&appid(&self.shared.api_key))
            .send()
            .await?;

        let body = ensure_status(res, StatusCode::OK, "station listing").await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Rebind the station id for this manager and its measurement client.
    pub fn set_station_id(&self, station_id: impl Into<String>) {
        self.shared.set_station_id(station_id.into());
    }

    /// Currently bound station id, if any.
    pub fn station_id(&self) -> Option<String> {
        self.shared.station_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn station_id_is_shared_with_measurements() {
        let station = Station::new("KEY");
        let measurements = station.measurements();

        assert_eq!(station.station_id(), None);

        station.set_station_id("abc");
        assert_eq!(station.station_id().as_deref(), Some("abc"));
        assert_eq!(measurements.station_id().as_deref(), Some("abc"));

        // The other direction holds too.
        measurements.set_station_id("def");
        assert_eq!(station.station_id().as_deref(), Some("def"));
    }

    #[test]
    fn constructor_binds_initial_station_id() {
        let station = Station::with_station_id("KEY", "abc");

        assert_eq!(station.station_id().as_deref(), Some("abc"));
        assert_eq!(station.measurements().station_id().as_deref(), Some("abc"));
    }

    #[test]
    fn registration_response_accepts_both_id_spellings() {
        let lower: Registered = serde_json::from_str(r#"{"id": "x1"}"#).expect("deserializable");
        assert_eq!(lower.id, "x1");

        let upper: Registered = serde_json::from_str(r#"{"ID": "x2"}"#).expect("deserializable");
        assert_eq!(upper.id, "x2");
    }
}
