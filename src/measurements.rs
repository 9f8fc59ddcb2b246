//! Measurement client: submitting sensor readings and querying aggregated
//! history for a station.

use std::sync::Arc;

use chrono::Utc;
use reqwest::StatusCode;
use serde::Serialize;
use tracing::{debug, warn};

use crate::client::{Shared, appid, ensure_status, truncate_body};
use crate::error::{Error, Result};
use crate::model::{Measurement, MeasurementQuery, StationMeasurement};

/// Client for the `measurements` collection.
///
/// Obtained from [`crate::Station::measurements`]; shares the bound station id
/// with its station manager.
#[derive(Debug, Clone)]
pub struct Measurements {
    shared: Arc<Shared>,
}

/// Wire shape of a submitted reading: `station_id` and `dt` are always
/// present, the sensor fields only when set.
#[derive(Debug, Serialize)]
struct OutgoingRecord<'a> {
    station_id: &'a str,
    dt: i64,
    #[serde(flatten)]
    values: &'a Measurement,
}

impl Measurements {
    pub(crate) fn from_shared(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    /// Query aggregated historical measurements. Server defaults apply when
    /// the query leaves period (`h`) or limit (`24`) unset.
    pub async fn get(&self, query: &MeasurementQuery) -> Result<Vec<StationMeasurement>> {
        let station_id = self.shared.resolve_station_id(query.station_id.as_deref())?;
        debug!(station_id = %station_id, "fetching measurements");

        let res = self
            .shared
            .http
            .get(self.shared.measurements_url())
            .query(&query.to_pairs(&station_id))
            .query(&appid(&self.shared.api_key))
            .send()
            .await?;

        let body = ensure_status(res, StatusCode::OK, "measurement query").await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Fetch exactly one record (the query's limit is overridden with 1).
    /// An empty result is [`Error::NoMeasurements`].
    pub async fn get_one(&self, query: &MeasurementQuery) -> Result<StationMeasurement> {
        let query = MeasurementQuery {
            limit: Some(1),
            ..query.clone()
        };
        first_record(self.get(&query).await?)
    }

    /// Submit a single reading. `dt` defaults to the current Unix time and
    /// `station_id` to the bound one. Returns the raw acknowledgement body.
    pub async fn set(
        &self,
        dt: Option<i64>,
        station_id: Option<&str>,
        values: &Measurement,
    ) -> Result<Vec<u8>> {
        let station_id = self.shared.resolve_station_id(station_id)?;
        let record = OutgoingRecord {
            station_id: &station_id,
            dt: dt.unwrap_or_else(|| Utc::now().timestamp()),
            values,
        };
        debug!(station_id = %station_id, dt = record.dt, "submitting measurement");

        // The endpoint only accepts arrays, even for a single record.
        self.post_records(&[record]).await
    }

    /// Submit a caller-assembled batch of records as-is, without validation.
    /// Returns the raw acknowledgement body.
    pub async fn set_bulk<T>(&self, payload: &T) -> Result<Vec<u8>>
    where
        T: Serialize + ?Sized,
    {
        self.post_records(payload).await
    }

    /// Rebind the station id shared with the station manager.
    pub fn set_station_id(&self, station_id: impl Into<String>) {
        self.shared.set_station_id(station_id.into());
    }

    /// Currently bound station id, if any.
    pub fn station_id(&self) -> Option<String> {
        self.shared.station_id()
    }

    async fn post_records<T>(&self, payload: &T) -> Result<Vec<u8>>
    where
        T: Serialize + ?Sized,
    {
        let res = self
            .shared
            .http
            .post(self.shared.measurements_url())
            .query(&appid(&self.shared.api_key))
            .json(payload)
            .send()
            .await?;

        let status = res.status();
        let body = res.bytes().await?;

        if !status.is_success() {
            let text = String::from_utf8_lossy(&body);
            warn!(%status, "OpenWeather request failed");
            return Err(Error::Api {
                what: "measurement submission",
                status,
                body: truncate_body(&text),
            });
        }

        Ok(body.to_vec())
    }
}

fn first_record(records: Vec<StationMeasurement>) -> Result<StationMeasurement> {
    records.into_iter().next().ok_or(Error::NoMeasurements)
}
