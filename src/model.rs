//! Domain types for the Stations API: station records, sensor readings and
//! the aggregated records the measurement endpoint returns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fields required to register a new station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationParams {
    pub external_id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

/// Partial station update. `None` fields keep their current value; the merged
/// record is submitted as a full replacement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StationPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
}

impl StationPatch {
    /// Overlay this patch on the current server record: specified fields win,
    /// unspecified fields are preserved from `current`.
    pub fn merged_over(&self, current: &StationInfo) -> StationPatch {
        StationPatch {
            external_id: self.external_id.clone().or_else(|| current.external_id.clone()),
            name: self.name.clone().or_else(|| current.name.clone()),
            latitude: self.latitude.or(current.latitude),
            longitude: self.longitude.or(current.longitude),
            altitude: self.altitude.or(current.altitude),
        }
    }
}

/// A station record as returned by the API. Everything is optional because
/// list and detail responses expose slightly different subsets, and the
/// registration response capitalizes the id field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StationInfo {
    #[serde(alias = "ID", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Aggregation window for measurement queries (`type` query parameter).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggregationPeriod {
    #[serde(rename = "m")]
    Minute,
    #[default]
    #[serde(rename = "h")]
    Hour,
    #[serde(rename = "d")]
    Day,
}

impl AggregationPeriod {
    pub fn as_str(self) -> &'static str {
        match self {
            AggregationPeriod::Minute => "m",
            AggregationPeriod::Hour => "h",
            AggregationPeriod::Day => "d",
        }
    }
}

impl std::fmt::Display for AggregationPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for AggregationPeriod {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "m" => Ok(AggregationPeriod::Minute),
            "h" => Ok(AggregationPeriod::Hour),
            "d" => Ok(AggregationPeriod::Day),
            _ => Err(format!("unknown aggregation period '{value}', expected m, h or d")),
        }
    }
}

/// Query for historical measurements. All fields are optional; the server
/// defaults (`type=h`, `limit=24`) are filled in when building the request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementQuery {
    /// Explicit station id; falls back to the bound one when `None`.
    pub station_id: Option<String>,
    pub period: Option<AggregationPeriod>,
    pub limit: Option<u32>,
    /// Start of the time range, Unix epoch seconds.
    pub from: Option<i64>,
    /// End of the time range, Unix epoch seconds.
    pub to: Option<i64>,
}

const DEFAULT_LIMIT: u32 = 24;

impl MeasurementQuery {
    /// Query-string pairs for the measurements endpoint, with defaults
    /// applied. `from`/`to` appear only when set.
    pub(crate) fn to_pairs(&self, station_id: &str) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("station_id", station_id.to_owned()),
            ("type", self.period.unwrap_or_default().as_str().to_owned()),
            ("limit", self.limit.unwrap_or(DEFAULT_LIMIT).to_string()),
        ];
        if let Some(from) = self.from {
            pairs.push(("from", from.to_string()));
        }
        if let Some(to) = self.to {
            pairs.push(("to", to.to_string()));
        }
        pairs
    }
}

/// A sparse sensor reading. Only `Some` fields go on the wire, so a reading of
/// zero is still transmitted; use `None` for "not measured".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_gust: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_deg: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pressure: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rain_1h: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rain_6h: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rain_24h: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snow_1h: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snow_6h: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snow_24h: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dew_point: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humidex: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heat_index: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility_distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clouds: Option<Vec<CloudReport>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather: Option<Vec<WeatherReport>>,
}

/// Cloud layer observation, e.g. `{"condition": "NSC"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudReport {
    pub condition: String,
}

/// Weather phenomenon observation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

/// An aggregated measurement record as returned by the retrieval endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StationMeasurement {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub period: Option<AggregationPeriod>,
    /// Timestamp of the aggregation window as formatted by the API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp: Option<AggregateStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humidity: Option<AggregateStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pressure: Option<AggregateStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind: Option<WindStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precipitation: Option<PrecipitationStats>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WindStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrecipitationStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rain: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snow: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn aggregation_period_as_str_roundtrip() {
        for period in [
            AggregationPeriod::Minute,
            AggregationPeriod::Hour,
            AggregationPeriod::Day,
        ] {
            let parsed =
                AggregationPeriod::try_from(period.as_str()).expect("roundtrip should succeed");
            assert_eq!(period, parsed);
        }
    }

    #[test]
    fn unknown_aggregation_period() {
        let err = AggregationPeriod::try_from("w").unwrap_err();
        assert!(err.contains("unknown aggregation period"));
    }

    #[test]
    fn default_query_uses_hourly_and_24_records() {
        let pairs = MeasurementQuery::default().to_pairs("station-1");

        assert_eq!(
            pairs,
            vec![
                ("station_id", "station-1".to_string()),
                ("type", "h".to_string()),
                ("limit", "24".to_string()),
            ]
        );
    }

    #[test]
    fn query_time_bounds_use_from_and_to() {
        let query = MeasurementQuery {
            period: Some(AggregationPeriod::Day),
            limit: Some(7),
            from: Some(1_600_000_000),
            to: Some(1_600_600_000),
            ..Default::default()
        };

        let pairs = query.to_pairs("station-1");

        assert_eq!(
            pairs,
            vec![
                ("station_id", "station-1".to_string()),
                ("type", "d".to_string()),
                ("limit", "7".to_string()),
                ("from", "1600000000".to_string()),
                ("to", "1600600000".to_string()),
            ]
        );
    }

    #[test]
    fn measurement_omits_unset_fields_but_keeps_zero() {
        let reading = Measurement {
            temperature: Some(0.0),
            wind_speed: Some(5.0),
            ..Default::default()
        };

        let value = serde_json::to_value(&reading).expect("serializable");
        assert_eq!(value, json!({"temperature": 0.0, "wind_speed": 5.0}));
    }

    #[test]
    fn empty_measurement_serializes_to_empty_object() {
        let value = serde_json::to_value(Measurement::default()).expect("serializable");
        assert_eq!(value, json!({}));
    }

    #[test]
    fn patch_merge_preserves_unspecified_fields() {
        let current = StationInfo {
            name: Some("A".to_string()),
            latitude: Some(1.0),
            ..Default::default()
        };
        let patch = StationPatch {
            name: Some("B".to_string()),
            ..Default::default()
        };

        let merged = patch.merged_over(&current);

        let value = serde_json::to_value(&merged).expect("serializable");
        assert_eq!(value, json!({"name": "B", "latitude": 1.0}));
    }

    #[test]
    fn patch_merge_overwrites_every_specified_field() {
        let current = StationInfo {
            external_id: Some("OLD".to_string()),
            name: Some("Old name".to_string()),
            latitude: Some(1.0),
            longitude: Some(2.0),
            altitude: Some(3.0),
            ..Default::default()
        };
        let patch = StationPatch {
            external_id: Some("NEW".to_string()),
            name: Some("New name".to_string()),
            latitude: Some(10.0),
            longitude: Some(20.0),
            altitude: Some(30.0),
        };

        let merged = patch.merged_over(&current);
        assert_eq!(merged, patch);
    }

    #[test]
    fn station_info_accepts_capitalized_id() {
        let info: StationInfo = serde_json::from_value(json!({
            "ID": "583436dd9643a9000196b8d6",
            "external_id": "SF_TEST001",
            "name": "San Francisco Test Station",
            "latitude": 37.76,
            "longitude": -122.43,
            "altitude": 150.0,
        }))
        .expect("deserializable");

        assert_eq!(info.id.as_deref(), Some("583436dd9643a9000196b8d6"));
        assert_eq!(info.latitude, Some(37.76));
    }

    #[test]
    fn station_measurement_parses_aggregates() {
        let record: StationMeasurement = serde_json::from_value(json!({
            "station_id": "583436dd9643a9000196b8d6",
            "date": "2017-08-23 18:00:00",
            "type": "h",
            "temp": {"max": 24.5, "min": 22.1, "average": 23.3, "weight": 1},
            "wind": {"deg": 162.0, "speed": 1.1},
            "precipitation": {"rain": 0.5},
        }))
        .expect("deserializable");

        assert_eq!(record.period, Some(AggregationPeriod::Hour));
        assert_eq!(record.temp.as_ref().and_then(|t| t.average), Some(23.3));
        assert_eq!(record.precipitation.as_ref().and_then(|p| p.rain), Some(0.5));
        assert_eq!(record.precipitation.as_ref().and_then(|p| p.snow), None);
        assert!(record.humidity.is_none());
    }
}
