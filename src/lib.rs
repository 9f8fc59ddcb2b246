//! Client for the OpenWeather Stations API (personal weather stations).
//!
//! This crate wraps the `data/3.0` `stations` and `measurements` collections:
//! - [`Station`]: register, inspect, update, delete and list stations
//! - [`Measurements`]: submit sensor readings and query aggregated history
//!
//! Both handles share the same API key and bound station id; registering a
//! station binds its server-assigned id for subsequent measurement calls.
//! Every method performs exactly one HTTP request and returns a typed
//! [`Result`]; there are no retries and no caching.
//!
//! ```no_run
//! use openweather_pws::{Measurement, Station, StationParams};
//!
//! #[tokio::main]
//! async fn main() -> openweather_pws::Result<()> {
//!     let station = Station::new("my-api-key");
//!
//!     let id = station
//!         .register(&StationParams {
//!             external_id: "SF_TEST001".to_string(),
//!             name: "San Francisco Test Station".to_string(),
//!             latitude: 37.76,
//!             longitude: -122.43,
//!             altitude: 150.0,
//!         })
//!         .await?;
//!     println!("registered station {id}");
//!
//!     let measurements = station.measurements();
//!     let reading = Measurement {
//!         temperature: Some(18.7),
//!         humidity: Some(87.0),
//!         ..Default::default()
//!     };
//!     measurements.set(None, None, &reading).await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod measurements;
pub mod model;
pub mod station;

mod client;

pub use error::{Error, Result};
pub use measurements::Measurements;
pub use model::{
    AggregateStats, AggregationPeriod, CloudReport, Measurement, MeasurementQuery,
    PrecipitationStats, StationInfo, StationMeasurement, StationParams, StationPatch,
    WeatherReport, WindStats,
};
pub use station::Station;
