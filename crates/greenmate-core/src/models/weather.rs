use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A single snapshot of current weather at a location.
///
/// Units are metric: temperature in °C, wind speed in m/s, precipitation in
/// millimetres over the last hour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WeatherObservation {
    pub temperature: f64,
    /// Relative humidity, 0 to 100.
    pub humidity: f64,
    /// Atmospheric pressure in hPa.
    #[serde(default)]
    pub pressure: f64,
    /// Free-text condition, e.g. "clear sky" or "light rain".
    pub description: String,
    #[serde(default)]
    pub wind_speed: f64,
    #[serde(default)]
    pub precipitation: f64,
}

/// Where to fetch weather for. Coordinates win over a city name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LocationQuery {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub city: Option<String>,
    pub country: Option<String>,
}

/// A location after it has been checked for usable fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ResolvedLocation {
    Coordinates {
        lat: f64,
        lon: f64,
    },
    City {
        city: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        country: Option<String>,
    },
}

impl std::fmt::Display for ResolvedLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolvedLocation::Coordinates { lat, lon } => write!(f, "{:.4},{:.4}", lat, lon),
            ResolvedLocation::City {
                city,
                country: Some(country),
            } => write!(f, "{},{}", city, country),
            ResolvedLocation::City { city, country: None } => write!(f, "{}", city),
        }
    }
}
