//! Weather provider abstraction and the OpenWeatherMap client.

use std::time::Duration;

use async_trait::async_trait;
use greenmate_core::models::{ResolvedLocation, WeatherObservation};
use serde::Deserialize;

use crate::error::CareError;

/// Source of current weather for a resolved location.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current_weather(
        &self,
        location: &ResolvedLocation,
    ) -> Result<WeatherObservation, CareError>;

    /// Provider name, used in logs.
    fn provider_name(&self) -> &'static str;
}

// Current weather response (only the fields we read)
#[derive(Debug, Deserialize)]
struct CurrentWeatherResponse {
    main: MainBlock,
    #[serde(default)]
    weather: Vec<ConditionBlock>,
    #[serde(default)]
    wind: Option<WindBlock>,
    #[serde(default)]
    rain: Option<VolumeBlock>,
    #[serde(default)]
    snow: Option<VolumeBlock>,
}

#[derive(Debug, Deserialize)]
struct MainBlock {
    temp: f64,
    humidity: f64,
    #[serde(default)]
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct ConditionBlock {
    description: String,
}

#[derive(Debug, Deserialize)]
struct WindBlock {
    #[serde(default)]
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct VolumeBlock {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
}

impl From<CurrentWeatherResponse> for WeatherObservation {
    fn from(resp: CurrentWeatherResponse) -> Self {
        let precipitation = resp
            .rain
            .and_then(|r| r.one_hour)
            .or_else(|| resp.snow.and_then(|s| s.one_hour))
            .unwrap_or(0.0);

        WeatherObservation {
            temperature: resp.main.temp,
            humidity: resp.main.humidity,
            pressure: resp.main.pressure,
            description: resp
                .weather
                .into_iter()
                .next()
                .map(|c| c.description)
                .unwrap_or_default(),
            wind_speed: resp.wind.map(|w| w.speed).unwrap_or(0.0),
            precipitation,
        }
    }
}

/// Parse a current-weather JSON body into an observation.
pub fn parse_current_weather(body: &str) -> Result<WeatherObservation, CareError> {
    let parsed: CurrentWeatherResponse = serde_json::from_str(body).map_err(|e| {
        CareError::WeatherFetchFailed(format!("Invalid weather response: {}", e))
    })?;
    Ok(parsed.into())
}

#[derive(Clone)]
pub struct OpenWeatherMapClient {
    api_key: Option<String>,
    base_url: String,
    client: reqwest::Client,
}

impl OpenWeatherMapClient {
    pub fn new(
        api_key: Option<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn weather_url(&self) -> String {
        format!("{}/weather", self.base_url)
    }

    fn query_params(location: &ResolvedLocation, api_key: &str) -> Vec<(&'static str, String)> {
        let mut params = match location {
            ResolvedLocation::Coordinates { lat, lon } => {
                vec![("lat", lat.to_string()), ("lon", lon.to_string())]
            }
            ResolvedLocation::City { .. } => vec![("q", location.to_string())],
        };
        params.push(("appid", api_key.to_string()));
        params.push(("units", "metric".to_string()));
        params
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherMapClient {
    async fn current_weather(
        &self,
        location: &ResolvedLocation,
    ) -> Result<WeatherObservation, CareError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            CareError::WeatherFetchFailed("Weather API key is not configured".to_string())
        })?;

        let start = std::time::Instant::now();
        let response = self
            .client
            .get(self.weather_url())
            .query(&Self::query_params(location, api_key))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::warn!(
                status = %status,
                location = %location,
                "Weather provider returned an error"
            );
            return Err(CareError::WeatherFetchFailed(format!(
                "Weather API failed with status {}: {}",
                status, error_text
            )));
        }

        let body = response.text().await?;
        let observation = parse_current_weather(&body)?;

        tracing::debug!(
            location = %location,
            temperature = observation.temperature,
            humidity = observation.humidity,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Fetched current weather"
        );

        Ok(observation)
    }

    fn provider_name(&self) -> &'static str {
        "openweathermap"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "coord": {"lon": -0.13, "lat": 51.51},
        "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}],
        "main": {"temp": 14.2, "feels_like": 13.8, "pressure": 1009, "humidity": 82},
        "wind": {"speed": 4.6, "deg": 230},
        "rain": {"1h": 0.8},
        "name": "London"
    }"#;

    #[test]
    fn test_parse_full_response() {
        let obs = parse_current_weather(SAMPLE).unwrap();
        assert_eq!(obs.temperature, 14.2);
        assert_eq!(obs.humidity, 82.0);
        assert_eq!(obs.pressure, 1009.0);
        assert_eq!(obs.description, "light rain");
        assert_eq!(obs.wind_speed, 4.6);
        assert_eq!(obs.precipitation, 0.8);
    }

    #[test]
    fn test_precipitation_falls_back_to_snow_then_zero() {
        let snow = r#"{"main": {"temp": -2, "humidity": 90}, "snow": {"1h": 1.5}}"#;
        assert_eq!(parse_current_weather(snow).unwrap().precipitation, 1.5);

        let rain_without_hour = r#"{"main": {"temp": 5, "humidity": 90}, "rain": {"3h": 4.0}, "snow": {"1h": 0.3}}"#;
        assert_eq!(
            parse_current_weather(rain_without_hour).unwrap().precipitation,
            0.3
        );

        let dry = r#"{"main": {"temp": 20, "humidity": 40}, "weather": []}"#;
        let obs = parse_current_weather(dry).unwrap();
        assert_eq!(obs.precipitation, 0.0);
        assert_eq!(obs.wind_speed, 0.0);
        assert_eq!(obs.description, "");
    }

    #[test]
    fn test_parse_rejects_missing_main() {
        let err = parse_current_weather(r#"{"cod": 401, "message": "Invalid API key"}"#)
            .unwrap_err();
        assert!(matches!(err, CareError::WeatherFetchFailed(_)));
    }

    #[test]
    fn test_query_params() {
        let coords = ResolvedLocation::Coordinates { lat: 48.85, lon: 2.35 };
        let params = OpenWeatherMapClient::query_params(&coords, "k");
        assert_eq!(
            params,
            vec![
                ("lat", "48.85".to_string()),
                ("lon", "2.35".to_string()),
                ("appid", "k".to_string()),
                ("units", "metric".to_string()),
            ]
        );

        let city = ResolvedLocation::City {
            city: "Paris".to_string(),
            country: Some("FR".to_string()),
        };
        let params = OpenWeatherMapClient::query_params(&city, "k");
        assert_eq!(params[0], ("q", "Paris,FR".to_string()));
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_without_network() {
        let client = OpenWeatherMapClient::new(
            None,
            "http://127.0.0.1:9",
            Duration::from_secs(1),
        )
        .unwrap();
        let err = client
            .current_weather(&ResolvedLocation::Coordinates { lat: 0.0, lon: 0.0 })
            .await
            .unwrap_err();
        assert!(matches!(err, CareError::WeatherFetchFailed(_)));
    }

    #[tokio::test]
    async fn test_transport_error_does_not_leak_api_key() {
        let client = OpenWeatherMapClient::new(
            Some("SECRETKEY123".to_string()),
            "http://127.0.0.1:9",
            Duration::from_secs(2),
        )
        .unwrap();
        let err = client
            .current_weather(&ResolvedLocation::Coordinates { lat: 1.0, lon: 2.0 })
            .await
            .unwrap_err();
        assert!(matches!(err, CareError::WeatherFetchFailed(_)));
        assert!(!err.to_string().contains("SECRETKEY123"));
        assert!(!format!("{:?}", err).contains("appid"));
    }
}
