use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::model::WeatherReport;

use super::{WeatherProvider, truncate_body};

pub const OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, OPENWEATHER_BASE_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url,
            http: Client::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    dt: Option<i64>,
    main: OwMain,
    weather: Vec<OwWeather>,
}

/// Temperatures stay in Kelvin: the request carries no `units` parameter.
fn parse_current(body: &str) -> Result<WeatherReport> {
    let parsed: OwCurrentResponse =
        serde_json::from_str(body).context("Failed to parse OpenWeather current JSON")?;

    let description = parsed
        .weather
        .first()
        .map(|w| w.description.clone())
        .unwrap_or_else(|| "unknown".to_string());

    let observed_at = parsed
        .dt
        .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0))
        .unwrap_or_else(Utc::now);

    Ok(WeatherReport {
        description,
        temperature_k: parsed.main.temp,
        observed_at,
    })
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn current_weather(&self, lat: f64, lng: f64) -> Result<WeatherReport> {
        debug!(lat, lng, "requesting current weather");

        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lng.to_string()),
                ("appid", self.api_key.clone()),
            ])
            .send()
            .await
            .context("Failed to send request to OpenWeather (current weather)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read OpenWeather current response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather current request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        parse_current(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_current_weather() {
        let body = r#"{
            "coord": {"lon": 18.07, "lat": 59.33},
            "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
            "main": {"temp": 280.32, "feels_like": 278.1, "humidity": 81},
            "dt": 1700000000,
            "name": "Stockholm"
        }"#;

        let report = parse_current(body).expect("valid weather json");

        assert_eq!(report.description, "clear sky");
        assert!((report.temperature_k - 280.32).abs() < 1e-9);
        assert_eq!(report.observed_at.timestamp(), 1_700_000_000);
    }

    #[test]
    fn missing_weather_entry_is_unknown() {
        let report = parse_current(r#"{"weather": [], "main": {"temp": 273.15}}"#).unwrap();

        assert_eq!(report.description, "unknown");
        assert!(report.temperature_c().abs() < 1e-9);
    }

    #[test]
    fn malformed_body_is_an_error() {
        let err = parse_current(r#"{"cod": 401}"#).unwrap_err();
        assert!(err.to_string().contains("Failed to parse OpenWeather"));
    }
}
