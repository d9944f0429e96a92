use crate::{
    Config,
    error::SearchError,
    model::{CapitalImage, Country, SearchRequest, WeatherReport},
    provider::{openweather::OpenWeatherClient, pixabay::PixabayClient},
};
use async_trait::async_trait;
use std::{convert::TryFrom, fmt::Debug};

pub mod openweather;
pub mod pixabay;
pub mod restcountries;

pub use restcountries::RestCountriesClient;

/// Services that need an API key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenWeather,
    Pixabay,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "openweather",
            ProviderId::Pixabay => "pixabay",
        }
    }

    /// Environment variable that overrides the stored key.
    pub fn env_var(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "OPENWEATHER_API_KEY",
            ProviderId::Pixabay => "PIXABAY_API_KEY",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::OpenWeather, ProviderId::Pixabay]
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "openweather" => Ok(ProviderId::OpenWeather),
            "pixabay" => Ok(ProviderId::Pixabay),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: openweather, pixabay."
            )),
        }
    }
}

/// Looks up countries by name or language.
#[async_trait]
pub trait CountryCatalog: Send + Sync + Debug {
    /// Matching countries, most populous first.
    async fn search(&self, request: &SearchRequest) -> Result<Vec<Country>, SearchError>;
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_weather(&self, lat: f64, lng: f64) -> anyhow::Result<WeatherReport>;
}

#[async_trait]
pub trait ImageProvider: Send + Sync + Debug {
    async fn find_image(&self, query: &str) -> anyhow::Result<Option<CapitalImage>>;
}

fn api_key(id: ProviderId, config: &Config) -> anyhow::Result<String> {
    config.provider_api_key(id).map(str::to_owned).ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured for provider '{id}'.\n\
                 Hint: run `countries configure {id}` and enter your API key."
        )
    })
}

pub fn catalog_from_config(config: &Config) -> RestCountriesClient {
    match &config.countries_base_url {
        Some(base) => RestCountriesClient::with_base_url(base.clone()),
        None => RestCountriesClient::new(),
    }
}

pub fn weather_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let key = api_key(ProviderId::OpenWeather, config)?;
    let client = match &config.weather_base_url {
        Some(base) => OpenWeatherClient::with_base_url(key, base.clone()),
        None => OpenWeatherClient::new(key),
    };
    Ok(Box::new(client))
}

pub fn images_from_config(config: &Config) -> anyhow::Result<Box<dyn ImageProvider>> {
    let key = api_key(ProviderId::Pixabay, config)?;
    let client = match &config.images_base_url {
        Some(base) => PixabayClient::with_base_url(key, base.clone()),
        None => PixabayClient::new(key),
    };
    Ok(Box::new(client))
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn provider_id_as_str_roundtrip() {
        for id in ProviderId::all() {
            let s = id.as_str();
            let parsed = ProviderId::try_from(s).expect("roundtrip should succeed");
            assert_eq!(*id, parsed);
        }
    }

    #[test]
    fn unknown_provider_error() {
        let err = ProviderId::try_from("flickr").unwrap_err();
        assert!(err.to_string().contains("Unknown provider"));
    }

    #[test]
    fn weather_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = weather_from_config(&cfg).unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("No API key configured for provider 'openweather'"));
        assert!(msg.contains("Hint: run `countries configure openweather`"));
    }

    #[test]
    fn images_from_config_works_when_configured() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::Pixabay, "KEY".to_string());

        assert!(images_from_config(&cfg).is_ok());
        assert!(weather_from_config(&cfg).is_err());
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let short = "é".repeat(10);
        assert_eq!(truncate_body(&short), short);

        let long = "é".repeat(250);
        let truncated = truncate_body(&long);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 203);
    }
}
