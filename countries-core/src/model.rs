use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, convert::TryFrom, fmt};

/// Which REST Countries endpoint a query goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    Name,
    Language,
}

impl SearchMode {
    /// Path segment used by the REST Countries API.
    pub fn endpoint(&self) -> &'static str {
        match self {
            SearchMode::Name => "name",
            SearchMode::Language => "lang",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SearchMode::Name => "Country name",
            SearchMode::Language => "Language",
        }
    }

    pub const fn all() -> &'static [SearchMode] {
        &[SearchMode::Name, SearchMode::Language]
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<&str> for SearchMode {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "name" | "country" => Ok(SearchMode::Name),
            "lang" | "language" => Ok(SearchMode::Language),
            _ => Err(anyhow::anyhow!(
                "Unknown search mode '{value}'. Supported modes: name, language."
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub mode: SearchMode,
    pub query: String,
}

impl SearchRequest {
    pub fn new(mode: SearchMode, query: impl Into<String>) -> Self {
        Self {
            mode,
            query: query.into(),
        }
    }
}

/// A country record as returned by `restcountries.com/v3.1` with the
/// field filter applied. Everything except the name may be missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    pub name: CountryName,
    #[serde(default)]
    pub capital: Vec<String>,
    #[serde(default)]
    pub languages: BTreeMap<String, String>,
    #[serde(default)]
    pub subregion: Option<String>,
    #[serde(default)]
    pub population: u64,
    #[serde(default)]
    pub flags: Flags,
    #[serde(default)]
    pub capital_info: CapitalInfo,
    #[serde(default)]
    pub demonyms: Demonyms,
}

impl Country {
    pub fn primary_capital(&self) -> Option<&str> {
        self.capital.first().map(String::as_str)
    }

    /// Capital coordinates as `(lat, lng)`.
    pub fn capital_coordinates(&self) -> Option<(f64, f64)> {
        match self.capital_info.latlng.as_slice() {
            [lat, lng, ..] => Some((*lat, *lng)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryName {
    pub common: String,
    pub official: String,
    #[serde(default)]
    pub native_name: BTreeMap<String, NativeName>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeName {
    pub official: String,
    pub common: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Flags {
    #[serde(default)]
    pub png: String,
    #[serde(default)]
    pub svg: String,
    #[serde(default)]
    pub alt: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CapitalInfo {
    #[serde(default)]
    pub latlng: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Demonyms {
    #[serde(default)]
    pub eng: Option<Demonym>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Demonym {
    pub f: String,
    pub m: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub description: String,
    pub temperature_k: f64,
    pub observed_at: DateTime<Utc>,
}

impl WeatherReport {
    pub fn temperature_c(&self) -> f64 {
        self.temperature_k - 273.15
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapitalImage {
    pub page_url: String,
    pub webformat_url: String,
}

/// A country enriched with the capital photo and current weather.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryDetails {
    pub country: Country,
    pub image: Option<CapitalImage>,
    pub weather: Option<WeatherReport>,
}
