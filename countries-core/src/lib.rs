//! Core library for the `countries` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Clients for the countries, weather and image APIs
//! - Search URL construction, result ordering and error classification
//! - Plain-text rendering of result cards and the detail view
//!
//! It is used by `countries-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod details;
pub mod error;
pub mod model;
pub mod provider;
pub mod render;
pub mod search;

pub use config::{Config, ProviderConfig};
pub use details::fetch_details;
pub use error::SearchError;
pub use model::{Country, CountryDetails, SearchMode, SearchRequest, WeatherReport};
pub use provider::{CountryCatalog, ImageProvider, ProviderId, RestCountriesClient, WeatherProvider};
