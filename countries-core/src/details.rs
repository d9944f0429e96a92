//! Enriches a single country with a photo of its capital and the current
//! weather there. Either lookup may be unavailable; the other still runs.

use tracing::warn;

use crate::{
    model::{CapitalImage, Country, CountryDetails, WeatherReport},
    provider::{ImageProvider, WeatherProvider},
};

pub async fn fetch_details(
    country: Country,
    weather: Option<&dyn WeatherProvider>,
    images: Option<&dyn ImageProvider>,
) -> CountryDetails {
    let (image, weather) = tokio::join!(
        capital_image(&country, images),
        capital_weather(&country, weather)
    );

    CountryDetails {
        country,
        image,
        weather,
    }
}

async fn capital_image(
    country: &Country,
    images: Option<&dyn ImageProvider>,
) -> Option<CapitalImage> {
    let images = images?;
    let capital = country.primary_capital()?;

    match images.find_image(capital).await {
        Ok(image) => image,
        Err(err) => {
            warn!(capital, error = %format!("{err:#}"), "capital image lookup failed");
            None
        }
    }
}

async fn capital_weather(
    country: &Country,
    weather: Option<&dyn WeatherProvider>,
) -> Option<WeatherReport> {
    let weather = weather?;
    let Some((lat, lng)) = country.capital_coordinates() else {
        warn!(country = %country.name.common, "no capital coordinates, skipping weather");
        return None;
    };

    match weather.current_weather(lat, lng).await {
        Ok(report) => Some(report),
        Err(err) => {
            warn!(lat, lng, error = %format!("{err:#}"), "weather lookup failed");
            None
        }
    }
}
