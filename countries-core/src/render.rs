//! Plain-text rendering of search results and the country detail view.

use crate::{
    model::{Country, CountryDetails, WeatherReport},
    search::result_message,
};

/// Flag URL, common name, then one `Key : value` line per summary field.
pub fn render_card(country: &Country) -> String {
    card_with_title(country, &country.name.common, None)
}

/// Result message followed by one card per country, separated by blank lines.
pub fn render_results(countries: &[Country]) -> String {
    let mut out = result_message(countries.len());
    for country in countries {
        out.push_str("\n\n");
        out.push_str(&render_card(country));
    }
    out
}

pub fn render_details(details: &CountryDetails) -> String {
    let country = &details.country;
    let image = details.image.as_ref().map(|i| i.webformat_url.as_str());

    let mut out = card_with_title(country, &country.name.official, image);

    if let Some(section) = alt_names_section(country) {
        out.push_str("\n\n");
        out.push_str(&section);
    }

    out.push_str("\n\n");
    out.push_str(&weather_section(country, details.weather.as_ref()));
    out
}

fn card_with_title(country: &Country, title: &str, image: Option<&str>) -> String {
    let mut lines = Vec::new();

    if !country.flags.png.is_empty() {
        lines.push(country.flags.png.clone());
    }
    if let Some(image) = image {
        lines.push(image.to_string());
    }

    let subregion = country.subregion.as_deref().unwrap_or_default();

    lines.push(title.to_string());
    lines.push(format!("Capital : {}", country.capital.join(",")));
    lines.push(format!("Subregion : {subregion}"));
    lines.push(format!("Population : {}", country.population));
    lines.join("\n")
}

/// Native official names under a demonym title, or `None` when English is a native language.
fn alt_names_section(country: &Country) -> Option<String> {
    let native = &country.name.native_name;
    if native.contains_key("eng") {
        return None;
    }

    let people = country
        .demonyms
        .eng
        .as_ref()
        .map(|d| d.f.as_str())
        .unwrap_or("locals");

    let mut lines = vec![format!("\"{}\" to the {people}", country.name.common)];
    for (code, name) in native {
        let language = country
            .languages
            .get(code)
            .map(String::as_str)
            .unwrap_or(code.as_str());
        lines.push(format!("{} ({language})", name.official));
    }
    Some(lines.join("\n"))
}

fn weather_section(country: &Country, weather: Option<&WeatherReport>) -> String {
    let mut out = format!(
        "Current Weather in {}, {}",
        country.capital.join(","),
        country.name.common
    );
    if let Some(report) = weather {
        out.push('\n');
        out.push_str(&weather_line(report));
    }
    out
}

/// e.g. `Light rain and 6.85°C!`
pub fn weather_line(report: &WeatherReport) -> String {
    let text = format!(
        "{} and {:.2}°C!",
        report.description,
        report.temperature_c()
    );
    capitalize_first(&text)
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
