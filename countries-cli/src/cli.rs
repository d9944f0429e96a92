use std::{io::IsTerminal, process::ExitCode};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use countries_core::{
    Config, Country, CountryCatalog, ImageProvider, ProviderId, SearchError, SearchMode,
    SearchRequest, WeatherProvider, fetch_details,
    provider::{catalog_from_config, images_from_config, weather_from_config},
    render::{render_details, render_results},
};
use inquire::{InquireError, Password, PasswordDisplayMode, Select, Text};
use tracing::{debug, warn};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "countries", version, about = "Search countries by name or language")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key for a provider.
    Configure {
        /// Provider short name: "openweather" or "pixabay".
        provider: String,
    },

    /// List countries matching a name or language, most populous first.
    Search {
        /// Country name or language; prompted for when absent.
        query: Option<String>,

        /// Search mode: "name" or "language"; prompted for when absent.
        #[arg(long, value_parser = parse_mode)]
        by: Option<SearchMode>,

        /// Print the results as JSON.
        #[arg(long)]
        json: bool,

        /// Pick countries from the results to show their details.
        #[arg(short, long, conflicts_with = "json")]
        interactive: bool,
    },

    /// Show capital photo, native names and current weather for a country.
    Show {
        /// Country name; the most populous match is shown.
        name: String,

        /// Print the details as JSON.
        #[arg(long)]
        json: bool,
    },
}

fn parse_mode(value: &str) -> Result<SearchMode, String> {
    SearchMode::try_from(value).map_err(|err| err.to_string())
}

impl Cli {
    pub async fn run(self) -> Result<ExitCode> {
        match self.command {
            Command::Configure { provider } => configure(&provider).map(|()| ExitCode::SUCCESS),
            Command::Search {
                query,
                by,
                json,
                interactive,
            } => {
                let config = load_config()?;
                let request = search_request(query, by)?;

                let countries = match search(&config, &request).await {
                    Ok(countries) => countries,
                    Err(failure) => return Ok(failure.exit_code()),
                };

                if json {
                    println!("{}", serde_json::to_string_pretty(&countries)?);
                    return Ok(ExitCode::SUCCESS);
                }

                println!("{}", render_results(&countries));

                if interactive {
                    pick_details(&config, &countries).await?;
                }
                Ok(ExitCode::SUCCESS)
            }
            Command::Show { name, json } => {
                let config = load_config()?;
                let request = SearchRequest::new(SearchMode::Name, name);

                let countries = match search(&config, &request).await {
                    Ok(countries) => countries,
                    Err(failure) => return Ok(failure.exit_code()),
                };
                let Some(country) = countries.into_iter().next() else {
                    println!("{}", countries_core::error::NO_RESULTS_MESSAGE);
                    return Ok(ExitCode::SUCCESS);
                };

                let (weather, images) = enrichment_providers(&config)?;
                let details = fetch_details(country, weather.as_deref(), images.as_deref()).await;

                if json {
                    println!("{}", serde_json::to_string_pretty(&details)?);
                } else {
                    println!("{}", render_details(&details));
                }
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

fn load_config() -> Result<Config> {
    let mut config = Config::load()?;
    config.apply_env_overrides();
    Ok(config)
}

fn configure(provider: &str) -> Result<()> {
    let id = ProviderId::try_from(provider)?;
    let mut config = Config::load()?;

    let api_key = Password::new(&format!("API key for {id}:"))
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let api_key = api_key.trim().to_string();
    anyhow::ensure!(!api_key.is_empty(), "API key must not be empty");

    config.upsert_provider_api_key(id, api_key);
    config.save()?;

    println!(
        "Saved {id} API key to {}",
        Config::config_file_path()?.display()
    );
    Ok(())
}

fn search_label(mode: SearchMode) -> String {
    format!("Search by {} :", mode.label())
}

/// Fills in mode and query from prompts when they were not given on the command line.
fn search_request(query: Option<String>, by: Option<SearchMode>) -> Result<SearchRequest> {
    let interactive = std::io::stdin().is_terminal();

    let mode = match by {
        Some(mode) => mode,
        None if interactive => {
            let mode = Select::new("Search by", SearchMode::all().to_vec())
                .prompt()
                .context("Failed to read search mode")?;
            if query.is_some() {
                println!("{}", search_label(mode));
            }
            mode
        }
        None => SearchMode::Name,
    };

    let query = match query {
        Some(query) => query,
        None if interactive => Text::new(&search_label(mode))
            .prompt()
            .context("Failed to read search query")?,
        None => anyhow::bail!("A search query is required when stdin is not a terminal"),
    };

    anyhow::ensure!(!query.trim().is_empty(), "Search query must not be empty");
    Ok(SearchRequest::new(mode, query))
}

/// A search that produced no cards: the line shown to the user and the exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SearchFailure {
    message: &'static str,
    failed: bool,
}

impl SearchFailure {
    fn from_error(err: &SearchError) -> Self {
        Self {
            message: err.user_message(),
            failed: !err.is_no_results(),
        }
    }

    fn report(&self) {
        if self.failed {
            eprintln!("{}", self.message);
        } else {
            println!("{}", self.message);
        }
    }

    fn exit_code(&self) -> ExitCode {
        if self.failed {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    }
}

/// Runs the search, printing the user message when nothing can be shown.
async fn search(config: &Config, request: &SearchRequest) -> Result<Vec<Country>, SearchFailure> {
    let catalog = catalog_from_config(config);

    catalog.search(request).await.map_err(|err| {
        debug!(error = ?err, "country search failed");
        let failure = SearchFailure::from_error(&err);
        failure.report();
        failure
    })
}

type EnrichmentProviders = (Option<Box<dyn WeatherProvider>>, Option<Box<dyn ImageProvider>>);

/// Providers for the detail view; unconfigured ones are skipped with a warning.
fn enrichment_providers(config: &Config) -> Result<EnrichmentProviders> {
    let weather = if config.is_provider_configured(ProviderId::OpenWeather) {
        Some(weather_from_config(config)?)
    } else {
        warn!("weather disabled: run `countries configure openweather` to enable it");
        None
    };

    let images = if config.is_provider_configured(ProviderId::Pixabay) {
        Some(images_from_config(config)?)
    } else {
        warn!("capital images disabled: run `countries configure pixabay` to enable them");
        None
    };

    Ok((weather, images))
}

const CLOSE: &str = "Close";

/// Detail picker over the results; Esc or `Close` ends it.
async fn pick_details(config: &Config, countries: &[Country]) -> Result<()> {
    if countries.is_empty() || !std::io::stdin().is_terminal() {
        return Ok(());
    }

    let (weather, images) = enrichment_providers(config)?;

    let mut options: Vec<&str> = countries.iter().map(|c| c.name.common.as_str()).collect();
    options.push(CLOSE);

    loop {
        let choice = match Select::new("Show details for", options.clone()).prompt() {
            Ok(choice) => choice,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Failed to read selection"),
        };

        if choice == CLOSE {
            break;
        }

        let Some(country) = countries.iter().find(|c| c.name.common == choice) else {
            continue;
        };

        let details = fetch_details(country.clone(), weather.as_deref(), images.as_deref()).await;
        println!("\n{}\n", render_details(&details));
    }

    Ok(())
}
