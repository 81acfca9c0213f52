use std::{future::Future, sync::Arc};

use anyhow::{Context, bail};
use chrono::Local;
use clap::{Parser, Subcommand};
use inquire::{CustomType, Text};
use skywatch_core::{
    Config, ForecastRequest, MetNoService, SourceId,
    source::{alert_source_from_config, metno_service_from_config},
};

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "skywatch",
    version,
    about = "MET Norway forecasts, sun times and WMO severe weather alerts"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the user agent, timeout and endpoints.
    Configure {
        /// Only configure one source: "metno", "nominatim" or "wmo".
        source: Option<SourceId>,
    },

    /// Show the forecast and today's sun times for a coordinate.
    Forecast {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        /// Metres above sea level.
        #[arg(long, allow_negative_numbers = true)]
        altitude: Option<i32>,

        /// Number of forecast steps to print.
        #[arg(long, default_value_t = 12)]
        steps: usize,

        /// Print the raw decoded documents as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Find places by name, or name the place at a coordinate.
    Locate {
        /// Place name, e.g. "Tromsø".
        #[arg(conflicts_with_all = ["lat", "lon"], required_unless_present = "lat")]
        query: Option<String>,

        #[arg(long, allow_negative_numbers = true, requires = "lon")]
        lat: Option<f64>,

        #[arg(long, allow_negative_numbers = true, requires = "lat")]
        lon: Option<f64>,

        /// Print the places as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List severe weather alerts for a region.
    Alerts {
        /// Region code, e.g. "europe". Defaults to the configured region.
        region: Option<String>,

        /// Print the alerts as JSON.
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { source } => {
                configure(source)?;
            }
            Command::Forecast {
                lat,
                lon,
                altitude,
                steps,
                json,
            } => {
                let config = Config::load()?;
                let service = Arc::new(metno_service_from_config(&config)?);

                let mut request = ForecastRequest::new(lat, lon);
                if let Some(altitude) = altitude {
                    request = request.with_altitude(altitude);
                }
                let now = Local::now();

                let Some(weather) = cancel_on_interrupt(
                    &service,
                    service.request_weather(&request, now.date_naive(), *now.offset()),
                )
                .await
                else {
                    return Ok(());
                };
                let weather = weather.context("Failed to fetch weather from MET Norway")?;

                if json {
                    println!("{}", serde_json::to_string_pretty(&weather)?);
                } else {
                    print!("{}", output::render_sun(&weather.sun));
                    print!("{}", output::render_forecast(&weather.forecast, steps));
                }
            }
            Command::Locate {
                query,
                lat,
                lon,
                json,
            } => {
                let config = Config::load()?;
                let service = Arc::new(metno_service_from_config(&config)?);

                let places = match (query, lat, lon) {
                    (Some(query), _, _) => {
                        let Some(places) =
                            cancel_on_interrupt(&service, service.search_locations(&query)).await
                        else {
                            return Ok(());
                        };
                        places.with_context(|| format!("Failed to search for '{query}'"))?
                    }
                    (None, Some(lat), Some(lon)) => {
                        let Some(place) =
                            cancel_on_interrupt(&service, service.locate(lat, lon)).await
                        else {
                            return Ok(());
                        };
                        place
                            .with_context(|| format!("Failed to look up {lat}, {lon}"))?
                            .into_iter()
                            .collect()
                    }
                    _ => bail!("Give a place name, or both --lat and --lon."),
                };

                if json {
                    println!("{}", serde_json::to_string_pretty(&places)?);
                } else {
                    print!("{}", output::render_locations(&places));
                }
            }
            Command::Alerts { region, json } => {
                let config = Config::load()?;
                let region = match region {
                    Some(region) => region,
                    None => config.default_region()?.to_string(),
                };
                let source = alert_source_from_config(&config)?;

                let Some(alerts) = until_interrupted(source.get_alerts_by_region(&region)).await
                else {
                    return Ok(());
                };
                let alerts = alerts
                    .with_context(|| format!("Failed to fetch alerts for region '{region}'"))?;

                if json {
                    println!("{}", serde_json::to_string_pretty(&alerts)?);
                } else {
                    print!("{}", output::render_alerts(&region, &alerts));
                }
            }
        }

        Ok(())
    }
}

/// Run `fut` unless Ctrl-C arrives first, in which case the request is
/// dropped and `None` is returned.
async fn until_interrupted<F: Future>(fut: F) -> Option<F::Output> {
    tokio::select! {
        out = fut => Some(out),
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("interrupted, request cancelled");
            None
        }
    }
}

/// Await a service request; Ctrl-C cancels everything the service has in
/// flight, which makes the request come back as `None`.
async fn cancel_on_interrupt<T>(
    service: &Arc<MetNoService>,
    request: impl Future<Output = Option<T>>,
) -> Option<T> {
    let watcher = {
        let service = Arc::clone(service);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("interrupted, cancelling requests");
                service.cancel();
            }
        })
    };

    let out = request.await;
    watcher.abort();
    out
}

fn configure(only: Option<SourceId>) -> anyhow::Result<()> {
    let mut config = Config::load()?;

    if only.is_none() {
        config.user_agent = Text::new("User agent (include contact details):")
            .with_default(&config.user_agent)
            .prompt()?;

        let timeout = CustomType::<u64>::new("Request timeout in seconds (0 for none):")
            .with_default(config.timeout_secs.unwrap_or(0))
            .prompt()?;
        config.timeout_secs = (timeout > 0).then_some(timeout);
    }

    let sources: &[SourceId] = match &only {
        Some(id) => std::slice::from_ref(id),
        None => SourceId::all(),
    };

    for &id in sources {
        let base_url = Text::new(&format!("Base URL for {id}:"))
            .with_default(config.base_url(id))
            .prompt()?;
        config.set_base_url(id, base_url);

        if id == SourceId::Nominatim {
            let current = config.nominatim.language.clone().unwrap_or_default();
            let language = Text::new("Place name language, e.g. nb or en (empty for server default):")
                .with_default(&current)
                .prompt()?;
            config.nominatim.language = Some(language).filter(|l| !l.trim().is_empty());
        }

        if id == SourceId::WmoSevereWeather {
            let current = config.wmo.default_region.clone().unwrap_or_default();
            let region = Text::new("Default alert region (empty for none):")
                .with_default(&current)
                .prompt()?;
            config.set_default_region(Some(region));
        }
    }

    // Fail early on a base URL the sources would reject.
    metno_service_from_config(&config)?;
    alert_source_from_config(&config)?;

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());

    Ok(())
}
