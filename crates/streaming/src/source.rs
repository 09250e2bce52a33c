//! Auxiliary data providers.
//!
//! Moon and weather lookups sit behind small object-safe traits so the
//! dispatcher can run against real HTTP endpoints or canned data in tests.

use std::future::Future;
use std::pin::Pin;

use futures_util::future::join_all;
use tracing::{debug, warn};

use crate::config::FetchConfig;
use crate::error::FetchError;
use crate::moon::{MoonData, parse_moon_response};
use crate::protocol::AuxQuery;
use crate::weather::{WeatherStats, parse_archive_day, same_day_in, summarize_weather, years_to_analyse};

/// Type alias for a boxed future that can be sent between threads.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait MoonSource: Send + Sync {
    fn moon_data(&self, query: AuxQuery) -> BoxFuture<'_, Result<MoonData, FetchError>>;
}

pub trait WeatherSource: Send + Sync {
    /// Summary over past years for the query's day and hour.
    ///
    /// `reference_year` bounds the analysed years (exclusive).
    fn weather_stats(&self, query: AuxQuery, reference_year: i32) -> BoxFuture<'_, Result<WeatherStats, FetchError>>;
}

fn build_client(config: &FetchConfig) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(config.timeout())
        .build()
        .unwrap_or_else(|err| {
            warn!("falling back to default HTTP client: {err}");
            reqwest::Client::new()
        })
}

/// RapidAPI moon-phase client.
pub struct HttpMoonSource {
    client: reqwest::Client,
    base_url: String,
    host: String,
    api_key: Option<String>,
}

impl HttpMoonSource {
    pub fn new(config: &FetchConfig) -> Self {
        Self {
            client: build_client(config),
            base_url: config.moon_api_url.clone(),
            host: config.moon_api_host.clone(),
            api_key: config.rapidapi_key.clone().filter(|k| !k.trim().is_empty()),
        }
    }

    fn request(&self, query: &AuxQuery) -> reqwest::RequestBuilder {
        self.client.get(&self.base_url).query(&[
            ("lat", query.point.lat.to_string()),
            ("lon", query.point.lng.to_string()),
            ("date", query.date.to_string()),
        ])
    }
}

impl MoonSource for HttpMoonSource {
    fn moon_data(&self, query: AuxQuery) -> BoxFuture<'_, Result<MoonData, FetchError>> {
        Box::pin(async move {
            let key = self.api_key.as_deref().ok_or(FetchError::MissingApiKey)?;
            debug!(lat = query.point.lat, lng = query.point.lng, date = %query.date, "moon lookup");

            let resp = self
                .request(&query)
                .header("x-rapidapi-key", key)
                .header("x-rapidapi-host", &self.host)
                .send()
                .await?;
            if !resp.status().is_success() {
                return Err(FetchError::Status(resp.status().as_u16()));
            }
            let body = resp.text().await?;
            parse_moon_response(&body)
        })
    }
}

/// Open-Meteo historical archive client. One request per analysed year.
pub struct OpenMeteoArchive {
    client: reqwest::Client,
    base_url: String,
    years: u32,
}

impl OpenMeteoArchive {
    pub fn new(config: &FetchConfig) -> Self {
        Self {
            client: build_client(config),
            base_url: config.weather_archive_url.clone(),
            years: config.weather_years,
        }
    }

    fn request(&self, query: &AuxQuery, date: chrono::NaiveDate) -> reqwest::RequestBuilder {
        let date = date.to_string();
        self.client.get(&self.base_url).query(&[
            ("latitude", query.point.lat.to_string()),
            ("longitude", query.point.lng.to_string()),
            ("start_date", date.clone()),
            ("end_date", date),
            ("hourly", "temperature_2m,cloudcover,precipitation".to_string()),
            ("timezone", "auto".to_string()),
        ])
    }

    async fn fetch_day(&self, query: AuxQuery, date: chrono::NaiveDate) -> Result<crate::weather::HistoricalWeatherPoint, FetchError> {
        let resp = self.request(&query, date).send().await?;
        if !resp.status().is_success() {
            return Err(FetchError::Status(resp.status().as_u16()));
        }
        let body = resp.text().await?;
        parse_archive_day(&body, date, query.hour)
    }
}

impl WeatherSource for OpenMeteoArchive {
    fn weather_stats(&self, query: AuxQuery, reference_year: i32) -> BoxFuture<'_, Result<WeatherStats, FetchError>> {
        Box::pin(async move {
            let dates: Vec<_> = years_to_analyse(reference_year, self.years)
                .into_iter()
                .filter_map(|year| same_day_in(query.date, year))
                .collect();

            let results = join_all(dates.iter().map(|&date| self.fetch_day(query, date))).await;
            let mut history = Vec::with_capacity(results.len());
            for (date, result) in dates.iter().zip(results) {
                match result {
                    Ok(point) => history.push(point),
                    Err(err) => warn!(%date, "weather archive lookup failed: {err}"),
                }
            }
            // Years that failed are skipped; the summary covers whatever came back.
            Ok(summarize_weather(history))
        })
    }
}
