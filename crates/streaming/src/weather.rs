//! Historical cloud cover at the eclipse hour (Open-Meteo archive).

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use compute::analysis::statistics::Statistics;

use crate::error::FetchError;

/// Cloud cover below this percentage counts as a clear sky.
pub const CLEAR_SKY_THRESHOLD_PERCENT: f64 = 20.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalWeatherPoint {
    pub year: i32,
    pub date: NaiveDate,
    pub cloud_cover_percent: f64,
    pub precipitation_mm: f64,
    pub temperature_c: f64,
    pub is_clear: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherStats {
    pub average_cloud_cover_percent: u8,
    pub clear_sky_probability_percent: u8,
    pub years_analyzed: usize,
    /// Newest year first.
    pub history: Vec<HistoricalWeatherPoint>,
}

impl WeatherStats {
    pub fn is_empty(&self) -> bool {
        self.years_analyzed == 0
    }
}

#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    hourly: Option<HourlySeries>,
}

#[derive(Debug, Deserialize)]
struct HourlySeries {
    #[serde(default)]
    cloudcover: Vec<Option<f64>>,
    #[serde(default)]
    precipitation: Vec<Option<f64>>,
    #[serde(default)]
    temperature_2m: Vec<Option<f64>>,
}

/// The `count` full years before `reference_year`, oldest first.
pub fn years_to_analyse(reference_year: i32, count: u32) -> Vec<i32> {
    (1..=count as i32).rev().map(|back| reference_year - back).collect()
}

/// Same month and day as `target` in `year`. Feb 29 falls back to Feb 28.
pub fn same_day_in(target: NaiveDate, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, target.month(), target.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, target.month(), target.day().saturating_sub(1)))
}

/// Pick the reading at local `hour` out of a one-day archive response.
/// Missing readings count as zero.
pub fn parse_archive_day(body: &str, date: NaiveDate, hour: u8) -> Result<HistoricalWeatherPoint, FetchError> {
    let parsed: ArchiveResponse = serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))?;
    let hourly = parsed.hourly.ok_or(FetchError::NoData)?;
    let at = |series: &[Option<f64>]| series.get(hour as usize).copied().flatten().unwrap_or(0.0);

    let cloud = at(&hourly.cloudcover);
    Ok(HistoricalWeatherPoint {
        year: date.year(),
        date,
        cloud_cover_percent: cloud,
        precipitation_mm: at(&hourly.precipitation),
        temperature_c: at(&hourly.temperature_2m),
        is_clear: cloud < CLEAR_SKY_THRESHOLD_PERCENT,
    })
}

/// Aggregate per-year readings. No readings gives an empty summary, not an error.
pub fn summarize_weather(mut history: Vec<HistoricalWeatherPoint>) -> WeatherStats {
    let clouds: Vec<f64> = history.iter().map(|p| p.cloud_cover_percent).collect();
    let Some(average) = Statistics::mean(&clouds) else {
        return WeatherStats::default();
    };
    let clear = Statistics::fraction_where(&clouds, |c| c < CLEAR_SKY_THRESHOLD_PERCENT).unwrap_or(0.0);

    history.sort_by(|a, b| b.year.cmp(&a.year));
    WeatherStats {
        average_cloud_cover_percent: Statistics::to_percent(average),
        clear_sky_probability_percent: Statistics::to_percent(clear * 100.0),
        years_analyzed: history.len(),
        history,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn point(year: i32, cloud: f64) -> HistoricalWeatherPoint {
        HistoricalWeatherPoint {
            year,
            date: day(year, 8, 12),
            cloud_cover_percent: cloud,
            precipitation_mm: 0.0,
            temperature_c: 25.0,
            is_clear: cloud < CLEAR_SKY_THRESHOLD_PERCENT,
        }
    }

    #[test]
    fn analyses_previous_full_years() {
        assert_eq!(years_to_analyse(2026, 5), vec![2021, 2022, 2023, 2024, 2025]);
        assert!(years_to_analyse(2026, 0).is_empty());
    }

    #[test]
    fn leap_day_falls_back() {
        assert_eq!(same_day_in(day(2024, 2, 29), 2025), Some(day(2025, 2, 28)));
        assert_eq!(same_day_in(day(2026, 8, 12), 2021), Some(day(2021, 8, 12)));
    }

    #[test]
    fn picks_the_requested_hour() {
        let mut cloud = vec![Some(90.0); 24];
        cloud[20] = Some(12.0);
        let body = serde_json::json!({
            "hourly": {
                "time": [],
                "cloudcover": cloud,
                "precipitation": vec![Some(0.0); 24],
                "temperature_2m": vec![Some(24.5); 24],
            }
        })
        .to_string();
        let p = parse_archive_day(&body, day(2024, 8, 12), 20).unwrap();
        assert_eq!(p.cloud_cover_percent, 12.0);
        assert_eq!(p.temperature_c, 24.5);
        assert!(p.is_clear);
        assert_eq!(p.year, 2024);
    }

    #[test]
    fn missing_series_is_no_data() {
        assert_eq!(parse_archive_day("{}", day(2024, 8, 12), 20).unwrap_err(), FetchError::NoData);
        let short = r#"{"hourly":{"cloudcover":[null]}}"#;
        let p = parse_archive_day(short, day(2024, 8, 12), 20).unwrap();
        assert_eq!(p.cloud_cover_percent, 0.0);
    }

    #[test]
    fn summary_averages_and_sorts_newest_first() {
        let stats = summarize_weather(vec![point(2021, 10.0), point(2023, 60.0), point(2022, 15.0), point(2024, 35.0)]);
        assert_eq!(stats.years_analyzed, 4);
        assert_eq!(stats.average_cloud_cover_percent, 30);
        assert_eq!(stats.clear_sky_probability_percent, 50);
        let years: Vec<_> = stats.history.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![2024, 2023, 2022, 2021]);
    }

    #[test]
    fn empty_summary() {
        let stats = summarize_weather(Vec::new());
        assert!(stats.is_empty());
        assert_eq!(stats, WeatherStats::default());
    }
}
