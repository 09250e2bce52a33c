//! Plain-text rendering for the CLI.

use std::fmt::Write as _;

use catalog::{CityRecord, EclipseEvent, PointOfInterest, WeatherZone};
use compute::{AlignmentResult, EclipseCalculationResult, SunPosition};
use foundation::time::{NOT_APPLICABLE, format_duration_secs};
use foundation::GeoPoint;
use streaming::{MoonData, WeatherStats};

pub fn event_summary(event: &EclipseEvent) -> String {
    let info = &event.info;
    let mut out = String::new();
    let _ = writeln!(out, "{} [{}]", event.name, event.id);
    let _ = writeln!(out, "  date           {} ({} eclipse)", info.date, info.kind.label());
    let _ = writeln!(out, "  saros / gamma  {} / {}", info.saros, info.gamma);
    let _ = writeln!(
        out,
        "  max duration   {} at {}",
        format_duration_secs(info.max_duration as f64),
        info.max_duration_location
    );
    let _ = writeln!(out, "  max width      {} km", info.max_width_km);
    let _ = writeln!(out, "  region         {}", info.region);
    let _ = writeln!(out, "  enters         {} {} ({})", info.entry.time, info.timezone.label, info.entry.location);
    let _ = writeln!(out, "  leaves         {} {} ({})", info.exit.time, info.timezone.label, info.exit.location);
    let _ = writeln!(out, "  sun altitude   {}", info.sun_altitude_range);
    let _ = write!(
        out,
        "  cities         {} ({} in totality)",
        event.cities.len(),
        event.cities.iter().filter(|c| c.in_totality).count()
    );
    out
}

pub fn location_report(point: GeoPoint, r: &EclipseCalculationResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "location        {:.4}, {:.4}", point.lat, point.lng);
    let verdict = if r.is_in_totality { "TOTAL" } else { "partial" };
    let _ = writeln!(out, "eclipse         {verdict}");
    let _ = writeln!(out, "from centre     {} km", r.distance_from_center_km);
    let _ = writeln!(out, "duration        {}", r.estimated_duration);
    let _ = writeln!(out, "maximum         {}", r.max_time_label());
    let _ = writeln!(out, "magnitude       {:.3}", r.magnitude);
    let _ = writeln!(out, "coverage        {}%", r.coverage_percent);
    let _ = write!(out, "sun altitude    {}°", r.sun_altitude_deg);
    if let Some(city) = &r.nearest_city {
        let _ = write!(out, "\nnearest city    {city}");
    }
    out
}

pub fn city_line(city: &CityRecord, tz: &str) -> String {
    let duration = city
        .totality_duration
        .map(|s| format_duration_secs(s as f64))
        .unwrap_or_else(|| NOT_APPLICABLE.to_string());
    format!(
        "{:<24} {:>8.4} {:>8.4}  max {} {tz}  totality {:<7}  mag {:.3}  sun {}°",
        city.name, city.point.lat, city.point.lng, city.times.maximum, duration, city.magnitude, city.sun_altitude_deg
    )
}

pub fn poi_line(poi: &PointOfInterest) -> String {
    let mark = if poi.in_totality { "*" } else { " " };
    format!("{mark} {:<28} {:<10} {}", poi.name, poi.category.label(), poi.photo_tip)
}

pub fn zone_line(zone: &WeatherZone) -> String {
    let outlook = zone.outlook();
    format!("{:<36} {:>3}% cloud  {:<9} {}", zone.name, zone.cloud_probability, outlook.label(), zone.description)
}

pub fn sun_line(sun: &SunPosition) -> String {
    let horizon = if sun.is_above_horizon() { "" } else { " (below horizon)" };
    format!("azimuth {:.1}°  altitude {:.1}°{horizon}", sun.azimuth_deg, sun.altitude_deg)
}

pub fn alignment_report(r: &AlignmentResult) -> String {
    let mut out = format!(
        "at {}\nsun azimuth {:.1}°  altitude {:.1}°",
        r.instant.format("%Y-%m-%d %H:%M %:z"),
        r.sun_azimuth_deg,
        r.sun_altitude_deg
    );
    if let (Some(bearing), Some(diff)) = (r.bearing_a_to_b_deg, r.angular_difference_deg) {
        let verdict = if r.is_aligned() { "ALIGNED" } else { "not aligned" };
        let _ = write!(out, "\nbearing A→B {bearing:.1}°  difference {diff:.1}°  {verdict}");
    }
    out
}

pub fn moon_report(moon: Option<&MoonData>) -> String {
    let Some(m) = moon else {
        return "moon: no data available".to_string();
    };
    let illumination = m
        .illumination_percent()
        .map(|p| format!("{p:.0}%"))
        .unwrap_or_else(|| NOT_APPLICABLE.to_string());
    format!(
        "moon: {} {} illumination {illumination}, rise {} set {}",
        m.moon.emoji, m.moon.phase_name, m.moon.moonrise, m.moon.moonset
    )
}

pub fn weather_report(stats: Option<&WeatherStats>) -> String {
    let Some(s) = stats.filter(|s| !s.is_empty()) else {
        return "weather: no data available".to_string();
    };
    let mut out = format!(
        "weather: {}% average cloud, {}% clear-sky chance over {} years",
        s.average_cloud_cover_percent, s.clear_sky_probability_percent, s.years_analyzed
    );
    for p in &s.history {
        let sky = if p.is_clear { "clear" } else { "cloudy" };
        let _ = write!(
            out,
            "\n  {}  {:>3.0}% cloud  {:>4.1} mm  {:>4.1}°C  {sky}",
            p.year, p.cloud_cover_percent, p.precipitation_mm, p.temperature_c
        );
    }
    out
}
