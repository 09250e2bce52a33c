use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use foundation::time::{duration_string, optional_clock, optional_duration_string};
use foundation::{ClockTime, GeoBounds, GeoPoint, Polyline};

use crate::poi::{PoiCategory, PointOfInterest};
use crate::weather::WeatherZone;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EclipseKind {
    Total,
    Annular,
    Hybrid,
}

impl EclipseKind {
    pub fn label(self) -> &'static str {
        match self {
            EclipseKind::Total => "Total",
            EclipseKind::Annular => "Annular",
            EclipseKind::Hybrid => "Hybrid",
        }
    }
}

/// Where and when the path enters or leaves the covered region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crossing {
    pub time: ClockTime,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeZoneInfo {
    pub label: String,
    pub utc_offset_minutes: i32,
}

impl TimeZoneInfo {
    pub fn offset(&self) -> Option<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_minutes * 60)
    }
}

/// Descriptive metadata shown alongside the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EclipseInfo {
    pub date: NaiveDate,
    pub kind: EclipseKind,
    pub saros: u32,
    pub gamma: f64,
    /// Greatest duration anywhere on the track, in seconds.
    #[serde(with = "duration_string")]
    pub max_duration: u32,
    pub max_duration_location: String,
    pub max_width_km: f64,
    pub region: String,
    pub entry: Crossing,
    pub exit: Crossing,
    pub sun_altitude_range: String,
    pub timezone: TimeZoneInfo,
    /// Approximate local maximum used as the alignment tool's zero offset.
    pub alignment_reference: DateTime<FixedOffset>,
    #[serde(default)]
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_in_region: Option<NaiveDate>,
}

/// How a point is classified as inside the band of totality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BandPolicy {
    /// Inside when closer than a fixed distance to the central line.
    Radius { max_distance_km: f64 },
    /// Inside a lat/lng box and closer than a half-width that shrinks eastward:
    /// `max(base - (lng - reference_lng) * narrowing, min)`.
    NarrowingBox {
        bounds: GeoBounds,
        base_half_width_km: f64,
        reference_lng: f64,
        narrowing_km_per_deg: f64,
        min_half_width_km: f64,
    },
}

impl BandPolicy {
    /// Allowed distance from the central line at `point`, or `None` when the
    /// policy excludes the point outright.
    pub fn half_width_km(&self, point: GeoPoint) -> Option<f64> {
        match self {
            BandPolicy::Radius { max_distance_km } => Some(*max_distance_km),
            BandPolicy::NarrowingBox {
                bounds,
                base_half_width_km,
                reference_lng,
                narrowing_km_per_deg,
                min_half_width_km,
            } => {
                if !bounds.contains(point) {
                    return None;
                }
                let narrowed = base_half_width_km - (point.lng - reference_lng) * narrowing_km_per_deg;
                Some(narrowed.max(*min_half_width_km))
            }
        }
    }

    /// Strictly closer than the half-width. An infinite distance is never inside.
    pub fn contains(&self, point: GeoPoint, distance_km: f64) -> bool {
        self.half_width_km(point).is_some_and(|hw| distance_km < hw)
    }
}

fn default_duration_band_width_km() -> f64 {
    150.0
}

fn default_partial_magnitude_floor() -> f64 {
    0.5
}

fn default_partial_decay_per_km() -> f64 {
    0.001
}

/// Parameters of the distance-driven timing model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandModel {
    pub policy: BandPolicy,
    /// Distance at which the duration falloff reaches zero.
    #[serde(default = "default_duration_band_width_km")]
    pub duration_band_width_km: f64,
    #[serde(default = "default_partial_magnitude_floor")]
    pub partial_magnitude_floor: f64,
    #[serde(default = "default_partial_decay_per_km")]
    pub partial_decay_per_km: f64,
    /// Central line is resampled to this vertex spacing before proximity queries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resample_step_km: Option<f64>,
    /// Duration ceiling used when the nearest city records no totality.
    #[serde(with = "duration_string")]
    pub central_duration: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalEventTimes {
    pub start: ClockTime,
    #[serde(with = "optional_clock")]
    pub totality_start: Option<ClockTime>,
    pub maximum: ClockTime,
    #[serde(with = "optional_clock")]
    pub totality_end: Option<ClockTime>,
    pub end: ClockTime,
}

/// Published local circumstances for a named place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityRecord {
    pub name: String,
    #[serde(flatten)]
    pub point: GeoPoint,
    pub times: LocalEventTimes,
    #[serde(with = "optional_duration_string")]
    pub totality_duration: Option<u32>,
    pub magnitude: f64,
    pub sun_altitude_deg: f64,
    pub in_totality: bool,
}

/// One eclipse and everything drawn or computed for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EclipseEvent {
    pub id: String,
    pub name: String,
    pub info: EclipseInfo,
    pub band: BandModel,
    pub central_line: Polyline,
    pub north_limit: Polyline,
    pub south_limit: Polyline,
    pub cities: Vec<CityRecord>,
    #[serde(default)]
    pub points_of_interest: Vec<PointOfInterest>,
    #[serde(default)]
    pub weather_zones: Vec<WeatherZone>,
    #[serde(skip)]
    sampled_central_line: Polyline,
}

impl EclipseEvent {
    /// Rebuild derived geometry after the central line or band model changed.
    pub fn prepare(&mut self) {
        self.sampled_central_line = match self.band.resample_step_km {
            Some(step) => self.central_line.resample(step),
            None => self.central_line.clone(),
        };
    }

    /// Central line as used for proximity queries (resampled when configured).
    pub fn proximity_line(&self) -> &Polyline {
        if self.sampled_central_line.is_empty() {
            &self.central_line
        } else {
            &self.sampled_central_line
        }
    }

    pub fn city(&self, name: &str) -> Option<&CityRecord> {
        self.cities.iter().find(|c| c.name == name)
    }

    /// Cities whose name contains `query`, ignoring case. Blank queries match everything.
    pub fn search_cities(&self, query: &str) -> Vec<&CityRecord> {
        let needle = query.trim().to_lowercase();
        self.cities
            .iter()
            .filter(|c| needle.is_empty() || c.name.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn point_of_interest(&self, id: &str) -> Option<&PointOfInterest> {
        self.points_of_interest.iter().find(|p| p.id == id)
    }

    /// Points of interest whose category passes `keep`, in catalog order.
    pub fn points_of_interest_matching<'a, F>(&'a self, mut keep: F) -> impl Iterator<Item = &'a PointOfInterest> + 'a
    where
        F: FnMut(PoiCategory) -> bool + 'a,
    {
        self.points_of_interest.iter().filter(move |p| keep(p.category))
    }

    /// Closed ring of the totality band: north limit then the south limit reversed.
    pub fn totality_ring(&self) -> Vec<GeoPoint> {
        self.north_limit.points().chain(self.south_limit.points().rev()).collect()
    }

    /// Local time zone offset; falls back to the alignment reference's own offset.
    pub fn local_offset(&self) -> FixedOffset {
        self.info
            .timezone
            .offset()
            .unwrap_or(*self.info.alignment_reference.offset())
    }
}
