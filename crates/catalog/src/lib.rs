//! Eclipse datasets: paths, limits, city circumstances, points of interest.
//!
//! Everything here is static at runtime. A [`Catalog`] is built once (from the
//! bundled JSON or a user-supplied file), validated, and then only read.

pub mod event;
pub mod poi;
pub mod weather;

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use foundation::GeoPoint;

pub use event::{
    BandModel, BandPolicy, CityRecord, Crossing, EclipseEvent, EclipseInfo, EclipseKind, LocalEventTimes,
    TimeZoneInfo,
};
pub use poi::{PoiCategory, PointOfInterest};
pub use weather::{SkyOutlook, WeatherZone};

const BUILTIN_2026: &str = include_str!("../data/eclipse-2026.json");
const BUILTIN_2027: &str = include_str!("../data/eclipse-2027.json");
const BUILTIN_DEFAULT: &str = "2026";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("catalog has no events")]
    Empty,
    #[error("duplicate event id {0:?}")]
    DuplicateId(String),
    #[error("default event {0:?} is not in the catalog")]
    UnknownDefault(String),
    #[error("event {event:?} is invalid: {reason}")]
    Invalid { event: String, reason: String },
    #[error("catalog parse error: {0}")]
    Parse(String),
    #[error("cannot read catalog {path}: {message}")]
    Io { path: String, message: String },
}

/// On-disk layout of a catalog file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_event: Option<String>,
    pub events: Vec<EclipseEvent>,
}

/// Validated, read-only set of eclipse events.
#[derive(Debug, Clone)]
pub struct Catalog {
    events: Vec<EclipseEvent>,
    default_index: usize,
}

impl Catalog {
    /// Validate `events` and prepare their derived geometry.
    ///
    /// With no explicit default the first event is the default.
    pub fn new(mut events: Vec<EclipseEvent>, default_event: Option<&str>) -> Result<Self, CatalogError> {
        if events.is_empty() {
            return Err(CatalogError::Empty);
        }
        for (i, event) in events.iter().enumerate() {
            if events[..i].iter().any(|e| e.id == event.id) {
                return Err(CatalogError::DuplicateId(event.id.clone()));
            }
            validate_event(event)?;
        }
        let default_index = match default_event {
            Some(id) => events
                .iter()
                .position(|e| e.id == id)
                .ok_or_else(|| CatalogError::UnknownDefault(id.to_string()))?,
            None => 0,
        };
        for event in &mut events {
            event.prepare();
        }
        Ok(Self { events, default_index })
    }

    /// The datasets compiled into the binary.
    pub fn builtin() -> Result<Self, CatalogError> {
        let events = [BUILTIN_2026, BUILTIN_2027]
            .into_iter()
            .map(|raw| serde_json::from_str::<EclipseEvent>(raw).map_err(|e| CatalogError::Parse(e.to_string())))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(events, Some(BUILTIN_DEFAULT))
    }

    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(raw).map_err(|e| CatalogError::Parse(e.to_string()))?;
        Self::new(file.events, file.default_event.as_deref())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| CatalogError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let catalog = Self::from_json_str(&raw)?;
        info!(path = %path.display(), events = catalog.events.len(), "catalog loaded");
        Ok(catalog)
    }

    pub fn to_file(&self) -> CatalogFile {
        CatalogFile {
            default_event: Some(self.default_event().id.clone()),
            events: self.events.clone(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&EclipseEvent> {
        self.events.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn default_event(&self) -> &EclipseEvent {
        // default_index is checked in `new` and events are never removed.
        &self.events[self.default_index]
    }

    pub fn events(&self) -> &[EclipseEvent] {
        &self.events
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.events.iter().map(|e| e.id.as_str())
    }
}

fn in_range(p: GeoPoint) -> bool {
    p.is_finite() && p.lat.abs() <= 90.0 && p.lng.abs() <= 180.0
}

fn validate_event(event: &EclipseEvent) -> Result<(), CatalogError> {
    let invalid = |reason: String| CatalogError::Invalid {
        event: event.id.clone(),
        reason,
    };

    if event.id.trim().is_empty() {
        return Err(invalid("empty id".into()));
    }
    for (name, line) in [
        ("central_line", &event.central_line),
        ("north_limit", &event.north_limit),
        ("south_limit", &event.south_limit),
    ] {
        if let Some(i) = line.points().position(|p| !in_range(p)) {
            return Err(invalid(format!("{name} vertex {i} is out of range")));
        }
    }
    if event.central_line.is_empty() {
        warn!(event = %event.id, "central line is empty; every query will be outside totality");
    }
    if let Some(city) = event.cities.iter().find(|c| !in_range(c.point)) {
        return Err(invalid(format!("city {:?} has invalid coordinates", city.name)));
    }
    if let Some(poi) = event.points_of_interest.iter().find(|p| !in_range(p.point)) {
        return Err(invalid(format!("point of interest {:?} has invalid coordinates", poi.id)));
    }
    if let Some(zone) = event.weather_zones.iter().find(|z| z.cloud_probability > 100) {
        return Err(invalid(format!("weather zone {:?} probability above 100", zone.id)));
    }
    if event.info.timezone.offset().is_none() {
        return Err(invalid("time zone offset out of range".into()));
    }

    let band = &event.band;
    if !(band.duration_band_width_km.is_finite() && band.duration_band_width_km > 0.0) {
        return Err(invalid("duration_band_width_km must be positive".into()));
    }
    if !(0.0..=1.0).contains(&band.partial_magnitude_floor) {
        return Err(invalid("partial_magnitude_floor must lie in [0, 1]".into()));
    }
    if !(band.partial_decay_per_km.is_finite() && band.partial_decay_per_km >= 0.0) {
        return Err(invalid("partial_decay_per_km must be non-negative".into()));
    }
    if let Some(step) = band.resample_step_km {
        if !(step.is_finite() && step > 0.0) {
            return Err(invalid("resample_step_km must be positive".into()));
        }
    }
    let policy_ok = match &band.policy {
        BandPolicy::Radius { max_distance_km } => max_distance_km.is_finite() && *max_distance_km > 0.0,
        BandPolicy::NarrowingBox {
            bounds,
            base_half_width_km,
            min_half_width_km,
            ..
        } => bounds.is_valid() && *base_half_width_km > 0.0 && *min_half_width_km >= 0.0,
    };
    if !policy_ok {
        return Err(invalid("band policy parameters are out of range".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{BandPolicy, Catalog, CatalogError, EclipseKind};

    #[test]
    fn builtin_catalog_loads_both_events() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.ids().collect::<Vec<_>>(), vec!["2026", "2027"]);
        assert_eq!(catalog.default_event().id, "2026");

        let e2026 = catalog.get("2026").unwrap();
        assert_eq!(e2026.info.kind, EclipseKind::Total);
        assert_eq!(e2026.info.saros, 126);
        assert_eq!(e2026.info.max_duration, 138);
        assert_eq!(e2026.info.timezone.label, "CEST");
        assert_eq!(e2026.band.central_duration, 107);
        assert!(matches!(e2026.band.policy, BandPolicy::NarrowingBox { .. }));

        let e2027 = catalog.get("2027").unwrap();
        assert!(matches!(e2027.band.policy, BandPolicy::Radius { .. }));
        assert!(e2027.points_of_interest.is_empty());
        assert!(!e2027.weather_zones.is_empty());
        assert!(catalog.get("1999").is_none());
    }

    #[test]
    fn file_round_trip_keeps_default() {
        let catalog = Catalog::builtin().unwrap();
        let raw = serde_json::to_string(&catalog.to_file()).unwrap();
        let again = Catalog::from_json_str(&raw).unwrap();
        assert_eq!(again.default_event().id, "2026");
        assert_eq!(again.ids().collect::<Vec<_>>(), catalog.ids().collect::<Vec<_>>());
        let (a, b) = (again.get("2026").unwrap(), catalog.get("2026").unwrap());
        assert_eq!(a.cities.len(), b.cities.len());
        assert_eq!(a.cities[0].totality_duration, b.cities[0].totality_duration);
        assert_eq!(a.info.alignment_reference, b.info.alignment_reference);
        assert_eq!(a.proximity_line().len(), b.proximity_line().len());
    }

    #[test]
    fn rejects_duplicate_and_unknown_ids() {
        let catalog = Catalog::builtin().unwrap();
        let event = catalog.default_event().clone();

        let err = Catalog::new(vec![event.clone(), event.clone()], None).unwrap_err();
        assert_eq!(err, CatalogError::DuplicateId("2026".into()));

        let err = Catalog::new(vec![event], Some("2030")).unwrap_err();
        assert_eq!(err, CatalogError::UnknownDefault("2030".into()));

        assert_eq!(Catalog::new(Vec::new(), None).unwrap_err(), CatalogError::Empty);
    }

    #[test]
    fn rejects_out_of_range_geometry() {
        let catalog = Catalog::builtin().unwrap();
        let mut event = catalog.default_event().clone();
        event.cities[0].point.lat = 123.0;
        let err = Catalog::new(vec![event], None).unwrap_err();
        assert!(matches!(err, CatalogError::Invalid { .. }), "{err}");
    }

    #[test]
    fn empty_central_line_is_accepted() {
        let catalog = Catalog::builtin().unwrap();
        let mut event = catalog.default_event().clone();
        event.central_line = Default::default();
        let catalog = Catalog::new(vec![event], None).unwrap();
        assert!(catalog.default_event().proximity_line().is_empty());
    }

    #[test]
    fn parse_errors_are_reported() {
        assert!(matches!(Catalog::from_json_str("{"), Err(CatalogError::Parse(_))));
        assert!(matches!(
            Catalog::load("/definitely/not/here.json"),
            Err(CatalogError::Io { .. })
        ));
    }

    #[test]
    fn oversized_central_duration_is_a_parse_error() {
        let file = Catalog::builtin().unwrap().to_file();
        let mut raw = serde_json::to_value(&file).unwrap();
        raw["events"][0]["band"]["central_duration"] = "4294967295m 0s".into();
        let err = Catalog::from_json_str(&raw.to_string()).unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)), "{err}");
    }
}
