use serde::{Deserialize, Serialize};

use catalog::{CityRecord, EclipseEvent, PointOfInterest};
use foundation::GeoPoint;
use foundation::math::ScreenPoint;
use foundation::math::precision::stable_total_cmp_f64;

use crate::overlay::{Marker, MarkerKind, OverlayFrame};

/// City markers are circles of this radius.
pub const CITY_HIT_RADIUS_PX: f64 = 16.0;

/// POI markers are squares extending this far from their centre.
pub const POI_HIT_HALF_BOX_PX: f64 = 10.0;

/// Payload of the marker popup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum PopupContent {
    City(CityRecord),
    Poi(PointOfInterest),
}

impl PopupContent {
    pub fn title(&self) -> &str {
        match self {
            PopupContent::City(c) => &c.name,
            PopupContent::Poi(p) => &p.name,
        }
    }

    pub fn point(&self) -> GeoPoint {
        match self {
            PopupContent::City(c) => c.point,
            PopupContent::Poi(p) => p.point,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MarkerHit {
    pub kind: MarkerKind,
    pub index: usize,
    pub distance_px: f64,
}

/// Deterministic marker picking at a screen position.
///
/// Ordering contract:
/// - POIs are drawn above cities, so any POI hit beats any city hit.
/// - Within a layer the closest marker centre wins.
/// - Equal distances go to the lower catalog index.
///
/// Only markers present in `frame` are considered, so hidden layers, filtered
/// categories and culled markers never win.
pub fn pick_marker(frame: &OverlayFrame, pos: ScreenPoint) -> Option<MarkerHit> {
    let mut best: Option<(u8, MarkerHit)> = None;

    for marker in &frame.markers {
        let Some((layer, distance_px)) = hit_test(marker, pos) else {
            continue;
        };
        let hit = MarkerHit {
            kind: marker.kind,
            index: marker.index,
            distance_px,
        };
        best = match best {
            None => Some((layer, hit)),
            Some((bl, bh)) => {
                let ord = layer
                    .cmp(&bl)
                    .then_with(|| stable_total_cmp_f64(distance_px, bh.distance_px))
                    .then_with(|| hit.index.cmp(&bh.index));
                if ord.is_lt() { Some((layer, hit)) } else { Some((bl, bh)) }
            }
        };
    }

    best.map(|(_, hit)| hit)
}

/// Resolve a hit back to the catalog record shown in the popup.
pub fn popup_for(event: &EclipseEvent, hit: &MarkerHit) -> Option<PopupContent> {
    match hit.kind {
        MarkerKind::City { .. } => event.cities.get(hit.index).cloned().map(PopupContent::City),
        MarkerKind::PointOfInterest { .. } => event.points_of_interest.get(hit.index).cloned().map(PopupContent::Poi),
        _ => None,
    }
}

/// Layer rank (lower is on top) and distance, when `pos` falls on the marker.
fn hit_test(marker: &Marker, pos: ScreenPoint) -> Option<(u8, f64)> {
    let d = marker.screen.distance_to(pos);
    match marker.kind {
        MarkerKind::PointOfInterest { .. } => {
            let inside = (pos.x - marker.screen.x).abs() <= POI_HIT_HALF_BOX_PX
                && (pos.y - marker.screen.y).abs() <= POI_HIT_HALF_BOX_PX;
            inside.then_some((0, d))
        }
        MarkerKind::City { .. } => (d <= CITY_HIT_RADIUS_PX).then_some((1, d)),
        _ => None,
    }
}
