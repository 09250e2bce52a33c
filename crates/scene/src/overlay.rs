//! Per-frame overlay geometry.
//!
//! Everything here is recomputed from the current view and event on demand;
//! nothing is cached between frames.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use catalog::{EclipseEvent, PoiCategory, SkyOutlook};
use foundation::GeoPoint;
use foundation::math::ScreenPoint;
use streaming::{TileCoord, TileStyle};

use crate::selection::CategorySet;
use crate::view::MapView;
use crate::visibility::LayerVisibility;

/// Markers further than this outside the viewport are not emitted.
pub const MARKER_CULL_MARGIN_PX: f64 = 50.0;

pub const TOTAL_CITY_COLOR: &str = "#fbbf24";
pub const PARTIAL_CITY_COLOR: &str = "#94a3b8";
pub const SELECTED_LOCATION_COLOR: &str = "#f97316";
pub const OBSERVER_COLOR: &str = "#22c55e";
pub const TARGET_COLOR: &str = "#3b82f6";

/// `M x y L x y ...` path data for an SVG `<path>`. Empty input gives an empty string.
pub fn path_data<I>(points: I, view: &MapView) -> String
where
    I: IntoIterator<Item = GeoPoint>,
{
    let mut out = String::new();
    for (i, p) in points.into_iter().enumerate() {
        let s = view.geo_to_screen(p);
        if i > 0 {
            out.push(' ');
        }
        let cmd = if i == 0 { 'M' } else { 'L' };
        let _ = write!(out, "{cmd} {:.1} {:.1}", s.x, s.y);
    }
    out
}

/// Like [`path_data`] but closed with `Z`.
pub fn closed_path_data<I>(points: I, view: &MapView) -> String
where
    I: IntoIterator<Item = GeoPoint>,
{
    let mut out = path_data(points, view);
    if !out.is_empty() {
        out.push_str(" Z");
    }
    out
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MarkerKind {
    City { in_totality: bool },
    PointOfInterest { category: PoiCategory },
    WeatherZone { outlook: SkyOutlook },
    SelectedLocation,
    Observer,
    Target,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub kind: MarkerKind,
    /// Index into the event's city/POI/zone list; 0 for pins.
    pub index: usize,
    pub label: String,
    pub point: GeoPoint,
    pub screen: ScreenPoint,
    pub color: String,
}

impl Marker {
    /// Single pin (location, alignment point). Pins are never culled.
    pub fn pin(kind: MarkerKind, label: &str, point: GeoPoint, view: &MapView) -> Self {
        let color = match kind {
            MarkerKind::Observer => OBSERVER_COLOR,
            MarkerKind::Target => TARGET_COLOR,
            _ => SELECTED_LOCATION_COLOR,
        };
        Self {
            kind,
            index: 0,
            label: label.to_string(),
            point,
            screen: view.geo_to_screen(point),
            color: color.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileImage {
    pub coord: TileCoord,
    pub screen: ScreenPoint,
    pub url: String,
}

/// Drawable state for one frame, back to front.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverlayFrame {
    pub tiles: Vec<TileImage>,
    pub attribution: String,
    pub totality_band: String,
    pub north_limit: String,
    pub south_limit: String,
    pub central_line: String,
    pub markers: Vec<Marker>,
}

impl OverlayFrame {
    pub fn compose(
        view: &MapView,
        event: &EclipseEvent,
        style: TileStyle,
        layers: LayerVisibility,
        categories: &CategorySet,
    ) -> Self {
        let tiles = view
            .visible_tiles()
            .into_iter()
            .map(|t| TileImage {
                coord: t.coord,
                screen: t.screen,
                url: style.tile_url(t.coord),
            })
            .collect();

        let mut frame = OverlayFrame {
            tiles,
            attribution: style.attribution().to_string(),
            ..OverlayFrame::default()
        };

        if layers.path {
            frame.totality_band = closed_path_data(event.totality_ring(), view);
            frame.north_limit = path_data(event.north_limit.points(), view);
            frame.south_limit = path_data(event.south_limit.points(), view);
            frame.central_line = path_data(event.central_line.points(), view);
        }

        if layers.weather {
            for (index, zone) in event.weather_zones.iter().enumerate() {
                let outlook = zone.outlook();
                frame.push_culled(
                    view,
                    MarkerKind::WeatherZone { outlook },
                    index,
                    &zone.name,
                    zone.point,
                    outlook.color(),
                );
            }
        }

        if layers.cities {
            for (index, city) in event.cities.iter().enumerate() {
                let color = if city.in_totality {
                    TOTAL_CITY_COLOR
                } else {
                    PARTIAL_CITY_COLOR
                };
                frame.push_culled(
                    view,
                    MarkerKind::City {
                        in_totality: city.in_totality,
                    },
                    index,
                    &city.name,
                    city.point,
                    color,
                );
            }
        }

        if layers.points_of_interest {
            for (index, poi) in event.points_of_interest.iter().enumerate() {
                if !categories.contains(poi.category) {
                    continue;
                }
                frame.push_culled(
                    view,
                    MarkerKind::PointOfInterest { category: poi.category },
                    index,
                    &poi.name,
                    poi.point,
                    poi.category.color(),
                );
            }
        }

        frame
    }

    fn push_culled(&mut self, view: &MapView, kind: MarkerKind, index: usize, label: &str, point: GeoPoint, color: &str) {
        let screen = view.geo_to_screen(point);
        if !view.viewport().contains_with_margin(screen, MARKER_CULL_MARGIN_PX) {
            return;
        }
        self.markers.push(Marker {
            kind,
            index,
            label: label.to_string(),
            point,
            screen,
            color: color.to_string(),
        });
    }

    pub fn markers_of<'a>(&'a self, pred: impl Fn(&MarkerKind) -> bool + 'a) -> impl Iterator<Item = &'a Marker> + 'a {
        self.markers.iter().filter(move |m| pred(&m.kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::Catalog;
    use foundation::math::Viewport;

    fn event_2026() -> EclipseEvent {
        Catalog::builtin().unwrap().get("2026").unwrap().clone()
    }

    fn view() -> MapView {
        MapView::new(Viewport::new(800.0, 600.0))
    }

    #[test]
    fn path_data_moves_then_draws() {
        let v = view();
        let d = path_data([v.center(), v.screen_to_geo(ScreenPoint::new(500.0, 300.0))], &v);
        assert_eq!(d, "M 400.0 300.0 L 500.0 300.0");
        assert_eq!(path_data(Vec::<GeoPoint>::new(), &v), "");
        assert_eq!(closed_path_data(Vec::<GeoPoint>::new(), &v), "");
    }

    #[test]
    fn totality_band_is_closed_ring() {
        let event = event_2026();
        let frame = OverlayFrame::compose(&view(), &event, TileStyle::Dark, LayerVisibility::default(), &CategorySet::all());
        assert!(frame.totality_band.starts_with("M "));
        assert!(frame.totality_band.ends_with(" Z"));
        let vertices = frame.totality_band.matches(['M', 'L']).count();
        assert_eq!(vertices, event.north_limit.len() + event.south_limit.len());
        assert!(!frame.central_line.is_empty());
        assert!(frame.tiles.iter().all(|t| t.url.contains("cartocdn")));
    }

    #[test]
    fn hidden_layers_emit_nothing() {
        let event = event_2026();
        let layers = LayerVisibility {
            path: false,
            cities: false,
            points_of_interest: false,
            weather: false,
        };
        let frame = OverlayFrame::compose(&view(), &event, TileStyle::Satellite, layers, &CategorySet::all());
        assert!(frame.central_line.is_empty());
        assert!(frame.totality_band.is_empty());
        assert!(frame.markers.is_empty());
        assert!(!frame.tiles.is_empty());
        assert_eq!(frame.attribution, TileStyle::Satellite.attribution());
    }

    #[test]
    fn category_filter_limits_poi_markers() {
        let event = event_2026();
        let museums: CategorySet = [PoiCategory::Museum].into_iter().collect();
        let frame = OverlayFrame::compose(&view(), &event, TileStyle::Dark, LayerVisibility::default(), &museums);
        let pois: Vec<_> = frame
            .markers_of(|k| matches!(k, MarkerKind::PointOfInterest { .. }))
            .collect();
        assert!(!pois.is_empty());
        assert!(pois.iter().all(|m| m.kind == MarkerKind::PointOfInterest {
            category: PoiCategory::Museum
        }));
    }

    #[test]
    fn off_screen_markers_are_culled() {
        let event = event_2026();
        let mut v = view();
        // Far out in the Atlantic at high zoom: nothing from the catalog nearby.
        v.fly_to(GeoPoint::new(30.0, -40.0), Some(12.0));
        let frame = OverlayFrame::compose(&v, &event, TileStyle::Dark, LayerVisibility::default(), &CategorySet::all());
        assert!(frame.markers.is_empty());

        let all = OverlayFrame::compose(&view(), &event, TileStyle::Dark, LayerVisibility::default(), &CategorySet::all());
        assert!(all.markers.iter().all(|m| view().viewport().contains_with_margin(m.screen, MARKER_CULL_MARGIN_PX)));
        let cities = all.markers_of(|k| matches!(k, MarkerKind::City { .. })).count();
        assert!(cities > 0 && cities <= event.cities.len());
    }

    #[test]
    fn weather_zones_follow_layer_flag() {
        let event = event_2026();
        let layers = LayerVisibility {
            weather: true,
            ..LayerVisibility::default()
        };
        let frame = OverlayFrame::compose(&view(), &event, TileStyle::Dark, layers, &CategorySet::all());
        let zones = frame.markers_of(|k| matches!(k, MarkerKind::WeatherZone { .. })).count();
        assert!(zones > 0);
    }
}
