//! Slippy-map viewport controller.
//!
//! Tracks the centre and zoom of a flat Web Mercator view and turns raw
//! pointer input into pans, zoom steps and clicks:
//! - left drag pans, anchored at the drag start so the map follows the pointer
//! - a release that moved less than [`CLICK_TOLERANCE_PX`] is a click
//! - the wheel steps the integer zoom, keeping the geography under the cursor fixed

use serde::{Deserialize, Serialize};
use tracing::debug;

use foundation::GeoPoint;
use foundation::math::{
    ScreenPoint, TILE_SIZE, TilePoint, Viewport, geo_to_screen, geo_to_tile, screen_to_geo, tile_to_geo,
};
use streaming::TileCoord;

pub const MIN_ZOOM: f64 = 4.0;
pub const MAX_ZOOM: f64 = 12.0;
pub const DEFAULT_ZOOM: f64 = 6.0;

/// Initial centre: the middle of the Iberian peninsula.
pub const DEFAULT_CENTER: GeoPoint = GeoPoint::new(41.5, -3.5);

/// Pointer travel (pixels) under which a press/release pair counts as a click.
pub const CLICK_TOLERANCE_PX: f64 = 4.0;

pub fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_nan() {
        return DEFAULT_ZOOM;
    }
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}

/// What a pointer release amounted to.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PointerOutcome {
    /// Press and release without meaningful travel, at this location.
    Click { screen: ScreenPoint, point: GeoPoint },
    Dragged,
    /// No drag was in progress.
    Ignored,
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct DragState {
    start: ScreenPoint,
    start_center: GeoPoint,
    moved: bool,
}

/// A basemap tile and where its top-left corner lands on screen.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedTile {
    pub coord: TileCoord,
    pub screen: ScreenPoint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    center: GeoPoint,
    zoom: f64,
    viewport: Viewport,
    #[serde(skip)]
    drag: Option<DragState>,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            viewport: Viewport::default(),
            drag: None,
        }
    }
}

impl MapView {
    pub fn new(viewport: Viewport) -> Self {
        let mut view = Self::default();
        view.set_viewport(viewport.width, viewport.height);
        view
    }

    pub fn center(&self) -> GeoPoint {
        self.center
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = Viewport::new(width.max(1.0), height.max(1.0));
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = clamp_zoom(zoom);
    }

    pub fn geo_to_screen(&self, point: GeoPoint) -> ScreenPoint {
        geo_to_screen(point, self.center, self.zoom, self.viewport)
    }

    pub fn screen_to_geo(&self, screen: ScreenPoint) -> GeoPoint {
        screen_to_geo(screen, self.center, self.zoom, self.viewport)
    }

    /// Handle pointer press. Only the primary button (0) starts a drag.
    ///
    /// Returns whether a drag started.
    pub fn on_pointer_down(&mut self, pos: ScreenPoint, button: i32) -> bool {
        if button != 0 {
            return false;
        }
        self.drag = Some(DragState {
            start: pos,
            start_center: self.center,
            moved: false,
        });
        true
    }

    pub fn on_pointer_move(&mut self, pos: ScreenPoint) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        if pos.distance_to(drag.start) > CLICK_TOLERANCE_PX {
            drag.moved = true;
        }
        let anchor = geo_to_tile(drag.start_center, self.zoom);
        self.center = tile_to_geo(
            TilePoint {
                x: anchor.x - (pos.x - drag.start.x) / TILE_SIZE,
                y: anchor.y - (pos.y - drag.start.y) / TILE_SIZE,
            },
            self.zoom,
        );
    }

    pub fn on_pointer_up(&mut self, pos: ScreenPoint) -> PointerOutcome {
        let Some(drag) = self.drag.take() else {
            return PointerOutcome::Ignored;
        };
        if drag.moved || pos.distance_to(drag.start) > CLICK_TOLERANCE_PX {
            return PointerOutcome::Dragged;
        }
        PointerOutcome::Click {
            screen: pos,
            point: self.screen_to_geo(pos),
        }
    }

    /// Pointer left the map: end any drag without producing a click.
    pub fn on_pointer_leave(&mut self) {
        self.drag = None;
    }

    /// Step the zoom by one level towards `delta_y`'s direction (positive = out),
    /// keeping the location under `pos` fixed on screen.
    ///
    /// Returns whether the zoom changed.
    pub fn on_wheel(&mut self, pos: ScreenPoint, delta_y: f64) -> bool {
        if delta_y == 0.0 || delta_y.is_nan() {
            return false;
        }
        let step = if delta_y > 0.0 { -1.0 } else { 1.0 };
        let new_zoom = clamp_zoom(self.zoom.round() + step);
        if new_zoom == self.zoom {
            return false;
        }

        let anchor = self.screen_to_geo(pos);
        let (hw, hh) = self.viewport.half();
        let tile = geo_to_tile(anchor, new_zoom);
        self.center = tile_to_geo(
            TilePoint {
                x: tile.x - (pos.x - hw) / TILE_SIZE,
                y: tile.y - (pos.y - hh) / TILE_SIZE,
            },
            new_zoom,
        );
        self.zoom = new_zoom;
        true
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom + 1.0);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom - 1.0);
    }

    pub fn reset(&mut self) {
        self.center = DEFAULT_CENTER;
        self.zoom = DEFAULT_ZOOM;
        self.drag = None;
    }

    /// Recentre on `point`, optionally changing the zoom.
    pub fn fly_to(&mut self, point: GeoPoint, zoom: Option<f64>) {
        self.center = point;
        if let Some(z) = zoom {
            self.set_zoom(z);
        }
        self.drag = None;
    }

    /// Integer zoom level tiles are fetched at.
    pub fn tile_zoom(&self) -> u8 {
        self.zoom.round() as u8
    }

    /// Tiles covering the viewport plus a one-tile border, column by column.
    ///
    /// Columns wrap around the antimeridian; rows outside the world are skipped.
    pub fn visible_tiles(&self) -> Vec<PlacedTile> {
        let z = self.tile_zoom();
        let zf = z as f64;
        let center = geo_to_tile(self.center, zf);
        let tiles_x = (self.viewport.width / TILE_SIZE).ceil() as i64 + 2;
        let tiles_y = (self.viewport.height / TILE_SIZE).ceil() as i64 + 2;
        let start_x = (center.x - tiles_x as f64 / 2.0).floor() as i64;
        let start_y = (center.y - tiles_y as f64 / 2.0).floor() as i64;
        let (hw, hh) = self.viewport.half();

        let mut out = Vec::with_capacity((tiles_x * tiles_y) as usize);
        for x in start_x..start_x + tiles_x {
            for y in start_y..start_y + tiles_y {
                let Some(coord) = TileCoord::wrapped(z, x, y) else {
                    continue;
                };
                out.push(PlacedTile {
                    coord,
                    screen: ScreenPoint::new(hw + (x as f64 - center.x) * TILE_SIZE, hh + (y as f64 - center.y) * TILE_SIZE),
                });
            }
        }
        debug!(zoom = z, count = out.len(), "visible tile set");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64, eps: f64) {
        assert!((a - b).abs() <= eps, "expected {b}, got {a} (eps {eps})");
    }

    fn view() -> MapView {
        MapView::new(Viewport::new(800.0, 600.0))
    }

    #[test]
    fn starts_over_iberia() {
        let v = view();
        assert_eq!(v.center(), DEFAULT_CENTER);
        assert_eq!(v.zoom(), DEFAULT_ZOOM);
        assert!(!v.is_dragging());
    }

    #[test]
    fn screen_round_trip() {
        let v = view();
        for (x, y) in [(0.0, 0.0), (400.0, 300.0), (799.0, 12.5), (123.4, 567.8)] {
            let s = ScreenPoint::new(x, y);
            let back = v.geo_to_screen(v.screen_to_geo(s));
            assert_close(back.x, x, 1e-6);
            assert_close(back.y, y, 1e-6);
        }
        let c = v.geo_to_screen(v.center());
        assert_close(c.x, 400.0, 1e-9);
        assert_close(c.y, 300.0, 1e-9);
    }

    #[test]
    fn drag_moves_map_with_pointer() {
        let mut v = view();
        let grabbed = v.screen_to_geo(ScreenPoint::new(300.0, 200.0));
        assert!(v.on_pointer_down(ScreenPoint::new(300.0, 200.0), 0));
        v.on_pointer_move(ScreenPoint::new(350.0, 260.0));
        v.on_pointer_move(ScreenPoint::new(420.0, 310.0));
        let at = v.geo_to_screen(grabbed);
        assert_close(at.x, 420.0, 1e-6);
        assert_close(at.y, 310.0, 1e-6);
        assert_eq!(v.on_pointer_up(ScreenPoint::new(420.0, 310.0)), PointerOutcome::Dragged);
        assert!(!v.is_dragging());
    }

    #[test]
    fn short_press_is_a_click() {
        let mut v = view();
        v.on_pointer_down(ScreenPoint::new(400.0, 300.0), 0);
        v.on_pointer_move(ScreenPoint::new(401.0, 301.0));
        match v.on_pointer_up(ScreenPoint::new(401.0, 301.0)) {
            PointerOutcome::Click { point, .. } => {
                assert_close(point.lat, 41.5, 0.05);
                assert_close(point.lng, -3.5, 0.05);
            }
            other => panic!("expected click, got {other:?}"),
        }
    }

    #[test]
    fn secondary_button_and_leave_do_not_click() {
        let mut v = view();
        assert!(!v.on_pointer_down(ScreenPoint::new(10.0, 10.0), 2));
        assert_eq!(v.on_pointer_up(ScreenPoint::new(10.0, 10.0)), PointerOutcome::Ignored);

        v.on_pointer_down(ScreenPoint::new(10.0, 10.0), 0);
        v.on_pointer_leave();
        assert_eq!(v.on_pointer_up(ScreenPoint::new(10.0, 10.0)), PointerOutcome::Ignored);
    }

    #[test]
    fn wheel_zooms_towards_cursor() {
        let mut v = view();
        let cursor = ScreenPoint::new(150.0, 450.0);
        let under = v.screen_to_geo(cursor);
        assert!(v.on_wheel(cursor, -120.0));
        assert_eq!(v.zoom(), 7.0);
        let at = v.geo_to_screen(under);
        assert_close(at.x, cursor.x, 1e-6);
        assert_close(at.y, cursor.y, 1e-6);

        assert!(v.on_wheel(cursor, 120.0));
        assert_eq!(v.zoom(), 6.0);
        assert!(!v.on_wheel(cursor, 0.0));
    }

    #[test]
    fn zoom_is_clamped() {
        let mut v = view();
        for _ in 0..20 {
            v.zoom_in();
        }
        assert_eq!(v.zoom(), MAX_ZOOM);
        assert!(!v.on_wheel(ScreenPoint::new(0.0, 0.0), -1.0));
        for _ in 0..20 {
            v.zoom_out();
        }
        assert_eq!(v.zoom(), MIN_ZOOM);
        v.set_zoom(f64::NAN);
        assert_eq!(v.zoom(), DEFAULT_ZOOM);
    }

    #[test]
    fn reset_and_fly_to() {
        let mut v = view();
        v.fly_to(GeoPoint::new(36.0, -5.6), Some(9.0));
        assert_eq!(v.center(), GeoPoint::new(36.0, -5.6));
        assert_eq!(v.zoom(), 9.0);
        v.fly_to(GeoPoint::new(43.0, -8.0), None);
        assert_eq!(v.zoom(), 9.0);
        v.reset();
        assert_eq!(v.center(), DEFAULT_CENTER);
        assert_eq!(v.zoom(), DEFAULT_ZOOM);
    }

    #[test]
    fn tile_grid_covers_viewport_plus_border() {
        let v = view();
        let tiles = v.visible_tiles();
        // ceil(800/256)+2 = 6 columns, ceil(600/256)+2 = 5 rows
        assert_eq!(tiles.len(), 30);
        assert!(tiles.iter().all(|t| t.coord.z == 6));
        let min_x = tiles.iter().map(|t| t.screen.x).fold(f64::INFINITY, f64::min);
        let max_x = tiles.iter().map(|t| t.screen.x).fold(f64::NEG_INFINITY, f64::max);
        assert!(min_x <= 0.0);
        assert!(max_x + TILE_SIZE >= 800.0);
    }

    #[test]
    fn tiles_wrap_columns_and_skip_rows() {
        let mut v = MapView::new(Viewport::new(2048.0, 2048.0));
        v.fly_to(GeoPoint::new(84.0, 179.0), Some(4.0));
        let tiles = v.visible_tiles();
        let n = TileCoord::tiles_per_axis(4) as u32;
        assert!(tiles.iter().all(|t| t.coord.x < n && t.coord.y < n));
        // 10 columns requested but rows above the pole are dropped
        assert!(tiles.len() < 10 * 10);
        assert!(tiles.iter().any(|t| t.coord.x == 0));
        assert!(tiles.iter().any(|t| t.coord.x == n - 1));
    }
}
