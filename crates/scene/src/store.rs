//! Application state and the actions that mutate it.
//!
//! [`AppState`] is plain serializable data. The only way to change it is
//! [`Store::dispatch`] with a named [`Action`]. Anything derived from the state
//! (overlay geometry, alignment numbers) is recomputed on request.
//!
//! Network lookups are not performed here: an action that needs them returns
//! [`Effect::FetchAux`], the caller starts the lookup and reports back with
//! [`Action::AuxStarted`] and [`Action::AuxArrived`]. Updates for anything but
//! the latest request are dropped.

use chrono::{Datelike, Timelike};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use catalog::{Catalog, EclipseEvent, PoiCategory};
use compute::{AlignmentResult, AlignmentState, EclipseCalculationResult, calculate_eclipse_data};
use foundation::math::ScreenPoint;
use foundation::{CoordinateError, GeoPoint, parse_coordinates};
use streaming::{AuxPayload, AuxQuery, AuxUpdate, MoonData, Request, TileStyle, WeatherStats};

use crate::alignment_tool::{AlignmentMode, ModeError};
use crate::overlay::{Marker, MarkerKind, OverlayFrame};
use crate::picking::{PopupContent, pick_marker, popup_for};
use crate::selection::CategorySet;
use crate::view::{MapView, PointerOutcome};
use crate::visibility::{Layer, LayerVisibility};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("unknown eclipse {0:?}")]
    UnknownEvent(String),
    #[error("no city named {0:?} in this eclipse")]
    UnknownCity(String),
    #[error("invalid coordinates: {0}")]
    InvalidCoordinates(#[from] CoordinateError),
    #[error("place the observer (point A) before the target")]
    ObserverMissing,
}

impl From<ModeError> for StoreError {
    fn from(err: ModeError) -> Self {
        match err {
            ModeError::ObserverMissing => StoreError::ObserverMissing,
        }
    }
}

/// Lifecycle of one auxiliary panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum AuxSlot<T> {
    #[default]
    Idle,
    Loading,
    Ready(T),
    /// Lookup failed or timed out; shown as "no data available".
    Unavailable,
}

impl<T> AuxSlot<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            AuxSlot::Ready(v) => Some(v),
            _ => None,
        }
    }

    fn settle(value: Option<T>) -> Self {
        value.map(AuxSlot::Ready).unwrap_or(AuxSlot::Unavailable)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuxPanel {
    /// Key of the query the panel is waiting for.
    pub key: Option<String>,
    /// Dispatcher id once the lookup was started.
    pub request: Option<Request>,
    pub moon: AuxSlot<MoonData>,
    pub weather: AuxSlot<WeatherStats>,
}

/// Timing result tagged with the event it was computed for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationReport {
    pub event_id: String,
    pub point: GeoPoint,
    pub data: EclipseCalculationResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    pub event_id: String,
    pub view: MapView,
    pub tile_style: TileStyle,
    pub layers: LayerVisibility,
    pub categories: CategorySet,
    pub selected_location: Option<GeoPoint>,
    pub report: Option<LocationReport>,
    pub popup: Option<PopupContent>,
    pub alignment_mode: AlignmentMode,
    pub alignment: AlignmentState,
    pub aux: AuxPanel,
}

impl AppState {
    pub fn for_event(event: &EclipseEvent) -> Self {
        Self {
            event_id: event.id.clone(),
            view: MapView::default(),
            tile_style: TileStyle::default(),
            layers: LayerVisibility::default(),
            categories: CategorySet::all(),
            selected_location: None,
            report: None,
            popup: None,
            alignment_mode: AlignmentMode::Idle,
            alignment: AlignmentState::new(event.info.alignment_reference),
            aux: AuxPanel::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    SelectEvent { id: String },
    PointerDown { x: f64, y: f64, button: i32 },
    PointerMove { x: f64, y: f64 },
    PointerUp { x: f64, y: f64 },
    PointerLeave,
    Wheel { x: f64, y: f64, delta_y: f64 },
    Resize { width: f64, height: f64 },
    ZoomIn,
    ZoomOut,
    ResetView,
    FlyTo { point: GeoPoint, zoom: Option<f64> },
    SetTileStyle { style: TileStyle },
    ToggleTileStyle,
    SetLayer { layer: Layer, visible: bool },
    ToggleCategory { category: PoiCategory },
    SetCategories { categories: CategorySet },
    /// Inspect a location directly (search result, CLI query).
    SelectLocation { point: GeoPoint },
    /// Pick a city from the list: feeds the alignment tool when it is waiting,
    /// otherwise selects and centres on the city.
    SelectCity { name: String },
    /// Manually typed coordinates. Rejected entries leave the state untouched.
    EnterCoordinates { lat: String, lng: String },
    ClearLocation,
    ClosePopup,
    RequestPointA,
    RequestPointB,
    CancelAlignmentPick,
    ClearAlignment,
    SetTimeOffset { minutes: i32 },
    AuxStarted { request: Request, key: String },
    AuxArrived { update: AuxUpdate },
}

/// Work the caller has to carry out after a dispatch.
#[must_use]
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    /// Start moon and weather lookups for `query`.
    FetchAux { query: AuxQuery, reference_year: i32 },
}

pub struct Store {
    catalog: Catalog,
    state: AppState,
}

impl Store {
    /// Store showing the catalog's default event.
    pub fn new(catalog: Catalog) -> Self {
        let state = AppState::for_event(catalog.default_event());
        Self { catalog, state }
    }

    /// Resume from a saved state. Fails if its event is not in `catalog`.
    pub fn with_state(catalog: Catalog, state: AppState) -> Result<Self, StoreError> {
        if !catalog.contains(&state.event_id) {
            return Err(StoreError::UnknownEvent(state.event_id));
        }
        Ok(Self { catalog, state })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn event(&self) -> &EclipseEvent {
        self.catalog
            .get(&self.state.event_id)
            .unwrap_or_else(|| self.catalog.default_event())
    }

    /// Current timing report; `None` when it belongs to a different event.
    pub fn report(&self) -> Option<&LocationReport> {
        self.state
            .report
            .as_ref()
            .filter(|r| r.event_id == self.state.event_id)
    }

    pub fn alignment_result(&self) -> Option<AlignmentResult> {
        self.state.alignment.result()
    }

    /// Drawable overlay for the current state, including location and alignment pins.
    pub fn frame(&self) -> OverlayFrame {
        let s = &self.state;
        let mut frame = OverlayFrame::compose(&s.view, self.event(), s.tile_style, s.layers, &s.categories);
        if let Some(p) = s.selected_location {
            frame
                .markers
                .push(Marker::pin(MarkerKind::SelectedLocation, "Selected location", p, &s.view));
        }
        if let Some(a) = s.alignment.point_a {
            frame.markers.push(Marker::pin(MarkerKind::Observer, "A", a, &s.view));
        }
        if let Some(b) = s.alignment.point_b {
            frame.markers.push(Marker::pin(MarkerKind::Target, "B", b, &s.view));
        }
        frame
    }

    pub fn dispatch(&mut self, action: Action) -> Result<Effect, StoreError> {
        debug!(?action, "dispatch");
        match action {
            Action::SelectEvent { id } => return self.select_event(id),
            Action::PointerDown { x, y, button } => {
                if self.state.view.on_pointer_down(ScreenPoint::new(x, y), button) {
                    self.state.popup = None;
                }
            }
            Action::PointerMove { x, y } => self.state.view.on_pointer_move(ScreenPoint::new(x, y)),
            Action::PointerUp { x, y } => {
                if let PointerOutcome::Click { screen, point } = self.state.view.on_pointer_up(ScreenPoint::new(x, y)) {
                    return Ok(self.click(screen, point));
                }
            }
            Action::PointerLeave => self.state.view.on_pointer_leave(),
            Action::Wheel { x, y, delta_y } => {
                self.state.view.on_wheel(ScreenPoint::new(x, y), delta_y);
            }
            Action::Resize { width, height } => self.state.view.set_viewport(width, height),
            Action::ZoomIn => self.state.view.zoom_in(),
            Action::ZoomOut => self.state.view.zoom_out(),
            Action::ResetView => {
                self.state.view.reset();
                self.state.popup = None;
            }
            Action::FlyTo { point, zoom } => self.state.view.fly_to(point, zoom),
            Action::SetTileStyle { style } => self.state.tile_style = style,
            Action::ToggleTileStyle => self.state.tile_style = self.state.tile_style.toggled(),
            Action::SetLayer { layer, visible } => {
                self.state.layers.set(layer, visible);
            }
            Action::ToggleCategory { category } => {
                self.state.categories.toggle(category);
            }
            Action::SetCategories { categories } => self.state.categories = categories,
            Action::SelectLocation { point } => return Ok(self.select_location(point)),
            Action::SelectCity { name } => return self.select_city(&name),
            Action::EnterCoordinates { lat, lng } => {
                let point = parse_coordinates(&lat, &lng).inspect_err(|err| {
                    warn!(%lat, %lng, "manual coordinates rejected: {err}");
                })?;
                self.state.view.fly_to(point, None);
                return Ok(self.select_location(point));
            }
            Action::ClearLocation => {
                self.state.selected_location = None;
                self.state.report = None;
                self.state.aux = AuxPanel::default();
            }
            Action::ClosePopup => self.state.popup = None,
            Action::RequestPointA => self.state.alignment_mode.request_point_a(),
            Action::RequestPointB => self.state.alignment_mode.request_point_b(&self.state.alignment)?,
            Action::CancelAlignmentPick => self.state.alignment_mode.cancel(),
            Action::ClearAlignment => {
                self.state.alignment.clear();
                self.state.alignment_mode.cancel();
            }
            Action::SetTimeOffset { minutes } => self.state.alignment.set_time_offset_minutes(minutes),
            Action::AuxStarted { request, key } => self.aux_started(request, key),
            Action::AuxArrived { update } => self.aux_arrived(update),
        }
        Ok(Effect::None)
    }

    fn select_event(&mut self, id: String) -> Result<Effect, StoreError> {
        if id == self.state.event_id {
            return Ok(Effect::None);
        }
        let Some(event) = self.catalog.get(&id) else {
            return Err(StoreError::UnknownEvent(id));
        };
        debug!(from = %self.state.event_id, to = %id, "switching eclipse");

        let reference = event.info.alignment_reference;
        self.state.event_id = id;
        self.state.popup = None;
        self.state.alignment.reference_time = reference;
        self.state.report = None;
        self.state.aux = AuxPanel::default();

        // Everything derived from the old event is recomputed, never reused.
        match self.state.selected_location {
            Some(point) => Ok(self.select_location(point)),
            None => Ok(Effect::None),
        }
    }

    fn click(&mut self, screen: ScreenPoint, point: GeoPoint) -> Effect {
        let frame = self.frame();
        if let Some(hit) = pick_marker(&frame, screen) {
            self.state.popup = popup_for(self.event(), &hit);
            return Effect::None;
        }
        if self.state.alignment_mode.capture(point, &mut self.state.alignment) {
            debug!(lat = point.lat, lng = point.lng, "alignment point captured");
            return Effect::None;
        }
        self.select_location(point)
    }

    fn select_city(&mut self, name: &str) -> Result<Effect, StoreError> {
        let point = self
            .event()
            .city(name)
            .map(|c| c.point)
            .ok_or_else(|| StoreError::UnknownCity(name.to_string()))?;
        if self.state.alignment_mode.capture(point, &mut self.state.alignment) {
            return Ok(Effect::None);
        }
        self.state.view.fly_to(point, None);
        Ok(self.select_location(point))
    }

    fn select_location(&mut self, point: GeoPoint) -> Effect {
        let event = self.event();
        let data = calculate_eclipse_data(point, event);
        let query = aux_query(event, point, &data);
        let reference_year = event.info.date.year();
        let event_id = event.id.clone();
        debug!(
            lat = point.lat,
            lng = point.lng,
            total = data.is_in_totality,
            distance_km = data.distance_from_center_km,
            "location selected"
        );

        self.state.report = Some(LocationReport {
            event_id,
            point,
            data,
        });
        self.state.selected_location = Some(point);
        self.state.popup = None;
        self.state.aux = AuxPanel {
            key: Some(query.key()),
            request: None,
            moon: AuxSlot::Loading,
            weather: AuxSlot::Loading,
        };
        Effect::FetchAux { query, reference_year }
    }

    fn aux_started(&mut self, request: Request, key: String) {
        if self.state.aux.key.as_deref() != Some(key.as_str()) {
            debug!(request = request.0, %key, "aux start for a different query ignored");
            return;
        }
        self.state.aux.request = Some(request);
    }

    fn aux_arrived(&mut self, update: AuxUpdate) {
        let current = self.state.aux.request == Some(update.request) && self.state.aux.key.as_deref() == Some(update.key.as_str());
        if !current {
            debug!(request = update.request.0, key = %update.key, "stale aux update dropped");
            return;
        }
        match update.payload {
            AuxPayload::Moon(data) => self.state.aux.moon = AuxSlot::settle(data),
            AuxPayload::Weather(stats) => self.state.aux.weather = AuxSlot::settle(stats),
        }
    }
}

/// Moon/weather query for `point`: the event's date at the local hour of maximum.
fn aux_query(event: &EclipseEvent, point: GeoPoint, data: &EclipseCalculationResult) -> AuxQuery {
    let hour = match data.estimated_max_time_local {
        Some(t) => t.hour(),
        None => event
            .info
            .alignment_reference
            .with_timezone(&event.local_offset())
            .hour() as u8,
    };
    AuxQuery::new(point, event.info.date, hour)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use streaming::{AuxKind, WeatherStats};

    fn store() -> Store {
        Store::new(Catalog::builtin().unwrap())
    }

    fn fetch_query(effect: Effect) -> (AuxQuery, i32) {
        match effect {
            Effect::FetchAux { query, reference_year } => (query, reference_year),
            Effect::None => panic!("expected an aux fetch"),
        }
    }

    fn a_coruna() -> GeoPoint {
        GeoPoint::new(43.3623, -8.4115)
    }

    #[test]
    fn starts_on_default_event() {
        let s = store();
        assert_eq!(s.state().event_id, "2026");
        assert_eq!(s.state().alignment.reference_time, s.event().info.alignment_reference);
        assert!(s.report().is_none());
    }

    #[test]
    fn selecting_location_reports_and_requests_aux() {
        let mut s = store();
        let (query, year) = fetch_query(s.dispatch(Action::SelectLocation { point: a_coruna() }).unwrap());
        assert_eq!(year, 2026);
        assert_eq!(query.hour, 20);
        assert_eq!(query.date.to_string(), "2026-08-12");

        let report = s.report().unwrap();
        assert!(report.data.is_in_totality);
        assert_eq!(report.data.max_time_label(), "20:28 CEST");
        assert_eq!(s.state().aux.moon, AuxSlot::Loading);
        assert_eq!(s.state().aux.key.as_deref(), Some(query.key().as_str()));
    }

    #[test]
    fn rejected_entry_keeps_previous_results() {
        let mut s = store();
        let _ = s.dispatch(Action::SelectLocation { point: a_coruna() }).unwrap();
        let before = s.state().clone();

        let err = s
            .dispatch(Action::EnterCoordinates {
                lat: "forty".into(),
                lng: "-3.7".into(),
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidCoordinates(_)));
        assert_eq!(s.state(), &before);
    }

    #[test]
    fn manual_entry_centres_and_computes() {
        let mut s = store();
        let effect = s
            .dispatch(Action::EnterCoordinates {
                lat: " 40.4168".into(),
                lng: "-3.7038 ".into(),
            })
            .unwrap();
        let (query, _) = fetch_query(effect);
        assert_eq!(query.point, GeoPoint::new(40.4168, -3.7038));
        assert_eq!(s.state().view.center(), GeoPoint::new(40.4168, -3.7038));
        assert!(!s.report().unwrap().data.is_in_totality);
    }

    #[test]
    fn switching_event_recomputes_report() {
        let mut s = store();
        let tarifa = GeoPoint::new(36.0128, -5.6045);
        let _ = s.dispatch(Action::SelectLocation { point: tarifa }).unwrap();
        assert!(!s.report().unwrap().data.is_in_totality);

        let (query, year) = fetch_query(s.dispatch(Action::SelectEvent { id: "2027".into() }).unwrap());
        assert_eq!(year, 2027);
        assert_eq!(query.hour, 10);
        let report = s.report().unwrap();
        assert_eq!(report.event_id, "2027");
        assert!(report.data.is_in_totality);
        assert_eq!(s.state().alignment.reference_time, s.event().info.alignment_reference);
    }

    #[test]
    fn stale_report_is_hidden() {
        let mut s = store();
        let _ = s.dispatch(Action::SelectLocation { point: a_coruna() }).unwrap();
        let mut state = s.state().clone();
        state.event_id = "2027".into();
        let resumed = Store::with_state(Catalog::builtin().unwrap(), state).unwrap();
        assert!(resumed.report().is_none());
    }

    #[test]
    fn unknown_event_and_city_are_errors() {
        let mut s = store();
        assert_eq!(
            s.dispatch(Action::SelectEvent { id: "1999".into() }),
            Err(StoreError::UnknownEvent("1999".into()))
        );
        assert_eq!(
            s.dispatch(Action::SelectCity { name: "Atlantis".into() }),
            Err(StoreError::UnknownCity("Atlantis".into()))
        );
        assert_eq!(s.dispatch(Action::SelectEvent { id: "2026".into() }), Ok(Effect::None));
    }

    #[test]
    fn map_click_selects_location() {
        let mut s = store();
        let _ = s.dispatch(Action::PointerDown { x: 200.0, y: 500.0, button: 0 }).unwrap();
        let effect = s.dispatch(Action::PointerUp { x: 200.0, y: 500.0 }).unwrap();
        let (query, _) = fetch_query(effect);
        assert_eq!(s.state().selected_location, Some(query.point));
    }

    #[test]
    fn drag_does_not_select() {
        let mut s = store();
        let _ = s.dispatch(Action::PointerDown { x: 200.0, y: 500.0, button: 0 }).unwrap();
        let _ = s.dispatch(Action::PointerMove { x: 260.0, y: 480.0 }).unwrap();
        assert_eq!(s.dispatch(Action::PointerUp { x: 260.0, y: 480.0 }).unwrap(), Effect::None);
        assert!(s.state().selected_location.is_none());
    }

    #[test]
    fn clicking_a_city_marker_opens_popup() {
        let mut s = store();
        let madrid = s.event().city("Madrid").unwrap().point;
        let at = s.state().view.geo_to_screen(madrid);
        let _ = s.dispatch(Action::PointerDown { x: at.x, y: at.y, button: 0 }).unwrap();
        assert_eq!(s.dispatch(Action::PointerUp { x: at.x, y: at.y }).unwrap(), Effect::None);
        match &s.state().popup {
            Some(PopupContent::City(c)) => assert_eq!(c.name, "Madrid"),
            other => panic!("expected Madrid popup, got {other:?}"),
        }
        assert!(s.state().selected_location.is_none());

        let _ = s.dispatch(Action::PointerDown { x: 10.0, y: 10.0, button: 0 }).unwrap();
        assert!(s.state().popup.is_none());
    }

    #[test]
    fn alignment_flow_through_clicks_and_city_list() {
        let mut s = store();
        assert_eq!(s.dispatch(Action::RequestPointB), Err(StoreError::ObserverMissing));

        let _ = s.dispatch(Action::RequestPointA).unwrap();
        assert_eq!(s.dispatch(Action::SelectCity { name: "Burgos".into() }).unwrap(), Effect::None);
        assert_eq!(s.state().alignment_mode, AlignmentMode::Idle);
        assert!(s.state().selected_location.is_none());
        let obs = s.alignment_result().unwrap();
        assert!(obs.bearing_a_to_b_deg.is_none());

        let _ = s.dispatch(Action::RequestPointB).unwrap();
        let _ = s.dispatch(Action::PointerDown { x: 700.0, y: 100.0, button: 0 }).unwrap();
        assert_eq!(s.dispatch(Action::PointerUp { x: 700.0, y: 100.0 }).unwrap(), Effect::None);
        let result = s.alignment_result().unwrap();
        let diff = result.angular_difference_deg.unwrap();
        assert!((0.0..=180.0).contains(&diff));

        let _ = s.dispatch(Action::SetTimeOffset { minutes: 500 }).unwrap();
        assert_eq!(s.state().alignment.time_offset_minutes(), 60);

        let _ = s.dispatch(Action::ClearAlignment).unwrap();
        assert!(s.alignment_result().is_none());
    }

    #[test]
    fn aux_updates_only_land_for_latest_request() {
        let mut s = store();
        let (first, _) = fetch_query(s.dispatch(Action::SelectLocation { point: a_coruna() }).unwrap());
        let _ = s
            .dispatch(Action::AuxStarted {
                request: Request(1),
                key: first.key(),
            })
            .unwrap();

        let madrid = GeoPoint::new(40.4168, -3.7038);
        let (second, _) = fetch_query(s.dispatch(Action::SelectLocation { point: madrid }).unwrap());
        let _ = s
            .dispatch(Action::AuxStarted {
                request: Request(2),
                key: second.key(),
            })
            .unwrap();

        // Late answer for the first click.
        let _ = s
            .dispatch(Action::AuxArrived {
                update: AuxUpdate {
                    request: Request(1),
                    key: first.key(),
                    payload: AuxPayload::Weather(Some(WeatherStats::default())),
                },
            })
            .unwrap();
        assert_eq!(s.state().aux.weather, AuxSlot::Loading);

        let _ = s
            .dispatch(Action::AuxArrived {
                update: AuxUpdate {
                    request: Request(2),
                    key: second.key(),
                    payload: AuxPayload::unavailable(AuxKind::Moon),
                },
            })
            .unwrap();
        assert_eq!(s.state().aux.moon, AuxSlot::Unavailable);
        assert_eq!(s.state().aux.weather, AuxSlot::Loading);
    }

    #[test]
    fn frame_carries_pins() {
        let mut s = store();
        let _ = s.dispatch(Action::SelectLocation { point: a_coruna() }).unwrap();
        let frame = s.frame();
        assert_eq!(frame.markers_of(|k| *k == MarkerKind::SelectedLocation).count(), 1);
        assert_eq!(frame.markers_of(|k| *k == MarkerKind::Observer).count(), 0);
    }

    #[test]
    fn view_and_layer_actions() {
        let mut s = store();
        let _ = s.dispatch(Action::ZoomIn).unwrap();
        assert_eq!(s.state().view.zoom(), 7.0);
        let _ = s.dispatch(Action::ResetView).unwrap();
        assert_eq!(s.state().view.zoom(), 6.0);
        let _ = s.dispatch(Action::ToggleTileStyle).unwrap();
        assert_eq!(s.state().tile_style, TileStyle::Satellite);
        let _ = s
            .dispatch(Action::SetLayer {
                layer: Layer::Cities,
                visible: false,
            })
            .unwrap();
        assert!(s.frame().markers_of(|k| matches!(k, MarkerKind::City { .. })).next().is_none());
        let _ = s
            .dispatch(Action::ToggleCategory {
                category: PoiCategory::Museum,
            })
            .unwrap();
        assert!(!s.state().categories.contains(PoiCategory::Museum));
    }

    #[test]
    fn state_and_actions_serialize() {
        let mut s = store();
        let _ = s.dispatch(Action::SelectLocation { point: a_coruna() }).unwrap();
        let json = serde_json::to_string(s.state()).unwrap();
        let back: AppState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.event_id, "2026");
        assert_eq!(back.selected_location, Some(a_coruna()));
        assert_eq!(back.categories, CategorySet::all());

        let action: Action = serde_json::from_str(r#"{"action":"select_event","id":"2027"}"#).unwrap();
        assert_eq!(action, Action::SelectEvent { id: "2027".into() });
    }
}
