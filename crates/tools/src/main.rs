use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use chrono::{DateTime, FixedOffset};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use catalog::{Catalog, PoiCategory};
use compute::{AlignmentState, nearest_city, sun_position};
use foundation::math::Viewport;
use foundation::parse_lat_lng_pair;
use scene::{Action, Effect, MapView, Store};
use streaming::{AuxDispatcher, FetchConfig, HttpMoonSource, OpenMeteoArchive, TileStyle};
use tools::config::{Overrides, Settings};
use tools::report;

#[derive(Parser, Debug)]
#[command(author, version, about = "Path-of-totality explorer for total solar eclipses")]
struct Args {
    /// Catalog JSON replacing the built-in events (env: ECLIPSE_CATALOG)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Event id; the catalog default when omitted
    #[arg(long, global = true)]
    event: Option<String>,

    /// Basemap style: dark or satellite (env: ECLIPSE_TILE_STYLE)
    #[arg(long, global = true)]
    tile_style: Option<TileStyle>,

    /// Per-request timeout for moon and weather lookups (env: ECLIPSE_FETCH_TIMEOUT_MS)
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List catalog events
    Events,

    /// Event details
    Info,

    /// Estimate the eclipse at a manually entered location
    Query {
        #[arg(long, allow_hyphen_values = true)]
        lat: String,
        #[arg(long, allow_hyphen_values = true)]
        lng: String,
        /// Also fetch moon phase and historical weather
        #[arg(long)]
        aux: bool,
    },

    /// List cities, optionally filtered by a name fragment
    Cities {
        #[arg(long)]
        search: Option<String>,
    },

    /// Closest catalog city to a point ("lat,lng")
    Nearest {
        #[arg(allow_hyphen_values = true)]
        point: String,
    },

    /// Sun position at a point ("lat,lng")
    Sun {
        #[arg(allow_hyphen_values = true)]
        point: String,
        /// RFC 3339 instant; the event's alignment reference when omitted
        #[arg(long)]
        at: Option<String>,
    },

    /// Compare the sun azimuth seen from A with the bearing A to B
    Align {
        #[arg(long, allow_hyphen_values = true)]
        a: String,
        #[arg(long, allow_hyphen_values = true)]
        b: Option<String>,
        /// Minutes relative to the reference time, clamped to +/-60
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        offset: i32,
        /// Search the offset range for the closest alignment
        #[arg(long)]
        best: bool,
    },

    /// Basemap tiles covering a view
    Tiles {
        #[command(flatten)]
        view: ViewArgs,
    },

    /// Points of interest, optionally one category
    Pois {
        #[arg(long)]
        category: Option<PoiCategory>,
    },

    /// Climatological cloud outlook per weather zone
    Outlook,

    /// Overlay geometry for a view as JSON
    Overlay {
        #[command(flatten)]
        view: ViewArgs,
    },

    /// Apply a JSON array of actions and print the resulting state
    Replay {
        file: PathBuf,
        /// Run moon and weather lookups the actions ask for
        #[arg(long)]
        aux: bool,
    },
}

#[derive(clap::Args, Debug)]
struct ViewArgs {
    /// View centre ("lat,lng"); the default Iberian view when omitted
    #[arg(long, allow_hyphen_values = true)]
    center: Option<String>,
    #[arg(long)]
    zoom: Option<f64>,
    #[arg(long, default_value_t = 1024.0)]
    width: f64,
    #[arg(long, default_value_t = 768.0)]
    height: f64,
}

impl ViewArgs {
    fn build(&self) -> Result<MapView> {
        let mut view = MapView::new(Viewport::new(self.width, self.height));
        if let Some(raw) = &self.center {
            let center = parse_lat_lng_pair(raw).with_context(|| format!("bad --center {raw:?}"))?;
            view.fly_to(center, self.zoom);
        } else if let Some(zoom) = self.zoom {
            view.set_zoom(zoom);
        }
        Ok(view)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let settings = Settings::from_env(Overrides {
        catalog: args.catalog.clone(),
        tile_style: args.tile_style,
        timeout_ms: args.timeout_ms,
    })?;

    let catalog = match &settings.catalog {
        Some(path) => Catalog::load(path).with_context(|| format!("loading catalog {}", path.display()))?,
        None => Catalog::builtin()?,
    };
    debug!(events = catalog.events().len(), "catalog ready");

    let mut store = Store::new(catalog);
    if let Some(id) = &args.event {
        let _ = store.dispatch(Action::SelectEvent { id: id.clone() })?;
    }
    let _ = store.dispatch(Action::SetTileStyle {
        style: settings.fetch.tile_style,
    })?;

    let json = args.json;
    match args.command {
        Command::Events => {
            let default_id = store.catalog().default_event().id.clone();
            if json {
                let ids: Vec<&str> = store.catalog().ids().collect();
                return print_json(&ids);
            }
            for event in store.catalog().events() {
                let mark = if event.id == default_id { "*" } else { " " };
                println!("{mark} {:<6} {}  {}", event.id, event.info.date, event.name);
            }
        }
        Command::Info => {
            let event = store.event();
            if json {
                return print_json(&event.info);
            }
            println!("{}", report::event_summary(event));
        }
        Command::Query { lat, lng, aux } => {
            let effect = store.dispatch(Action::EnterCoordinates { lat, lng })?;
            if aux {
                run_aux(&mut store, effect, &settings.fetch).await?;
            }
            let state = store.state();
            let location = store.report().ok_or_else(|| anyhow!("no report for the entered location"))?;
            if json {
                return print_json(&serde_json::json!({
                    "report": location,
                    "moon": state.aux.moon.ready(),
                    "weather": state.aux.weather.ready(),
                }));
            }
            println!("{}", report::location_report(location.point, &location.data));
            if aux {
                println!("{}", report::moon_report(state.aux.moon.ready()));
                println!("{}", report::weather_report(state.aux.weather.ready()));
            }
        }
        Command::Cities { search } => {
            let event = store.event();
            let cities = match &search {
                Some(q) => event.search_cities(q),
                None => event.cities.iter().collect(),
            };
            if json {
                return print_json(&cities);
            }
            for city in cities {
                println!("{}", report::city_line(city, &event.info.timezone.label));
            }
        }
        Command::Nearest { point } => {
            let point = parse_lat_lng_pair(&point)?;
            let event = store.event();
            let nearest = nearest_city(point, &event.cities).ok_or_else(|| anyhow!("event {} has no cities", event.id))?;
            if json {
                return print_json(&serde_json::json!({
                    "city": nearest.city,
                    "distance_km": nearest.distance_km,
                }));
            }
            println!("{:.0} km", nearest.distance_km);
            println!("{}", report::city_line(nearest.city, &event.info.timezone.label));
        }
        Command::Sun { point, at } => {
            let point = parse_lat_lng_pair(&point)?;
            let instant = match at {
                Some(raw) => parse_instant(&raw)?,
                None => store.event().info.alignment_reference,
            };
            let sun = sun_position(point, &instant);
            if json {
                return print_json(&sun);
            }
            println!("{}", report::sun_line(&sun));
        }
        Command::Align { a, b, offset, best } => {
            let mut state = AlignmentState::new(store.event().info.alignment_reference);
            state.point_a = Some(parse_lat_lng_pair(&a)?);
            state.point_b = b.as_deref().map(parse_lat_lng_pair).transpose()?;
            state.set_time_offset_minutes(offset);
            if best {
                let (minutes, diff) = state
                    .best_offset()
                    .ok_or_else(|| anyhow!("--best needs both --a and --b"))?;
                info!(minutes, diff, "closest alignment in range");
                state.set_time_offset_minutes(minutes);
            }
            let result = state.result().ok_or_else(|| anyhow!("observer missing"))?;
            if json {
                return print_json(&result);
            }
            println!("offset {:+} min", state.time_offset_minutes());
            println!("{}", report::alignment_report(&result));
        }
        Command::Tiles { view } => {
            let view = view.build()?;
            let style = store.state().tile_style;
            let tiles = view.visible_tiles();
            if json {
                return print_json(&tiles);
            }
            for tile in tiles {
                println!(
                    "{:>8.1} {:>8.1}  {}",
                    tile.screen.x,
                    tile.screen.y,
                    style.tile_url(tile.coord)
                );
            }
            println!("{}", style.attribution());
        }
        Command::Pois { category } => {
            let event = store.event();
            let pois: Vec<_> = event
                .points_of_interest_matching(|c| category.is_none_or(|wanted| c == wanted))
                .collect();
            if json {
                return print_json(&pois);
            }
            for poi in pois {
                println!("{}", report::poi_line(poi));
            }
        }
        Command::Outlook => {
            let event = store.event();
            if json {
                return print_json(&event.weather_zones);
            }
            for zone in &event.weather_zones {
                println!("{}", report::zone_line(zone));
            }
        }
        Command::Overlay { view } => {
            let view = view.build()?;
            let center = view.center();
            let _ = store.dispatch(Action::Resize {
                width: view.viewport().width,
                height: view.viewport().height,
            })?;
            let _ = store.dispatch(Action::FlyTo {
                point: center,
                zoom: Some(view.zoom()),
            })?;
            print_json(&store.frame())?;
        }
        Command::Replay { file, aux } => {
            let raw = std::fs::read_to_string(&file).with_context(|| format!("reading {}", file.display()))?;
            let actions: Vec<Action> = serde_json::from_str(&raw).context("parsing actions")?;
            for (i, action) in actions.into_iter().enumerate() {
                let effect = store.dispatch(action).with_context(|| format!("action #{i}"))?;
                if aux {
                    run_aux(&mut store, effect, &settings.fetch).await?;
                }
            }
            print_json(store.state())?;
        }
    }

    Ok(())
}

/// Carry out a store effect and feed the results back in.
async fn run_aux(store: &mut Store, effect: Effect, config: &FetchConfig) -> Result<()> {
    let Effect::FetchAux { query, reference_year } = effect else {
        return Ok(());
    };
    let moon = Arc::new(HttpMoonSource::new(config));
    let weather = Arc::new(OpenMeteoArchive::new(config));
    let (mut dispatcher, mut updates) = AuxDispatcher::new(moon, weather, config.timeout());

    let key = query.key();
    let request = dispatcher.request(query, reference_year);
    let _ = store.dispatch(Action::AuxStarted { request, key })?;

    // One update per lookup; timeouts arrive as unavailable payloads.
    for _ in 0..2 {
        let Some(update) = updates.recv().await else {
            bail!("aux dispatcher closed early");
        };
        let _ = store.dispatch(Action::AuxArrived { update })?;
    }
    Ok(())
}

fn parse_instant(raw: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw).with_context(|| format!("expected an RFC 3339 instant, got {raw:?}"))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
