//! Application state - single source of truth

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tui_dispatch::DataResource;

use crate::geo::{MapViewport, round_coord};

/// A point on the globe in decimal degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Wire form used by the weather API: `"{lat},{lon}"`.
    pub fn query_param(&self) -> String {
        format!("{},{}", self.lat, self.lon)
    }

    /// Marker popup text, values shown verbatim.
    pub fn label(&self) -> String {
        format!("Latitude: {}, Longitude: {}", self.lat, self.lon)
    }

    /// Move by whole degrees, clamped to the valid range and rounded to the
    /// map's 2-decimal grid.
    pub fn offset(&self, dlat: f64, dlon: f64) -> Self {
        Self {
            lat: round_coord((self.lat + dlat).clamp(-90.0, 90.0)),
            lon: round_coord((self.lon + dlon).clamp(-180.0, 180.0)),
        }
    }
}

/// What the user asked for: a place name or a point picked on the map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub enum LocationQuery {
    Text(String),
    Coordinate(Coordinate),
}

impl LocationQuery {
    /// Value of the `q` parameter.
    pub fn as_param(&self) -> String {
        match self {
            LocationQuery::Text(text) => text.clone(),
            LocationQuery::Coordinate(coord) => coord.query_param(),
        }
    }

    /// Coordinate lookups ask for a single forecast day; text lookups leave
    /// the service default.
    pub fn days(&self) -> Option<u8> {
        match self {
            LocationQuery::Text(_) => None,
            LocationQuery::Coordinate(_) => Some(1),
        }
    }
}

impl fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationQuery::Text(text) => write!(f, "{text:?}"),
            LocationQuery::Coordinate(coord) => write!(f, "({})", coord.query_param()),
        }
    }
}

/// Current conditions decoded from the weather API
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ForecastResult {
    pub name: String,
    pub region: String,
    pub country: String,
    pub condition_text: String,
    pub condition_icon: String,
    pub condition_code: Option<u16>,
    pub temp_c: f64,
    pub temp_f: f64,
    pub feelslike_c: f64,
    pub feelslike_f: f64,
    pub humidity: u8,
    pub wind_kph: f64,
    pub wind_dir: String,
    pub vis_km: f64,
    pub last_updated: Option<String>,
}

impl ForecastResult {
    pub fn heading(&self) -> String {
        format!("{}, {}", self.name, self.country)
    }

    /// Heading with the region between name and country, when there is one
    pub fn place_line(&self) -> String {
        let region = self.region.trim();
        if region.is_empty() || region == self.name {
            self.heading()
        } else {
            format!("{}, {}, {}", self.name, region, self.country)
        }
    }

    pub fn temperature_line(&self) -> String {
        format!("{}°C", self.temp_c)
    }
}

/// Which half of the screen receives key input
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Focus {
    #[default]
    Search,
    Map,
}

impl Focus {
    pub fn toggle(&self) -> Self {
        match self {
            Focus::Search => Focus::Map,
            Focus::Map => Focus::Search,
        }
    }
}

/// Tick rate of the loading pulse.
pub const LOADING_PULSE_TICK_MS: u64 = 120;
pub const LOADING_PULSE_CYCLE_TICKS: u32 = 8;

/// Where the map crosshair starts: the Indian subcontinent.
pub const DEFAULT_MAP_CURSOR: Coordinate = Coordinate::new(20.0, 78.0);

/// Application state - everything the UI needs to render
#[derive(Clone, Debug, tui_dispatch::DebugState, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    // --- Search ---
    /// Text in the location input
    #[debug(section = "Search", label = "Query")]
    pub query: String,

    /// Forecast for the latest request: Loading while it is outstanding,
    /// then Loaded or Failed. Kept across "New Search".
    #[debug(section = "Search", label = "Forecast", debug_fmt)]
    pub forecast: DataResource<ForecastResult>,

    /// Token of the most recently issued fetch; settlements carrying any
    /// other token are dropped
    #[debug(section = "Search", label = "Latest request")]
    pub latest_request: u64,

    // --- Panels ---
    #[debug(section = "Panels", label = "Result visible")]
    pub result_visible: bool,

    #[debug(section = "Panels", label = "Details visible")]
    pub details_visible: bool,

    #[debug(section = "Panels", label = "Focus", debug_fmt)]
    pub focus: Focus,

    // --- Map ---
    /// Marker position, set by the last map selection
    #[debug(section = "Map", label = "Marker", debug_fmt)]
    pub last_coordinate: Option<Coordinate>,

    #[debug(section = "Map", label = "Cursor", debug_fmt)]
    pub map_cursor: Coordinate,

    #[debug(section = "Map", label = "Viewport", debug_fmt)]
    pub viewport: MapViewport,

    /// Loading pulse frame counter
    #[debug(skip)]
    pub tick_count: u32,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            query: String::new(),
            forecast: DataResource::Empty,
            latest_request: 0,
            result_visible: false,
            details_visible: false,
            focus: Focus::default(),
            last_coordinate: None,
            map_cursor: DEFAULT_MAP_CURSOR,
            viewport: MapViewport::world(),
            tick_count: 0,
        }
    }

    /// State seeded with a location name, as passed on the command line
    pub fn with_query(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::new()
        }
    }

    pub fn has_forecast(&self) -> bool {
        self.forecast.is_loaded()
    }

    /// Loaded forecast, if the latest request succeeded
    pub fn loaded_forecast(&self) -> Option<&ForecastResult> {
        self.forecast.data()
    }

    pub fn is_loading(&self) -> bool {
        self.forecast.is_loading()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.forecast.error()
    }

    /// Whether the map should draw its crosshair.
    pub fn map_focused(&self) -> bool {
        self.focus == Focus::Map
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
