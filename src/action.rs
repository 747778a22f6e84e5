//! Actions: user intents and fetch settlements

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::state::{Coordinate, ForecastResult};

/// Application actions with automatic category inference
#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    // ===== Search category =====
    /// Location input text changed
    SearchQueryChange(String),

    /// Submit the typed location (triggers async fetch)
    SearchSubmit(String),

    /// "New Search": hide result and details, back to the input card
    SearchReset,

    // ===== Map category =====
    /// Coordinate picked with the mouse (triggers async fetch)
    MapSelect(Coordinate),

    /// Move the keyboard crosshair by whole steps (lat rows, lon columns)
    MapCursorMove { dlat: i8, dlon: i8 },

    /// Fetch the forecast under the crosshair
    MapCursorSelect,

    MapZoomIn,

    MapZoomOut,

    // ===== Forecast category =====
    /// Result: forecast decoded for request `request_id`
    ForecastDidLoad {
        request_id: u64,
        forecast: ForecastResult,
    },

    /// Result: fetch for request `request_id` failed
    ForecastDidError { request_id: u64, message: String },

    // ===== Details category =====
    /// Show/hide the details grid (only with a result loaded)
    DetailsToggle,

    // ===== UI category =====
    /// Move key focus between the card and the map
    UiFocusToggle,

    /// Force a re-render (for cursor movement, etc.)
    Render,

    // ===== Uncategorized (global) =====
    /// Periodic tick for the loading pulse
    Tick,

    /// Exit the application
    Quit,
}
