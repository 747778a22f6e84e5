pub mod details_panel;
pub mod forecast_screen;
pub mod result_card;
pub mod search_card;
pub mod world_map;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use details_panel::{DetailsPanel, DetailsPanelProps, detail_fields};
pub use forecast_screen::{ForecastScreen, ForecastScreenProps, ScreenLayout};
pub use result_card::{LOADING_TEXT, ResultCard, ResultCardProps};
pub use search_card::{SearchCard, SearchCardProps};
pub use world_map::{WorldMap, WorldMapProps};

/// Ctrl+C quits from anywhere, the text input included.
pub fn is_quit_chord(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}
