//! Reducer - pure function: (state, action) -> DispatchResult

use tracing::{debug, info, warn};
use tui_dispatch::{DataResource, DispatchResult};

use crate::action::Action;
use crate::effect::Effect;
use crate::state::{AppState, Coordinate, Focus, LocationQuery};

/// The reducer handles all state transitions
pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        // ===== Search actions =====
        Action::SearchQueryChange(query) => {
            if state.query == query {
                return DispatchResult::unchanged();
            }
            state.query = query;
            DispatchResult::changed()
        }

        Action::SearchSubmit(query) => {
            state.query = query.clone();
            begin_fetch(state, LocationQuery::Text(query))
        }

        Action::SearchReset => {
            if !state.result_visible && !state.details_visible && state.focus == Focus::Search {
                return DispatchResult::unchanged();
            }
            state.result_visible = false;
            state.details_visible = false;
            state.focus = Focus::Search;
            DispatchResult::changed()
        }

        // ===== Map actions =====
        Action::MapSelect(coord) => select_coordinate(state, coord),

        Action::MapCursorMove { dlat, dlon } => {
            let (lat_step, lon_step) = state.viewport.cursor_step();
            let moved = state
                .map_cursor
                .offset(f64::from(dlat) * lat_step, f64::from(dlon) * lon_step);
            if moved == state.map_cursor {
                return DispatchResult::unchanged();
            }
            state.map_cursor = moved;
            if !state.viewport.bounds().contains(moved) {
                state.viewport.center = moved;
            }
            DispatchResult::changed()
        }

        Action::MapCursorSelect => {
            let coord = state.map_cursor;
            select_coordinate(state, coord)
        }

        Action::MapZoomIn => {
            let zoomed = state.viewport.zoomed_in(state.map_cursor);
            if zoomed == state.viewport {
                return DispatchResult::unchanged();
            }
            state.viewport = zoomed;
            DispatchResult::changed()
        }

        Action::MapZoomOut => {
            let zoomed = state.viewport.zoomed_out();
            if zoomed == state.viewport {
                return DispatchResult::unchanged();
            }
            state.viewport = zoomed;
            DispatchResult::changed()
        }

        // ===== Forecast actions =====
        Action::ForecastDidLoad {
            request_id,
            forecast,
        } => {
            if request_id != state.latest_request {
                warn!(
                    request_id,
                    latest = state.latest_request,
                    "dropping stale forecast"
                );
                return DispatchResult::unchanged();
            }
            info!(request_id, place = %forecast.heading(), "forecast loaded");
            state.forecast = DataResource::Loaded(forecast);
            DispatchResult::changed()
        }

        Action::ForecastDidError {
            request_id,
            message,
        } => {
            if request_id != state.latest_request {
                warn!(
                    request_id,
                    latest = state.latest_request,
                    "dropping stale fetch failure"
                );
                return DispatchResult::unchanged();
            }
            state.forecast = DataResource::Failed(message);
            DispatchResult::changed()
        }

        // ===== Details actions =====
        Action::DetailsToggle => {
            if !state.has_forecast() {
                return DispatchResult::unchanged();
            }
            state.details_visible = !state.details_visible;
            DispatchResult::changed()
        }

        // ===== UI actions =====
        Action::UiFocusToggle => {
            state.focus = state.focus.toggle();
            DispatchResult::changed()
        }

        Action::Render => DispatchResult::changed(),

        // ===== Global actions =====
        Action::Tick => {
            if state.is_loading() {
                state.tick_count = state.tick_count.wrapping_add(1);
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn select_coordinate(state: &mut AppState, coord: Coordinate) -> DispatchResult<Effect> {
    debug!(lat = coord.lat, lon = coord.lon, "map selection");
    state.last_coordinate = Some(coord);
    state.map_cursor = coord;
    begin_fetch(state, LocationQuery::Coordinate(coord))
}

/// Shared transition for every fetch trigger: issue a fresh request token,
/// clear the previous outcome and show the result panel in its loading form.
fn begin_fetch(state: &mut AppState, query: LocationQuery) -> DispatchResult<Effect> {
    state.latest_request = state.latest_request.wrapping_add(1);
    state.forecast = DataResource::Loading;
    state.result_visible = true;
    state.details_visible = false;
    state.tick_count = 0;

    let request_id = state.latest_request;
    info!(request_id, query = %query, "fetch issued");
    DispatchResult::changed_with(Effect::FetchForecast { request_id, query })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ForecastResult;

    fn paris() -> ForecastResult {
        ForecastResult {
            name: "Paris".into(),
            country: "France".into(),
            condition_text: "Cloudy".into(),
            temp_c: 18.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_submit_begins_fetch() {
        let mut state = AppState {
            forecast: DataResource::Failed("old".into()),
            details_visible: true,
            ..Default::default()
        };

        let result = reducer(&mut state, Action::SearchSubmit("Paris".into()));

        assert!(result.changed);
        assert!(state.is_loading());
        assert!(state.result_visible);
        assert!(!state.details_visible);
        assert_eq!(state.error_message(), None);
        assert_eq!(state.loaded_forecast(), None);
        assert_eq!(state.latest_request, 1);
        assert_eq!(
            result.effects,
            vec![Effect::FetchForecast {
                request_id: 1,
                query: LocationQuery::Text("Paris".into()),
            }]
        );
    }

    #[test]
    fn test_empty_query_is_still_sent() {
        let mut state = AppState::default();
        let result = reducer(&mut state, Action::SearchSubmit(String::new()));
        assert_eq!(
            result.effects,
            vec![Effect::FetchForecast {
                request_id: 1,
                query: LocationQuery::Text(String::new()),
            }]
        );
    }

    #[test]
    fn test_map_select_records_marker() {
        let mut state = AppState::default();
        let coord = Coordinate::new(51.5, -0.12);

        let result = reducer(&mut state, Action::MapSelect(coord));

        assert_eq!(state.last_coordinate, Some(coord));
        assert_eq!(state.map_cursor, coord);
        assert!(state.result_visible);
        assert!(state.is_loading());
        assert_eq!(
            result.effects,
            vec![Effect::FetchForecast {
                request_id: 1,
                query: LocationQuery::Coordinate(coord),
            }]
        );
    }

    #[test]
    fn test_load_for_latest_request_is_applied() {
        let mut state = AppState::default();
        reducer(&mut state, Action::SearchSubmit("Paris".into()));

        let result = reducer(
            &mut state,
            Action::ForecastDidLoad {
                request_id: 1,
                forecast: paris(),
            },
        );

        assert!(result.changed);
        assert!(!state.is_loading());
        assert_eq!(state.loaded_forecast(), Some(&paris()));
        assert_eq!(state.error_message(), None);
    }

    #[test]
    fn test_stale_settlements_are_dropped() {
        let mut state = AppState::default();
        reducer(&mut state, Action::SearchSubmit("Paris".into()));
        reducer(&mut state, Action::MapSelect(Coordinate::new(1.0, 2.0)));
        assert_eq!(state.latest_request, 2);

        let result = reducer(
            &mut state,
            Action::ForecastDidLoad {
                request_id: 1,
                forecast: paris(),
            },
        );
        assert!(!result.changed);
        assert!(state.is_loading());
        assert_eq!(state.loaded_forecast(), None);

        let result = reducer(
            &mut state,
            Action::ForecastDidError {
                request_id: 1,
                message: "late".into(),
            },
        );
        assert!(!result.changed);
        assert!(state.is_loading());
        assert_eq!(state.error_message(), None);
    }

    #[test]
    fn test_error_clears_loading_and_keeps_panel() {
        let mut state = AppState::default();
        reducer(&mut state, Action::SearchSubmit("Nowhere".into()));

        reducer(
            &mut state,
            Action::ForecastDidError {
                request_id: 1,
                message: "boom".into(),
            },
        );

        assert!(!state.is_loading());
        assert!(state.result_visible);
        assert_eq!(state.error_message(), Some("boom"));
        assert_eq!(state.loaded_forecast(), None);
    }

    #[test]
    fn test_details_toggle_requires_forecast() {
        let mut state = AppState::default();
        let result = reducer(&mut state, Action::DetailsToggle);
        assert!(!result.changed);
        assert!(!state.details_visible);

        state.forecast = DataResource::Loaded(paris());
        reducer(&mut state, Action::DetailsToggle);
        assert!(state.details_visible);
        reducer(&mut state, Action::DetailsToggle);
        assert!(!state.details_visible);
    }

    #[test]
    fn test_details_toggle_ignored_after_failure() {
        let mut state = AppState {
            forecast: DataResource::Failed("boom".into()),
            result_visible: true,
            ..Default::default()
        };
        let result = reducer(&mut state, Action::DetailsToggle);
        assert!(!result.changed);
        assert!(!state.details_visible);
    }

    #[test]
    fn test_search_reset_is_idempotent() {
        let mut state = AppState {
            forecast: DataResource::Loaded(paris()),
            result_visible: true,
            details_visible: true,
            focus: Focus::Map,
            ..Default::default()
        };

        let first = reducer(&mut state, Action::SearchReset);
        let after_once = state.clone();
        let second = reducer(&mut state, Action::SearchReset);

        assert!(first.changed);
        assert!(!second.changed);
        assert!(!state.result_visible);
        assert!(!state.details_visible);
        assert_eq!(state.focus, after_once.focus);
        // the last result survives a reset
        assert_eq!(state.loaded_forecast(), Some(&paris()));
    }

    #[test]
    fn test_cursor_move_and_select() {
        let mut state = AppState {
            map_cursor: Coordinate::new(0.0, 0.0),
            ..Default::default()
        };

        reducer(&mut state, Action::MapCursorMove { dlat: 1, dlon: -2 });
        assert_eq!(state.map_cursor, Coordinate::new(9.0, -18.0));

        let result = reducer(&mut state, Action::MapCursorSelect);
        assert_eq!(state.last_coordinate, Some(Coordinate::new(9.0, -18.0)));
        assert!(matches!(
            result.effects.as_slice(),
            [Effect::FetchForecast {
                query: LocationQuery::Coordinate(_),
                ..
            }]
        ));
    }

    #[test]
    fn test_cursor_at_edge_is_unchanged() {
        let mut state = AppState {
            map_cursor: Coordinate::new(90.0, 0.0),
            ..Default::default()
        };
        let result = reducer(&mut state, Action::MapCursorMove { dlat: 1, dlon: 0 });
        assert!(!result.changed);
    }

    #[test]
    fn test_zoom_follows_cursor() {
        let mut state = AppState {
            map_cursor: Coordinate::new(48.85, 2.35),
            ..Default::default()
        };
        reducer(&mut state, Action::MapZoomIn);
        assert_eq!(state.viewport.zoom, 1);
        assert_eq!(state.viewport.center, Coordinate::new(48.85, 2.35));

        reducer(&mut state, Action::MapZoomOut);
        assert_eq!(state.viewport.zoom, 0);
        let result = reducer(&mut state, Action::MapZoomOut);
        assert!(!result.changed);
    }

    #[test]
    fn test_tick_only_while_loading() {
        let mut state = AppState::default();
        assert!(!reducer(&mut state, Action::Tick).changed);

        state.forecast = DataResource::Loading;
        assert!(reducer(&mut state, Action::Tick).changed);
        assert_eq!(state.tick_count, 1);
    }
}
