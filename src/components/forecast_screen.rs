use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    StatusBar, StatusBarHint, StatusBarProps, StatusBarSection, StatusBarStyle,
};

use super::details_panel::DETAILS_HEIGHT;
use super::{
    Component, DetailsPanel, DetailsPanelProps, ResultCard, ResultCardProps, SearchCard,
    SearchCardProps, WorldMap, WorldMapProps,
};
use crate::action::Action;
use crate::state::AppState;

const CARD_WIDTH: u16 = 64;
const CARD_HEIGHT: u16 = 9;

/// Where each part of the screen goes for a given state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenLayout {
    pub card: Rect,
    pub details: Option<Rect>,
    pub map: Rect,
    pub status: Rect,
}

impl ScreenLayout {
    pub fn compute(area: Rect, state: &AppState) -> Self {
        let show_details = state.details_visible && state.has_forecast();
        let details_height = if show_details { DETAILS_HEIGHT } else { 0 };

        let rows = Layout::vertical([
            Constraint::Length(CARD_HEIGHT),
            Constraint::Length(details_height),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

        let [card] = Layout::horizontal([Constraint::Max(CARD_WIDTH)])
            .flex(Flex::Center)
            .areas(rows[0]);
        let details = if show_details {
            let [details] = Layout::horizontal([Constraint::Max(CARD_WIDTH)])
                .flex(Flex::Center)
                .areas(rows[1]);
            Some(details)
        } else {
            None
        };

        Self {
            card,
            details,
            map: rows[2],
            status: rows[3],
        }
    }
}

/// Props for ForecastScreen - read-only view of state
pub struct ForecastScreenProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// The whole screen: search or result card, details grid, map, help bar
#[derive(Default)]
pub struct ForecastScreen {
    search: SearchCard,
    result: ResultCard,
    details: DetailsPanel,
    map: WorldMap,
}

impl ForecastScreen {
    pub fn new() -> Self {
        Self::default()
    }

    fn status_hints(state: &AppState) -> Vec<StatusBarHint<'static>> {
        if state.map_focused() {
            vec![
                StatusBarHint::new("click/enter", "pick"),
                StatusBarHint::new("arrows", "move"),
                StatusBarHint::new("+/-", "zoom"),
                StatusBarHint::new("tab", "back"),
                StatusBarHint::new("q", "quit"),
            ]
        } else if state.result_visible {
            vec![
                StatusBarHint::new("d", "details"),
                StatusBarHint::new("n", "new search"),
                StatusBarHint::new("tab", "map"),
                StatusBarHint::new("q", "quit"),
            ]
        } else {
            vec![
                StatusBarHint::new("enter", "search"),
                StatusBarHint::new("tab", "map"),
                StatusBarHint::new("ctrl+c", "quit"),
            ]
        }
    }
}

impl Component<Action> for ForecastScreen {
    type Props<'a> = ForecastScreenProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        let state = props.state;
        let map_props = WorldMapProps {
            viewport: &state.viewport,
            marker: state.last_coordinate,
            cursor: state.map_cursor,
            is_focused: props.is_focused && state.map_focused(),
        };

        // Mouse goes to the map whatever has key focus
        if matches!(event, EventKind::Mouse(_)) || state.map_focused() {
            return self
                .map
                .handle_event(event, map_props)
                .into_iter()
                .collect::<Vec<_>>();
        }

        let card_focused = props.is_focused;
        if state.result_visible {
            self.result
                .handle_event(
                    event,
                    ResultCardProps {
                        state,
                        is_focused: card_focused,
                    },
                )
                .into_iter()
                .collect()
        } else {
            self.search
                .handle_event(
                    event,
                    SearchCardProps {
                        query: &state.query,
                        is_focused: card_focused,
                        on_change: Action::SearchQueryChange,
                        on_submit: Action::SearchSubmit,
                    },
                )
                .into_iter()
                .collect()
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: ForecastScreenProps<'_>) {
        let state = props.state;
        let layout = ScreenLayout::compute(area, state);
        let card_focused = props.is_focused && !state.map_focused();

        if state.result_visible {
            self.result.render(
                frame,
                layout.card,
                ResultCardProps {
                    state,
                    is_focused: card_focused,
                },
            );
        } else {
            self.search.render(
                frame,
                layout.card,
                SearchCardProps {
                    query: &state.query,
                    is_focused: card_focused,
                    on_change: Action::SearchQueryChange,
                    on_submit: Action::SearchSubmit,
                },
            );
        }

        if let (Some(details_area), Some(forecast)) = (layout.details, state.loaded_forecast()) {
            self.details
                .render(frame, details_area, DetailsPanelProps { forecast });
        }

        self.map.render(
            frame,
            layout.map,
            WorldMapProps {
                viewport: &state.viewport,
                marker: state.last_coordinate,
                cursor: state.map_cursor,
                is_focused: props.is_focused && state.map_focused(),
            },
        );

        let hints = Self::status_hints(state);
        let mut status_bar = StatusBar::new();
        <StatusBar as Component<Action>>::render(
            &mut status_bar,
            frame,
            layout.status,
            StatusBarProps {
                left: StatusBarSection::empty(),
                center: StatusBarSection::hints(&hints),
                right: StatusBarSection::empty(),
                style: StatusBarStyle::default(),
                is_focused: false,
            },
        );
    }
}
