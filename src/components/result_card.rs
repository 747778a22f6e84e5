use crossterm::event::KeyCode;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Paragraph},
};
use tui_dispatch::{DataResource, EventKind};

use super::{Component, is_quit_chord};
use crate::action::Action;
use crate::api::ConditionKind;
use crate::state::{AppState, ForecastResult, LOADING_PULSE_CYCLE_TICKS};

pub const LOADING_TEXT: &str = "Loading...";

/// Result card: loading line, error, or the fetched conditions
#[derive(Default)]
pub struct ResultCard;

pub struct ResultCardProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

impl Component<Action> for ResultCard {
    type Props<'a> = ResultCardProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }

        match event {
            EventKind::Key(key) if is_quit_chord(key) => Some(Action::Quit),
            EventKind::Key(key) => match key.code {
                KeyCode::Char('d') => Some(Action::DetailsToggle),
                KeyCode::Char('n') => Some(Action::SearchReset),
                KeyCode::Tab => Some(Action::UiFocusToggle),
                KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
                _ => None,
            },
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let state = props.state;
        let border = if props.is_focused {
            Color::Cyan
        } else {
            Color::DarkGray
        };
        let block = Block::bordered()
            .title(" Weather Forecast ")
            .border_style(Style::default().fg(border));

        let mut lines = Vec::new();
        match &state.forecast {
            DataResource::Loading => {
                lines.push(Line::from(Span::styled(
                    LOADING_TEXT,
                    pulse_style(state.tick_count),
                )));
            }
            DataResource::Loaded(forecast) => {
                lines.extend(forecast_lines(forecast));
                lines.push(Line::default());
                lines.push(action_hints(state.details_visible));
            }
            DataResource::Failed(error) => {
                lines.push(Line::from(Span::styled(
                    error.clone(),
                    Style::default().fg(Color::Red),
                )));
                lines.push(Line::default());
                lines.push(new_search_hint());
            }
            DataResource::Empty => lines.push(new_search_hint()),
        }

        let paragraph = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
    }
}

fn forecast_lines(forecast: &ForecastResult) -> Vec<Line<'static>> {
    let kind = ConditionKind::from_code(forecast.condition_code);
    let mut lines = vec![
        Line::from(Span::styled(
            forecast.place_line(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            forecast.condition_text.clone(),
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(
            forecast.temperature_line(),
            Style::default().fg(Color::LightBlue).bold(),
        )),
        Line::from(kind.glyph()),
    ];
    if let Some(updated) = &forecast.last_updated {
        lines.push(Line::from(Span::styled(
            format!("updated {updated}"),
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines
}

fn action_hints(details_visible: bool) -> Line<'static> {
    let details_label = if details_visible {
        " Hide Details"
    } else {
        " View Details"
    };
    Line::from(vec![
        Span::styled("d", Style::default().fg(Color::Cyan).bold()),
        Span::styled(details_label, Style::default().fg(Color::Gray)),
        Span::raw("   "),
        Span::styled("n", Style::default().fg(Color::Cyan).bold()),
        Span::styled(" New Search", Style::default().fg(Color::Gray)),
    ])
}

fn new_search_hint() -> Line<'static> {
    Line::from(vec![
        Span::styled("n", Style::default().fg(Color::Cyan).bold()),
        Span::styled(" New Search", Style::default().fg(Color::Gray)),
    ])
}

/// Half the cycle bright, half dim.
fn pulse_style(tick_count: u32) -> Style {
    let cycle = LOADING_PULSE_CYCLE_TICKS.max(2);
    if tick_count % cycle < cycle / 2 {
        Style::default().fg(Color::Gray)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}
