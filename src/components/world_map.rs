use crossterm::event::{KeyCode, MouseButton, MouseEventKind};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style, Stylize},
    symbols::Marker,
    text::Span,
    widgets::{
        Block,
        canvas::{Canvas, Map, MapResolution},
    },
};
use tui_dispatch::EventKind;

use super::{Component, is_quit_chord};
use crate::action::Action;
use crate::geo::{MapViewport, Projection};
use crate::state::Coordinate;

pub const MARKER_SYMBOL: &str = "\u{25cf}";
pub const CURSOR_SYMBOL: &str = "+";

/// Click-sensitive world map. Remembers where it was last drawn so mouse
/// positions can be projected back to coordinates.
#[derive(Default)]
pub struct WorldMap {
    projection: Option<Projection>,
}

pub struct WorldMapProps<'a> {
    pub viewport: &'a MapViewport,
    pub marker: Option<Coordinate>,
    pub cursor: Coordinate,
    pub is_focused: bool,
}

impl WorldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Projection of the last render, if any.
    pub fn projection(&self) -> Option<Projection> {
        self.projection
    }

    fn handle_key(code: KeyCode) -> Option<Action> {
        match code {
            KeyCode::Up => Some(Action::MapCursorMove { dlat: 1, dlon: 0 }),
            KeyCode::Down => Some(Action::MapCursorMove { dlat: -1, dlon: 0 }),
            KeyCode::Left => Some(Action::MapCursorMove { dlat: 0, dlon: -1 }),
            KeyCode::Right => Some(Action::MapCursorMove { dlat: 0, dlon: 1 }),
            KeyCode::Enter | KeyCode::Char(' ') => Some(Action::MapCursorSelect),
            KeyCode::Char('+') | KeyCode::Char('=') => Some(Action::MapZoomIn),
            KeyCode::Char('-') => Some(Action::MapZoomOut),
            KeyCode::Tab => Some(Action::UiFocusToggle),
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
            _ => None,
        }
    }
}

impl Component<Action> for WorldMap {
    type Props<'a> = WorldMapProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        match event {
            // Clicks land regardless of key focus
            EventKind::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => self
                .projection
                .and_then(|projection| projection.coordinate_at(mouse.column, mouse.row))
                .map(Action::MapSelect),
            EventKind::Scroll { delta, .. } if props.is_focused => match (*delta).signum() {
                -1 => Some(Action::MapZoomIn),
                1 => Some(Action::MapZoomOut),
                _ => None,
            },
            EventKind::Key(key) if props.is_focused => {
                if is_quit_chord(key) {
                    Some(Action::Quit)
                } else {
                    Self::handle_key(key.code)
                }
            }
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let bounds = props.viewport.bounds();
        let border = if props.is_focused {
            Color::Cyan
        } else {
            Color::DarkGray
        };
        let block = Block::bordered()
            .title(" Map - click a point ")
            .border_style(Style::default().fg(border));
        let inner = block.inner(area);
        let projection = Projection::new(inner, bounds);
        self.projection = Some(projection);

        let cell_lon = if inner.width > 0 {
            (bounds.east - bounds.west) / f64::from(inner.width)
        } else {
            0.0
        };
        let marker = props.marker;
        let label = marker.map(|coord| format!(" {} ", coord.label()));
        // Label sits right of the marker unless that would run past the edge
        let label_lon = match (marker, &label) {
            (Some(coord), Some(text)) => {
                let width = text.chars().count() as u16;
                let flip = projection
                    .cell_for(coord)
                    .is_some_and(|(col, _)| col + 1 + width > inner.right());
                if flip {
                    coord.lon - f64::from(width + 1) * cell_lon
                } else {
                    coord.lon + cell_lon
                }
            }
            _ => 0.0,
        };
        let cursor = props.cursor;
        let show_cursor = props.is_focused;

        let canvas = Canvas::default()
            .block(block)
            .marker(Marker::Braille)
            .x_bounds([bounds.west, bounds.east])
            .y_bounds([bounds.south, bounds.north])
            .paint(move |ctx| {
                ctx.draw(&Map {
                    color: Color::Green,
                    resolution: MapResolution::High,
                });
                ctx.layer();
                if show_cursor {
                    ctx.print(
                        cursor.lon,
                        cursor.lat,
                        Span::styled(CURSOR_SYMBOL, Style::default().fg(Color::Yellow).bold()),
                    );
                }
                if let (Some(coord), Some(label)) = (marker, label.clone()) {
                    ctx.print(
                        coord.lon,
                        coord.lat,
                        Span::styled(MARKER_SYMBOL, Style::default().fg(Color::Red).bold()),
                    );
                    ctx.print(
                        label_lon,
                        coord.lat,
                        Span::styled(label, Style::default().fg(Color::Black).bg(Color::White)),
                    );
                }
            });
        frame.render_widget(canvas, area);
    }
}
