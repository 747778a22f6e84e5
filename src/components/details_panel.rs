use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

use super::Component;
use crate::action::Action;
use crate::state::ForecastResult;

/// Rows needed for the 3x2 grid of bordered cells.
pub const DETAILS_HEIGHT: u16 = 9;

/// The six detail cells, in display order.
pub fn detail_fields(forecast: &ForecastResult) -> [(&'static str, String); 6] {
    [
        (
            "Temperature",
            format!("{}°C / {}°F", forecast.temp_c, forecast.temp_f),
        ),
        (
            "Feels Like",
            format!("{}°C / {}°F", forecast.feelslike_c, forecast.feelslike_f),
        ),
        ("Humidity", format!("{}%", forecast.humidity)),
        ("Wind Speed", format!("{} km/h", forecast.wind_kph)),
        ("Wind Direction", forecast.wind_dir.clone()),
        ("Visibility", format!("{} km", forecast.vis_km)),
    ]
}

#[derive(Default)]
pub struct DetailsPanel;

pub struct DetailsPanelProps<'a> {
    pub forecast: &'a ForecastResult,
}

impl Component<Action> for DetailsPanel {
    type Props<'a> = DetailsPanelProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let rows = Layout::vertical([Constraint::Length(3); 3]).split(area);
        let fields = detail_fields(props.forecast);

        for (row_idx, pair) in fields.chunks(2).enumerate() {
            let cols =
                Layout::horizontal([Constraint::Percentage(50); 2]).split(rows[row_idx]);
            for (col_idx, (title, value)) in pair.iter().enumerate() {
                let block = Block::bordered()
                    .title(Span::styled(*title, Style::default().bold()))
                    .border_style(Style::default().fg(Color::DarkGray));
                let value = Paragraph::new(Line::from(value.as_str()).centered()).block(block);
                frame.render_widget(value, cols[col_idx]);
            }
        }
    }
}
