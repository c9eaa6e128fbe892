use crate::app::App;
use crate::detail::Region;
use crate::format::truncate_str;
use crate::theme::Palette;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::Line,
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
};

const BAR_WIDTH: u16 = 7;

pub fn render(app: &App, frame: &mut Frame, palette: &Palette) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(5), Constraint::Length(1)])
        .split(area);

    frame.render_widget(super::header(app, "Statistics", palette), chunks[0]);
    let hints: &[(&str, &str)] = &[("r", "Reload"), ("Esc", "Back"), ("?", "Help")];
    frame.render_widget(super::status_bar(hints, &app.status_msg, palette), chunks[2]);

    let charts = match &app.stats {
        Region::Loading => {
            let loading = Paragraph::new("Loading...")
                .style(Style::default().fg(palette.muted))
                .alignment(Alignment::Center);
            frame.render_widget(loading, chunks[1]);
            return;
        }
        Region::Failed(message) => {
            let error = Paragraph::new(message.as_str())
                .style(Style::default().fg(palette.error))
                .alignment(Alignment::Center);
            frame.render_widget(error, chunks[1]);
            return;
        }
        Region::Ready(charts) => charts,
    };

    if charts.is_empty() {
        let empty = Paragraph::new("No statistics available")
            .style(Style::default().fg(palette.muted))
            .alignment(Alignment::Center);
        frame.render_widget(empty, chunks[1]);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, charts.len() as u32); charts.len()])
        .split(chunks[1]);

    for (series, row) in charts.iter().zip(rows.iter()) {
        let bars: Vec<Bar> = series
            .labels
            .iter()
            .zip(&series.values)
            .map(|(label, value)| {
                Bar::default()
                    .value(*value)
                    .label(Line::from(truncate_str(label, BAR_WIDTH as usize)))
                    .style(Style::default().fg(palette.accent))
                    .value_style(Style::default().fg(palette.bg).bg(palette.accent).add_modifier(Modifier::BOLD))
            })
            .collect();
        let chart = BarChart::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(palette.muted))
                    .title(format!(" {} ", series.title)),
            )
            .data(BarGroup::default().bars(&bars))
            .bar_width(BAR_WIDTH)
            .bar_gap(1)
            .max(series.max().max(1));
        frame.render_widget(chart, *row);
    }
}
