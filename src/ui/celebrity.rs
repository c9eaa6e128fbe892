use crate::app::App;
use crate::catalog::PosterState;
use crate::celebrity::{CelebrityView, stats_line};
use crate::format::{self, sanitize_terminal, truncate_str};
use crate::theme::Palette;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

pub fn render(app: &App, frame: &mut Frame, palette: &Palette) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(4),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    let hints: &[(&str, &str)] = &[("Tab", "Switch grid"), ("↑↓", "Navigate"), ("Enter", "Detail"), ("Esc", "Back")];
    frame.render_widget(super::status_bar(hints, &app.status_msg, palette), chunks[3]);

    let view = match &app.celebrity {
        Some(view) => view,
        None => return,
    };

    let (celebrity, active_grid, selected) = match view {
        CelebrityView::Loading { name } => {
            frame.render_widget(super::header(app, &sanitize_terminal(name), palette), chunks[0]);
            let loading = Paragraph::new("Loading...")
                .style(Style::default().fg(palette.muted))
                .alignment(Alignment::Center);
            frame.render_widget(loading, chunks[2]);
            return;
        }
        CelebrityView::Failed(message) => {
            frame.render_widget(super::header(app, "Celebrity", palette), chunks[0]);
            let error = Paragraph::new(message.as_str())
                .style(Style::default().fg(palette.error))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(palette.error))
                        .title(" Error "),
                );
            frame.render_widget(error, chunks[1].union(chunks[2]));
            return;
        }
        CelebrityView::Loaded { celebrity, grid, selected } => (celebrity, *grid, *selected),
    };

    frame.render_widget(super::header(app, &sanitize_terminal(&celebrity.name), palette), chunks[0]);

    let roles = if celebrity.roles.is_empty() {
        format::PLACEHOLDER.to_string()
    } else {
        celebrity.roles.join(", ")
    };
    let summary = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(" Roles   ", Style::default().fg(palette.muted)),
            Span::raw(sanitize_terminal(&roles)),
        ]),
        Line::from(vec![
            Span::styled(" Movies  ", Style::default().fg(palette.muted)),
            Span::styled(stats_line(celebrity), Style::default().fg(palette.accent)),
        ]),
    ])
    .block(Block::default().borders(Borders::BOTTOM).border_style(Style::default().fg(palette.muted)));
    frame.render_widget(summary, chunks[1]);

    let grids = CelebrityView::grids(celebrity);
    if grids.is_empty() {
        let empty = Paragraph::new("No movies on record")
            .style(Style::default().fg(palette.muted))
            .alignment(Alignment::Center);
        frame.render_widget(empty, chunks[2]);
        return;
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, grids.len() as u32); grids.len()])
        .split(chunks[2]);

    for ((kind, movies), column) in grids.iter().zip(columns.iter()) {
        let active = *kind == active_grid;
        let width = column.width as usize;
        let items: Vec<ListItem> = movies
            .iter()
            .map(|movie| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{} ", PosterState::for_movie(movie).badge()),
                        Style::default().fg(palette.accent),
                    ),
                    Span::styled(
                        format!("★ {:<4} ", format::format_rating(movie.rating.as_ref())),
                        Style::default().fg(palette.warn),
                    ),
                    Span::raw(truncate_str(&sanitize_terminal(&movie.title()), width.saturating_sub(20).max(8))),
                    Span::styled(
                        format!(" ({})", format::scalar_or_dash(movie.year.as_ref())),
                        Style::default().fg(palette.muted),
                    ),
                ]))
            })
            .collect();
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(if active { palette.accent } else { palette.muted }))
                    .title(format!(" {} [{}] ", kind.title(), movies.len())),
            )
            .highlight_style(
                Style::default()
                    .bg(palette.highlight_bg)
                    .fg(palette.highlight_fg)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▸ ");
        let mut state = ListState::default();
        if active {
            state.select(Some(selected));
        }
        frame.render_stateful_widget(list, *column, &mut state);
    }
}
