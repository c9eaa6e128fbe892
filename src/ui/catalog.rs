use crate::app::{App, InputMode};
use crate::catalog::{AiPanel, CatalogFocus, CatalogSource, FilterRow, PageControl, PosterState};
use crate::format::{self, truncate_str};
use crate::model::Movie;
use crate::theme::Palette;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

const FILTER_PANEL_WIDTH: u16 = 34;

pub fn render(app: &App, frame: &mut Frame, palette: &Palette) {
    let area = frame.area();
    let catalog = &app.catalog;
    let controls = catalog.controls();

    let ai_height = match &catalog.ai_panel {
        AiPanel::Hidden => 0,
        AiPanel::Ready { generated_sql: Some(_), .. } => 5,
        _ => 3,
    };
    let pager_height = if controls.is_empty() { 0 } else { 1 };

    // Layout: header(2) + search(3) + ai(opt) + body(min) + pager(opt) + status(1)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(ai_height),
            Constraint::Min(5),
            Constraint::Length(pager_height),
            Constraint::Length(1),
        ])
        .split(area);

    let title = match &catalog.pagination {
        Some(p) if catalog.source == CatalogSource::Browse => format!("MovieMind   [{} movies]", p.total),
        _ => format!("MovieMind   [{} shown]", catalog.movies.len()),
    };
    frame.render_widget(super::header(app, &title, palette), chunks[0]);

    // ── Search bar ──
    let editing = matches!(app.input_mode, InputMode::Search | InputMode::AiQuery);
    let bar_style = if editing {
        Style::default().fg(palette.warn)
    } else {
        Style::default().fg(palette.muted)
    };
    let (label, text) = match app.input_mode {
        InputMode::Search => (" Search (Enter to run, Esc to cancel): ", app.search_input.as_str()),
        InputMode::AiQuery => (" Ask AI (Enter to run, Esc to cancel): ", app.ai_input.as_str()),
        _ => match &catalog.source {
            CatalogSource::Browse => (" / search   a ask AI ", ""),
            CatalogSource::Keyword(k) => (" Results for: ", k.as_str()),
            CatalogSource::Ai(q) => (" AI results for: ", q.as_str()),
        },
    };
    let search_bar = Paragraph::new(format!("{label}{text}"))
        .style(bar_style)
        .block(Block::default().borders(Borders::ALL).border_style(bar_style).title(" Search "));
    frame.render_widget(search_bar, chunks[1]);
    if editing {
        let cursor_x = chunks[1].x + 1 + unicode_width::UnicodeWidthStr::width(format!("{label}{text}").as_str()) as u16;
        frame.set_cursor_position((cursor_x.min(chunks[1].right().saturating_sub(2)), chunks[1].y + 1));
    }

    // ── AI interpretation ──
    if ai_height > 0 {
        let lines = match &catalog.ai_panel {
            AiPanel::Loading => vec![Line::from(Span::styled(
                " Thinking...",
                Style::default().fg(palette.muted),
            ))],
            AiPanel::Ready { interpretation, generated_sql } => {
                let mut lines = vec![Line::from(vec![
                    Span::styled(" Understood as: ", Style::default().fg(palette.muted)),
                    Span::raw(format::sanitize_terminal(interpretation)),
                ])];
                if let Some(sql) = generated_sql {
                    lines.push(Line::from(vec![
                        Span::styled(" Query: ", Style::default().fg(palette.muted)),
                        Span::styled(format::sanitize_terminal(sql), Style::default().fg(palette.ok)),
                    ]));
                }
                lines
            }
            AiPanel::Failed(message) => vec![Line::from(Span::styled(
                format!(" {message}"),
                Style::default().fg(palette.error),
            ))],
            AiPanel::Hidden => Vec::new(),
        };
        let panel = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.muted))
                .title(" AI search "),
        );
        frame.render_widget(panel, chunks[2]);
    }

    // ── Body: grid + filters ──
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(FILTER_PANEL_WIDTH)])
        .split(chunks[3]);

    let grid_focused = catalog.focus == CatalogFocus::Grid;
    let grid_title = if catalog.loading { " Movies (loading...) " } else { " Movies " };
    let grid_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if grid_focused { palette.accent } else { palette.muted }))
        .title(grid_title);

    match &catalog.message {
        Some(message) => {
            let style = if catalog.failed {
                Style::default().fg(palette.error)
            } else {
                Style::default().fg(palette.muted)
            };
            let empty = Paragraph::new(message.as_str())
                .style(style)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(grid_block);
            frame.render_widget(empty, body[0]);
        }
        None => {
            let width = body[0].width as usize;
            let items: Vec<ListItem> = catalog.movies.iter().map(|m| movie_card(m, width, palette)).collect();
            let list = List::new(items)
                .block(grid_block)
                .highlight_style(
                    Style::default()
                        .bg(palette.highlight_bg)
                        .fg(palette.highlight_fg)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol("▸ ");
            let mut state = ListState::default();
            state.select(Some(catalog.selected));
            frame.render_stateful_widget(list, body[0], &mut state);
        }
    }

    render_filters(app, frame, body[1], palette);

    // ── Pagination ──
    if !controls.is_empty() {
        let focused = catalog.focus == CatalogFocus::Pagination;
        let mut spans = vec![Span::raw(" ")];
        for (i, control) in controls.iter().enumerate() {
            let mut style = match control {
                PageControl::Number { active: true, .. } => Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                _ => Style::default().fg(palette.fg),
            };
            if focused && i == catalog.page_cursor {
                style = style.bg(palette.highlight_bg).fg(palette.highlight_fg);
            }
            spans.push(Span::styled(format!(" {} ", control.label()), style));
        }
        if let Some(p) = &catalog.pagination {
            spans.push(Span::styled(
                format!("   page {} of {}", catalog.page.page, p.total_pages),
                Style::default().fg(palette.muted),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), chunks[4]);
    }

    let hints: &[(&str, &str)] = match catalog.focus {
        CatalogFocus::Grid => &[("↑↓", "Navigate"), ("Enter", "Detail"), ("/", "Search"), ("a", "AI"), ("f", "Filters"), ("p", "Pages"), ("?", "Help")],
        CatalogFocus::Filters => &[("↑↓", "Row"), ("←→", "Change"), ("Enter", "Apply"), ("r", "Reset"), ("Esc", "Back")],
        CatalogFocus::Pagination => &[("←→", "Choose"), ("Enter", "Load"), ("Esc", "Back")],
    };
    frame.render_widget(super::status_bar(hints, &app.status_msg, palette), chunks[5]);
}

fn movie_card(movie: &Movie, width: usize, palette: &Palette) -> ListItem<'static> {
    let rank = movie.rank.map(|r| format!("{r:>4} ")).unwrap_or_else(|| "     ".to_string());
    let year = format::scalar_or_dash(movie.year.as_ref());
    let rating = format::format_rating(movie.rating.as_ref());
    let genres = format::join_or_dash(&movie.genre_list());
    let title = format::sanitize_terminal(&movie.title());
    let line = Line::from(vec![
        Span::styled(rank, Style::default().fg(palette.muted)),
        Span::styled(
            format!("{} ", PosterState::for_movie(movie).badge()),
            Style::default().fg(palette.accent),
        ),
        Span::styled(format!("★ {rating:<4} "), Style::default().fg(palette.warn)),
        Span::styled(truncate_str(&title, width.saturating_sub(42).max(10)), Style::default().fg(palette.fg)),
        Span::styled(format!("  ({year})  "), Style::default().fg(palette.muted)),
        Span::styled(truncate_str(&genres, 20), Style::default().fg(palette.muted)),
    ]);
    ListItem::new(line)
}

fn render_filters(app: &App, frame: &mut Frame, area: ratatui::layout::Rect, palette: &Palette) {
    let catalog = &app.catalog;
    let focused = catalog.focus == CatalogFocus::Filters;
    let mut lines = vec![Line::from("")];
    for row in FilterRow::ALL {
        let selected = focused && catalog.controls.row == row;
        let marker = if selected { "▸" } else { " " };
        let value_style = if selected {
            Style::default().fg(palette.highlight_fg).bg(palette.highlight_bg)
        } else {
            Style::default().fg(palette.fg)
        };
        lines.push(Line::from(vec![
            Span::styled(format!(" {marker} {:<11}", row.label()), Style::default().fg(palette.muted)),
            Span::styled(format!("‹ {} ›", catalog.controls.value_label(row)), value_style),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!(" Active: {}", catalog.filters.describe()),
        Style::default().fg(palette.accent),
    )));

    let panel = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if focused { palette.accent } else { palette.muted }))
            .title(" Filters (f) "),
    );
    frame.render_widget(panel, area);
}
