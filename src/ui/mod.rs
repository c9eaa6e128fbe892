pub mod auth_overlay;
mod catalog;
mod celebrity;
mod detail;
mod help;
mod people;
mod stats;

use crate::app::{App, View};
use crate::theme::Palette;
use ratatui::{
    Frame,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

/// Top-level render dispatch.
pub fn render(app: &App, frame: &mut Frame) {
    let palette = app.theme.theme().palette();
    frame.render_widget(
        Block::default().style(Style::default().fg(palette.fg).bg(palette.bg)),
        frame.area(),
    );

    match app.view {
        View::Catalog => catalog::render(app, frame, &palette),
        View::Detail => detail::render(app, frame, &palette),
        View::Celebrity => celebrity::render(app, frame, &palette),
        View::People => people::render(app, frame, &palette),
        View::Stats => stats::render(app, frame, &palette),
    }

    if let Some(overlay) = &app.auth {
        overlay.render(frame, &palette);
    }

    // Render help overlay on top if active
    if app.show_help {
        help::render(frame, &palette);
    }
}

/// Header line shared by every view: title on the left, greeting and theme toggle on the right.
fn header(app: &App, title: &str, palette: &Palette) -> Paragraph<'static> {
    let line = Line::from(vec![
        Span::styled(
            format!(" {title}"),
            Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled(app.greeting(), Style::default().fg(palette.fg)),
        Span::raw("   "),
        Span::styled(
            app.theme.icon().to_string(),
            Style::default().fg(palette.warn).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" t: {}", app.theme.theme().tooltip()),
            Style::default().fg(palette.muted),
        ),
    ]);
    Paragraph::new(line).block(
        Block::default()
            .borders(ratatui::widgets::Borders::BOTTOM)
            .border_style(Style::default().fg(palette.muted)),
    )
}

/// Status bar: key hints followed by the current status message.
fn status_bar(hints: &[(&str, &str)], status: &str, palette: &Palette) -> Paragraph<'static> {
    let mut spans = Vec::with_capacity(hints.len() * 2 + 1);
    for (key, label) in hints {
        spans.push(Span::styled(
            format!(" {key}"),
            Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(format!(" {label} ")));
    }
    spans.push(Span::styled(format!(" {status}"), Style::default().fg(palette.muted)));
    Paragraph::new(Line::from(spans))
}
