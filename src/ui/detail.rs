use crate::app::{App, InputMode};
use crate::catalog::PosterState;
use crate::detail::{DetailFocus, DetailState, Region, info_fields};
use crate::format::{self, sanitize_terminal};
use crate::review::{MAX_STARS, ReviewList, SubmitState};
use crate::theme::Palette;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

pub fn render(app: &App, frame: &mut Frame, palette: &Palette) {
    let area = frame.area();
    let Some(detail) = &app.detail else {
        return;
    };

    // Layout: header(2) + body(min) + status(1)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(8), Constraint::Length(1)])
        .split(area);

    let title = match detail.movie.ready() {
        Some(movie) => sanitize_terminal(&movie.title()),
        None => format!("Movie #{}", detail.movie_id),
    };
    frame.render_widget(super::header(app, &title, palette), chunks[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(10)])
        .split(columns[0]);
    render_info(app, detail, frame, left[0], palette);
    render_cast(detail, frame, left[1], palette);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(7)])
        .split(columns[1]);
    render_reviews(detail, frame, right[0], palette);
    render_form(app, detail, frame, right[1], palette);

    let hints: &[(&str, &str)] = match detail.focus {
        DetailFocus::Comment if app.input_mode == InputMode::Comment => &[("Enter", "Submit"), ("Esc", "Stop typing")],
        DetailFocus::Stars => &[("1-5", "Rate"), ("←→", "Move"), ("Space", "Toggle"), ("Tab", "Next")],
        DetailFocus::Cast => &[("↑↓", "Select"), ("Enter", "Celebrity"), ("Tab", "Next"), ("Esc", "Back")],
        _ => &[("Tab", "Focus"), ("↑↓", "Scroll"), ("c", "Review"), ("Esc", "Back"), ("?", "Help")],
    };
    frame.render_widget(super::status_bar(hints, &app.status_msg, palette), chunks[2]);
}

fn border(focused: bool, palette: &Palette) -> Style {
    Style::default().fg(if focused { palette.accent } else { palette.muted })
}

fn region_notice<T>(region: &Region<T>, palette: &Palette) -> Option<Paragraph<'static>> {
    match region {
        Region::Loading => Some(Paragraph::new("Loading...").style(Style::default().fg(palette.muted))),
        Region::Failed(message) => Some(
            Paragraph::new(message.clone())
                .style(Style::default().fg(palette.error))
                .wrap(Wrap { trim: true }),
        ),
        Region::Ready(_) => None,
    }
}

fn render_info(app: &App, detail: &DetailState, frame: &mut Frame, area: Rect, palette: &Palette) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border(detail.focus == DetailFocus::Info, palette))
        .title(" Movie ");

    let Some(movie) = detail.movie.ready() else {
        if let Some(notice) = region_notice(&detail.movie, palette) {
            frame.render_widget(notice.block(block), area);
        }
        return;
    };

    let mut lines = Vec::new();
    if let Some(original) = movie.original_title.as_deref().filter(|t| !t.trim().is_empty()) {
        lines.push(Line::from(Span::styled(
            format!(" {}", sanitize_terminal(original)),
            Style::default().fg(palette.muted).add_modifier(Modifier::ITALIC),
        )));
    }
    let poster = match &detail.poster {
        PosterState::Remote(url) => url.clone(),
        PosterState::Placeholder => app
            .config
            .placeholder_poster_url
            .clone()
            .unwrap_or_else(|| "[ no poster ]".to_string()),
        PosterState::Text => format!("[ {} ]", sanitize_terminal(&movie.title())),
    };
    lines.push(Line::from(vec![
        Span::styled(format!(" {:<10}", "Poster"), Style::default().fg(palette.muted)),
        Span::styled(poster, Style::default().fg(palette.accent)),
    ]));
    for (label, value) in info_fields(movie) {
        lines.push(Line::from(vec![
            Span::styled(format!(" {label:<10}"), Style::default().fg(palette.muted)),
            Span::styled(sanitize_terminal(&value), Style::default().fg(palette.fg)),
        ]));
    }
    if let Some(synopsis) = movie.synopsis() {
        lines.push(Line::from(""));
        lines.push(Line::from(format!(" {}", sanitize_terminal(synopsis))));
    }

    let info = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((detail.info_scroll, 0))
        .block(block);
    frame.render_widget(info, area);
}

fn render_cast(detail: &DetailState, frame: &mut Frame, area: Rect, palette: &Palette) {
    let focused = detail.focus == DetailFocus::Cast;
    let items: Vec<ListItem> = detail
        .cast
        .iter()
        .map(|entry| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("[{}] ", entry.badge()),
                    Style::default().fg(palette.warn).add_modifier(Modifier::BOLD),
                ),
                Span::raw(sanitize_terminal(&entry.name)),
                Span::styled(format!("  {}", entry.role.label()), Style::default().fg(palette.muted)),
            ]))
        })
        .collect();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border(focused, palette))
                .title(" Cast "),
        )
        .highlight_style(Style::default().bg(palette.highlight_bg).fg(palette.highlight_fg))
        .highlight_symbol("▸ ");
    let mut state = ListState::default();
    if focused && !detail.cast.is_empty() {
        state.select(Some(detail.cast_selected));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_reviews(detail: &DetailState, frame: &mut Frame, area: Rect, palette: &Palette) {
    let total = detail.reviews.ready().map(|list| list.total);
    let title = match total {
        Some(total) => format!(" Reviews ({total}) "),
        None => " Reviews ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border(detail.focus == DetailFocus::Reviews, palette))
        .title(title);

    let Some(list) = detail.reviews.ready() else {
        if let Some(notice) = region_notice(&detail.reviews, palette) {
            frame.render_widget(notice.block(block), area);
        }
        return;
    };

    let body = Paragraph::new(review_lines(list, palette))
        .wrap(Wrap { trim: false })
        .scroll((detail.review_scroll, 0))
        .block(block);
    frame.render_widget(body, area);
}

fn review_lines(list: &ReviewList, palette: &Palette) -> Vec<Line<'static>> {
    if list.items.is_empty() {
        return vec![Line::from(Span::styled(
            " No reviews yet",
            Style::default().fg(palette.muted),
        ))];
    }
    let mut lines = Vec::new();
    for review in &list.items {
        let when = review
            .created_at
            .as_deref()
            .map(format::format_timestamp)
            .unwrap_or_default();
        lines.push(Line::from(vec![
            Span::styled(format!(" #{} ", review.number()), Style::default().fg(palette.muted)),
            Span::styled(
                sanitize_terminal(review.author()),
                Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {}", format::star_string(review.user_rating.as_ref())),
                Style::default().fg(palette.warn),
            ),
            Span::styled(format!("  {when}"), Style::default().fg(palette.muted)),
        ]));
        lines.push(Line::from(format!(
            "   {}",
            sanitize_terminal(review.comment.as_deref().unwrap_or_default())
        )));
        lines.push(Line::from(""));
    }
    lines
}

fn render_form(app: &App, detail: &DetailState, frame: &mut Frame, area: Rect, palette: &Palette) {
    let form = &detail.form;
    let stars = &form.stars;
    let focused = matches!(detail.focus, DetailFocus::Stars | DetailFocus::Comment);

    let mut star_spans = vec![Span::raw(" ")];
    for star in 1..=MAX_STARS {
        let glyph = if stars.is_lit(star) { "★" } else { "☆" };
        let mut style = if !stars.is_enabled() {
            Style::default().fg(palette.muted)
        } else if stars.is_lit(star) {
            Style::default().fg(palette.warn)
        } else {
            Style::default().fg(palette.fg)
        };
        if detail.focus == DetailFocus::Stars && stars.cursor() == star {
            style = style.add_modifier(Modifier::REVERSED);
        }
        star_spans.push(Span::styled(format!("{glyph} "), style));
    }
    star_spans.push(Span::styled(format!("  {}", stars.hint()), Style::default().fg(palette.muted)));

    let typing = app.input_mode == InputMode::Comment;
    let comment_style = if typing {
        Style::default().fg(palette.warn)
    } else {
        Style::default().fg(palette.fg)
    };
    let comment = if form.comment.is_empty() && !typing {
        Span::styled("press c to write a review", Style::default().fg(palette.muted))
    } else {
        Span::styled(format!("{}{}", form.comment, if typing { "▏" } else { "" }), comment_style)
    };

    let status = match &form.state {
        SubmitState::Error(message) => Span::styled(format!(" {message}"), Style::default().fg(palette.error)),
        SubmitState::Success(message) => Span::styled(format!(" {message}"), Style::default().fg(palette.ok)),
        _ => Span::styled(
            format!(" {}", form.status_text().unwrap_or_default()),
            Style::default().fg(palette.muted),
        ),
    };

    let mut lines = vec![Line::from(star_spans), Line::from(vec![Span::raw(" "), comment]), Line::from(""), Line::from(status)];
    if app.session.is_none() {
        lines.push(Line::from(Span::styled(
            " Log in (L) to rate and review",
            Style::default().fg(palette.muted),
        )));
    }

    let title = if form.is_submitting() { " Your review (submitting) " } else { " Your review " };
    let panel = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border(focused, palette))
            .title(title),
    );
    frame.render_widget(panel, area);
}
