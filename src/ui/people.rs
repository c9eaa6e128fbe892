use crate::app::App;
use crate::celebrity::RoleFilter;
use crate::detail::Region;
use crate::format::{self, sanitize_terminal};
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
    let index = &app.people;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    frame.render_widget(super::header(app, "Celebrities", palette), chunks[0]);

    // Role tabs
    let mut tabs = vec![Span::styled(" Role: ", Style::default().fg(palette.muted))];
    for role in [RoleFilter::All, RoleFilter::Director, RoleFilter::Actor] {
        let style = if role == index.role {
            Style::default().fg(palette.accent).add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(palette.muted)
        };
        tabs.push(Span::styled(format!(" {} ", role.label()), style));
    }
    frame.render_widget(Paragraph::new(Line::from(tabs)), chunks[1]);

    let hints: &[(&str, &str)] = &[("Tab", "Role"), ("↑↓", "Navigate"), ("Enter", "Open"), ("Esc", "Back")];
    frame.render_widget(super::status_bar(hints, &app.status_msg, palette), chunks[3]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.accent));
    let title = format!(" {} ", index.role.label());

    let entries = match &index.entries {
        Region::Loading => {
            let loading = Paragraph::new("Loading...")
                .style(Style::default().fg(palette.muted))
                .alignment(Alignment::Center)
                .block(block.title(title));
            frame.render_widget(loading, chunks[2]);
            return;
        }
        Region::Failed(message) => {
            let error = Paragraph::new(message.as_str())
                .style(Style::default().fg(palette.error))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(block.title(title).border_style(Style::default().fg(palette.error)));
            frame.render_widget(error, chunks[2]);
            return;
        }
        Region::Ready(entries) => entries,
    };

    if entries.is_empty() {
        let empty = Paragraph::new("No celebrities on record")
            .style(Style::default().fg(palette.muted))
            .alignment(Alignment::Center)
            .block(block.title(title));
        frame.render_widget(empty, chunks[2]);
        return;
    }

    let items: Vec<ListItem> = entries
        .iter()
        .map(|entry| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("[{}] ", format::initials(&entry.name)),
                    Style::default().fg(palette.warn).add_modifier(Modifier::BOLD),
                ),
                Span::raw(sanitize_terminal(&entry.name)),
                Span::styled(
                    format!("  {}", format::or_dash(entry.role.as_deref())),
                    Style::default().fg(palette.muted),
                ),
            ]))
        })
        .collect();
    let list = List::new(items)
        .block(block.title(format!(" {} [{}] ", index.role.label(), entries.len())))
        .highlight_style(
            Style::default()
                .bg(palette.highlight_bg)
                .fg(palette.highlight_fg)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");
    let mut state = ListState::default();
    state.select(Some(index.selected));
    frame.render_stateful_widget(list, chunks[2], &mut state);
}
