use crate::theme::Palette;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Global",
        &[
            ("?", "Toggle this help"),
            ("Ctrl+C", "Quit application"),
            ("Esc", "Back / cancel"),
            ("t", "Toggle dark/light theme"),
            ("L / U / O", "Log in / register / log out"),
            ("S", "Statistics"),
            ("P", "Celebrity index"),
        ],
    ),
    (
        "Catalog",
        &[
            ("↑/k ↓/j", "Navigate movies"),
            ("Enter", "Open movie detail"),
            ("/", "Keyword search"),
            ("a", "AI search"),
            ("f", "Focus filters (←→ change, Enter apply, r reset)"),
            ("p", "Focus pagination (←→ choose, Enter load)"),
            ("[ / ]", "Previous / next page"),
            ("q", "Quit"),
        ],
    ),
    (
        "Movie Detail",
        &[
            ("Tab", "Cycle info / cast / reviews / stars / comment"),
            ("↑/↓", "Scroll, or move in the cast list"),
            ("Enter", "Open celebrity (cast) / submit (comment)"),
            ("1-5", "Set rating (1 again clears it)"),
            ("c", "Write a review"),
        ],
    ),
    (
        "Celebrity",
        &[
            ("Tab", "Switch director / actor grid"),
            ("↑/↓", "Navigate movies"),
            ("Enter", "Open movie detail"),
        ],
    ),
    (
        "Celebrity Index",
        &[
            ("Tab", "Cycle all / directors / actors"),
            ("↑/↓", "Navigate celebrities"),
            ("Enter", "Open celebrity"),
        ],
    ),
    ("Statistics", &[("r", "Reload")]),
];

pub fn render(frame: &mut Frame, palette: &Palette) {
    let area = centered_rect(70, 80, frame.area());

    // Clear the area behind the popup
    frame.render_widget(Clear, area);

    let mut help_text = vec![Line::from("")];
    for (title, keys) in SECTIONS {
        help_text.push(Line::from(Span::styled(
            format!("  {title}"),
            Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
        )));
        for (key, description) in *keys {
            help_text.push(Line::from(vec![
                Span::styled(format!("    {key:<10}"), Style::default().fg(palette.warn)),
                Span::raw(*description),
            ]));
        }
        help_text.push(Line::from(""));
    }

    let help = Paragraph::new(help_text)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.accent))
                .title(" Help: Keybindings ")
                .title_bottom(Line::from(" Press any key to close ").style(Style::default().fg(palette.muted))),
        )
        .style(Style::default().fg(palette.fg).bg(palette.bg));

    frame.render_widget(help, area);
}

/// Create a centered rectangle using percentage of parent area.
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
