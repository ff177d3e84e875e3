//! Header banner: app name, version, and the server being talked to.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::ui::theme::styles;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const TITLE: &str = "Chatbot ";
const HELP_HINT: &str = " /help ";
const SERVER_LABEL: &str = "serveur : ";

/// Truncate to `max_chars` from the end with ellipsis. Single pass over chars.
fn truncate_end(s: &str, max_chars: usize) -> String {
    let count = s.chars().count();
    if count <= max_chars {
        return s.to_string();
    }
    let take = max_chars.saturating_sub(1);
    let skip = count.saturating_sub(take);
    format!("…{}", s.chars().skip(skip).collect::<String>())
}

pub fn render(f: &mut Frame, server_url: &str, area: Rect) {
    // Total width available, minus 2 for leading "  " indent.
    let total = (area.width as usize).saturating_sub(2);
    // Number of horizontal dashes between the corners (╭ and ╮ take 1 each).
    let dash_count = total.saturating_sub(2);
    // Inner content width = between the "│ " and " │".
    let inner = total.saturating_sub(4);

    let top_line = format!("╭{}╮", "─".repeat(dash_count));
    let bottom_line = format!("╰{}╯", "─".repeat(dash_count));

    let version = format!("(v{VERSION})");
    let title_len = TITLE.chars().count() + version.chars().count();
    let pad = inner.saturating_sub(title_len + HELP_HINT.chars().count());

    let url_max = inner.saturating_sub(SERVER_LABEL.chars().count());
    let url_show = truncate_end(server_url, url_max);
    let url_pad = inner.saturating_sub(SERVER_LABEL.chars().count() + url_show.chars().count());

    let border = styles::border();
    let lines = vec![
        Line::from(vec![Span::styled("  ", border), Span::styled(top_line, border)]),
        Line::from(vec![
            Span::styled("  │ ", border),
            Span::styled(TITLE, styles::accent_bold()),
            Span::styled(version, styles::text_dim()),
            Span::styled(" ".repeat(pad), Style::default()),
            Span::styled(HELP_HINT, styles::muted()),
            Span::styled(" │", border),
        ]),
        Line::from(vec![
            Span::styled("  │", border),
            Span::styled(" ".repeat(dash_count), Style::default()),
            Span::styled("│", border),
        ]),
        Line::from(vec![
            Span::styled("  │ ", border),
            Span::styled(SERVER_LABEL, styles::text_dim()),
            Span::styled(url_show, styles::bot_bold()),
            Span::styled(" ".repeat(url_pad), Style::default()),
            Span::styled(" │", border),
        ]),
        Line::from(vec![Span::styled("  ", border), Span::styled(bottom_line, border)]),
    ];

    let para = Paragraph::new(lines).style(styles::elevated_bg());
    f.render_widget(para, area);
}
