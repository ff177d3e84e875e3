//! Chat pane: labelled, wrapped message blocks pinned to the bottom unless scrolled back.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::state::{ChatEntry, ChatState, Sender};
use crate::ui::theme::{colors, styles, MESSAGE_GAP};

const USER_LABEL: &str = "Vous ";
const BOT_LABEL: &str = "Bot  ";
/// Both labels are this wide so continuation lines line up.
const LABEL_WIDTH: usize = 5;
const EMPTY_HINT: &str = "Écrivez un message.  /  commandes · Entrée pour envoyer";

fn label(sender: Sender) -> (&'static str, Style) {
    match sender {
        Sender::User => (USER_LABEL, styles::accent_bold()),
        Sender::Bot => (BOT_LABEL, styles::bot_bold()),
    }
}

/// Lay the chat out as terminal lines for a pane `width` columns wide.
/// Message text is shown literally and wrapped; nothing is parsed as markup.
pub fn chat_lines(chat: &ChatState, width: usize, waiting: bool, spinner_char: char) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();
    let text_width = width.saturating_sub(LABEL_WIDTH).max(1);

    for (i, entry) in chat.entries.iter().enumerate() {
        if i > 0 {
            for _ in 0..MESSAGE_GAP {
                lines.push(Line::from(""));
            }
        }
        match entry {
            ChatEntry::Message(msg) => {
                let (label_text, label_style) = label(msg.sender);
                for (n, row) in textwrap::wrap(&msg.text, text_width).into_iter().enumerate() {
                    let prefix = if n == 0 {
                        Span::styled(label_text, label_style)
                    } else {
                        Span::raw(" ".repeat(LABEL_WIDTH))
                    };
                    lines.push(Line::from(vec![
                        prefix,
                        Span::styled(row.into_owned(), styles::text()),
                    ]));
                }
            }
            ChatEntry::Notice(text) => {
                for row in textwrap::wrap(text, width.max(1)) {
                    lines.push(Line::from(Span::styled(row.into_owned(), styles::notice())));
                }
            }
        }
    }

    if waiting {
        if !lines.is_empty() {
            for _ in 0..MESSAGE_GAP {
                lines.push(Line::from(""));
            }
        }
        lines.push(Line::from(vec![
            Span::styled(BOT_LABEL, styles::bot_bold()),
            Span::styled(format!("{spinner_char} "), styles::accent_bold()),
            Span::styled("…", styles::text_dim()),
        ]));
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(EMPTY_HINT, styles::muted())));
    }
    lines
}

pub fn render(f: &mut Frame, chat: &mut ChatState, area: Rect, waiting: bool, spinner_char: char) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(styles::border())
        .style(Style::default().bg(colors::BG));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let lines = chat_lines(chat, inner.width as usize, waiting, spinner_char);
    let height = inner.height as usize;
    let max_scroll = lines.len().saturating_sub(height);
    chat.set_max_scroll(max_scroll);

    let top = max_scroll - chat.scroll_back;
    let visible: Vec<Line> = lines.into_iter().skip(top).take(height).collect();
    let para = Paragraph::new(visible).style(Style::default().fg(colors::TEXT).bg(colors::BG));
    f.render_widget(para, inner);
}
