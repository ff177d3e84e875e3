//! Single-column layout: header, chat, optional log panel, input, status.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

use super::theme::{
    HEADER_HEIGHT, INPUT_HEIGHT, LOG_PANEL_HEIGHT, MARGIN_X, MIN_CHAT_LINES, PALETTE_MAX_HEIGHT,
    STATUS_HEIGHT,
};

#[derive(Clone, Debug)]
pub struct LayoutRegions {
    pub header: Rect,
    pub chat: Rect,
    pub logs: Option<Rect>,
    pub input: Rect,
    pub status: Rect,
}

/// Palette overlay sits on the bottom of the chat area, just above the input bar.
pub fn palette_overlay_rect(chat: Rect, rows: usize) -> Rect {
    // Two rows of border around the entries.
    let wanted = (rows as u16).saturating_add(2).min(PALETTE_MAX_HEIGHT);
    let height = wanted.min(chat.height);
    Rect {
        x: chat.x,
        y: chat.y + chat.height.saturating_sub(height),
        width: chat.width,
        height,
    }
}

pub fn compute(area: Rect, logs_visible: bool) -> LayoutRegions {
    let logs_height = if logs_visible { LOG_PANEL_HEIGHT } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(MIN_CHAT_LINES),
            Constraint::Length(logs_height),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(area);
    let chat = Rect {
        x: area.x + MARGIN_X,
        y: chunks[1].y,
        width: area.width.saturating_sub(2 * MARGIN_X),
        height: chunks[1].height,
    };
    LayoutRegions {
        header: chunks[0],
        chat,
        logs: logs_visible.then_some(chunks[2]),
        input: chunks[3],
        status: chunks[4],
    }
}
