//! Input bar: prompt and cursor; greyed out while a request is outstanding.

use ratatui::{
    layout::{Position, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::state::InputState;
use crate::ui::theme::{colors, styles};

const PROMPT: &str = " ▸ ";
const WAITING_TEXT: &str = "En attente de la réponse…";

/// Slice of `buffer` that fits in `width` columns with the cursor kept on
/// screen, plus the cursor column within that slice. Scrolls left once the
/// text before the cursor no longer fits.
fn visible_window(buffer: &str, cursor: usize, width: usize) -> (&str, usize) {
    if width == 0 {
        return ("", 0);
    }
    let before = buffer.get(..cursor).map(|s| s.chars().count()).unwrap_or(0);
    // One cell stays free for the cursor itself.
    let skip = before.saturating_sub(width - 1);
    let start = buffer.char_indices().nth(skip).map(|(i, _)| i).unwrap_or(buffer.len());
    let rest = &buffer[start..];
    let end = rest.char_indices().nth(width).map(|(i, _)| i).unwrap_or(rest.len());
    (&rest[..end], before - skip)
}

pub fn render(f: &mut Frame, input: &InputState, disabled: bool, focused: bool, area: Rect) {
    let block = Block::default()
        .style(Style::default().bg(colors::ELEVATED))
        .borders(Borders::TOP)
        .border_style(styles::border())
        .border_type(BorderType::Plain);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let prompt_width = PROMPT.chars().count() as u16;
    let text_width = inner.width.saturating_sub(prompt_width) as usize;
    let (shown, cursor_col) = visible_window(&input.buffer, input.cursor, text_width);

    let line = if disabled {
        Line::from(vec![
            Span::styled(PROMPT, styles::muted()),
            Span::styled(WAITING_TEXT, styles::muted()),
        ])
    } else {
        let text_style = if focused { styles::text() } else { styles::text_dim() };
        Line::from(vec![
            Span::styled(PROMPT, styles::accent_bold()),
            Span::styled(shown, text_style),
        ])
    };
    f.render_widget(Paragraph::new(line), inner);

    if disabled || !focused || inner.width == 0 {
        return;
    }
    let x = (inner.x + prompt_width + cursor_col as u16).min(inner.x + inner.width - 1);
    f.set_cursor_position(Position { x, y: inner.y });
}
