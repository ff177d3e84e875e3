//! Command palette: list with accent bar selection.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

use crate::state::PaletteState;
use crate::ui::theme::colors;

pub fn render(f: &mut Frame, palette: &PaletteState, area: Rect) {
    if !palette.visible || palette.filtered.is_empty() {
        return;
    }
    let block = Block::default()
        .title("  Commandes  ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(colors::BORDER))
        .style(Style::default().bg(colors::ELEVATED));
    let inner = block.inner(area);
    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let lines: Vec<Line> = palette
        .filtered
        .iter()
        .take(inner.height as usize)
        .enumerate()
        .filter_map(|(i, &idx)| {
            let cmd = palette.commands.get(idx)?;
            let selected = i == palette.selected_index;
            Some(Line::from(vec![
                Span::styled(if selected { "▎ " } else { "  " }, Style::default().fg(colors::ACCENT)),
                Span::styled(
                    cmd.name.as_str(),
                    if selected {
                        Style::default().fg(colors::TEXT).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(colors::TEXT_DIM)
                    },
                ),
                Span::raw("  "),
                Span::styled(
                    cmd.description.as_str(),
                    Style::default().fg(if selected { colors::TEXT_DIM } else { colors::MUTED }),
                ),
            ]))
        })
        .collect();
    f.render_widget(Paragraph::new(lines), inner);
}
