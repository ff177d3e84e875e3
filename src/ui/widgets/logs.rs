//! Logs panel: newest diagnostics, pinned to the bottom.

use std::collections::VecDeque;

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::state::{LogEntry, LogLevel};
use crate::ui::theme::colors;

fn level_style(level: LogLevel) -> Style {
    match level {
        LogLevel::Info => Style::default().fg(colors::TEXT_DIM),
        LogLevel::Warn => Style::default().fg(colors::WARNING),
        LogLevel::Error => Style::default().fg(colors::ERROR),
        LogLevel::Debug => Style::default().fg(colors::MUTED),
    }
}

fn level_tag(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Info => "INF",
        LogLevel::Warn => "WRN",
        LogLevel::Error => "ERR",
        LogLevel::Debug => "DBG",
    }
}

/// Local wall-clock time of the entry.
fn clock(entry: &LogEntry) -> String {
    entry.timestamp.format("%H:%M:%S").to_string()
}

pub fn render(f: &mut Frame, entries: &VecDeque<LogEntry>, area: Rect) {
    let block = Block::default()
        .title(" Journal ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(colors::BORDER))
        .style(Style::default().bg(colors::ELEVATED));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let height = inner.height as usize;
    let skip = entries.len().saturating_sub(height);
    let lines: Vec<Line> = entries
        .iter()
        .skip(skip)
        .map(|e| {
            Line::from(vec![
                Span::styled(format!("{} ", clock(e)), Style::default().fg(colors::MUTED)),
                Span::styled(
                    format!("[{}] ", level_tag(e.level)),
                    level_style(e.level).add_modifier(Modifier::BOLD),
                ),
                Span::raw(e.message.as_str()),
            ])
        })
        .collect();
    let para = Paragraph::new(lines).style(Style::default().fg(colors::TEXT_DIM));
    f.render_widget(para, inner);
}
