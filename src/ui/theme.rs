//! Theme: dark canvas, blue accents, one colour per sender.

use ratatui::style::Color;

pub mod colors {
    use super::*;
    /// Main canvas (chat area).
    pub const BG: Color = Color::Rgb(0x18, 0x1c, 0x22);
    /// Header, input bar, status, palette, logs.
    pub const ELEVATED: Color = Color::Rgb(0x16, 0x1a, 0x1f);
    pub const BORDER: Color = Color::Rgb(0x2d, 0x34, 0x3e);
    /// Prompt and "Vous" label.
    pub const ACCENT: Color = Color::Rgb(0x6b, 0xbc, 0xff);
    /// "Bot" label.
    pub const ACCENT_SOFT: Color = Color::Rgb(0x99, 0xd4, 0xff);
    pub const TEXT: Color = Color::Rgb(0xf2, 0xf4, 0xf8);
    pub const TEXT_DIM: Color = Color::Rgb(0xbc, 0xc5, 0xd0);
    pub const MUTED: Color = Color::Rgb(0x94, 0x9e, 0xad);
    pub const WARNING: Color = Color::Rgb(0xe5, 0xc0, 0x7b);
    pub const ERROR: Color = Color::Rgb(0xf0, 0x6c, 0x6c);
}

pub mod styles {
    use ratatui::style::{Modifier, Style};

    use super::colors;

    pub fn border() -> Style {
        Style::default().fg(colors::BORDER)
    }
    pub fn accent_bold() -> Style {
        Style::default().fg(colors::ACCENT).add_modifier(Modifier::BOLD)
    }
    pub fn bot_bold() -> Style {
        Style::default().fg(colors::ACCENT_SOFT).add_modifier(Modifier::BOLD)
    }
    pub fn text() -> Style {
        Style::default().fg(colors::TEXT)
    }
    pub fn text_dim() -> Style {
        Style::default().fg(colors::TEXT_DIM)
    }
    pub fn muted() -> Style {
        Style::default().fg(colors::MUTED)
    }
    pub fn notice() -> Style {
        Style::default().fg(colors::TEXT_DIM).add_modifier(Modifier::ITALIC)
    }
    pub fn elevated_bg() -> Style {
        Style::default().bg(colors::ELEVATED)
    }
}

pub const HEADER_HEIGHT: u16 = 5;
pub const STATUS_HEIGHT: u16 = 1;
/// Top border plus one line of text.
pub const INPUT_HEIGHT: u16 = 2;
pub const LOG_PANEL_HEIGHT: u16 = 8;
pub const MIN_CHAT_LINES: u16 = 3;
pub const PALETTE_MAX_HEIGHT: u16 = 9;
/// Blank line between messages.
pub const MESSAGE_GAP: usize = 1;
/// Inner horizontal margin (chars each side).
pub const MARGIN_X: u16 = 1;
pub const SPINNER: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
