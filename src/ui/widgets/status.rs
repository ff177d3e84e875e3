//! Status bar: request state on the left, key hints on the right.

use ratatui::{layout::Rect, style::Style, text::Span, widgets::Paragraph, Frame};

use crate::ui::theme::colors;

const HINTS_FOCUSED: &str = " Entrée envoyer  ↑↓ historique  / commandes  Échap défiler  F2 journal ";
const HINTS_BROWSING: &str = " j/k défiler  g/G haut/bas  i saisir  q quitter ";

pub fn render(f: &mut Frame, area: Rect, waiting: bool, focused: bool, spinner_char: char) {
    let left = if waiting {
        format!(" {spinner_char} En attente…")
    } else {
        " Prêt".to_string()
    };
    let right = if focused || waiting { HINTS_FOCUSED } else { HINTS_BROWSING };
    let width = area.width as usize;
    let pad = width.saturating_sub(left.chars().count() + right.chars().count());
    let line = format!("{}{}{}", left, " ".repeat(pad), right);
    let span = Span::styled(line, Style::default().fg(colors::MUTED).bg(colors::ELEVATED));
    f.render_widget(Paragraph::new(span), area);
}
