//! Single-panel render: header, chat, logs, input bar, status, optional palette overlay.

use ratatui::Frame;

use crate::app::App;
use crate::ui::layout;
use crate::ui::theme::SPINNER;
use crate::ui::widgets::{
    render_chat, render_header, render_input, render_logs, render_palette, render_status,
};

pub fn render(f: &mut Frame, app: &mut App, tick: usize) {
    let area = f.area();
    let regions = layout::compute(area, app.state.logs.visible);

    let spinner_char = SPINNER[tick % SPINNER.len()];
    let waiting = app.input_disabled();
    let focused = app.input_has_focus();

    render_header(f, app.server_url(), regions.header);
    render_chat(f, &mut app.state.chat, regions.chat, waiting, spinner_char);
    if let Some(logs_area) = regions.logs {
        render_logs(f, &app.state.logs.entries, logs_area);
    }
    render_input(f, &app.state.input, waiting, focused, regions.input);
    render_status(f, regions.status, waiting, focused, spinner_char);

    if app.state.palette.visible {
        let palette_area = layout::palette_overlay_rect(regions.chat, app.state.palette.filtered.len());
        render_palette(f, &app.state.palette, palette_area);
    }
}
