mod help_overlay;
mod issue_table;
mod settings_modal;
mod status_row;
mod tab_bar;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::Block;

use super::app::App;

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(app.theme.background)),
        area,
    );

    let chunks = Layout::vertical([
        Constraint::Length(2), // tab bar + separator
        Constraint::Min(0),    // issue table
        Constraint::Length(1), // status row
    ])
    .split(area);

    tab_bar::render_tab_bar(frame, app, chunks[0]);
    issue_table::render_issue_table(frame, app, chunks[1]);
    status_row::render_status_row(frame, app, chunks[2]);

    if let Some(editor) = &app.settings {
        settings_modal::render_settings(frame, app, editor, area);
    }
    if app.show_help {
        help_overlay::render_help(frame, app, area);
    }
}

/// Centered popup rect with the given percentage size
fn centered_rect(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(area);
    let horizontal = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(vertical[1]);
    horizontal[1]
}

/// Truncate to a display width, padding with spaces to exactly fill it
fn pad_truncate(s: &str, width: usize) -> String {
    use unicode_width::UnicodeWidthChar;

    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}
