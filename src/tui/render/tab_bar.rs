use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;

/// Render the tab bar: one tab per view slot, with a separator line below
pub fn render_tab_bar(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Length(1), // tabs
        Constraint::Length(1), // separator
    ])
    .split(area);

    render_tabs(frame, app, chunks[0]);
    render_separator(frame, app, chunks[1]);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let bg_style = Style::default().bg(app.theme.background);
    let sep = Span::styled(
        "\u{2502}",
        Style::default().fg(app.theme.dim).bg(app.theme.background),
    );

    let mut spans: Vec<Span> = vec![Span::styled(" ", bg_style)];
    for slot in 0..app.config.slot_count() {
        let is_current = slot == app.current_slot;
        let style = if is_current {
            Style::default()
                .fg(app.theme.text_bright)
                .bg(app.theme.selection_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text).bg(app.theme.background)
        };
        spans.push(Span::styled(format!(" {} ", app.slot_name(slot)), style));

        // Count of still-highlighted new issues in this slot
        let new_count = app.tracker.highlighted_in(app.cache.issues(slot));
        if new_count > 0 {
            spans.push(Span::styled(
                format!("+{} ", new_count),
                Style::default()
                    .fg(app.theme.new_issue)
                    .bg(if is_current {
                        app.theme.selection_bg
                    } else {
                        app.theme.background
                    }),
            ));
        }
        spans.push(sep.clone());
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).style(bg_style), area);
}

fn render_separator(frame: &mut Frame, app: &App, area: Rect) {
    let line = "\u{2500}".repeat(area.width as usize);
    frame.render_widget(
        Paragraph::new(line).style(Style::default().fg(app.theme.dim).bg(app.theme.background)),
        area,
    );
}
