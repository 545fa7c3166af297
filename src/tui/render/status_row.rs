use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;

/// Render the status row (bottom of screen): cache freshness of the
/// current view on the left, last background error or key hints on the
/// right.
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let mut left = match app.cache.fetched_at(app.current_slot) {
        Some(at) => format!(" fetched {} ago", age(at)),
        None => " never fetched".to_string(),
    };
    if app.global_in_flight || app.activity_in_flight {
        left.push_str("  \u{21bb} refreshing\u{2026}");
    }
    left.push_str(&format!("  sort: {}", app.sort_mode.label()));

    let mut spans = vec![Span::styled(
        left.clone(),
        Style::default().fg(app.theme.dim).bg(bg),
    )];

    let (right, right_style) = match &app.status_error {
        Some(error) => (
            error.clone(),
            Style::default().fg(app.theme.red).bg(bg),
        ),
        None => (
            "r refresh  f flag  c clear  s sort  , settings  ? help".to_string(),
            Style::default().fg(app.theme.dim).bg(bg),
        ),
    };

    let left_width = left.chars().count();
    let right_width = right.chars().count();
    if left_width + right_width + 1 < width {
        let padding = width - left_width - right_width - 1;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(right, right_style));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)),
        area,
    );
}

fn age(at: Instant) -> String {
    let secs = at.elapsed().as_secs();
    if secs < 60 {
        format!("{}s", secs)
    } else {
        format!("{}m", secs / 60)
    }
}
