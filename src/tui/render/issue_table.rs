use chrono::{DateTime, Utc};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;

use super::pad_truncate;

const KEY_WIDTH: usize = 12;
const STATUS_WIDTH: usize = 14;
const ASSIGNEE_WIDTH: usize = 16;
const UPDATED_WIDTH: usize = 9;

/// Render the scrollable issue table for the current slot
pub fn render_issue_table(frame: &mut Frame, app: &App, area: Rect) {
    let issues = app.visible_issues(app.current_slot);
    let bg = app.theme.background;

    if issues.is_empty() {
        let text = if app.cache.entry(app.current_slot).is_none() {
            "loading\u{2026}"
        } else {
            "no matching issues"
        };
        let line = Line::from(Span::styled(
            format!("  {}", text),
            Style::default().fg(app.theme.dim).bg(bg),
        ));
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    let height = area.height as usize;
    let cursor = app.cursors[app.current_slot].min(issues.len() - 1);
    // Keep the cursor on screen; pin it to the last row once past a page
    let scroll = cursor.saturating_sub(height.saturating_sub(1));

    let summary_width = (area.width as usize)
        .saturating_sub(2 + 2 + KEY_WIDTH + STATUS_WIDTH + ASSIGNEE_WIDTH + UPDATED_WIDTH + 5);

    let now = Utc::now();
    let mut lines: Vec<Line> = Vec::with_capacity(height);
    for (row, issue) in issues.iter().enumerate().skip(scroll).take(height) {
        let selected = row == cursor;
        let is_new = app.tracker.is_highlighted(&issue.id);
        let row_bg = if selected { app.theme.selection_bg } else { bg };

        let flag = if app.flags.contains(&issue.key) {
            Span::styled("\u{2691} ", Style::default().fg(app.theme.flag).bg(row_bg))
        } else {
            Span::styled("  ", Style::default().bg(row_bg))
        };
        let new_marker = if is_new {
            Span::styled("\u{25cf} ", Style::default().fg(app.theme.new_issue).bg(row_bg))
        } else {
            Span::styled("  ", Style::default().bg(row_bg))
        };

        let key_style = if is_new {
            Style::default()
                .fg(app.theme.new_issue)
                .bg(row_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.cyan).bg(row_bg)
        };
        let text_style = Style::default()
            .fg(if selected {
                app.theme.text_bright
            } else {
                app.theme.text
            })
            .bg(row_bg);
        let dim_style = Style::default().fg(app.theme.dim).bg(row_bg);

        lines.push(Line::from(vec![
            flag,
            new_marker,
            Span::styled(pad_truncate(&issue.key, KEY_WIDTH), key_style),
            Span::styled(" ", Style::default().bg(row_bg)),
            Span::styled(pad_truncate(&issue.status, STATUS_WIDTH), text_style),
            Span::styled(" ", Style::default().bg(row_bg)),
            Span::styled(
                pad_truncate(issue.assignee.as_deref().unwrap_or("-"), ASSIGNEE_WIDTH),
                dim_style,
            ),
            Span::styled(" ", Style::default().bg(row_bg)),
            Span::styled(pad_truncate(&age(now, issue.updated), UPDATED_WIDTH), dim_style),
            Span::styled(" ", Style::default().bg(row_bg)),
            Span::styled(pad_truncate(&issue.summary, summary_width), text_style),
        ]));
    }

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}

/// Compact age like "5m", "3h", "12d"
fn age(now: DateTime<Utc>, then: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds().max(0);
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m", secs / 60)
    } else if secs < 86_400 {
        format!("{}h", secs / 3600)
    } else {
        format!("{}d", secs / 86_400)
    }
}
