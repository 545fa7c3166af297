use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;
use crate::tui::settings::{ACTIVITY_ITEMS, MENU_ITEMS, SettingsEditor, SettingsMode};
use crate::tui::textfield::TextField;

use super::centered_rect;

pub fn render_settings(frame: &mut Frame, app: &App, editor: &SettingsEditor, area: Rect) {
    let popup = centered_rect(area, 70, 60);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.highlight))
        .title(" Settings ")
        .style(Style::default().bg(app.theme.background));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let mut lines: Vec<Line> = Vec::new();
    match &editor.mode {
        SettingsMode::Menu { cursor } => {
            for (i, item) in MENU_ITEMS.iter().enumerate() {
                lines.push(menu_row(app, item, i == *cursor));
            }
            lines.push(Line::default());
            lines.push(hint(app, "Enter select  Esc cancel"));
        }
        SettingsMode::ViewList { cursor } => {
            for (i, view) in editor.draft.views.iter().enumerate() {
                let label = format!("{} \u{2014} {}", view.name, view.jql);
                lines.push(menu_row(app, &label, i == *cursor));
            }
            lines.push(menu_row(
                app,
                "+ new view\u{2026}",
                *cursor == editor.draft.views.len(),
            ));
            lines.push(Line::default());
            lines.push(hint(app, "Enter edit  d delete  Esc back"));
        }
        SettingsMode::EditViewName { field, .. } => {
            field_rows(app, &mut lines, "View name", field);
        }
        SettingsMode::EditViewJql { field, .. } => {
            field_rows(app, &mut lines, "View query (JQL)", field);
        }
        SettingsMode::Activity { cursor } => {
            let activity = editor.draft.activity.as_ref();
            let values = [
                activity.map_or("no".to_string(), |a| {
                    if a.enabled { "yes".into() } else { "no".into() }
                }),
                activity.map_or("-".to_string(), |a| {
                    format!("{}m", a.polling_interval_minutes)
                }),
                activity.map_or("-".to_string(), |a| a.jql.clone()),
            ];
            for (i, (item, value)) in ACTIVITY_ITEMS.iter().zip(values).enumerate() {
                let label = format!("{}: {}", item, value);
                lines.push(menu_row(app, &label, i == *cursor));
            }
            lines.push(Line::default());
            lines.push(hint(app, "Enter edit/toggle  Esc back"));
        }
        SettingsMode::ActivityInterval { field } => {
            field_rows(app, &mut lines, "Polling interval (minutes)", field);
        }
        SettingsMode::ActivityJql { field } => {
            field_rows(app, &mut lines, "Activity query (JQL)", field);
        }
        SettingsMode::Project { field } => {
            field_rows(app, &mut lines, "Project key", field);
        }
        SettingsMode::Validating { .. } => {
            lines.push(Line::from(Span::styled(
                " validating query\u{2026}",
                Style::default().fg(app.theme.yellow).bg(app.theme.background),
            )));
            lines.push(Line::default());
            lines.push(hint(app, "Esc cancel"));
        }
    }

    if let Some(error) = &editor.error {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            format!(" {}", error),
            Style::default().fg(app.theme.red).bg(app.theme.background),
        )));
    }

    frame.render_widget(
        Paragraph::new(lines).style(Style::default().bg(app.theme.background)),
        inner,
    );
}

fn menu_row<'a>(app: &App, label: &str, selected: bool) -> Line<'a> {
    let style = if selected {
        Style::default()
            .fg(app.theme.text_bright)
            .bg(app.theme.selection_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.text).bg(app.theme.background)
    };
    let marker = if selected { "\u{25b8} " } else { "  " };
    Line::from(Span::styled(format!("{}{}", marker, label), style))
}

fn field_rows(app: &App, lines: &mut Vec<Line>, label: &str, field: &TextField) {
    lines.push(Line::from(Span::styled(
        format!(" {}:", label),
        Style::default().fg(app.theme.dim).bg(app.theme.background),
    )));
    let value = field.value();
    let col = field.cursor_col();
    let (before, after) = split_at_col(&value, col);
    lines.push(Line::from(vec![
        Span::styled(
            format!(" {}", before),
            Style::default()
                .fg(app.theme.text_bright)
                .bg(app.theme.background),
        ),
        Span::styled(
            "\u{258c}",
            Style::default().fg(app.theme.highlight).bg(app.theme.background),
        ),
        Span::styled(
            after.to_string(),
            Style::default()
                .fg(app.theme.text_bright)
                .bg(app.theme.background),
        ),
    ]));
    lines.push(Line::default());
    lines.push(hint(app, "Enter confirm  Esc back"));
}

/// Split a string at a display-column boundary
fn split_at_col(s: &str, col: usize) -> (String, String) {
    use unicode_width::UnicodeWidthChar;

    let mut used = 0;
    let mut before = String::new();
    let mut after = String::new();
    for c in s.chars() {
        if used < col {
            before.push(c);
            used += c.width().unwrap_or(0);
        } else {
            after.push(c);
        }
    }
    (before, after)
}

fn hint<'a>(app: &App, text: &str) -> Line<'a> {
    Line::from(Span::styled(
        format!(" {}", text),
        Style::default().fg(app.theme.dim).bg(app.theme.background),
    ))
}
