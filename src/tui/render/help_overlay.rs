use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;

use super::centered_rect;

const BINDINGS: [(&str, &str); 11] = [
    ("Tab / \u{2190}\u{2192}", "switch view"),
    ("1-9", "jump to view"),
    ("j/k \u{2191}\u{2193}", "move selection"),
    ("g / G", "first / last issue"),
    ("r", "refresh all views now"),
    ("c", "clear new-issue highlights"),
    ("f", "flag / unflag selected issue"),
    ("s", "cycle sort mode"),
    (",", "settings"),
    ("?", "this help"),
    ("q", "quit"),
];

pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let popup = centered_rect(area, 50, 60);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.highlight))
        .title(" Keys ")
        .style(Style::default().bg(app.theme.background));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let lines: Vec<Line> = BINDINGS
        .iter()
        .map(|(keys, what)| {
            Line::from(vec![
                Span::styled(
                    format!(" {:<12}", keys),
                    Style::default()
                        .fg(app.theme.cyan)
                        .bg(app.theme.background),
                ),
                Span::styled(
                    what.to_string(),
                    Style::default().fg(app.theme.text).bg(app.theme.background),
                ),
            ])
        })
        .collect();

    frame.render_widget(
        Paragraph::new(lines).style(Style::default().bg(app.theme.background)),
        inner,
    );
}
