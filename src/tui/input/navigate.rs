use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::App;

/// Keys in the main issue view
pub fn handle_navigate_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('?') => app.show_help = true,

        // View switching
        KeyCode::Tab | KeyCode::Right => app.next_slot(),
        KeyCode::BackTab | KeyCode::Left => app.prev_slot(),
        KeyCode::Char(c @ '1'..='9') => {
            app.switch_slot(c as usize - '1' as usize);
        }

        // Selection
        KeyCode::Down | KeyCode::Char('j') => app.move_cursor(1),
        KeyCode::Up | KeyCode::Char('k') => app.move_cursor(-1),
        KeyCode::PageDown => app.move_cursor(10),
        KeyCode::PageUp => app.move_cursor(-10),
        KeyCode::Char('g') => app.cursor_to_end(true),
        KeyCode::Char('G') => app.cursor_to_end(false),

        // Actions
        KeyCode::Char('r') => app.manual_refresh(),
        KeyCode::Char('c') => app.clear_highlights(),
        KeyCode::Char('f') => app.toggle_flag_selected(),
        KeyCode::Char('s') => app.cycle_sort(),
        KeyCode::Char(',') => app.open_settings(),
        _ => {}
    }
}
