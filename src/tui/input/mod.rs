mod navigate;
mod settings;

use crossterm::event::{KeyCode, KeyEvent};

use super::app::App;

/// Handle a key event for the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    // Help overlay intercepts all input
    if app.show_help {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?')) {
            app.show_help = false;
        }
        return;
    }

    // Settings modal intercepts all input while open
    if app.settings.is_some() {
        settings::handle_settings_key(app, key);
        return;
    }

    navigate::handle_navigate_key(app, key);
}
