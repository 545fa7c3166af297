use crossterm::event::KeyEvent;

use crate::tui::app::App;
use crate::tui::settings::EditorAction;

/// Keys while the settings modal is open: the editor state machine decides,
/// the app carries out the side effects.
pub fn handle_settings_key(app: &mut App, key: KeyEvent) {
    let Some(editor) = app.settings.as_mut() else {
        return;
    };
    match editor.handle_key(key) {
        EditorAction::None => {}
        EditorAction::Validate { scoped } => app.spawn_validation(scoped),
        EditorAction::Commit(config) => app.commit_settings(config),
        EditorAction::Cancel => app.settings = None,
    }
}
