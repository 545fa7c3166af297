//! Modal settings editor: a state machine over a working copy of the
//! configuration.
//!
//! The draft is a deep copy of the live config, discarded on cancel and
//! promoted only by the top-level save. Query fields are gated behind
//! remote validation: the editor hands the app an [`EditorAction::Validate`]
//! request, enters [`SettingsMode::Validating`], and commits or rejects the
//! field when the result comes back. Non-query fields commit locally.

use crossterm::event::{KeyCode, KeyEvent};

use crate::jql::scope_to_project;
use crate::model::{ActivityConfig, Config, ViewConfig};
use crate::remote::{QueryCheck, RemoteError};

use super::textfield::TextField;

/// Default interval when the activity section is first created
const DEFAULT_ACTIVITY_MINUTES: u64 = 10;

/// Menu rows, in display order
pub const MENU_ITEMS: [&str; 5] = ["Views", "Activity", "Project", "Save", "Cancel"];

/// Activity submenu rows
pub const ACTIVITY_ITEMS: [&str; 3] = ["Enabled", "Interval", "Query"];

/// Which view a name/query edit is aimed at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewTarget {
    Existing(usize),
    /// A view being created; it enters the draft only once its query
    /// passes validation.
    New { name: String },
}

/// Where a validated query commits to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JqlTarget {
    View(ViewTarget),
    Activity,
}

/// In-flight validation context, enough to restore the edit state on
/// rejection or cancel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingJql {
    pub target: JqlTarget,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsMode {
    Menu { cursor: usize },
    ViewList { cursor: usize },
    EditViewName { target: ViewTarget, field: TextField },
    EditViewJql { target: ViewTarget, field: TextField },
    Activity { cursor: usize },
    ActivityInterval { field: TextField },
    ActivityJql { field: TextField },
    Project { field: TextField },
    /// Waiting on remote validation; input is ignored except Esc.
    Validating { pending: PendingJql },
}

/// What the app loop must do after a key event
#[derive(Debug, Clone, PartialEq)]
pub enum EditorAction {
    None,
    /// Spawn a remote validation of this already-scoped query
    Validate { scoped: String },
    /// Promote the draft: persist, replace live config, re-arm
    Commit(Config),
    /// Discard the draft and close the editor
    Cancel,
}

#[derive(Debug)]
pub struct SettingsEditor {
    pub draft: Config,
    pub mode: SettingsMode,
    /// Inline error for the current field or menu
    pub error: Option<String>,
}

impl SettingsEditor {
    pub fn new(live: &Config) -> Self {
        SettingsEditor {
            draft: live.clone(),
            mode: SettingsMode::Menu { cursor: 0 },
            error: None,
        }
    }

    /// True while a validation round trip is outstanding
    pub fn is_validating(&self) -> bool {
        matches!(self.mode, SettingsMode::Validating { .. })
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> EditorAction {
        match std::mem::replace(&mut self.mode, SettingsMode::Menu { cursor: 0 }) {
            SettingsMode::Menu { cursor } => self.on_menu(cursor, key),
            SettingsMode::ViewList { cursor } => self.on_view_list(cursor, key),
            SettingsMode::EditViewName { target, field } => self.on_view_name(target, field, key),
            SettingsMode::EditViewJql { target, field } => self.on_view_jql(target, field, key),
            SettingsMode::Activity { cursor } => self.on_activity(cursor, key),
            SettingsMode::ActivityInterval { field } => self.on_activity_interval(field, key),
            SettingsMode::ActivityJql { field } => self.on_activity_jql(field, key),
            SettingsMode::Project { field } => self.on_project(field, key),
            SettingsMode::Validating { pending } => self.on_validating(pending, key),
        }
    }

    /// Result of the validation requested by the last
    /// [`EditorAction::Validate`]. A transport failure leaves the query
    /// unvalidated: the field commit stays blocked, but the message makes
    /// clear nothing was judged invalid.
    pub fn apply_validation(&mut self, result: Result<QueryCheck, RemoteError>) {
        if !self.is_validating() {
            return;
        }
        let SettingsMode::Validating { pending } =
            std::mem::replace(&mut self.mode, SettingsMode::Menu { cursor: 0 })
        else {
            return;
        };
        match result {
            Ok(check) if check.valid => {
                self.error = None;
                match pending.target {
                    JqlTarget::View(ViewTarget::Existing(i)) => {
                        if let Some(view) = self.draft.views.get_mut(i) {
                            view.jql = pending.value;
                        }
                        self.mode = SettingsMode::ViewList { cursor: i };
                    }
                    JqlTarget::View(ViewTarget::New { name }) => {
                        self.draft.views.push(ViewConfig {
                            name,
                            jql: pending.value,
                        });
                        self.mode = SettingsMode::ViewList {
                            cursor: self.draft.views.len() - 1,
                        };
                    }
                    JqlTarget::Activity => {
                        ensure_activity(&mut self.draft).jql = pending.value;
                        self.mode = SettingsMode::Activity { cursor: 2 };
                    }
                }
            }
            Ok(check) => {
                self.error = check
                    .errors
                    .first()
                    .cloned()
                    .or_else(|| Some("query rejected".to_string()));
                self.restore_jql_edit(pending);
            }
            Err(e) => {
                self.error = Some(format!("could not validate query: {}", e));
                self.restore_jql_edit(pending);
            }
        }
    }

    /// Back into the field-edit state for retry, input preserved.
    fn restore_jql_edit(&mut self, pending: PendingJql) {
        let field = TextField::new(&pending.value);
        self.mode = match pending.target {
            JqlTarget::View(target) => SettingsMode::EditViewJql { target, field },
            JqlTarget::Activity => SettingsMode::ActivityJql { field },
        };
    }

    fn on_menu(&mut self, cursor: usize, key: KeyEvent) -> EditorAction {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.mode = SettingsMode::Menu {
                    cursor: cursor.saturating_sub(1),
                };
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.mode = SettingsMode::Menu {
                    cursor: (cursor + 1).min(MENU_ITEMS.len() - 1),
                };
            }
            KeyCode::Esc => return EditorAction::Cancel,
            KeyCode::Enter => {
                self.error = None;
                match cursor {
                    0 => self.mode = SettingsMode::ViewList { cursor: 0 },
                    1 => self.mode = SettingsMode::Activity { cursor: 0 },
                    2 => {
                        self.mode = SettingsMode::Project {
                            field: TextField::new(&self.draft.project),
                        }
                    }
                    3 => {
                        let problems = self.draft.validate();
                        if problems.is_empty() {
                            return EditorAction::Commit(self.draft.clone());
                        }
                        self.error = Some(problems.join("; "));
                        self.mode = SettingsMode::Menu { cursor };
                        return EditorAction::None;
                    }
                    _ => return EditorAction::Cancel,
                }
            }
            _ => self.mode = SettingsMode::Menu { cursor },
        }
        EditorAction::None
    }

    /// View-list row an edit target came from (the "new view" row for a
    /// view not yet in the draft).
    fn view_row(&self, target: &ViewTarget) -> usize {
        match target {
            ViewTarget::Existing(i) => *i,
            ViewTarget::New { .. } => self.draft.views.len(),
        }
    }

    fn on_view_list(&mut self, cursor: usize, key: KeyEvent) -> EditorAction {
        let rows = self.draft.views.len() + 1; // trailing "new view" row
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.mode = SettingsMode::ViewList {
                    cursor: cursor.saturating_sub(1),
                };
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.mode = SettingsMode::ViewList {
                    cursor: (cursor + 1).min(rows - 1),
                };
            }
            KeyCode::Esc => {
                self.error = None;
                self.mode = SettingsMode::Menu { cursor: 0 };
            }
            KeyCode::Char('d') if cursor < self.draft.views.len() => {
                // At least one view is a standing invariant
                if self.draft.views.len() > 1 {
                    self.draft.views.remove(cursor);
                    self.error = None;
                    self.mode = SettingsMode::ViewList {
                        cursor: cursor.min(self.draft.views.len() - 1),
                    };
                } else {
                    self.error = Some("cannot delete the last view".to_string());
                    self.mode = SettingsMode::ViewList { cursor };
                }
            }
            KeyCode::Enter => {
                self.error = None;
                if cursor < self.draft.views.len() {
                    self.mode = SettingsMode::EditViewName {
                        target: ViewTarget::Existing(cursor),
                        field: TextField::new(&self.draft.views[cursor].name),
                    };
                } else {
                    self.mode = SettingsMode::EditViewName {
                        target: ViewTarget::New {
                            name: String::new(),
                        },
                        field: TextField::new(""),
                    };
                }
            }
            _ => self.mode = SettingsMode::ViewList { cursor },
        }
        EditorAction::None
    }

    fn on_view_name(&mut self, target: ViewTarget, mut field: TextField, key: KeyEvent) -> EditorAction {
        match key.code {
            KeyCode::Esc => {
                self.error = None;
                self.mode = SettingsMode::ViewList {
                    cursor: self.view_row(&target),
                };
            }
            KeyCode::Enter => {
                let name = field.value();
                if name.trim().is_empty() {
                    self.error = Some("view name cannot be empty".to_string());
                    self.mode = SettingsMode::EditViewName { target, field };
                    return EditorAction::None;
                }
                self.error = None;
                // Name commits locally; the query edit follows
                match target {
                    ViewTarget::Existing(i) => {
                        let jql = self.draft.views[i].jql.clone();
                        self.draft.views[i].name = name;
                        self.mode = SettingsMode::EditViewJql {
                            target: ViewTarget::Existing(i),
                            field: TextField::new(&jql),
                        };
                    }
                    ViewTarget::New { .. } => {
                        self.mode = SettingsMode::EditViewJql {
                            target: ViewTarget::New { name },
                            field: TextField::new(""),
                        };
                    }
                }
            }
            _ => {
                edit_field(&mut field, key);
                self.mode = SettingsMode::EditViewName { target, field };
            }
        }
        EditorAction::None
    }

    fn on_view_jql(&mut self, target: ViewTarget, mut field: TextField, key: KeyEvent) -> EditorAction {
        match key.code {
            KeyCode::Esc => {
                // Field not committed; a New target never entered the draft
                self.error = None;
                self.mode = SettingsMode::ViewList {
                    cursor: self.view_row(&target),
                };
            }
            KeyCode::Enter => {
                let value = field.value();
                let scoped = scope_to_project(&value, &self.draft.project);
                self.mode = SettingsMode::Validating {
                    pending: PendingJql {
                        target: JqlTarget::View(target),
                        value,
                    },
                };
                return EditorAction::Validate { scoped };
            }
            _ => {
                edit_field(&mut field, key);
                self.mode = SettingsMode::EditViewJql { target, field };
            }
        }
        EditorAction::None
    }

    fn on_activity(&mut self, cursor: usize, key: KeyEvent) -> EditorAction {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.mode = SettingsMode::Activity {
                    cursor: cursor.saturating_sub(1),
                };
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.mode = SettingsMode::Activity {
                    cursor: (cursor + 1).min(ACTIVITY_ITEMS.len() - 1),
                };
            }
            KeyCode::Esc => {
                self.error = None;
                self.mode = SettingsMode::Menu { cursor: 1 };
            }
            KeyCode::Enter | KeyCode::Char(' ') if cursor == 0 => {
                let activity = ensure_activity(&mut self.draft);
                activity.enabled = !activity.enabled;
                self.mode = SettingsMode::Activity { cursor };
            }
            KeyCode::Enter if cursor == 1 => {
                let current = self
                    .draft
                    .activity
                    .as_ref()
                    .map(|a| a.polling_interval_minutes)
                    .unwrap_or(DEFAULT_ACTIVITY_MINUTES);
                self.mode = SettingsMode::ActivityInterval {
                    field: TextField::new(&current.to_string()),
                };
            }
            KeyCode::Enter => {
                let jql = self
                    .draft
                    .activity
                    .as_ref()
                    .map(|a| a.jql.clone())
                    .unwrap_or_default();
                self.mode = SettingsMode::ActivityJql {
                    field: TextField::new(&jql),
                };
            }
            _ => self.mode = SettingsMode::Activity { cursor },
        }
        EditorAction::None
    }

    fn on_activity_interval(&mut self, mut field: TextField, key: KeyEvent) -> EditorAction {
        match key.code {
            KeyCode::Esc => {
                self.error = None;
                self.mode = SettingsMode::Activity { cursor: 1 };
            }
            KeyCode::Enter => match field.value().trim().parse::<u64>() {
                Ok(minutes) if minutes > 0 => {
                    ensure_activity(&mut self.draft).polling_interval_minutes = minutes;
                    self.error = None;
                    self.mode = SettingsMode::Activity { cursor: 1 };
                }
                _ => {
                    // Rejected locally; the prior value stays in the draft
                    self.error = Some("interval must be a positive number of minutes".to_string());
                    self.mode = SettingsMode::ActivityInterval { field };
                }
            },
            _ => {
                edit_field(&mut field, key);
                self.mode = SettingsMode::ActivityInterval { field };
            }
        }
        EditorAction::None
    }

    fn on_activity_jql(&mut self, mut field: TextField, key: KeyEvent) -> EditorAction {
        match key.code {
            KeyCode::Esc => {
                self.error = None;
                self.mode = SettingsMode::Activity { cursor: 2 };
            }
            KeyCode::Enter => {
                let value = field.value();
                let scoped = scope_to_project(&value, &self.draft.project);
                self.mode = SettingsMode::Validating {
                    pending: PendingJql {
                        target: JqlTarget::Activity,
                        value,
                    },
                };
                return EditorAction::Validate { scoped };
            }
            _ => {
                edit_field(&mut field, key);
                self.mode = SettingsMode::ActivityJql { field };
            }
        }
        EditorAction::None
    }

    fn on_project(&mut self, mut field: TextField, key: KeyEvent) -> EditorAction {
        match key.code {
            KeyCode::Esc => {
                self.error = None;
                self.mode = SettingsMode::Menu { cursor: 2 };
            }
            KeyCode::Enter => {
                let project = field.value();
                if project.trim().is_empty() {
                    self.error = Some("project key cannot be empty".to_string());
                    self.mode = SettingsMode::Project { field };
                } else {
                    self.draft.project = project.trim().to_string();
                    self.error = None;
                    self.mode = SettingsMode::Menu { cursor: 2 };
                }
            }
            _ => {
                edit_field(&mut field, key);
                self.mode = SettingsMode::Project { field };
            }
        }
        EditorAction::None
    }

    fn on_validating(&mut self, pending: PendingJql, key: KeyEvent) -> EditorAction {
        match key.code {
            // Abandon the gate; the in-flight result will be dropped
            KeyCode::Esc => {
                self.error = None;
                self.restore_jql_edit(pending);
            }
            _ => self.mode = SettingsMode::Validating { pending },
        }
        EditorAction::None
    }
}

fn ensure_activity(draft: &mut Config) -> &mut ActivityConfig {
    draft.activity.get_or_insert_with(|| ActivityConfig {
        enabled: false,
        polling_interval_minutes: DEFAULT_ACTIVITY_MINUTES,
        jql: String::new(),
    })
}

fn edit_field(field: &mut TextField, key: KeyEvent) {
    match key.code {
        KeyCode::Char(c) => field.insert(c),
        KeyCode::Backspace => field.backspace(),
        KeyCode::Delete => field.delete(),
        KeyCode::Left => field.left(),
        KeyCode::Right => field.right(),
        KeyCode::Home => field.home(),
        KeyCode::End => field.end(),
        _ => {}
    }
}
