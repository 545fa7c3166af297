use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crossterm::event::{Event, EventStream, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use futures::StreamExt;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;

use crate::engine::{FlaggedKeys, NewIssueTracker, PollingScheduler, Tick, ViewCache};
use crate::io::state::UserState;
use crate::io::{config_io, paths, state};
use crate::jql::scope_to_project;
use crate::model::{Config, Issue, SortMode};
use crate::remote::{JiraClient, QueryCheck, RemoteError};

use super::input;
use super::render;
use super::settings::SettingsEditor;
use super::theme::Theme;

/// Which refresh cycle a fetch belongs to. Global covers both the periodic
/// pass and manual refresh-all; they share one in-flight slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleKind {
    Global,
    Activity,
}

/// Results reported back from spawned network tasks
#[derive(Debug)]
pub enum EngineMsg {
    ViewFetched {
        epoch: u64,
        kind: CycleKind,
        slot: usize,
        initial: bool,
        result: Result<Vec<Issue>, RemoteError>,
    },
    CycleFinished {
        epoch: u64,
        kind: CycleKind,
    },
    ValidationFinished {
        token: u64,
        result: Result<QueryCheck, RemoteError>,
    },
}

/// Main application state. The app task is the single owner of the cache,
/// tracker, and flags; spawned tasks only talk to it through [`EngineMsg`].
pub struct App {
    pub config: Config,
    pub cache: ViewCache,
    pub tracker: NewIssueTracker,
    pub flags: FlaggedKeys,
    pub scheduler: PollingScheduler,
    pub theme: Theme,
    /// Currently displayed tab (slot index)
    pub current_slot: usize,
    /// Per-slot selection cursor
    pub cursors: Vec<usize>,
    pub sort_mode: SortMode,
    pub show_help: bool,
    pub should_quit: bool,
    pub settings: Option<SettingsEditor>,
    /// Last background refresh error, shown non-blockingly in the status
    /// row until the same slot refreshes successfully
    pub status_error: Option<String>,
    status_error_slot: Option<usize>,
    pub global_in_flight: bool,
    pub activity_in_flight: bool,
    /// Bumped on every settings commit; results tagged with an older epoch
    /// are superseded and never applied
    epoch: u64,
    validation_token: u64,
    pending_validation: Option<u64>,
    client: Arc<JiraClient>,
    tx: mpsc::UnboundedSender<EngineMsg>,
    config_path: PathBuf,
    state_path: PathBuf,
}

impl App {
    pub fn new(
        config: Config,
        user_state: UserState,
        client: Arc<JiraClient>,
        tx: mpsc::UnboundedSender<EngineMsg>,
        config_path: PathBuf,
        state_path: PathBuf,
    ) -> Self {
        let slots = config.slot_count();
        let scheduler = PollingScheduler::new(&config, Instant::now());
        App {
            cache: ViewCache::new(slots),
            tracker: NewIssueTracker::default(),
            flags: FlaggedKeys::from_list(user_state.flagged_issue_keys),
            scheduler,
            theme: Theme::default(),
            current_slot: 0,
            cursors: vec![0; slots],
            sort_mode: SortMode::default(),
            show_help: false,
            should_quit: false,
            settings: None,
            status_error: None,
            status_error_slot: None,
            global_in_flight: false,
            activity_in_flight: false,
            epoch: 0,
            validation_token: 0,
            pending_validation: None,
            client,
            tx,
            config_path,
            state_path,
            config,
        }
    }

    /// Tab label for a slot; the activity slot has no configured name.
    pub fn slot_name(&self, slot: usize) -> &str {
        match self.config.views.get(slot) {
            Some(view) => &view.name,
            None => "Activity",
        }
    }

    /// Snapshot of a slot's issues in the current display order
    pub fn visible_issues(&self, slot: usize) -> Vec<Issue> {
        let mut issues = self.cache.issues(slot).to_vec();
        self.sort_mode.sort(&mut issues);
        issues
    }

    pub fn selected_issue(&self) -> Option<Issue> {
        let issues = self.visible_issues(self.current_slot);
        let cursor = self.cursors.get(self.current_slot).copied()?;
        issues.into_iter().nth(cursor)
    }

    pub fn switch_slot(&mut self, slot: usize) {
        if slot < self.config.slot_count() {
            self.current_slot = slot;
        }
    }

    pub fn next_slot(&mut self) {
        self.current_slot = (self.current_slot + 1) % self.config.slot_count();
    }

    pub fn prev_slot(&mut self) {
        let count = self.config.slot_count();
        self.current_slot = (self.current_slot + count - 1) % count;
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.cache.issues(self.current_slot).len();
        if len == 0 {
            return;
        }
        let cursor = &mut self.cursors[self.current_slot];
        *cursor = cursor
            .saturating_add_signed(delta)
            .min(len - 1);
    }

    pub fn cursor_to_end(&mut self, top: bool) {
        let len = self.cache.issues(self.current_slot).len();
        self.cursors[self.current_slot] = if top { 0 } else { len.saturating_sub(1) };
    }

    pub fn cycle_sort(&mut self) {
        self.sort_mode = self.sort_mode.next();
    }

    pub fn clear_highlights(&mut self) {
        self.tracker.clear_highlights();
    }

    pub fn open_settings(&mut self) {
        self.settings = Some(SettingsEditor::new(&self.config));
    }

    /// Toggle the follow-up flag on the selected issue and rewrite the
    /// state file (synchronous read-modify-write, single writer).
    pub fn toggle_flag_selected(&mut self) {
        let Some(issue) = self.selected_issue() else {
            return;
        };
        self.flags.toggle(&issue.key);
        let snapshot = UserState {
            flagged_issue_keys: self.flags.to_list(),
        };
        if let Err(e) = state::write_state(&self.state_path, &snapshot) {
            log::warn!("could not write state file: {}", e);
            self.status_error = Some(format!("could not save flags: {}", e));
            self.status_error_slot = None;
        }
    }

    /// Force-fetch every view (standard + activity) in one pass, bypassing
    /// freshness windows. This is the only path where a global cycle
    /// carries the activity slot. Skipped while a global/manual cycle is
    /// running.
    pub fn manual_refresh(&mut self) {
        if self.global_in_flight {
            return;
        }
        let mut plan = self.standard_view_plan(true, Instant::now());
        plan.extend(self.activity_plan());
        if plan.is_empty() {
            return;
        }
        self.global_in_flight = true;
        self.spawn_fetch(CycleKind::Global, plan, false);
    }

    pub fn handle_tick(&mut self, tick: Tick) {
        match tick {
            Tick::Global => {
                if !self.global_in_flight {
                    self.spawn_global_cycle(false, false);
                }
            }
            Tick::Activity { initial } => {
                if !self.activity_in_flight {
                    self.spawn_activity_cycle(initial);
                }
            }
        }
    }

    /// Plan and spawn a pass over the standard views only; the activity
    /// slot belongs to its own timer. The freshness decision happens here,
    /// against the cache this task owns; the spawned task does nothing but
    /// fetch and report.
    fn spawn_global_cycle(&mut self, force: bool, initial: bool) {
        let plan = self.standard_view_plan(force, Instant::now());
        if plan.is_empty() {
            return;
        }
        self.global_in_flight = true;
        self.spawn_fetch(CycleKind::Global, plan, initial);
    }

    fn spawn_activity_cycle(&mut self, initial: bool) {
        let Some(entry) = self.activity_plan() else {
            return;
        };
        self.activity_in_flight = true;
        self.spawn_fetch(CycleKind::Activity, vec![entry], initial);
    }

    fn standard_view_plan(&self, force: bool, now: Instant) -> Vec<(usize, String)> {
        self.config
            .views
            .iter()
            .enumerate()
            .filter(|(slot, _)| self.cache.needs_fetch(*slot, force, now))
            .map(|(slot, view)| (slot, scope_to_project(&view.jql, &self.config.project)))
            .collect()
    }

    fn activity_plan(&self) -> Option<(usize, String)> {
        let activity = self.config.activity.as_ref().filter(|a| a.enabled)?;
        Some((
            self.config.views.len(),
            scope_to_project(&activity.jql, &self.config.project),
        ))
    }

    fn spawn_fetch(&self, kind: CycleKind, plan: Vec<(usize, String)>, initial: bool) {
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        let epoch = self.epoch;
        tokio::spawn(async move {
            // Sequential, in configured view order, so progress lands one
            // view at a time
            for (slot, jql) in plan {
                let result = client.search_all(&jql).await;
                if tx
                    .send(EngineMsg::ViewFetched {
                        epoch,
                        kind,
                        slot,
                        initial,
                        result,
                    })
                    .is_err()
                {
                    return;
                }
            }
            let _ = tx.send(EngineMsg::CycleFinished { epoch, kind });
        });
    }

    /// Spawn the settings editor's validation round trip.
    pub fn spawn_validation(&mut self, scoped: String) {
        self.validation_token += 1;
        let token = self.validation_token;
        self.pending_validation = Some(token);
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.validate_batch(&[scoped]).await.and_then(|checks| {
                checks
                    .into_iter()
                    .next()
                    .ok_or_else(|| RemoteError::Malformed("empty validation response".into()))
            });
            let _ = tx.send(EngineMsg::ValidationFinished { token, result });
        });
    }

    /// Apply a message from a spawned task. Results tagged with a stale
    /// epoch or validation token are dropped unapplied.
    pub fn apply_msg(&mut self, msg: EngineMsg) {
        match msg {
            EngineMsg::ViewFetched { epoch, .. } | EngineMsg::CycleFinished { epoch, .. }
                if epoch != self.epoch => {}
            EngineMsg::ViewFetched {
                slot,
                initial,
                result,
                ..
            } => match result {
                Ok(issues) => {
                    self.tracker.fold_in(&issues, initial);
                    self.cache.replace(slot, issues, Instant::now());
                    self.clamp_cursor(slot);
                    if self.status_error_slot == Some(slot) {
                        self.status_error = None;
                        self.status_error_slot = None;
                    }
                }
                Err(e) => {
                    // The view keeps its last-known cache
                    log::warn!("refresh of '{}' failed: {}", self.slot_name(slot), e);
                    self.status_error = Some(format!("{}: {}", self.slot_name(slot), e));
                    self.status_error_slot = Some(slot);
                }
            },
            EngineMsg::CycleFinished { kind, .. } => match kind {
                CycleKind::Global => self.global_in_flight = false,
                CycleKind::Activity => self.activity_in_flight = false,
            },
            EngineMsg::ValidationFinished { token, result } => {
                if self.pending_validation == Some(token) {
                    self.pending_validation = None;
                    if let Some(editor) = &mut self.settings {
                        editor.apply_validation(result);
                    }
                }
            }
        }
    }

    /// Promote a saved draft: persist, swap the live config, and re-seed
    /// everything against it. The seen-id set is deliberately retained.
    pub fn commit_settings(&mut self, new_config: Config) {
        // An error carried over from the old layout would name a stale slot
        self.status_error = None;
        self.status_error_slot = None;
        if let Err(e) = config_io::save_config(&self.config_path, &new_config) {
            log::error!("could not persist config: {}", e);
            self.status_error = Some(format!("could not save config: {}", e));
        }
        self.config = new_config;
        self.settings = None;
        self.epoch += 1;
        self.global_in_flight = false;
        self.activity_in_flight = false;
        self.pending_validation = None;

        let slots = self.config.slot_count();
        self.cache.reset(slots);
        self.tracker.clear_highlights();
        self.cursors = vec![0; slots];
        self.current_slot = self.current_slot.min(slots - 1);
        self.scheduler.rearm(&self.config, Instant::now());

        // Re-seed the standard views now rather than waiting a full
        // interval; the activity slot re-seeds via its immediate tick.
        self.spawn_global_cycle(true, false);
    }

    fn clamp_cursor(&mut self, slot: usize) {
        if let Some(cursor) = self.cursors.get_mut(slot) {
            let len = self.cache.issues(slot).len();
            *cursor = (*cursor).min(len.saturating_sub(1));
        }
    }
}

/// Startup gate: every configured query must validate before the main view
/// opens. Warnings are printed but do not block.
async fn startup_validation(client: &JiraClient, config: &Config) -> Result<(), String> {
    let mut names: Vec<&str> = config.views.iter().map(|v| v.name.as_str()).collect();
    let mut scoped: Vec<String> = config
        .views
        .iter()
        .map(|v| scope_to_project(&v.jql, &config.project))
        .collect();
    if let Some(activity) = config.activity.as_ref().filter(|a| a.enabled) {
        names.push("Activity");
        scoped.push(scope_to_project(&activity.jql, &config.project));
    }

    let checks = client
        .validate_batch(&scoped)
        .await
        .map_err(|e| format!("could not validate queries: {}", e))?;

    let mut listing = String::new();
    let mut failed = false;
    for (name, check) in names.iter().zip(&checks) {
        for warning in &check.warnings {
            listing.push_str(&format!("warning: {}: {}\n", name, warning));
        }
        for error in &check.errors {
            listing.push_str(&format!("error: {}: {}\n", name, error));
            failed = true;
        }
    }
    if failed {
        return Err(format!("configured queries failed validation:\n{}", listing));
    }
    if !listing.is_empty() {
        eprint!("{}", listing);
    }
    Ok(())
}

fn init_logging(path: &std::path::Path) {
    let Ok(file) = std::fs::OpenOptions::new().create(true).append(true).open(path) else {
        return;
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init();
}

/// Run the TUI application
pub async fn run(config_dir: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let dir = paths::config_dir(config_dir);
    let config_path = paths::config_path(&dir);
    let config = config_io::load_config(&config_path)?;
    let user_state = state::read_state(&paths::state_path(&dir));
    let client = Arc::new(JiraClient::from_env(&config.domain)?);

    init_logging(&paths::log_path(&dir));

    // Fatal before any terminal setup: invalid queries or transport failure
    startup_validation(&client, &config).await?;

    let (tx, rx) = mpsc::unbounded_channel();
    let mut app = App::new(
        config,
        user_state,
        client,
        tx,
        config_path,
        paths::state_path(&dir),
    );
    // First population of every standard view; never highlighted as new.
    // The activity slot loads via its immediate scheduler tick.
    app.spawn_global_cycle(true, true);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app, rx).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    mut rx: mpsc::UnboundedReceiver<EngineMsg>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut events = EventStream::new();
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        let deadline = tokio::time::Instant::from_std(app.scheduler.next_deadline());
        tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    input::handle_key(app, key);
                }
                Some(Ok(_)) => {} // resize etc. handled by the redraw
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
            Some(msg) = rx.recv() => app.apply_msg(msg),
            _ = tokio::time::sleep_until(deadline) => {
                let ticks = app.scheduler.due(Instant::now());
                for tick in ticks {
                    app.handle_tick(tick);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ActivityConfig, ViewConfig};

    fn base_config(activity: Option<ActivityConfig>) -> Config {
        Config {
            project: "PROJ".into(),
            domain: "example.invalid".into(),
            views: vec![ViewConfig {
                name: "Open".into(),
                jql: "status = Open".into(),
            }],
            activity,
        }
    }

    fn activity() -> ActivityConfig {
        ActivityConfig {
            enabled: true,
            polling_interval_minutes: 1,
            jql: "updated >= -1h".into(),
        }
    }

    fn test_app(
        config: Config,
        dir: &std::path::Path,
    ) -> (App, mpsc::UnboundedReceiver<EngineMsg>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let client = Arc::new(JiraClient::new("example.invalid", "a@example.invalid", "token"));
        let app = App::new(
            config,
            UserState::default(),
            client,
            tx,
            dir.join("config.json"),
            dir.join("state.json"),
        );
        (app, rx)
    }

    /// A settings commit re-seeds the standard views only; the activity
    /// slot loads exactly once, as its own initial fetch, via the rearmed
    /// timer's immediate tick.
    #[tokio::test]
    async fn commit_reseed_leaves_the_activity_slot_to_its_own_tick() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, mut rx) = test_app(base_config(None), dir.path());

        app.commit_settings(base_config(Some(activity())));
        for tick in app.scheduler.due(Instant::now()) {
            app.handle_tick(tick);
        }
        drop(app); // closes the channel once the spawned fetches finish

        let mut global_slots = Vec::new();
        let mut activity_fetches = Vec::new();
        while let Some(msg) = rx.recv().await {
            if let EngineMsg::ViewFetched {
                kind, slot, initial, ..
            } = msg
            {
                match kind {
                    CycleKind::Global => global_slots.push(slot),
                    CycleKind::Activity => activity_fetches.push((slot, initial)),
                }
            }
        }
        assert_eq!(global_slots, vec![0]);
        assert_eq!(activity_fetches, vec![(1, true)]);
    }

    #[tokio::test]
    async fn manual_refresh_forces_every_slot_including_activity() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, mut rx) = test_app(base_config(Some(activity())), dir.path());

        app.manual_refresh();
        drop(app);

        let mut global_slots = Vec::new();
        while let Some(msg) = rx.recv().await {
            if let EngineMsg::ViewFetched {
                kind: CycleKind::Global,
                slot,
                ..
            } = msg
            {
                global_slots.push(slot);
            }
        }
        assert_eq!(global_slots, vec![0, 1]);
    }

    #[test]
    fn status_error_clears_when_the_slot_recovers() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _rx) = test_app(base_config(None), dir.path());

        app.apply_msg(EngineMsg::ViewFetched {
            epoch: 0,
            kind: CycleKind::Global,
            slot: 0,
            initial: true,
            result: Err(RemoteError::Malformed("bad payload".into())),
        });
        assert!(app.status_error.is_some());

        app.apply_msg(EngineMsg::ViewFetched {
            epoch: 0,
            kind: CycleKind::Global,
            slot: 0,
            initial: false,
            result: Ok(vec![]),
        });
        assert!(app.status_error.is_none());
    }

    #[test]
    fn status_error_survives_success_of_another_slot() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = base_config(None);
        config.views.push(ViewConfig {
            name: "Mine".into(),
            jql: "assignee = currentUser()".into(),
        });
        let (mut app, _rx) = test_app(config, dir.path());

        app.apply_msg(EngineMsg::ViewFetched {
            epoch: 0,
            kind: CycleKind::Global,
            slot: 0,
            initial: true,
            result: Err(RemoteError::Malformed("bad payload".into())),
        });
        app.apply_msg(EngineMsg::ViewFetched {
            epoch: 0,
            kind: CycleKind::Global,
            slot: 1,
            initial: true,
            result: Ok(vec![]),
        });
        assert!(app.status_error.is_some());
    }
}
