//! TUI module - Terminal dashboard with ratatui
//!
//! The UI thread owns the [`WorkoutStore`]. AI calls run as tokio tasks and
//! report back over a channel that is drained once per tick, so every store
//! mutation still happens on this thread.

mod input;
mod render;

use std::io::{Stdout, stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use tokio::runtime::Handle;
use tokio::sync::{Mutex, mpsc, watch};
use tracing::{info, warn};

use crate::coach::{
    self, ChatLog, ChatSession, CoachError, GeminiClient, ImagePayload, SUGGEST_ERROR,
    SearchResult,
};
use crate::config::{Preferences, Theme};
use crate::exercises::LibraryFilter;
use crate::form::{Field, FormEditor, Submitted};
use crate::store::{EntryId, Snapshot, Weekday, WorkoutStore};

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Splash screen lifetime
const SPLASH: Duration = Duration::from_millis(2500);
/// Lifetime of the completion celebration
pub const CELEBRATION: Duration = Duration::from_millis(1200);

/// Which panel is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Tracker,
    Coach,
    Search,
    Analytics,
    Library,
}

impl View {
    pub fn all() -> &'static [View] {
        &[View::Tracker, View::Coach, View::Search, View::Analytics, View::Library]
    }

    pub fn title(&self) -> &'static str {
        match self {
            View::Tracker => "Tracker",
            View::Coach => "AI Coach",
            View::Search => "Web Search",
            View::Analytics => "Analytics",
            View::Library => "Library",
        }
    }
}

/// Tracker pane receiving keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Form,
    Routine,
}

/// Results coming back from background tasks
#[derive(Debug)]
pub enum CoachEvent {
    Suggestions(Result<Vec<String>, CoachError>),
    ChatReply(Result<String, CoachError>),
    Search(Result<SearchResult, CoachError>),
    Feedback { id: EntryId, result: Result<String, CoachError> },
    Media { day: Weekday, id: EntryId, url: String },
}

/// Form-feedback modal for one entry
#[derive(Debug, Clone)]
pub struct FeedbackModal {
    pub id: EntryId,
    pub exercise: String,
    pub image_path: String,
    pub feedback: Option<String>,
    pub loading: bool,
}

/// App state for TUI
pub struct App {
    pub(crate) store: WorkoutStore,
    pub(crate) routine: watch::Receiver<Snapshot>,
    pub(crate) snapshot: Snapshot,
    pub(crate) form: FormEditor,
    pub(crate) active_field: Field,
    pub(crate) pane: Pane,
    pub(crate) selected: usize,
    pub(crate) view: View,
    pub(crate) theme: Theme,
    prefs: Option<Preferences>,
    client: GeminiClient,
    chat: Arc<Mutex<ChatSession>>,
    pub(crate) chat_log: ChatLog,
    pub(crate) chat_input: String,
    pub(crate) chat_loading: bool,
    pub(crate) search_input: String,
    pub(crate) search_result: Option<SearchResult>,
    pub(crate) search_loading: bool,
    pub(crate) suggestions: Vec<String>,
    pub(crate) suggesting: bool,
    pub(crate) media_pending: usize,
    pub(crate) feedback: Option<FeedbackModal>,
    pub(crate) library_filter: LibraryFilter,
    pub(crate) celebration: Option<(EntryId, Instant)>,
    pub(crate) confirm_clear: bool,
    pub(crate) status: Option<String>,
    pub(crate) started: Instant,
    runtime: Handle,
    tx: mpsc::UnboundedSender<CoachEvent>,
    rx: mpsc::UnboundedReceiver<CoachEvent>,
    should_quit: bool,
}

impl App {
    /// Must be called from within a tokio runtime
    pub fn new(client: GeminiClient, prefs: Option<Preferences>) -> Self {
        let theme = prefs.as_ref().map(Preferences::load_theme).unwrap_or_default();
        let store = WorkoutStore::new();
        let routine = store.subscribe();
        let snapshot = store.snapshot();
        let (tx, rx) = mpsc::unbounded_channel();

        Self {
            store,
            routine,
            snapshot,
            form: FormEditor::new(),
            active_field: Field::Focus,
            pane: Pane::Form,
            selected: 0,
            view: View::Tracker,
            theme,
            prefs,
            chat: Arc::new(Mutex::new(ChatSession::new(client.clone()))),
            client,
            chat_log: ChatLog::default(),
            chat_input: String::new(),
            chat_loading: false,
            search_input: String::new(),
            search_result: None,
            search_loading: false,
            suggestions: Vec::new(),
            suggesting: false,
            media_pending: 0,
            feedback: None,
            library_filter: LibraryFilter::default(),
            celebration: None,
            confirm_clear: false,
            status: None,
            started: Instant::now(),
            runtime: Handle::current(),
            tx,
            rx,
            should_quit: false,
        }
    }

    /// Run the TUI application
    pub fn run(&mut self) -> Result<()> {
        let mut terminal = init_terminal()?;
        info!("TUI started");

        let result = self.event_loop(&mut terminal);

        restore_terminal()?;
        result
    }

    fn event_loop(&mut self, terminal: &mut Tui) -> Result<()> {
        while !self.should_quit() {
            self.tick();
            terminal.draw(|frame| render::draw(self, frame))?;
            self.handle_events()?;
        }
        Ok(())
    }

    /// Apply finished background work and expire transient state
    pub(crate) fn tick(&mut self) {
        self.drain_events();
        self.refresh_snapshot();
        if self
            .celebration
            .is_some_and(|(_, at)| at.elapsed() >= CELEBRATION)
        {
            self.celebration = None;
        }
    }

    pub(crate) fn splash_active(&self) -> bool {
        self.started.elapsed() < SPLASH
    }

    fn handle_events(&mut self) -> Result<()> {
        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            self.handle_key(key);
        }
        Ok(())
    }

    pub(crate) fn quit(&mut self) {
        self.should_quit = true;
    }

    pub(crate) fn should_quit(&self) -> bool {
        self.should_quit
    }

    fn refresh_snapshot(&mut self) {
        if self.routine.has_changed().unwrap_or(false) {
            self.snapshot = self.routine.borrow_and_update().clone();
            let rows = self.routine_rows().len();
            self.selected = self.selected.min(rows.saturating_sub(1));
        }
    }

    /// Entries in display order: days as planned, exercises as added
    pub(crate) fn routine_rows(&self) -> Vec<(Weekday, EntryId)> {
        self.snapshot
            .days()
            .flat_map(|(day, plan)| plan.exercises.iter().map(move |e| (day, e.id)))
            .collect()
    }

    pub(crate) fn selected_row(&self) -> Option<(Weekday, EntryId)> {
        self.routine_rows().get(self.selected).copied()
    }

    pub(crate) fn drain_events(&mut self) {
        while let Ok(event) = self.rx.try_recv() {
            self.apply_event(event);
        }
    }

    fn apply_event(&mut self, event: CoachEvent) {
        match event {
            CoachEvent::Suggestions(result) => {
                self.suggesting = false;
                match result {
                    Ok(list) => self.suggestions = list,
                    Err(e) => {
                        warn!("Error fetching suggestions: {}", e);
                        self.status = Some(SUGGEST_ERROR.to_string());
                    }
                }
            }
            CoachEvent::ChatReply(result) => {
                self.chat_loading = false;
                self.chat_log.push_model(coach::reply_or_fallback(result));
            }
            CoachEvent::Search(result) => {
                self.search_loading = false;
                self.search_result = Some(coach::search_or_fallback(result));
            }
            CoachEvent::Feedback { id, result } => {
                let Some(modal) = self.feedback.as_mut().filter(|m| m.id == id) else {
                    return;
                };
                modal.loading = false;
                match result {
                    Err(CoachError::Image(e)) => {
                        self.status = Some(format!("Could not read image: {e}"));
                    }
                    other => modal.feedback = Some(coach::feedback_or_fallback(other)),
                }
            }
            CoachEvent::Media { day, id, url } => {
                self.media_pending = self.media_pending.saturating_sub(1);
                self.store.attach_media(day, id, url);
            }
        }
    }

    // --- actions ---

    pub(crate) fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        if let Some(prefs) = &self.prefs
            && let Err(e) = prefs.save_theme(self.theme)
        {
            warn!("Failed to save theme: {:#}", e);
        }
    }

    pub(crate) fn submit_form(&mut self) {
        if !self.form.is_editing() && self.media_pending > 0 {
            return;
        }
        match self.form.submit(&mut self.store) {
            Ok(Submitted::Added { day, id, name }) => {
                self.status = None;
                self.suggestions.clear();
                self.active_field = Field::Exercise;
                self.media_pending += 1;
                let tx = self.tx.clone();
                self.runtime.spawn(async move {
                    let url = coach::resolve_media_url(&name).await;
                    let _ = tx.send(CoachEvent::Media { day, id, url });
                });
            }
            Ok(Submitted::Updated { .. }) => {
                self.status = Some("Exercise updated".to_string());
                self.active_field = Field::Exercise;
            }
            Err(e) => self.status = Some(e.to_string()),
        }
        self.refresh_snapshot();
    }

    pub(crate) fn cancel_edit(&mut self) {
        self.form.cancel(&self.snapshot);
        self.active_field = Field::Exercise;
    }

    pub(crate) fn start_edit_selected(&mut self) {
        if let Some((day, id)) = self.selected_row()
            && self.form.start_edit(&self.snapshot, day, id)
        {
            self.pane = Pane::Form;
            self.active_field = Field::Exercise;
        }
    }

    pub(crate) fn toggle_selected(&mut self) {
        let Some((day, id)) = self.selected_row() else {
            return;
        };
        let (_, just_completed) = self.store.toggle_completion(day, id);
        if just_completed {
            self.celebration = Some((id, Instant::now()));
        }
        self.refresh_snapshot();
    }

    pub(crate) fn clear_routine(&mut self) {
        self.store.clear_all();
        self.confirm_clear = false;
        if self.form.is_editing() {
            self.form.cancel(&self.store.snapshot());
        }
        self.refresh_snapshot();
        self.form.select_day(&self.snapshot, self.form.day());
    }

    pub(crate) fn select_day(&mut self, day: Weekday) {
        self.form.select_day(&self.snapshot, day);
    }

    pub(crate) fn request_suggestions(&mut self) {
        if self.suggesting {
            return;
        }
        let focus = self.form.focus.trim().to_string();
        if focus.is_empty() {
            self.status = Some(CoachError::MissingFocus.to_string());
            return;
        }
        self.suggesting = true;
        self.suggestions.clear();
        let client = self.client.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = client.suggest_exercises(&focus).await;
            let _ = tx.send(CoachEvent::Suggestions(result));
        });
    }

    pub(crate) fn apply_suggestion(&mut self, index: usize) {
        if let Some(name) = self.suggestions.get(index).cloned() {
            self.form.apply_suggestion(&name);
            self.suggestions.clear();
        }
    }

    pub(crate) fn send_chat(&mut self, message: String) {
        if self.chat_loading || message.trim().is_empty() {
            return;
        }
        self.chat_log.push_user(message.clone());
        self.chat_input.clear();
        self.chat_loading = true;
        let chat = self.chat.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = chat.lock().await.send(&message).await;
            let _ = tx.send(CoachEvent::ChatReply(result));
        });
    }

    pub(crate) fn run_search(&mut self) {
        let query = self.search_input.trim().to_string();
        if self.search_loading || query.is_empty() {
            return;
        }
        self.search_loading = true;
        self.search_result = None;
        let client = self.client.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = client.grounded_search(&query).await;
            let _ = tx.send(CoachEvent::Search(result));
        });
    }

    pub(crate) fn open_feedback(&mut self) {
        let Some((day, id)) = self.selected_row() else {
            return;
        };
        if let Some(entry) = self.snapshot.entry(day, id) {
            self.feedback = Some(FeedbackModal {
                id,
                exercise: entry.name.clone(),
                image_path: String::new(),
                feedback: None,
                loading: false,
            });
        }
    }

    pub(crate) fn request_feedback(&mut self) {
        let Some(modal) = self.feedback.as_mut() else {
            return;
        };
        let path = modal.image_path.trim().to_string();
        if modal.loading || path.is_empty() {
            return;
        }
        modal.loading = true;
        modal.feedback = None;
        let id = modal.id;
        let exercise = modal.exercise.clone();
        let client = self.client.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = match ImagePayload::from_path(std::path::Path::new(&path)).await {
                Ok(image) => client.form_feedback(&exercise, &image).await,
                Err(e) => Err(e),
            };
            let _ = tx.send(CoachEvent::Feedback { id, result });
        });
    }
}

fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    Ok(terminal)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coach::CoachSettings;

    pub(super) fn app() -> App {
        let mut app = App::new(GeminiClient::new(CoachSettings::default()), None);
        app.started = Instant::now() - SPLASH;
        app
    }

    pub(super) async fn settle(app: &mut App) {
        for _ in 0..20 {
            tokio::task::yield_now().await;
            app.tick();
        }
    }

    fn fill(app: &mut App, focus: &str, name: &str) {
        app.form.focus = focus.into();
        app.form.exercise = name.into();
        app.form.sets = "3".into();
        app.form.reps = "12".into();
        app.form.weight = "50kg".into();
        app.form.duration = "10m".into();
        app.form.intensity = "Medium".into();
    }

    #[tokio::test]
    async fn test_added_entry_gets_media_later() {
        let mut app = app();
        fill(&mut app, "Legs", "Squat");
        app.submit_form();

        let (day, id) = app.selected_row().unwrap();
        assert_eq!(day, Weekday::Monday);
        assert!(app.snapshot.entry(day, id).unwrap().media_url.is_none());
        assert_eq!(app.media_pending, 1);

        settle(&mut app).await;
        let url = app.snapshot.entry(day, id).unwrap().media_url.clone().unwrap();
        assert!(url.contains("squat,gym"));
        assert_eq!(app.media_pending, 0);
    }

    #[tokio::test]
    async fn test_add_is_blocked_while_media_is_loading() {
        let mut app = app();
        fill(&mut app, "Legs", "Squat");
        app.submit_form();

        fill(&mut app, "Legs", "Lunge");
        app.submit_form();
        assert_eq!(app.routine_rows().len(), 1);
        assert_eq!(app.form.exercise, "Lunge");

        settle(&mut app).await;
        app.submit_form();
        assert_eq!(app.routine_rows().len(), 2);
    }

    #[tokio::test]
    async fn test_toggle_starts_celebration_only_on_completion() {
        let mut app = app();
        fill(&mut app, "Legs", "Squat");
        app.submit_form();

        app.toggle_selected();
        let (_, id) = app.selected_row().unwrap();
        assert_eq!(app.celebration.map(|(c, _)| c), Some(id));

        app.celebration = None;
        app.toggle_selected();
        assert!(app.celebration.is_none());
    }

    #[tokio::test]
    async fn test_celebration_expires() {
        let mut app = app();
        app.celebration = Some((EntryId(1), Instant::now() - CELEBRATION));
        app.tick();
        assert!(app.celebration.is_none());
    }

    #[tokio::test]
    async fn test_validation_error_reaches_status() {
        let mut app = app();
        app.form.focus = "Legs".into();
        app.submit_form();
        assert!(app.status.as_deref().unwrap().starts_with("Please fill out all fields"));
        assert!(app.snapshot.is_empty());
    }

    #[tokio::test]
    async fn test_suggestions_need_focus() {
        let mut app = app();
        app.request_suggestions();
        assert!(!app.suggesting);
        assert_eq!(
            app.status.as_deref(),
            Some("Please enter a Workout Focus first to get suggestions.")
        );
    }

    #[tokio::test]
    async fn test_failed_chat_appends_fallback() {
        let mut app = app();
        app.send_chat("hi coach".into());
        assert!(app.chat_loading);

        // a second message while waiting is refused
        app.send_chat("are you there?".into());
        assert_eq!(app.chat_log.messages().len(), 1);

        settle(&mut app).await;
        assert!(!app.chat_loading);
        let last = app.chat_log.messages().last().unwrap();
        assert_eq!(last.text, coach::CHAT_FALLBACK);
    }

    #[tokio::test]
    async fn test_failed_search_sets_fallback_result() {
        let mut app = app();
        app.search_input = "best rep range".into();
        app.run_search();
        settle(&mut app).await;
        assert_eq!(app.search_result, Some(SearchResult::fallback()));
    }

    #[tokio::test]
    async fn test_clear_routine_resets_form_focus() {
        let mut app = app();
        fill(&mut app, "Legs", "Squat");
        app.submit_form();
        app.start_edit_selected();
        assert!(app.form.is_editing());

        app.clear_routine();
        assert!(app.snapshot.is_empty());
        assert!(!app.form.is_editing());
        assert!(app.form.focus.is_empty());
        assert!(app.selected_row().is_none());
    }

    #[tokio::test]
    async fn test_feedback_with_missing_image_reports_status() {
        let mut app = app();
        fill(&mut app, "Legs", "Squat");
        app.submit_form();
        app.open_feedback();
        app.feedback.as_mut().unwrap().image_path = "/no/such/photo.jpg".into();
        app.request_feedback();

        settle(&mut app).await;
        let modal = app.feedback.as_ref().unwrap();
        assert!(!modal.loading);
        assert!(modal.feedback.is_none());
        assert!(app.status.as_deref().unwrap().starts_with("Could not read image"));
    }
}
