use std::io;
use std::time::Duration;

use chrono::Datelike;
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph},
    Frame, Terminal,
};
use tokio::sync::mpsc;

use super::clipboard::{Clipboard, Osc52Clipboard};
use super::events::{Action, AppEvent, Notification, NotificationLevel};
use super::layout::AppLayout;
use super::services::Services;
use super::theme;
use super::views::class_selection::ClassSelectionState;
use super::views::game_details::GameDetailsState;
use super::views::match_info::MatchInfoState;
use super::views::results::ResultsState;
use super::views::StepInput;
use crate::core::bo3::{render_match, Bo3Wizard, WizardError, WizardStep};
use crate::core::suggestion::{SuggestionError, SuggestionInput};

const COPY_SUCCESS: &str = "結果をクリップボードにコピーしました。";
const COPY_SUGGESTION_SUCCESS: &str = "提案メッセージをクリップボードにコピーしました。";
const COPY_FAILURE: &str = "クリップボードへのコピーに失敗しました。";

/// Form state of the view for the current wizard step.
pub enum ActiveView {
    ClassSelection(ClassSelectionState),
    MatchInfo(MatchInfoState),
    Game(GameDetailsState),
    Results(ResultsState),
}

impl ActiveView {
    /// Fresh view for the wizard's current step, pre-filled from its record.
    pub fn for_wizard(wizard: &Bo3Wizard) -> Self {
        let record = wizard.record();
        match wizard.step() {
            WizardStep::ClassSelection => {
                ActiveView::ClassSelection(ClassSelectionState::from_record(record))
            }
            WizardStep::MatchInfo => ActiveView::MatchInfo(MatchInfoState::from_record(record)),
            WizardStep::Game1 | WizardStep::Game2 | WizardStep::Game3 => {
                match wizard.step().game() {
                    Some(game) => ActiveView::Game(GameDetailsState::new(game, wizard)),
                    None => ActiveView::Results(ResultsState::new()),
                }
            }
            WizardStep::Results => ActiveView::Results(ResultsState::new()),
        }
    }

    fn set_error(&mut self, message: String) {
        match self {
            ActiveView::ClassSelection(view) => view.error = Some(message),
            ActiveView::MatchInfo(view) => view.error = Some(message),
            ActiveView::Game(view) => view.error = Some(message),
            ActiveView::Results(_) => {}
        }
    }
}

/// Central application state (Elm architecture).
pub struct AppState {
    /// Whether the app is still running.
    pub running: bool,
    /// Match being recorded.
    pub wizard: Bo3Wizard,
    /// View for the current step.
    pub view: ActiveView,
    /// Active notifications (max 3 visible).
    pub notifications: Vec<Notification>,
    /// Monotonic counter for notification IDs.
    notification_counter: u64,
    /// Whether the help modal is open.
    pub show_help: bool,
    /// Last issued suggestion request id.
    suggestion_seq: u64,
    /// Request whose answer is still wanted; anything else is stale.
    pending_suggestion: Option<u64>,
    /// Receiver for backend events.
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    /// Backend services handle.
    services: Services,
    clipboard: Box<dyn Clipboard>,
}

impl AppState {
    pub fn new(event_rx: mpsc::UnboundedReceiver<AppEvent>, services: Services) -> Self {
        let wizard = Bo3Wizard::new();
        Self {
            running: true,
            view: ActiveView::for_wizard(&wizard),
            wizard,
            notifications: Vec::new(),
            notification_counter: 0,
            show_help: false,
            suggestion_seq: 0,
            pending_suggestion: None,
            event_rx,
            services,
            clipboard: Box::new(Osc52Clipboard),
        }
    }

    /// Replace the clipboard sink.
    pub fn with_clipboard(mut self, clipboard: Box<dyn Clipboard>) -> Self {
        self.clipboard = clipboard;
        self
    }

    // ── Elm event loop ──────────────────────────────────────────────────

    /// Main event loop: render → select → update → loop.
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        tick_rate: Duration,
    ) -> io::Result<()> {
        let mut tick_interval = tokio::time::interval(tick_rate);
        let mut event_stream = EventStream::new();

        while self.running {
            terminal.draw(|frame| self.render(frame))?;

            tokio::select! {
                _ = tick_interval.tick() => {
                    self.on_tick();
                }
                Some(event) = self.event_rx.recv() => {
                    self.handle_event(event);
                }
                Some(Ok(crossterm_event)) = event_stream.next() => {
                    self.handle_event(AppEvent::Input(crossterm_event));
                }
            }
        }

        Ok(())
    }

    // ── Event handling ──────────────────────────────────────────────────

    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Input(crossterm_event) => self.handle_input(crossterm_event),
            AppEvent::SuggestionReady {
                request_id,
                message,
            } => {
                if !self.take_pending(request_id) {
                    return;
                }
                if let ActiveView::Results(view) = &mut self.view {
                    view.set_ready(&message);
                }
            }
            AppEvent::SuggestionFailed { request_id, error } => {
                if !self.take_pending(request_id) {
                    return;
                }
                if let ActiveView::Results(view) = &mut self.view {
                    view.clear();
                }
                self.push_notification(error, NotificationLevel::Error);
            }
        }
    }

    fn handle_input(&mut self, event: Event) {
        // Priority 1: Help modal
        if self.show_help {
            if let Some(action) = self.map_help_input(&event) {
                self.handle_action(action);
            }
            return;
        }

        // Priority 2: Keys that work even inside text fields
        if let Some(action) = self.map_global_input(&event) {
            self.handle_action(action);
            return;
        }

        // Priority 3: Step view
        if self.dispatch_view_input(&event) {
            return;
        }

        // Priority 4: Fallback keybindings
        if let Some(action) = self.map_fallback_input(&event) {
            self.handle_action(action);
        }
    }

    /// Route input to the step view. Returns true if consumed.
    fn dispatch_view_input(&mut self, event: &Event) -> bool {
        match &mut self.view {
            ActiveView::ClassSelection(view) => match view.handle_input(event) {
                StepInput::Ignored => false,
                StepInput::Consumed => true,
                StepInput::Emit(classes) => {
                    let outcome = self.wizard.select_classes(&classes);
                    self.apply_submission(outcome);
                    true
                }
            },
            ActiveView::MatchInfo(view) => match view.handle_input(event) {
                StepInput::Ignored => false,
                StepInput::Consumed => true,
                StepInput::Emit((round_label, opponent_name)) => {
                    let outcome = self.wizard.submit_match_info(&round_label, &opponent_name);
                    self.apply_submission(outcome);
                    true
                }
            },
            ActiveView::Game(view) => {
                let game = view.game;
                match view.handle_input(event, &self.wizard) {
                    StepInput::Ignored => false,
                    StepInput::Consumed => true,
                    StepInput::Emit(draft) => {
                        let outcome = self.wizard.submit_game(game, draft);
                        self.apply_submission(outcome);
                        true
                    }
                }
            }
            ActiveView::Results(view) => match view.handle_input(event) {
                StepInput::Ignored => false,
                StepInput::Consumed => true,
                StepInput::Emit(action) => {
                    self.handle_action(action);
                    true
                }
            },
        }
    }

    /// Swap the view on success; show the message in place on failure.
    fn apply_submission(&mut self, outcome: Result<WizardStep, WizardError>) {
        match outcome {
            Ok(step) => {
                log::debug!("Wizard advanced to {step}");
                self.sync_view();
            }
            Err(e) => {
                log::debug!("Submission rejected: {e}");
                self.view.set_error(e.user_message().to_string());
            }
        }
    }

    /// Rebuild the view after the wizard step changed.
    fn sync_view(&mut self) {
        if self.wizard.step() != WizardStep::Results {
            self.pending_suggestion = None;
        }
        self.view = ActiveView::for_wizard(&self.wizard);
    }

    /// Consume `request_id` if it is the outstanding request.
    fn take_pending(&mut self, request_id: u64) -> bool {
        if self.pending_suggestion == Some(request_id) {
            self.pending_suggestion = None;
            true
        } else {
            log::debug!("Ignoring stale suggestion response {request_id}");
            false
        }
    }

    // ── Input mapping ───────────────────────────────────────────────────

    /// Map help modal input to action.
    fn map_help_input(&self, event: &Event) -> Option<Action> {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return None;
        };

        match (*modifiers, *code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('q')) => Some(Action::Quit),
            (_, KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?')) => Some(Action::CloseHelp),
            _ => None,
        }
    }

    fn map_global_input(&self, event: &Event) -> Option<Action> {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return None;
        };

        match (*modifiers, *code) {
            // Ctrl+C / Ctrl+Q → quit
            (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('q')) => Some(Action::Quit),
            // Ctrl+R → start over
            (KeyModifiers::CONTROL, KeyCode::Char('r')) => Some(Action::Reset),
            (_, KeyCode::F(1)) => Some(Action::ShowHelp),
            _ => None,
        }
    }

    /// Keys the step view left alone.
    fn map_fallback_input(&self, event: &Event) -> Option<Action> {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return None;
        };

        match (*modifiers, *code) {
            (_, KeyCode::Esc) => Some(Action::Back),
            // Text fields consume '?' before it gets here
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char('?')) => Some(Action::ShowHelp),
            _ => None,
        }
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::Back => {
                let from = self.wizard.step();
                // The first step has no predecessor; keep its unsaved picks
                if self.wizard.back() != from {
                    self.sync_view();
                }
            }
            Action::Reset | Action::NewMatch => {
                self.wizard.reset();
                self.sync_view();
            }
            Action::ShowHelp => self.show_help = true,
            Action::CloseHelp => self.show_help = false,
            Action::CopyResult => {
                let output = render_match(self.wizard.record());
                self.copy_to_clipboard(&output, COPY_SUCCESS);
            }
            Action::CopySuggestion => {
                let text = match &self.view {
                    ActiveView::Results(view) => view.suggestion_text(),
                    _ => None,
                };
                if let Some(text) = text {
                    self.copy_to_clipboard(&text, COPY_SUGGESTION_SUCCESS);
                }
            }
            Action::RequestSuggestion => self.request_suggestion(),
        }
    }

    fn copy_to_clipboard(&mut self, text: &str, success: &str) {
        match self.clipboard.copy(text) {
            Ok(()) => self.push_notification(success.to_string(), NotificationLevel::Success),
            Err(e) => {
                log::warn!("Clipboard write failed: {e}");
                self.push_notification(COPY_FAILURE.to_string(), NotificationLevel::Error);
            }
        }
    }

    fn request_suggestion(&mut self) {
        let ActiveView::Results(view) = &self.view else {
            return;
        };
        if view.is_loading() {
            return;
        }

        let input = match SuggestionInput::try_from(self.wizard.record()) {
            Ok(input) => input,
            Err(e) => {
                self.push_notification(e.user_message().to_string(), NotificationLevel::Warning);
                return;
            }
        };
        if !self.services.suggestion_available() {
            self.push_notification(
                SuggestionError::NotConfigured.user_message().to_string(),
                NotificationLevel::Warning,
            );
            return;
        }

        self.suggestion_seq += 1;
        let request_id = self.suggestion_seq;
        match self.services.request_suggestion(request_id, input) {
            Ok(()) => {
                self.pending_suggestion = Some(request_id);
                if let ActiveView::Results(view) = &mut self.view {
                    view.set_loading();
                }
            }
            Err(e) => {
                self.push_notification(e.user_message().to_string(), NotificationLevel::Error);
            }
        }
    }

    // ── Notifications ───────────────────────────────────────────────────

    /// Push a notification (dedup by message, max 3).
    pub fn push_notification(&mut self, message: String, level: NotificationLevel) {
        if self.notifications.iter().any(|n| n.message == message) {
            return;
        }

        self.notification_counter += 1;
        self.notifications.push(Notification {
            id: self.notification_counter,
            message,
            level,
            ttl_ticks: 100,
        });

        while self.notifications.len() > 3 {
            self.notifications.remove(0);
        }
    }

    /// Tick: decrement notification TTLs, dismiss expired.
    fn on_tick(&mut self) {
        for n in &mut self.notifications {
            n.ttl_ticks = n.ttl_ticks.saturating_sub(1);
        }
        self.notifications.retain(|n| n.ttl_ticks > 0);
    }

    // ── Rendering ───────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let layout = AppLayout::compute(area);

        self.render_header(frame, layout.header);
        self.render_progress(frame, layout.progress);

        match &self.view {
            ActiveView::ClassSelection(view) => view.render(frame, layout.main),
            ActiveView::MatchInfo(view) => view.render(frame, layout.main),
            ActiveView::Game(view) => view.render(frame, layout.main, &self.wizard),
            ActiveView::Results(view) => view.render(frame, layout.main, self.wizard.record()),
        }

        self.render_status_bar(frame, layout.status);

        // Overlays
        self.render_notifications(frame, area);
        if self.show_help {
            self.render_help_modal(frame, area);
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let step = self.wizard.step();
        let header = Line::from(vec![
            Span::styled(" BO3 Assistant ", theme::brand_badge()),
            Span::raw(" "),
            Span::styled(step.title(), theme::title()),
        ]);
        frame.render_widget(Paragraph::new(header), area);
    }

    fn render_progress(&self, frame: &mut Frame, area: Rect) {
        let percent = self.wizard.step().progress_percent();
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(theme::PRIMARY).bg(theme::BG_BASE))
            .percent(percent)
            .label(format!("{percent}%"));
        frame.render_widget(gauge, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let llm_status = if self.pending_suggestion.is_some() {
            Span::styled("generating", Style::default().fg(theme::PRIMARY_LIGHT))
        } else if self.services.suggestion_available() {
            Span::styled("ready", theme::muted())
        } else {
            Span::styled("off", Style::default().fg(theme::TEXT_DIM))
        };

        let year = chrono::Local::now().year();
        let status = Line::from(vec![
            Span::styled("LLM:", theme::key_hint()),
            Span::raw(" "),
            llm_status,
            Span::raw(" │ "),
            Span::styled("Esc", theme::key_hint()),
            Span::raw(":back "),
            Span::styled("Ctrl+R", theme::key_hint()),
            Span::raw(":reset "),
            Span::styled("F1", theme::key_hint()),
            Span::raw(":help "),
            Span::styled("Ctrl+Q", theme::key_hint()),
            Span::raw(":quit"),
            Span::styled(format!("  © {year} bo3-assistant"), theme::muted()),
        ]);
        frame.render_widget(Paragraph::new(status), area);
    }

    fn render_notifications(&self, frame: &mut Frame, area: Rect) {
        if self.notifications.is_empty() {
            return;
        }

        let max_width = 50.min(area.width.saturating_sub(2));
        let height = self.notifications.len() as u16;
        let x = area.width.saturating_sub(max_width + 1);
        let y = 1;

        let notification_area = Rect::new(x, y, max_width, height);

        let lines: Vec<Line> = self
            .notifications
            .iter()
            .map(|n| {
                let (prefix, color) = match n.level {
                    NotificationLevel::Info => ("ℹ", theme::INFO),
                    NotificationLevel::Success => ("✓", theme::SUCCESS),
                    NotificationLevel::Warning => ("⚠", theme::WARNING),
                    NotificationLevel::Error => ("✗", theme::ERROR),
                };
                Line::from(vec![
                    Span::styled(
                        format!(" {prefix} "),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(n.message.as_str(), Style::default().fg(theme::TEXT)),
                ])
            })
            .collect();

        frame.render_widget(Clear, notification_area);
        frame.render_widget(
            Paragraph::new(lines).style(Style::default().bg(theme::BG_BASE)),
            notification_area,
        );
    }

    fn render_help_modal(&self, frame: &mut Frame, area: Rect) {
        let modal = centered_rect(60, 80, area);

        let keybindings = vec![
            ("Global:", ""),
            ("Esc", "Back to the previous step"),
            ("Ctrl+R", "Start a new match"),
            ("F1 / ?", "Toggle this help"),
            ("Ctrl+C / Ctrl+Q", "Quit"),
            ("", ""),
            ("Class selection:", ""),
            ("j/k, ↑/↓", "Move cursor"),
            ("Space", "Toggle class (two max)"),
            ("Enter", "Confirm"),
            ("", ""),
            ("Match info:", ""),
            ("Tab", "Switch field"),
            ("Enter", "Next field / confirm"),
            ("", ""),
            ("Game:", ""),
            ("Tab, ↑/↓", "Move between fields"),
            ("←/→", "Change choice"),
            ("Enter / Ctrl+S", "Submit (Ctrl+S inside the memo)"),
            ("", ""),
            ("Results:", ""),
            ("c", "Copy result"),
            ("s", "Suggest a post-match message"),
            ("e / y", "Edit / copy the suggestion"),
            ("n", "New match"),
        ];

        let lines: Vec<Line> = keybindings
            .into_iter()
            .map(|(key, desc)| {
                if desc.is_empty() {
                    Line::from(Span::styled(key, theme::heading()))
                } else {
                    Line::from(vec![
                        Span::styled(format!("  {key:<18}"), theme::key_hint()),
                        Span::raw(desc),
                    ])
                }
            })
            .collect();

        let block = Block::default()
            .title(" Help ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(theme::border_focused());

        frame.render_widget(Clear, modal);
        frame.render_widget(Paragraph::new(lines).block(block), modal);
    }
}

/// Create a centered rectangle with given percentage width/height.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(area);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}
