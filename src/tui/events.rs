/// Events flowing through the Elm-architecture event loop.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Raw terminal input (keyboard/mouse).
    Input(crossterm::event::Event),
    /// A suggestion request finished with a message.
    SuggestionReady { request_id: u64, message: String },
    /// A suggestion request failed; `error` is user-facing text.
    SuggestionFailed { request_id: u64, error: String },
}

/// High-level actions dispatched by the input mapper or the step views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // Wizard navigation
    Back,
    Reset,
    NewMatch,

    // Results
    CopyResult,
    RequestSuggestion,
    CopySuggestion,

    // Modals
    ShowHelp,
    CloseHelp,

    // Application
    Quit,
}

/// Notification level for the overlay system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A timed notification shown in the overlay.
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub level: NotificationLevel,
    /// Ticks remaining before auto-dismiss.
    pub ttl_ticks: u32,
}
