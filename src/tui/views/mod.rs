//! One view per wizard step.
//!
//! Views own only transient form state (cursor, focused field, text areas).
//! The match itself lives in [`Bo3Wizard`](crate::core::bo3::Bo3Wizard);
//! a view reports a completed form to the app, which submits it and swaps
//! the view when the step changes.

pub mod class_selection;
pub mod game_details;
pub mod match_info;
pub mod results;

use crossterm::event::{Event, KeyEvent, KeyEventKind};
use ratatui::style::Style;
use ratatui_textarea::{CursorMove, TextArea};

use super::theme;

/// Outcome of routing one input event to a step view.
#[derive(Debug, Clone, PartialEq)]
pub enum StepInput<T> {
    /// Not handled; fall through to global keybindings.
    Ignored,
    /// Handled; nothing else to do.
    Consumed,
    /// The view produced a value for the app to act on.
    Emit(T),
}

/// Key press events only; repeats and releases are dropped.
pub(crate) fn key_press(event: &Event) -> Option<KeyEvent> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(*key),
        _ => None,
    }
}

/// Text area pre-filled with `text`, cursor at the end.
pub(crate) fn text_field(title: &'static str, text: &str, focused: bool) -> TextArea<'static> {
    let lines: Vec<String> = text.lines().map(str::to_string).collect();
    let mut ta = if lines.is_empty() {
        TextArea::default()
    } else {
        TextArea::new(lines)
    };
    ta.move_cursor(CursorMove::Bottom);
    ta.move_cursor(CursorMove::End);
    ta.set_cursor_line_style(Style::default());
    set_field_focus(&mut ta, title, focused);
    ta
}

pub(crate) fn set_field_focus(ta: &mut TextArea<'static>, title: &'static str, focused: bool) {
    ta.set_block(theme::block(title, focused));
}

/// Text area contents with lines joined by `\n`.
pub(crate) fn field_text(ta: &TextArea<'_>) -> String {
    ta.lines().join("\n")
}
