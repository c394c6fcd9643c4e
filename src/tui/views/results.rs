use crossterm::event::{Event, KeyCode};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Paragraph, Wrap},
    Frame,
};
use ratatui_textarea::TextArea;

use super::{field_text, key_press, text_field, StepInput};
use crate::core::bo3::{render_match, MatchRecord};
use crate::tui::events::Action;
use crate::tui::theme;

const SUGGESTION_TITLE: &str = "メッセージ提案";

/// State of the suggestion panel below the formatted result.
pub enum SuggestionPanel {
    Idle,
    Loading,
    Ready(TextArea<'static>),
}

pub struct ResultsState {
    pub suggestion: SuggestionPanel,
    /// Keys go to the suggestion text area while set.
    pub editing: bool,
}

impl ResultsState {
    pub fn new() -> Self {
        Self {
            suggestion: SuggestionPanel::Idle,
            editing: false,
        }
    }

    pub fn set_loading(&mut self) {
        self.suggestion = SuggestionPanel::Loading;
        self.editing = false;
    }

    pub fn set_ready(&mut self, message: &str) {
        self.suggestion = SuggestionPanel::Ready(text_field(SUGGESTION_TITLE, message, false));
        self.editing = false;
    }

    /// Drop a pending or shown suggestion.
    pub fn clear(&mut self) {
        self.suggestion = SuggestionPanel::Idle;
        self.editing = false;
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.suggestion, SuggestionPanel::Loading)
    }

    /// Suggestion text including the user's edits.
    pub fn suggestion_text(&self) -> Option<String> {
        match &self.suggestion {
            SuggestionPanel::Ready(ta) => Some(field_text(ta)),
            _ => None,
        }
    }

    pub fn handle_input(&mut self, event: &Event) -> StepInput<Action> {
        let Some(key) = key_press(event) else {
            return StepInput::Ignored;
        };

        if self.editing {
            if key.code == KeyCode::Esc {
                self.set_editing(false);
            } else if let SuggestionPanel::Ready(ta) = &mut self.suggestion {
                ta.input(event.clone());
            }
            return StepInput::Consumed;
        }

        match key.code {
            KeyCode::Char('c') => StepInput::Emit(Action::CopyResult),
            KeyCode::Char('s') => StepInput::Emit(Action::RequestSuggestion),
            KeyCode::Char('n') => StepInput::Emit(Action::NewMatch),
            KeyCode::Char('e') if self.suggestion_text().is_some() => {
                self.set_editing(true);
                StepInput::Consumed
            }
            KeyCode::Char('y') if self.suggestion_text().is_some() => {
                StepInput::Emit(Action::CopySuggestion)
            }
            _ => StepInput::Ignored,
        }
    }

    fn set_editing(&mut self, editing: bool) {
        self.editing = editing;
        if let SuggestionPanel::Ready(ta) = &mut self.suggestion {
            super::set_field_focus(ta, SUGGESTION_TITLE, editing);
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, record: &MatchRecord) {
        let block = theme::block_focused("結果確認・出力");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let output = render_match(record);
        let output_height = output.lines().count() as u16 + 2;

        let chunks = Layout::vertical([
            Constraint::Length(output_height),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(inner);

        let mut text = Text::default();
        for line in output.lines() {
            text.lines.push(Line::raw(line.to_string()));
        }
        if let Some(result) = record.overall_result {
            if let Some(last) = text.lines.last_mut() {
                *last = Line::styled(result.label(), theme::result(result));
            }
        }
        frame.render_widget(
            Paragraph::new(text).block(theme::block_default("出力")),
            chunks[0],
        );

        match &self.suggestion {
            SuggestionPanel::Idle => frame.render_widget(
                Paragraph::new(Span::styled("s でメッセージを提案", theme::muted()))
                    .block(theme::block_default(SUGGESTION_TITLE)),
                chunks[1],
            ),
            SuggestionPanel::Loading => frame.render_widget(
                Paragraph::new(Span::styled("提案を生成中…", theme::muted()))
                    .wrap(Wrap { trim: true })
                    .block(theme::block_default(SUGGESTION_TITLE)),
                chunks[1],
            ),
            SuggestionPanel::Ready(ta) => frame.render_widget(ta, chunks[1]),
        }

        let hints = if self.editing {
            vec![
                Span::styled(" EDIT ", theme::edit_badge()),
                Span::raw(" "),
                Span::styled("Esc", theme::key_hint()),
                Span::raw(":done"),
            ]
        } else {
            let mut hints = vec![
                Span::styled("c", theme::key_hint()),
                Span::raw(":copy  "),
                Span::styled("s", theme::key_hint()),
                Span::raw(":suggest  "),
            ];
            if self.suggestion_text().is_some() {
                hints.extend([
                    Span::styled("e", theme::key_hint()),
                    Span::raw(":edit  "),
                    Span::styled("y", theme::key_hint()),
                    Span::raw(":copy suggestion  "),
                ]);
            }
            hints.extend([
                Span::styled("n", theme::key_hint()),
                Span::raw(":new match  "),
                Span::styled("Esc", theme::key_hint()),
                Span::raw(":戻る"),
            ]);
            hints
        };
        frame.render_widget(Paragraph::new(Line::from(hints)), chunks[2]);
    }
}

impl Default for ResultsState {
    fn default() -> Self {
        Self::new()
    }
}
