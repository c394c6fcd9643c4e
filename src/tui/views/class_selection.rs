use crossterm::event::{Event, KeyCode};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};

use super::{key_press, StepInput};
use crate::core::bo3::{CardClass, MatchRecord};
use crate::tui::theme;

/// Maximum number of classes that can be brought to a match.
const PICK_COUNT: usize = 2;

/// Class picker: cursor over the seven classes, up to two toggled on.
pub struct ClassSelectionState {
    pub cursor: usize,
    /// Toggled classes, in the order they were picked.
    pub picked: Vec<CardClass>,
    pub error: Option<String>,
}

impl ClassSelectionState {
    pub fn new() -> Self {
        Self {
            cursor: 0,
            picked: Vec::with_capacity(PICK_COUNT),
            error: None,
        }
    }

    /// Picker restored from an earlier confirmation.
    pub fn from_record(record: &MatchRecord) -> Self {
        let mut state = Self::new();
        if let Some(pair) = record.classes {
            state.picked = pair.as_array().to_vec();
            state.cursor = pair.first().index();
        }
        state
    }

    pub fn handle_input(&mut self, event: &Event) -> StepInput<Vec<CardClass>> {
        let Some(key) = key_press(event) else {
            return StepInput::Ignored;
        };

        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.cursor = (self.cursor + 1) % CardClass::ALL.len();
                StepInput::Consumed
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.cursor = (self.cursor + CardClass::ALL.len() - 1) % CardClass::ALL.len();
                StepInput::Consumed
            }
            KeyCode::Char(' ') => {
                self.toggle(CardClass::ALL[self.cursor]);
                StepInput::Consumed
            }
            KeyCode::Enter => StepInput::Emit(self.picked.clone()),
            _ => StepInput::Ignored,
        }
    }

    /// Toggle `class`; picking a third class is ignored.
    pub fn toggle(&mut self, class: CardClass) {
        if let Some(pos) = self.picked.iter().position(|&c| c == class) {
            self.picked.remove(pos);
        } else if self.picked.len() < PICK_COUNT {
            self.picked.push(class);
        }
        self.error = None;
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = theme::block_focused("使用するクラスを2つ選択");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::vertical([
            Constraint::Length(CardClass::ALL.len() as u16),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(inner);

        let items: Vec<ListItem> = CardClass::ALL
            .iter()
            .map(|class| {
                let (mark, style) = match self.picked.iter().position(|c| c == class) {
                    Some(n) => (format!("[{}]", n + 1), theme::selected()),
                    None if self.picked.len() >= PICK_COUNT => ("[ ]".to_string(), theme::muted()),
                    None => ("[ ]".to_string(), ratatui::style::Style::default()),
                };
                ListItem::new(Line::from(vec![
                    Span::raw(format!("{mark} ")),
                    Span::styled(class.label(), style),
                ]))
            })
            .collect();

        let list = List::new(items)
            .highlight_style(theme::title())
            .highlight_symbol("▸ ");
        let mut list_state = ListState::default();
        list_state.select(Some(self.cursor));
        frame.render_stateful_widget(list, chunks[0], &mut list_state);

        let summary = self
            .picked
            .iter()
            .map(|c| c.label())
            .collect::<Vec<_>>()
            .join(" / ");
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("選択中: ", theme::heading()),
                Span::raw(summary),
                Span::styled(format!("  ({}/{})", self.picked.len(), PICK_COUNT), theme::muted()),
            ])),
            chunks[2],
        );

        if let Some(error) = &self.error {
            frame.render_widget(
                Paragraph::new(Span::styled(error.as_str(), theme::error_text())),
                chunks[3],
            );
        }

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("j/k", theme::key_hint()),
                Span::raw(":move  "),
                Span::styled("Space", theme::key_hint()),
                Span::raw(":toggle  "),
                Span::styled("Enter", theme::key_hint()),
                Span::raw(":次へ"),
            ])),
            chunks[4],
        );
    }
}

impl Default for ClassSelectionState {
    fn default() -> Self {
        Self::new()
    }
}
