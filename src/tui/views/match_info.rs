use crossterm::event::{Event, KeyCode, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use ratatui_textarea::TextArea;

use super::{field_text, key_press, set_field_focus, text_field, StepInput};
use crate::core::bo3::MatchRecord;
use crate::tui::theme;

const ROUND_TITLE: &str = "何回戦 (必須)";
const OPPONENT_TITLE: &str = "対戦相手 (任意)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchInfoField {
    RoundLabel,
    OpponentName,
}

/// Submitted match info: `(round_label, opponent_name)`, untrimmed.
pub type MatchInfo = (String, String);

pub struct MatchInfoState {
    pub round_label: TextArea<'static>,
    pub opponent_name: TextArea<'static>,
    pub focus: MatchInfoField,
    pub error: Option<String>,
}

impl MatchInfoState {
    pub fn from_record(record: &MatchRecord) -> Self {
        Self {
            round_label: text_field(ROUND_TITLE, &record.round_label, true),
            opponent_name: text_field(OPPONENT_TITLE, &record.opponent_name, false),
            focus: MatchInfoField::RoundLabel,
            error: None,
        }
    }

    pub fn handle_input(&mut self, event: &Event) -> StepInput<MatchInfo> {
        let Some(key) = key_press(event) else {
            return StepInput::Ignored;
        };

        match (key.modifiers, key.code) {
            (_, KeyCode::Tab) | (_, KeyCode::BackTab) | (_, KeyCode::Up) | (_, KeyCode::Down) => {
                self.switch_focus();
                StepInput::Consumed
            }
            (KeyModifiers::CONTROL, KeyCode::Char('s')) => StepInput::Emit(self.values()),
            (_, KeyCode::Enter) => match self.focus {
                MatchInfoField::RoundLabel => {
                    self.switch_focus();
                    StepInput::Consumed
                }
                MatchInfoField::OpponentName => StepInput::Emit(self.values()),
            },
            (_, KeyCode::Esc) => StepInput::Ignored,
            _ => {
                let field = match self.focus {
                    MatchInfoField::RoundLabel => &mut self.round_label,
                    MatchInfoField::OpponentName => &mut self.opponent_name,
                };
                field.input(event.clone());
                self.error = None;
                StepInput::Consumed
            }
        }
    }

    fn switch_focus(&mut self) {
        self.focus = match self.focus {
            MatchInfoField::RoundLabel => MatchInfoField::OpponentName,
            MatchInfoField::OpponentName => MatchInfoField::RoundLabel,
        };
        set_field_focus(
            &mut self.round_label,
            ROUND_TITLE,
            self.focus == MatchInfoField::RoundLabel,
        );
        set_field_focus(
            &mut self.opponent_name,
            OPPONENT_TITLE,
            self.focus == MatchInfoField::OpponentName,
        );
    }

    fn values(&self) -> MatchInfo {
        (field_text(&self.round_label), field_text(&self.opponent_name))
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = theme::block_focused("対戦情報");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(inner);

        frame.render_widget(&self.round_label, chunks[0]);
        frame.render_widget(&self.opponent_name, chunks[1]);

        if let Some(error) = &self.error {
            frame.render_widget(
                Paragraph::new(Span::styled(error.as_str(), theme::error_text())),
                chunks[2],
            );
        }

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("Tab", theme::key_hint()),
                Span::raw(":next field  "),
                Span::styled("Enter", theme::key_hint()),
                Span::raw(":次へ  "),
                Span::styled("Esc", theme::key_hint()),
                Span::raw(":戻る"),
            ])),
            chunks[4],
        );
    }
}
