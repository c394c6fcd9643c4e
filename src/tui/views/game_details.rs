use crossterm::event::{Event, KeyCode, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use ratatui_textarea::TextArea;

use super::{field_text, key_press, set_field_focus, text_field, StepInput};
use crate::core::bo3::{
    Bo3Wizard, CardClass, GameDraft, GameNumber, GameResult, TurnOrder, WizardStep,
};
use crate::tui::theme;

const MEMO_TITLE: &str = "メモ (任意)";

/// Form fields in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameField {
    UserClass,
    OpponentClass,
    TurnOrder,
    Result,
    Memo,
}

impl GameField {
    pub const ALL: [GameField; 5] = [
        GameField::UserClass,
        GameField::OpponentClass,
        GameField::TurnOrder,
        GameField::Result,
        GameField::Memo,
    ];

    pub fn label(self) -> &'static str {
        match self {
            GameField::UserClass => "自分のクラス",
            GameField::OpponentClass => "相手のクラス",
            GameField::TurnOrder => "先攻/後攻",
            GameField::Result => "勝敗",
            GameField::Memo => "メモ",
        }
    }

    fn next(self) -> GameField {
        let idx = GameField::ALL.iter().position(|&f| f == self).unwrap_or(0);
        GameField::ALL[(idx + 1) % GameField::ALL.len()]
    }

    fn prev(self) -> GameField {
        let idx = GameField::ALL.iter().position(|&f| f == self).unwrap_or(0);
        GameField::ALL[(idx + GameField::ALL.len() - 1) % GameField::ALL.len()]
    }
}

/// Per-game result form.
pub struct GameDetailsState {
    pub game: GameNumber,
    pub field: GameField,
    pub user_class: Option<CardClass>,
    pub opponent_class: Option<CardClass>,
    pub turn_order: Option<TurnOrder>,
    pub result: Option<GameResult>,
    pub memo: TextArea<'static>,
    pub error: Option<String>,
}

impl GameDetailsState {
    /// Form for `game`, pre-filled from the record and from fixed classes.
    pub fn new(game: GameNumber, wizard: &Bo3Wizard) -> Self {
        let draft = wizard
            .record()
            .game(game)
            .map(GameDraft::from_outcome)
            .unwrap_or_default();

        let user_options = wizard.user_class_options(game);
        let user_class = match draft.user_class {
            Some(class) if user_options.contains(&class) => Some(class),
            _ if user_options.len() == 1 => user_options.first().copied(),
            _ => None,
        };

        let opponent_options = wizard.opponent_class_options(game);
        let opponent_class = match draft.opponent_class {
            Some(class) if opponent_options.contains(&class) => Some(class),
            _ if wizard.is_opponent_class_fixed(game) => opponent_options.first().copied(),
            _ => None,
        };

        let field = if wizard.is_user_class_fixed(game) {
            if wizard.is_opponent_class_fixed(game) {
                GameField::TurnOrder
            } else {
                GameField::OpponentClass
            }
        } else {
            GameField::UserClass
        };

        Self {
            game,
            field,
            user_class,
            opponent_class,
            turn_order: draft.turn_order,
            result: draft.result,
            memo: text_field(MEMO_TITLE, &draft.memo, field == GameField::Memo),
            error: None,
        }
    }

    /// Current form contents.
    pub fn draft(&self) -> GameDraft {
        GameDraft {
            user_class: self.user_class,
            opponent_class: self.opponent_class,
            turn_order: self.turn_order,
            result: self.result,
            memo: field_text(&self.memo),
        }
    }

    /// Label of the submit key for the current result choice.
    pub fn submit_label(&self, wizard: &Bo3Wizard) -> &'static str {
        if wizard.submit_leads_to_results(self.game, self.result) {
            "結果を確認する"
        } else {
            "次の試合へ"
        }
    }

    pub fn handle_input(&mut self, event: &Event, wizard: &Bo3Wizard) -> StepInput<GameDraft> {
        let Some(key) = key_press(event) else {
            return StepInput::Ignored;
        };

        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('s')) => return StepInput::Emit(self.draft()),
            (_, KeyCode::Tab) => {
                self.focus(self.field.next());
                return StepInput::Consumed;
            }
            (_, KeyCode::BackTab) => {
                self.focus(self.field.prev());
                return StepInput::Consumed;
            }
            (_, KeyCode::Esc) => return StepInput::Ignored,
            _ => {}
        }

        if self.field == GameField::Memo {
            self.memo.input(event.clone());
            return StepInput::Consumed;
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.focus(self.field.prev()),
            KeyCode::Down | KeyCode::Char('j') => self.focus(self.field.next()),
            KeyCode::Left | KeyCode::Char('h') => self.cycle(wizard, false),
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => self.cycle(wizard, true),
            KeyCode::Enter => return StepInput::Emit(self.draft()),
            _ => return StepInput::Ignored,
        }
        StepInput::Consumed
    }

    fn focus(&mut self, field: GameField) {
        self.field = field;
        set_field_focus(&mut self.memo, MEMO_TITLE, field == GameField::Memo);
    }

    /// Step the focused choice through the options the wizard allows.
    fn cycle(&mut self, wizard: &Bo3Wizard, forward: bool) {
        match self.field {
            GameField::UserClass => {
                let options = wizard.user_class_options(self.game);
                self.user_class = cycle_option(&options, self.user_class, forward);
            }
            GameField::OpponentClass => {
                let options = wizard.opponent_class_options(self.game);
                self.opponent_class = cycle_option(&options, self.opponent_class, forward);
            }
            GameField::TurnOrder => {
                self.turn_order = cycle_option(&TurnOrder::ALL, self.turn_order, forward);
            }
            GameField::Result => {
                self.result = cycle_option(&GameResult::ALL, self.result, forward);
            }
            GameField::Memo => return,
        }
        self.error = None;
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, wizard: &Bo3Wizard) {
        let block = theme::block_focused(WizardStep::for_game(self.game).title());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::vertical([
            Constraint::Length(1), // User class
            Constraint::Length(1), // Opponent class
            Constraint::Length(1), // Turn order
            Constraint::Length(1), // Result
            Constraint::Length(1),
            Constraint::Min(3),    // Memo
            Constraint::Length(1), // Error
            Constraint::Length(1), // Hints
        ])
        .split(inner);

        let user_options = wizard.user_class_options(self.game);
        let user_line = if wizard.is_user_class_fixed(self.game) {
            fixed_choice(self.user_class.map(CardClass::label))
        } else {
            choices(
                user_options.iter().map(|c| (c.label(), Some(*c) == self.user_class, true)),
            )
        };
        self.render_row(frame, chunks[0], GameField::UserClass, user_line);

        let opponent_line = if wizard.is_opponent_class_fixed(self.game) {
            fixed_choice(self.opponent_class.map(CardClass::label))
        } else {
            let allowed = wizard.opponent_class_options(self.game);
            choices(CardClass::ALL.iter().map(|c| {
                (c.label(), Some(*c) == self.opponent_class, allowed.contains(c))
            }))
        };
        self.render_row(frame, chunks[1], GameField::OpponentClass, opponent_line);

        let turn_line = choices(
            TurnOrder::ALL
                .iter()
                .map(|t| (t.label(), Some(*t) == self.turn_order, true)),
        );
        self.render_row(frame, chunks[2], GameField::TurnOrder, turn_line);

        let result_line = choices(
            GameResult::ALL
                .iter()
                .map(|r| (r.label(), Some(*r) == self.result, true)),
        );
        self.render_row(frame, chunks[3], GameField::Result, result_line);

        frame.render_widget(&self.memo, chunks[5]);

        if let Some(error) = &self.error {
            frame.render_widget(
                Paragraph::new(Span::styled(error.as_str(), theme::error_text())),
                chunks[6],
            );
        }

        let submit_hint = if self.field == GameField::Memo {
            "Ctrl+S"
        } else {
            "Enter"
        };
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("Tab", theme::key_hint()),
                Span::raw(":field  "),
                Span::styled("←/→", theme::key_hint()),
                Span::raw(":select  "),
                Span::styled(submit_hint, theme::key_hint()),
                Span::raw(format!(":{}  ", self.submit_label(wizard))),
                Span::styled("Esc", theme::key_hint()),
                Span::raw(":戻る"),
            ])),
            chunks[7],
        );
    }

    fn render_row(&self, frame: &mut Frame, area: Rect, field: GameField, value: Vec<Span<'static>>) {
        let focused = self.field == field;
        let marker = if focused { "▸ " } else { "  " };
        let label_style = if focused { theme::title() } else { theme::heading() };

        let mut spans = vec![
            Span::styled(marker, theme::title()),
            Span::styled(format!("{:<8}", field.label()), label_style),
        ];
        spans.extend(value);
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

/// Next/previous option after `current`; starts at either end when unset.
fn cycle_option<T: Copy + PartialEq>(options: &[T], current: Option<T>, forward: bool) -> Option<T> {
    if options.is_empty() {
        return current;
    }
    let len = options.len();
    let next = match current.and_then(|c| options.iter().position(|o| *o == c)) {
        Some(i) if forward => (i + 1) % len,
        Some(i) => (i + len - 1) % len,
        None if forward => 0,
        None => len - 1,
    };
    Some(options[next])
}

/// Spans for `(label, selected, enabled)` options.
fn choices<'a>(options: impl Iterator<Item = (&'a str, bool, bool)>) -> Vec<Span<'static>> {
    options
        .flat_map(|(label, selected, enabled)| {
            let style = match (selected, enabled) {
                (true, _) => theme::selected(),
                (false, true) => Style::default(),
                (false, false) => theme::disabled(),
            };
            [Span::styled(format!(" {label} "), style), Span::raw(" ")]
        })
        .collect()
}

fn fixed_choice(label: Option<&str>) -> Vec<Span<'static>> {
    vec![
        Span::styled(format!(" {} ", label.unwrap_or("-")), theme::selected()),
        Span::styled(" (固定)", theme::muted()),
    ]
}
