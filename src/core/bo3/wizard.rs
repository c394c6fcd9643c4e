//! BO3 Wizard State Machine
//!
//! Step sequencing and derived per-step constraints for recording a match.
//!
//! ```text
//! ClassSelection → MatchInfo → Game1 → Game2 ─┬─────────→ Results
//!                                             └→ Game3 ──→ Results
//! ```
//!
//! Game 3 is only entered when games 1 and 2 split 1-1. Every step can go
//! back to its predecessor; Results backs up to Game3 when a third game was
//! played, else to Game2.
//!
//! Class constraints are derived from the [`MatchRecord`] on demand and never
//! stored:
//! - a class the user won with is retired for the next game
//! - game 3 is replayed with the class each side lost with
//! - the opponent cannot be credited with a class they already won with

use std::fmt;

use serde::{Deserialize, Serialize};

use super::types::{
    overall_result, CardClass, ClassPair, GameNumber, GameOutcome, GameResult, MatchRecord,
    TurnOrder,
};

// ============================================================================
// Steps
// ============================================================================

/// Wizard step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WizardStep {
    #[default]
    ClassSelection,
    MatchInfo,
    #[serde(rename = "GAME_1")]
    Game1,
    #[serde(rename = "GAME_2")]
    Game2,
    #[serde(rename = "GAME_3")]
    Game3,
    Results,
}

impl WizardStep {
    pub fn as_str(self) -> &'static str {
        match self {
            WizardStep::ClassSelection => "CLASS_SELECTION",
            WizardStep::MatchInfo => "MATCH_INFO",
            WizardStep::Game1 => "GAME_1",
            WizardStep::Game2 => "GAME_2",
            WizardStep::Game3 => "GAME_3",
            WizardStep::Results => "RESULTS",
        }
    }

    /// Step title shown in the header.
    pub fn title(self) -> &'static str {
        match self {
            WizardStep::ClassSelection => "自分の使用クラス選択",
            WizardStep::MatchInfo => "対戦情報入力",
            WizardStep::Game1 => "1試合目 結果入力",
            WizardStep::Game2 => "2試合目 結果入力",
            WizardStep::Game3 => "3試合目 結果入力",
            WizardStep::Results => "結果確認・出力",
        }
    }

    /// The game recorded at this step, if any.
    pub fn game(self) -> Option<GameNumber> {
        match self {
            WizardStep::Game1 => Some(GameNumber::One),
            WizardStep::Game2 => Some(GameNumber::Two),
            WizardStep::Game3 => Some(GameNumber::Three),
            _ => None,
        }
    }

    pub fn for_game(game: GameNumber) -> WizardStep {
        match game {
            GameNumber::One => WizardStep::Game1,
            GameNumber::Two => WizardStep::Game2,
            GameNumber::Three => WizardStep::Game3,
        }
    }

    /// Progress through the wizard (0-100). Results is always 100.
    pub fn progress_percent(self) -> u16 {
        let position = match self {
            WizardStep::ClassSelection => 1,
            WizardStep::MatchInfo => 2,
            WizardStep::Game1 => 3,
            WizardStep::Game2 => 4,
            WizardStep::Game3 => 5,
            WizardStep::Results => return 100,
        };
        position * 100 / 6
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Step Input
// ============================================================================

/// Partially filled game form. Every field but the memo is required.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameDraft {
    pub user_class: Option<CardClass>,
    pub opponent_class: Option<CardClass>,
    pub turn_order: Option<TurnOrder>,
    pub result: Option<GameResult>,
    pub memo: String,
}

impl GameDraft {
    pub fn from_outcome(outcome: &GameOutcome) -> Self {
        Self {
            user_class: Some(outcome.user_class),
            opponent_class: Some(outcome.opponent_class),
            turn_order: Some(outcome.turn_order),
            result: Some(outcome.result),
            memo: outcome.memo.clone(),
        }
    }

    /// Convert into a recorded game, failing on the first missing field.
    pub fn into_outcome(self) -> Result<GameOutcome, WizardValidationError> {
        let user_class = self
            .user_class
            .ok_or(WizardValidationError::MissingField("user_class"))?;
        let opponent_class = self
            .opponent_class
            .ok_or(WizardValidationError::MissingField("opponent_class"))?;
        let turn_order = self
            .turn_order
            .ok_or(WizardValidationError::MissingField("turn_order"))?;
        let result = self
            .result
            .ok_or(WizardValidationError::MissingField("result"))?;
        Ok(GameOutcome {
            user_class,
            opponent_class,
            turn_order,
            result,
            memo: self.memo,
        })
    }
}

/// Classes game 3 must be played with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForcedClasses {
    pub user: CardClass,
    pub opponent: CardClass,
}

// ============================================================================
// State Machine
// ============================================================================

/// Wizard state: current step plus the accumulating record.
#[derive(Debug, Clone, Default)]
pub struct Bo3Wizard {
    step: WizardStep,
    record: MatchRecord,
}

impl Bo3Wizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn record(&self) -> &MatchRecord {
        &self.record
    }

    /// Discard the record and start over.
    pub fn reset(&mut self) {
        tracing::debug!(from = %self.step, "Wizard reset");
        *self = Self::new();
    }

    /// Confirm the two classes brought to the match.
    pub fn select_classes(&mut self, classes: &[CardClass]) -> Result<WizardStep, WizardError> {
        self.expect_step(WizardStep::ClassSelection)?;
        let pair = ClassPair::from_selection(classes)?;

        self.record.classes = Some(pair);
        self.prune_invalid_games();
        Ok(self.advance(WizardStep::MatchInfo))
    }

    /// Record round label and opponent name. The opponent name may be blank.
    pub fn submit_match_info(
        &mut self,
        round_label: &str,
        opponent_name: &str,
    ) -> Result<WizardStep, WizardError> {
        self.expect_step(WizardStep::MatchInfo)?;
        let round_label = round_label.trim();
        if round_label.is_empty() {
            return Err(WizardValidationError::BlankRoundLabel.into());
        }

        self.record.round_label = round_label.to_string();
        self.record.opponent_name = opponent_name.trim().to_string();
        Ok(self.advance(WizardStep::Game1))
    }

    /// Record a game and move to the next step.
    pub fn submit_game(
        &mut self,
        game: GameNumber,
        draft: GameDraft,
    ) -> Result<WizardStep, WizardError> {
        self.expect_step(WizardStep::for_game(game))?;
        let outcome = draft.into_outcome()?;

        if !self.user_class_options(game).contains(&outcome.user_class) {
            return Err(WizardError::UserClassNotAllowed {
                game,
                class: outcome.user_class,
            });
        }
        if !self.opponent_class_options(game).contains(&outcome.opponent_class) {
            return Err(WizardError::OpponentClassNotAllowed {
                game,
                class: outcome.opponent_class,
            });
        }

        self.record.games[game.index()] = Some(outcome);
        self.prune_invalid_games();

        let next = match game {
            GameNumber::One => WizardStep::Game2,
            GameNumber::Two => {
                let first_two = self
                    .record
                    .games
                    .iter()
                    .take(2)
                    .flatten()
                    .map(|g| g.result);
                if overall_result(first_two).is_some() {
                    WizardStep::Results
                } else {
                    WizardStep::Game3
                }
            }
            GameNumber::Three => WizardStep::Results,
        };
        Ok(self.advance(next))
    }

    /// Move to the previous step. A no-op on the first step.
    pub fn back(&mut self) -> WizardStep {
        let previous = match self.step {
            WizardStep::ClassSelection | WizardStep::MatchInfo => WizardStep::ClassSelection,
            WizardStep::Game1 => WizardStep::MatchInfo,
            WizardStep::Game2 => WizardStep::Game1,
            WizardStep::Game3 => WizardStep::Game2,
            WizardStep::Results => {
                if self.record.game(GameNumber::Three).is_some() {
                    WizardStep::Game3
                } else {
                    WizardStep::Game2
                }
            }
        };
        tracing::debug!(from = %self.step, to = %previous, "Wizard back");
        self.step = previous;
        previous
    }

    // ── Derived constraints ─────────────────────────────────────────────

    /// Classes the user may play in `game`.
    pub fn user_class_options(&self, game: GameNumber) -> Vec<CardClass> {
        let Some(pair) = self.record.classes else {
            return Vec::new();
        };
        match game {
            GameNumber::One => pair.as_array().to_vec(),
            GameNumber::Two => match self.record.game(GameNumber::One) {
                Some(g1) if g1.result == GameResult::Win => {
                    pair.other(g1.user_class).into_iter().collect()
                }
                Some(_) => pair.as_array().to_vec(),
                None => Vec::new(),
            },
            GameNumber::Three => self
                .forced_game3_classes()
                .map(|forced| vec![forced.user])
                .unwrap_or_default(),
        }
    }

    /// True when the user has exactly one class to play in `game`.
    pub fn is_user_class_fixed(&self, game: GameNumber) -> bool {
        game == GameNumber::Three || self.user_class_options(game).len() == 1
    }

    /// Classes the opponent already won with before `game`.
    pub fn opponent_class_exclusions(&self, game: GameNumber) -> Vec<CardClass> {
        let mut excluded = Vec::new();
        for earlier in self.record.games.iter().take(game.index()).flatten() {
            if let Some(class) = earlier.opponent_winning_class() {
                if !excluded.contains(&class) {
                    excluded.push(class);
                }
            }
        }
        excluded
    }

    /// Classes the opponent may be credited with in `game`.
    pub fn opponent_class_options(&self, game: GameNumber) -> Vec<CardClass> {
        let excluded = self.opponent_class_exclusions(game);
        match game {
            GameNumber::One | GameNumber::Two => CardClass::ALL
                .into_iter()
                .filter(|c| !excluded.contains(c))
                .collect(),
            GameNumber::Three => match self.forced_game3_classes() {
                None => Vec::new(),
                Some(forced) if !excluded.contains(&forced.opponent) => vec![forced.opponent],
                // Lost with a class and then won with it: that class is
                // retired, so the replay is one they have not won with.
                Some(_) => CardClass::ALL
                    .into_iter()
                    .filter(|c| !excluded.contains(c))
                    .collect(),
            },
        }
    }

    pub fn is_opponent_class_fixed(&self, game: GameNumber) -> bool {
        game == GameNumber::Three && self.opponent_class_options(game).len() == 1
    }

    /// Classes for game 3: each side replays the class it lost with.
    ///
    /// `None` unless games 1 and 2 are recorded and split 1-1.
    pub fn forced_game3_classes(&self) -> Option<ForcedClasses> {
        let g1 = self.record.game(GameNumber::One)?;
        let g2 = self.record.game(GameNumber::Two)?;
        match (g1.result, g2.result) {
            (GameResult::Win, GameResult::Loss) => Some(ForcedClasses {
                user: g2.user_class,
                opponent: g1.opponent_class,
            }),
            (GameResult::Loss, GameResult::Win) => Some(ForcedClasses {
                user: g1.user_class,
                opponent: g2.opponent_class,
            }),
            _ => None,
        }
    }

    /// Whether submitting `game` with `result` ends at the results step.
    pub fn submit_leads_to_results(&self, game: GameNumber, result: Option<GameResult>) -> bool {
        match game {
            GameNumber::One => false,
            GameNumber::Two => match (self.record.game(GameNumber::One), result) {
                (Some(g1), Some(result)) => g1.result == result,
                _ => false,
            },
            GameNumber::Three => true,
        }
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn expect_step(&self, step: WizardStep) -> Result<(), WizardError> {
        if self.step == step {
            Ok(())
        } else {
            Err(WizardError::InvalidTransition {
                from: self.step,
                to: step,
            })
        }
    }

    fn advance(&mut self, next: WizardStep) -> WizardStep {
        tracing::debug!(from = %self.step, to = %next, "Wizard advance");
        self.step = next;
        next
    }

    /// Drop recorded games that earlier edits made inconsistent.
    ///
    /// Games are checked in order; the first invalid game and everything
    /// after it are cleared. The overall result is recomputed afterwards.
    fn prune_invalid_games(&mut self) {
        for game in GameNumber::ALL {
            let Some(outcome) = self.record.game(game) else {
                continue;
            };
            let valid = self.user_class_options(game).contains(&outcome.user_class)
                && self
                    .opponent_class_options(game)
                    .contains(&outcome.opponent_class)
                && (game != GameNumber::Three || self.forced_game3_classes().is_some());

            if !valid {
                tracing::debug!(game = %game, "Clearing games invalidated by an earlier edit");
                for slot in &mut self.record.games[game.index()..] {
                    *slot = None;
                }
                break;
            }
        }
        self.record.refresh_overall_result();
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during wizard operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("Invalid step transition: cannot submit {to} while on {from}")]
    InvalidTransition { from: WizardStep, to: WizardStep },

    #[error("Validation error: {0}")]
    Validation(#[from] WizardValidationError),

    #[error("Class {class:?} is not available to the user in game {game}")]
    UserClassNotAllowed { game: GameNumber, class: CardClass },

    #[error("Class {class:?} is not available to the opponent in game {game}")]
    OpponentClassNotAllowed { game: GameNumber, class: CardClass },
}

impl WizardError {
    /// Message shown in place on the step view.
    pub fn user_message(&self) -> &'static str {
        match self {
            WizardError::Validation(e) => e.user_message(),
            WizardError::InvalidTransition { .. } => "この操作は現在のステップでは行えません。",
            WizardError::UserClassNotAllowed { .. } => "その使用クラスはこの試合では選択できません。",
            WizardError::OpponentClassNotAllowed { .. } => {
                "相手がすでに勝利したクラスは選択できません。"
            }
        }
    }
}

/// Validation errors for wizard data
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Expected exactly two classes, got {0}")]
    ClassCount(usize),

    #[error("Class selected twice: {0:?}")]
    DuplicateClass(CardClass),

    #[error("Round label must not be blank")]
    BlankRoundLabel,
}

impl WizardValidationError {
    pub fn user_message(&self) -> &'static str {
        match self {
            WizardValidationError::MissingField(_) => "全ての必須項目を選択・入力してください。",
            WizardValidationError::ClassCount(_) | WizardValidationError::DuplicateClass(_) => {
                "使用するクラスを2つ選択してください。"
            }
            WizardValidationError::BlankRoundLabel => "何回戦かを入力してください。",
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
