//! BO3 Domain Types
//!
//! Defines the values recorded by the match wizard:
//! - [`CardClass`]: the seven deck archetypes
//! - [`TurnOrder`] / [`GameResult`]: per-game facts, always from the user's side
//! - [`GameOutcome`]: one recorded game
//! - [`ClassPair`]: the two classes the user brings to the match
//! - [`MatchRecord`]: accumulating draft state shared by every step
//!
//! # Serialization
//!
//! All types implement `Serialize` and `Deserialize` so a record can be
//! dumped to the log or handed to the suggestion provider as JSON.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::wizard::WizardValidationError;

// ============================================================================
// Enumerated Values
// ============================================================================

/// Deck archetype a player can bring to a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardClass {
    Elf,
    Royal,
    Dragon,
    Witch,
    Nightmare,
    Bishop,
    Nemesis,
}

impl CardClass {
    /// All classes in display order.
    pub const ALL: [CardClass; 7] = [
        CardClass::Elf,
        CardClass::Royal,
        CardClass::Dragon,
        CardClass::Witch,
        CardClass::Nightmare,
        CardClass::Bishop,
        CardClass::Nemesis,
    ];

    /// Japanese display label, as used in the shared output.
    pub fn label(self) -> &'static str {
        match self {
            CardClass::Elf => "エルフ",
            CardClass::Royal => "ロイヤル",
            CardClass::Dragon => "ドラゴン",
            CardClass::Witch => "ウィッチ",
            CardClass::Nightmare => "ナイトメア",
            CardClass::Bishop => "ビショップ",
            CardClass::Nemesis => "ネメシス",
        }
    }

    /// Position in [`CardClass::ALL`].
    pub fn index(self) -> usize {
        CardClass::ALL
            .iter()
            .position(|&c| c == self)
            .unwrap_or(0)
    }
}

impl fmt::Display for CardClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether the user went first or second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnOrder {
    First,
    Second,
}

impl TurnOrder {
    pub const ALL: [TurnOrder; 2] = [TurnOrder::First, TurnOrder::Second];

    pub fn label(self) -> &'static str {
        match self {
            TurnOrder::First => "先攻",
            TurnOrder::Second => "後攻",
        }
    }

    /// The opponent's turn order in the same game.
    pub fn opposite(self) -> TurnOrder {
        match self {
            TurnOrder::First => TurnOrder::Second,
            TurnOrder::Second => TurnOrder::First,
        }
    }

    /// Lowercase English name used by the suggestion provider.
    pub fn as_str(self) -> &'static str {
        match self {
            TurnOrder::First => "first",
            TurnOrder::Second => "second",
        }
    }
}

impl fmt::Display for TurnOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of a game (or of the whole match), from the user's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameResult {
    Win,
    Loss,
}

impl GameResult {
    pub const ALL: [GameResult; 2] = [GameResult::Win, GameResult::Loss];

    pub fn label(self) -> &'static str {
        match self {
            GameResult::Win => "勝利",
            GameResult::Loss => "敗北",
        }
    }

    /// The same game seen from the opponent's side.
    pub fn flipped(self) -> GameResult {
        match self {
            GameResult::Win => GameResult::Loss,
            GameResult::Loss => GameResult::Win,
        }
    }

    /// Scoreboard glyph: `○` for a win, `✕` for a loss.
    pub fn glyph(self) -> &'static str {
        match self {
            GameResult::Win => "○",
            GameResult::Loss => "✕",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GameResult::Win => "win",
            GameResult::Loss => "loss",
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Game slot within the BO3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GameNumber {
    One,
    Two,
    Three,
}

impl GameNumber {
    pub const ALL: [GameNumber; 3] = [GameNumber::One, GameNumber::Two, GameNumber::Three];

    /// Zero-based slot index.
    pub fn index(self) -> usize {
        match self {
            GameNumber::One => 0,
            GameNumber::Two => 1,
            GameNumber::Three => 2,
        }
    }

    /// One-based ordinal.
    pub fn ordinal(self) -> u8 {
        self.index() as u8 + 1
    }

    /// Circled-digit glyph used at the start of each output line.
    pub fn glyph(self) -> &'static str {
        match self {
            GameNumber::One => "①",
            GameNumber::Two => "②",
            GameNumber::Three => "③",
        }
    }
}

impl fmt::Display for GameNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ordinal())
    }
}

// ============================================================================
// Records
// ============================================================================

/// A single recorded game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    pub user_class: CardClass,
    pub opponent_class: CardClass,
    pub turn_order: TurnOrder,
    pub result: GameResult,
    /// Free-form note, may be empty.
    #[serde(default)]
    pub memo: String,
}

impl GameOutcome {
    pub fn new(
        user_class: CardClass,
        opponent_class: CardClass,
        turn_order: TurnOrder,
        result: GameResult,
    ) -> Self {
        Self {
            user_class,
            opponent_class,
            turn_order,
            result,
            memo: String::new(),
        }
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }

    /// Class the opponent won with, if the user lost this game.
    pub fn opponent_winning_class(&self) -> Option<CardClass> {
        (self.result == GameResult::Loss).then_some(self.opponent_class)
    }
}

/// The two classes the user registered for the match.
///
/// Always two distinct classes; order is the order of selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassPair([CardClass; 2]);

impl ClassPair {
    pub fn new(first: CardClass, second: CardClass) -> Result<Self, WizardValidationError> {
        if first == second {
            return Err(WizardValidationError::DuplicateClass(first));
        }
        Ok(Self([first, second]))
    }

    /// Build from a selection list, which must hold exactly two distinct classes.
    pub fn from_selection(classes: &[CardClass]) -> Result<Self, WizardValidationError> {
        match classes {
            [first, second] => Self::new(*first, *second),
            other => Err(WizardValidationError::ClassCount(other.len())),
        }
    }

    pub fn first(&self) -> CardClass {
        self.0[0]
    }

    pub fn second(&self) -> CardClass {
        self.0[1]
    }

    pub fn as_array(&self) -> [CardClass; 2] {
        self.0
    }

    pub fn contains(&self, class: CardClass) -> bool {
        self.0.contains(&class)
    }

    /// The class of the pair that is not `class`.
    pub fn other(&self, class: CardClass) -> Option<CardClass> {
        match self.0 {
            [a, b] if a == class => Some(b),
            [a, b] if b == class => Some(a),
            _ => None,
        }
    }
}

/// Accumulating match draft. Every wizard step writes into this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Set by the class selection step.
    pub classes: Option<ClassPair>,
    /// Round label, rendered as `{label}回戦`.
    pub round_label: String,
    /// Opponent name; blank means unknown.
    pub opponent_name: String,
    /// Games 1-3, indexed by [`GameNumber::index`].
    pub games: [Option<GameOutcome>; 3],
    /// `None` while the match is undecided.
    pub overall_result: Option<GameResult>,
}

impl Default for MatchRecord {
    fn default() -> Self {
        Self {
            classes: None,
            round_label: "1".to_string(),
            opponent_name: String::new(),
            games: [None, None, None],
            overall_result: None,
        }
    }
}

impl MatchRecord {
    /// Create a new empty record.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn game(&self, game: GameNumber) -> Option<&GameOutcome> {
        self.games[game.index()].as_ref()
    }

    /// Recorded games in order, with their slot.
    pub fn played_games(&self) -> impl Iterator<Item = (GameNumber, &GameOutcome)> {
        GameNumber::ALL
            .into_iter()
            .zip(self.games.iter())
            .filter_map(|(n, g)| g.as_ref().map(|g| (n, g)))
    }

    /// Overall result implied by the recorded games.
    pub fn decided_result(&self) -> Option<GameResult> {
        overall_result(self.played_games().map(|(_, g)| g.result))
    }

    /// Recompute and store [`MatchRecord::overall_result`].
    pub fn refresh_overall_result(&mut self) {
        self.overall_result = self.decided_result();
    }

    pub fn is_decided(&self) -> bool {
        self.overall_result.is_some()
    }
}

/// BO3 verdict for a sequence of game results: first side to two wins.
pub fn overall_result(results: impl IntoIterator<Item = GameResult>) -> Option<GameResult> {
    let (mut wins, mut losses) = (0u8, 0u8);
    for result in results {
        match result {
            GameResult::Win => wins += 1,
            GameResult::Loss => losses += 1,
        }
    }
    if wins >= 2 {
        Some(GameResult::Win)
    } else if losses >= 2 {
        Some(GameResult::Loss)
    } else {
        None
    }
}
