//! Property-based tests for match text rendering
//!
//! Tests invariants:
//! - Rendering is deterministic
//! - Output is trimmed
//! - One line for the header, each game, each non-blank memo and a decided result
//! - The opponent name appears only when it is not blank

use proptest::prelude::*;

use crate::core::bo3::{
    render_match, CardClass, GameNumber, GameOutcome, GameResult, MatchRecord, TurnOrder,
};

// ============================================================================
// Strategies for generating test inputs
// ============================================================================

fn arb_class() -> impl Strategy<Value = CardClass> {
    (0usize..7).prop_map(|i| CardClass::ALL[i])
}

fn arb_turn_order() -> impl Strategy<Value = TurnOrder> {
    prop_oneof![Just(TurnOrder::First), Just(TurnOrder::Second)]
}

fn arb_result() -> impl Strategy<Value = GameResult> {
    prop_oneof![Just(GameResult::Win), Just(GameResult::Loss)]
}

fn arb_outcome() -> impl Strategy<Value = GameOutcome> {
    (
        arb_class(),
        arb_class(),
        arb_turn_order(),
        arb_result(),
        "[a-z ]{0,8}",
    )
        .prop_map(|(user, opponent, turn, result, memo)| {
            GameOutcome::new(user, opponent, turn, result).with_memo(memo)
        })
}

/// Records shaped like wizard output: games fill from game 1 onward.
fn arb_record() -> impl Strategy<Value = MatchRecord> {
    (
        "[1-9]{1,2}",
        "[a-zA-Z ]{0,6}",
        prop::collection::vec(arb_outcome(), 0..=3),
    )
        .prop_map(|(round_label, opponent_name, outcomes)| {
            let mut record = MatchRecord::new();
            record.round_label = round_label;
            record.opponent_name = opponent_name;
            for (slot, outcome) in record.games.iter_mut().zip(outcomes) {
                *slot = Some(outcome);
            }
            record.refresh_overall_result();
            record
        })
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Property: the same record always renders the same text
    #[test]
    fn prop_render_is_deterministic(record in arb_record()) {
        prop_assert_eq!(render_match(&record), render_match(&record.clone()));
    }

    /// Property: output carries no leading or trailing whitespace
    #[test]
    fn prop_render_is_trimmed(record in arb_record()) {
        let output = render_match(&record);
        prop_assert_eq!(output.trim(), output.as_str());
    }

    /// Property: line count follows header, games, memos and result
    #[test]
    fn prop_line_count(record in arb_record()) {
        let output = render_match(&record);

        let games = record.played_games().count();
        let memos = record
            .played_games()
            .filter(|(_, g)| !g.memo.trim().is_empty())
            .count();
        let result = usize::from(record.is_decided());

        prop_assert_eq!(output.lines().count(), 1 + games + memos + result);
    }

    /// Property: header names the round, and the opponent only when given
    #[test]
    fn prop_header(record in arb_record()) {
        let output = render_match(&record);
        let header = output.lines().next().unwrap_or_default();

        let prefix = format!("{}回戦", record.round_label);
        prop_assert!(header.starts_with(&prefix));
        let name = record.opponent_name.trim();
        if name.is_empty() {
            prop_assert!(!header.contains("vs"));
        } else {
            let expected = format!("\u{3000}vs{}", name);
            prop_assert!(header.ends_with(&expected));
        }
    }

    /// Property: each played game gets a line starting with its glyph
    #[test]
    fn prop_game_lines_in_order(record in arb_record()) {
        let output = render_match(&record);
        let game_lines: Vec<&str> = output
            .lines()
            .filter(|line| GameNumber::ALL.iter().any(|g| line.starts_with(g.glyph())))
            .collect();

        let played: Vec<GameNumber> = record.played_games().map(|(n, _)| n).collect();
        prop_assert_eq!(game_lines.len(), played.len());
        for (line, game) in game_lines.iter().zip(&played) {
            prop_assert!(line.starts_with(game.glyph()));
        }
    }

    /// Property: the last line is the verdict exactly when the match is decided
    #[test]
    fn prop_result_line(record in arb_record()) {
        let output = render_match(&record);
        let last = output.lines().last().unwrap_or_default();
        let verdicts = [GameResult::Win.label(), GameResult::Loss.label()];

        match record.overall_result {
            Some(result) => prop_assert_eq!(last, result.label()),
            None => prop_assert!(!verdicts.contains(&last)),
        }
    }
}
