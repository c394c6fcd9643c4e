//! Property-based tests for the BO3 wizard state machine
//!
//! Tests invariants:
//! - A 1-1 split requires game 3, replayed with each side's losing class
//! - The overall result follows the two-wins rule and is never both
//! - Opponent options never include a class the opponent already won with
//! - Reset from any step yields an empty record at class selection
//! - Back from results lands on game 3 iff it was played

use proptest::prelude::*;

use crate::core::bo3::{
    Bo3Wizard, CardClass, GameDraft, GameNumber, GameResult, MatchRecord, TurnOrder, WizardStep,
};

// ============================================================================
// Strategies for generating test inputs
// ============================================================================

/// Two distinct classes in selection order.
fn arb_class_pair() -> impl Strategy<Value = (CardClass, CardClass)> {
    (0usize..7, 1usize..7).prop_map(|(first, offset)| {
        (
            CardClass::ALL[first],
            CardClass::ALL[(first + offset) % CardClass::ALL.len()],
        )
    })
}

fn arb_result() -> impl Strategy<Value = GameResult> {
    prop_oneof![Just(GameResult::Win), Just(GameResult::Loss)]
}

/// One game's choices: indices into the step's options, turn and result.
#[derive(Debug, Clone, Copy)]
struct GameChoice {
    user: usize,
    opponent: usize,
    first: bool,
    result: GameResult,
}

fn arb_game() -> impl Strategy<Value = GameChoice> {
    (0usize..8, 0usize..8, any::<bool>(), arb_result()).prop_map(
        |(user, opponent, first, result)| GameChoice {
            user,
            opponent,
            first,
            result,
        },
    )
}

fn arb_games() -> impl Strategy<Value = [GameChoice; 3]> {
    (arb_game(), arb_game(), arb_game()).prop_map(|(a, b, c)| [a, b, c])
}

// ============================================================================
// Helpers
// ============================================================================

fn at_game1(pair: (CardClass, CardClass)) -> Bo3Wizard {
    let mut wizard = Bo3Wizard::new();
    wizard
        .select_classes(&[pair.0, pair.1])
        .expect("distinct pair");
    wizard.submit_match_info("1", "").expect("round label");
    wizard
}

/// Draft that picks from whatever the current step allows.
fn draft_for(wizard: &Bo3Wizard, game: GameNumber, choice: GameChoice) -> GameDraft {
    let users = wizard.user_class_options(game);
    let opponents = wizard.opponent_class_options(game);
    GameDraft {
        user_class: Some(users[choice.user % users.len()]),
        opponent_class: Some(opponents[choice.opponent % opponents.len()]),
        turn_order: Some(if choice.first {
            TurnOrder::First
        } else {
            TurnOrder::Second
        }),
        result: Some(choice.result),
        memo: String::new(),
    }
}

/// Submit up to `limit` games, stopping at the results step.
fn play(wizard: &mut Bo3Wizard, games: &[GameChoice], limit: usize) {
    for &choice in games.iter().take(limit) {
        let Some(game) = wizard.step().game() else {
            return;
        };
        let draft = draft_for(wizard, game, choice);
        wizard.submit_game(game, draft).expect("draft built from options");
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Property: a 1-1 split requires game 3 with each side's losing class
    #[test]
    fn prop_split_forces_game3(
        pair in arb_class_pair(),
        games in arb_games(),
        user_won_first in any::<bool>(),
    ) {
        let mut wizard = at_game1(pair);
        let mut games = games;
        games[0].result = if user_won_first { GameResult::Win } else { GameResult::Loss };
        games[1].result = games[0].result.flipped();
        play(&mut wizard, &games, 2);

        prop_assert_eq!(wizard.step(), WizardStep::Game3);
        prop_assert_eq!(wizard.record().overall_result, None);

        let record = wizard.record();
        let g1 = record.game(GameNumber::One).unwrap();
        let g2 = record.game(GameNumber::Two).unwrap();
        let (user_lost, user_won) = if g1.result == GameResult::Loss { (g1, g2) } else { (g2, g1) };

        let forced = wizard.forced_game3_classes().unwrap();
        prop_assert_eq!(forced.user, user_lost.user_class);
        prop_assert_eq!(forced.opponent, user_won.opponent_class);
        prop_assert_eq!(wizard.user_class_options(GameNumber::Three), vec![forced.user]);
    }

    /// Property: overall result is decided by two wins for one side, never both
    #[test]
    fn prop_overall_result_follows_two_wins(
        pair in arb_class_pair(),
        games in arb_games(),
    ) {
        let mut wizard = at_game1(pair);
        play(&mut wizard, &games, 3);
        prop_assert_eq!(wizard.step(), WizardStep::Results);

        let record = wizard.record();
        let wins = record
            .played_games()
            .filter(|(_, g)| g.result == GameResult::Win)
            .count();
        let losses = record.played_games().count() - wins;
        prop_assert!(wins < 2 || losses < 2, "both sides reached two wins");
        let expected = if wins >= 2 {
            Some(GameResult::Win)
        } else if losses >= 2 {
            Some(GameResult::Loss)
        } else {
            None
        };
        prop_assert_eq!(record.overall_result, expected);
        prop_assert!(record.overall_result.is_some());

        // Game 3 exists iff the first two games split
        let g1 = record.game(GameNumber::One).unwrap().result;
        let g2 = record.game(GameNumber::Two).unwrap().result;
        prop_assert_eq!(record.game(GameNumber::Three).is_some(), g1 != g2);
    }

    /// Property: opponent options never include a class the opponent already won with
    #[test]
    fn prop_opponent_options_exclude_won_classes(
        pair in arb_class_pair(),
        games in arb_games(),
    ) {
        let mut wizard = at_game1(pair);
        for &choice in &games {
            let Some(game) = wizard.step().game() else {
                break;
            };

            let won_with: Vec<CardClass> = wizard
                .record()
                .played_games()
                .filter(|(_, g)| g.result == GameResult::Loss)
                .map(|(_, g)| g.opponent_class)
                .collect();
            let options = wizard.opponent_class_options(game);
            prop_assert!(!options.is_empty());
            for class in &won_with {
                prop_assert!(
                    !options.contains(class),
                    "{:?} offered to the opponent in {} after they won with it",
                    class,
                    game
                );
            }

            let draft = draft_for(&wizard, game, choice);
            wizard.submit_game(game, draft).unwrap();
        }
    }

    /// Property: reset from any step yields an empty record at class selection
    #[test]
    fn prop_reset_from_any_step(
        pair in arb_class_pair(),
        games in arb_games(),
        submitted in 0usize..=3,
        backs in 0usize..3,
    ) {
        let mut wizard = at_game1(pair);
        play(&mut wizard, &games, submitted);
        for _ in 0..backs {
            wizard.back();
        }

        wizard.reset();
        prop_assert_eq!(wizard.step(), WizardStep::ClassSelection);
        prop_assert_eq!(wizard.record(), &MatchRecord::new());
    }

    /// Property: back from results lands on game 3 iff game 3 was played
    #[test]
    fn prop_back_from_results(
        pair in arb_class_pair(),
        games in arb_games(),
    ) {
        let mut wizard = at_game1(pair);
        play(&mut wizard, &games, 3);
        prop_assert_eq!(wizard.step(), WizardStep::Results);

        let played_game3 = wizard.record().game(GameNumber::Three).is_some();
        let previous = wizard.back();
        if played_game3 {
            prop_assert_eq!(previous, WizardStep::Game3);
        } else {
            prop_assert_eq!(previous, WizardStep::Game2);
        }
    }

    /// Property: resubmitting an earlier game never leaves an inconsistent record
    #[test]
    fn prop_revisions_keep_record_consistent(
        pair in arb_class_pair(),
        games in arb_games(),
        revision in arb_game(),
    ) {
        let mut wizard = at_game1(pair);
        play(&mut wizard, &games, 3);

        // Back to game 1 and change it
        while wizard.step() != WizardStep::Game1 {
            wizard.back();
        }
        let draft = draft_for(&wizard, GameNumber::One, revision);
        wizard.submit_game(GameNumber::One, draft).unwrap();

        let record = wizard.record();
        for (game, outcome) in record.played_games() {
            prop_assert!(wizard.user_class_options(game).contains(&outcome.user_class));
            prop_assert!(wizard.opponent_class_options(game).contains(&outcome.opponent_class));
        }
        prop_assert_eq!(record.overall_result, record.decided_result());
    }
}
