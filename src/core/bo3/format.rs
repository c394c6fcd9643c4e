//! Shareable text rendering for a [`MatchRecord`].
//!
//! The output is copied to the clipboard verbatim, so the template is fixed
//! byte for byte:
//!
//! ```text
//! 3回戦　vs佐藤
//! ① 先攻:エルフ ○ｰ✕ 後攻:ロイヤル
//! 　 序盤から押し切れた
//! ② 後攻:ウィッチ ✕ｰ○ 先攻:ドラゴン
//! ③ 先攻:ウィッチ ○ｰ✕ 後攻:ロイヤル
//! 勝利
//! ```

use super::types::{GameNumber, GameOutcome, MatchRecord};

/// Separator between the user's and opponent's result glyphs (U+FF70).
const SCORE_SEPARATOR: &str = "ｰ";
/// Ideographic space (U+3000).
const WIDE_SPACE: &str = "\u{3000}";

/// Render the record into the shareable text block.
///
/// Games that were not played are skipped and the result line only appears
/// once the match is decided. Leading and trailing whitespace is trimmed.
pub fn render_match(record: &MatchRecord) -> String {
    let mut output = format!("{}回戦", record.round_label);

    let opponent = record.opponent_name.trim();
    if !opponent.is_empty() {
        output.push_str(WIDE_SPACE);
        output.push_str("vs");
        output.push_str(opponent);
    }
    output.push('\n');

    for (game, outcome) in record.played_games() {
        output.push_str(&render_game(game, outcome));
    }

    if let Some(result) = record.overall_result {
        output.push_str(result.label());
        output.push('\n');
    }

    output.trim().to_string()
}

/// One game line, plus an indented memo line when the memo is not blank.
fn render_game(game: GameNumber, outcome: &GameOutcome) -> String {
    let mut line = format!(
        "{} {}:{} {}{}{} {}:{}\n",
        game.glyph(),
        outcome.turn_order.label(),
        outcome.user_class.label(),
        outcome.result.glyph(),
        SCORE_SEPARATOR,
        outcome.result.flipped().glyph(),
        outcome.turn_order.opposite().label(),
        outcome.opponent_class.label(),
    );

    let memo = outcome.memo.trim();
    if !memo.is_empty() {
        line.push_str(WIDE_SPACE);
        line.push(' ');
        line.push_str(memo);
        line.push('\n');
    }
    line
}
