//! Post-Match Message Suggestion
//!
//! Maps a decided [`MatchRecord`] into the structured input the
//! text-generation service expects, builds the prompt, and returns the
//! drafted message. The call is best-effort: callers surface failures as a
//! notification and never feed the result back into the record.

use serde::Serialize;

use crate::core::bo3::{GameResult, MatchRecord, TurnOrder};
use crate::core::llm::{ChatMessage, ChatRequest, LLMError, LLMProvider};

const SYSTEM_PROMPT: &str = "You are a helpful assistant that suggests a short post-match message \
for a Shadowverse player.\n\nBased on the match result, opponent's name (if available), user's \
notes, and game details, suggest a suitable message that the user can copy and paste. \
Reply with the message only.";

// ============================================================================
// Input Mapping
// ============================================================================

/// Structured suggestion input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionInput {
    pub match_result: GameResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opponent_name: Option<String>,
    /// Non-blank per-game memos, trimmed, joined with `\n`.
    pub user_notes: String,
    pub game_details: Vec<GameSummary>,
}

/// One played game, in play order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSummary {
    pub user_class: String,
    pub opponent_class: String,
    pub turn_order: TurnOrder,
    pub game_result: GameResult,
}

impl TryFrom<&MatchRecord> for SuggestionInput {
    type Error = SuggestionError;

    fn try_from(record: &MatchRecord) -> Result<Self, Self::Error> {
        let match_result = record
            .overall_result
            .ok_or(SuggestionError::UndecidedMatch)?;

        let opponent_name = Some(record.opponent_name.trim())
            .filter(|name| !name.is_empty())
            .map(str::to_string);

        let user_notes = record
            .played_games()
            .map(|(_, game)| game.memo.trim())
            .filter(|memo| !memo.is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        let game_details = record
            .played_games()
            .map(|(_, game)| GameSummary {
                user_class: game.user_class.label().to_string(),
                opponent_class: game.opponent_class.label().to_string(),
                turn_order: game.turn_order,
                game_result: game.result,
            })
            .collect();

        Ok(Self {
            match_result,
            opponent_name,
            user_notes,
            game_details,
        })
    }
}

// ============================================================================
// Prompt
// ============================================================================

/// Render the user prompt for `input`.
pub fn build_prompt(input: &SuggestionInput) -> String {
    let mut prompt = format!(
        "Match Result: {}\nOpponent Name: {}\nUser Notes: {}\nGame Details:\n",
        input.match_result.as_str(),
        input.opponent_name.as_deref().unwrap_or("Unknown Opponent"),
        input.user_notes,
    );
    for game in &input.game_details {
        prompt.push_str(&format!(
            "- User Class: {}, Opponent Class: {}, Turn Order: {}, Game Result: {}\n",
            game.user_class,
            game.opponent_class,
            game.turn_order.as_str(),
            game.game_result.as_str(),
        ));
    }
    prompt.push_str("\nSuggested Message:");
    prompt
}

/// Ask `provider` to draft a post-match message.
pub async fn suggest_post_match_message(
    provider: &dyn LLMProvider,
    input: &SuggestionInput,
) -> Result<String, SuggestionError> {
    let request = ChatRequest::new(vec![ChatMessage::user(build_prompt(input))])
        .with_system(SYSTEM_PROMPT);

    let response = provider.chat(request).await?;
    let message = response.content.trim();
    if message.is_empty() {
        return Err(SuggestionError::EmptyResponse);
    }

    tracing::info!(
        provider = %response.provider,
        model = %response.model,
        latency_ms = response.latency_ms,
        chars = message.chars().count(),
        "Post-match message suggested"
    );
    Ok(message.to_string())
}

// ============================================================================
// Error Types
// ============================================================================

/// Errors from the suggestion flow
#[derive(Debug, thiserror::Error)]
pub enum SuggestionError {
    #[error("Match result is undecided")]
    UndecidedMatch,

    #[error("No suggestion provider is configured")]
    NotConfigured,

    #[error("Provider error: {0}")]
    Provider(#[from] LLMError),

    #[error("Provider returned an empty message")]
    EmptyResponse,
}

impl SuggestionError {
    /// Notification text for the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            SuggestionError::UndecidedMatch => {
                "総合成績が不明なため、メッセージを提案できません。"
            }
            SuggestionError::NotConfigured => "メッセージ提案のAPIキーが設定されていません。",
            SuggestionError::Provider(_) | SuggestionError::EmptyResponse => {
                "メッセージの提案に失敗しました。"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bo3::{CardClass, GameOutcome};

    fn decided_record() -> MatchRecord {
        let mut record = MatchRecord::new();
        record.opponent_name = " Sato ".to_string();
        record.games[0] = Some(
            GameOutcome::new(CardClass::Elf, CardClass::Royal, TurnOrder::First, GameResult::Win)
                .with_memo(" good curve "),
        );
        record.games[1] = Some(GameOutcome::new(
            CardClass::Witch,
            CardClass::Dragon,
            TurnOrder::Second,
            GameResult::Loss,
        ));
        record.games[2] = Some(
            GameOutcome::new(CardClass::Witch, CardClass::Royal, TurnOrder::First, GameResult::Win)
                .with_memo("topdecked"),
        );
        record.refresh_overall_result();
        record
    }

    #[test]
    fn test_undecided_record_is_refused() {
        let record = MatchRecord::new();
        let err = SuggestionInput::try_from(&record).unwrap_err();
        assert!(matches!(err, SuggestionError::UndecidedMatch));
        assert_eq!(
            err.user_message(),
            "総合成績が不明なため、メッセージを提案できません。"
        );
    }

    #[test]
    fn test_input_mapping() {
        let input = SuggestionInput::try_from(&decided_record()).unwrap();
        assert_eq!(input.match_result, GameResult::Win);
        assert_eq!(input.opponent_name.as_deref(), Some("Sato"));
        assert_eq!(input.user_notes, "good curve\ntopdecked");
        assert_eq!(input.game_details.len(), 3);
        assert_eq!(input.game_details[1].user_class, "ウィッチ");
        assert_eq!(input.game_details[1].turn_order, TurnOrder::Second);
        assert_eq!(input.game_details[1].game_result, GameResult::Loss);
    }

    #[test]
    fn test_blank_opponent_is_absent() {
        let mut record = decided_record();
        record.opponent_name = "  ".to_string();
        let input = SuggestionInput::try_from(&record).unwrap();
        assert!(input.opponent_name.is_none());

        let json = serde_json::to_value(&input).unwrap();
        assert!(json.get("opponentName").is_none());
    }

    #[test]
    fn test_input_serializes_wire_names() {
        let input = SuggestionInput::try_from(&decided_record()).unwrap();
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["matchResult"], "win");
        assert_eq!(json["gameDetails"][0]["turnOrder"], "first");
        assert_eq!(json["gameDetails"][1]["gameResult"], "loss");
        assert_eq!(json["gameDetails"][0]["userClass"], "エルフ");
    }

    #[test]
    fn test_prompt_lists_each_game() {
        let input = SuggestionInput::try_from(&decided_record()).unwrap();
        let prompt = build_prompt(&input);
        assert!(prompt.starts_with("Match Result: win\nOpponent Name: Sato\n"));
        assert!(prompt.contains(
            "- User Class: ウィッチ, Opponent Class: ドラゴン, Turn Order: second, Game Result: loss\n"
        ));
        assert!(prompt.ends_with("Suggested Message:"));
    }

    #[test]
    fn test_prompt_unknown_opponent() {
        let mut record = decided_record();
        record.opponent_name.clear();
        let input = SuggestionInput::try_from(&record).unwrap();
        assert!(build_prompt(&input).contains("Opponent Name: Unknown Opponent\n"));
    }
}
