//! Conversational prompt templates shared by the network providers

use crate::types::{ConversationTurn, Language};

/// Build the conversational prompt for `message`
///
/// The template language follows the script of the message. `history` is
/// rendered as `role: text` lines above the current message when non-empty.
pub(crate) fn conversation_prompt<'a>(
    message: &str,
    tool_hints: &[String],
    history: impl IntoIterator<Item = &'a ConversationTurn>,
) -> String {
    let language = Language::detect(message);
    let history: Vec<String> = history
        .into_iter()
        .map(|turn| format!("{}: {}", turn.role, turn.text))
        .collect();
    let note = tool_hint_note(language, tool_hints)
        .map(|n| format!("\n\n{}", n))
        .unwrap_or_default();

    let mut prompt = String::new();
    match language {
        Language::Japanese => {
            prompt.push_str(
                "あなたは親しみやすいAIアシスタントです。ユーザーのメッセージに日本語で自然に返答してください。\n\n",
            );
            if !history.is_empty() {
                prompt.push_str("これまでの会話の流れ:\n");
                prompt.push_str(&history.join("\n"));
                prompt.push_str("\n\n");
            }
            prompt.push_str(&format!("現在のユーザーメッセージ: {}{}\n\n", message, note));
            prompt.push_str("会話調で親しみやすく、役立つ情報を含んだ日本語の回答をお願いします。");
        }
        Language::English => {
            prompt.push_str(
                "You are a helpful AI assistant. Please respond naturally to the user's message.\n\n",
            );
            if !history.is_empty() {
                prompt.push_str("Context from our conversation:\n");
                prompt.push_str(&history.join("\n"));
                prompt.push_str("\n\n");
            }
            prompt.push_str(&format!("User message: {}{}\n\n", message, note));
            prompt.push_str(
                "Respond in a conversational, helpful manner. Keep responses concise but thorough.",
            );
        }
    }
    prompt
}

/// Note appended when the caller supplies tool hints
fn tool_hint_note(language: Language, tool_hints: &[String]) -> Option<String> {
    if tool_hints.is_empty() {
        return None;
    }
    let tools = tool_hints.join(", ");
    Some(match language {
        Language::Japanese => format!("（利用可能なツール: {}）", tools),
        Language::English => format!("Note: I have access to these tools if needed: {}", tools),
    })
}
