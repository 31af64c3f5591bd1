//! Prompt and notice text used by the orchestrator

use crate::registry::ServerDescriptor;
use crate::types::{Language, ToolResult};

/// Ask the LLM whether one of `tools` should handle `message`
///
/// The reply contract is the four labeled lines read back by
/// `parse_tool_decision`.
pub fn decision_prompt(message: &str, server: &ServerDescriptor, tools: &[String]) -> String {
    let tool_list = tools
        .iter()
        .map(|t| format!("• {}", t))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Analyze the user's message and determine if a specific tool should be used.\n\
         Respond strictly in the format below. Do not add any other text or formatting.\n\
         \n\
         User Message: \"{message}\"\n\
         Available Server: {name} ({description})\n\
         Available Tools:\n\
         {tool_list}\n\
         \n\
         Provide your response using these exact keys:\n\
         USE_TOOLS: YES or NO\n\
         TOOL_NAME: [Tool name to use (only if USE_TOOLS is YES)]\n\
         ARGUMENTS: [Arguments for the tool as a single-line JSON object (only if USE_TOOLS is YES)]\n\
         REASON: [Brief reason for your decision]",
        message = message,
        name = server.name,
        description = server.description,
        tool_list = tool_list,
    )
}

/// Ask the LLM to turn raw tool output into an answer to `message`
pub fn format_prompt(message: &str, results: &[ToolResult]) -> String {
    let rendered = results
        .iter()
        .map(ToolResult::labeled)
        .collect::<Vec<_>>()
        .join("\n");

    match Language::detect(message) {
        Language::Japanese => format!(
            "ユーザーからの質問に対してツールを実行しました。\n\
             結果を分かりやすく整形してユーザーに回答してください。\n\
             \n\
             元の質問: \"{}\"\n\
             ツール実行結果:\n\
             {}\n\
             \n\
             ユーザーフレンドリーな形で、結果を要約・整形して回答してください。",
            message, rendered
        ),
        Language::English => format!(
            "A tool was run to answer the user's question.\n\
             Turn the results into a clear answer for the user.\n\
             \n\
             Original question: \"{}\"\n\
             Tool results:\n\
             {}\n\
             \n\
             Summarize the results in a friendly, readable way.",
            message, rendered
        ),
    }
}

/// Shown above the plain answer when the matched server could not be used
pub fn connection_failed_notice(language: Language, server_name: &str) -> String {
    match language {
        Language::Japanese => format!(
            "❌ {}への接続に失敗しました。通常の応答をします。",
            server_name
        ),
        Language::English => format!(
            "❌ Could not connect to {}. Answering without tools.",
            server_name
        ),
    }
}

/// Shown when a fault was caught at the pipeline boundary
pub fn fault_notice(language: Language) -> &'static str {
    match language {
        Language::Japanese => "⚠️ ツール実行中にエラーが発生しました。通常の応答をします。",
        Language::English => "⚠️ Something went wrong while using tools. Answering without them.",
    }
}
