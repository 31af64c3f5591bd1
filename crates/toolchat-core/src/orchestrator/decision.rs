//! Reading the LLM's tool decision
//!
//! The reply is free text expected to carry `USE_TOOLS:`, `TOOL_NAME:`,
//! `ARGUMENTS:` and `REASON:` lines. Parsing is best-effort: anything short
//! of an affirmative flag, a tool name and a JSON object of arguments means
//! "no tool".

use serde_json::Value;

use crate::registry::ServerDescriptor;
use crate::types::{scalar_to_param, ToolArguments, ToolCall, ToolDecision};

const USE_TOOLS: &str = "USE_TOOLS:";
const TOOL_NAME: &str = "TOOL_NAME:";
const ARGUMENTS: &str = "ARGUMENTS:";
const REASON: &str = "REASON:";

const LABELS: [&str; 4] = [USE_TOOLS, TOOL_NAME, ARGUMENTS, REASON];

/// Text after `label` on `line`, if the trimmed line starts with it
fn label_value<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    let trimmed = line.trim_start();
    let head = trimmed.get(..label.len())?;
    if head.eq_ignore_ascii_case(label) {
        Some(trimmed[label.len()..].trim())
    } else {
        None
    }
}

/// Index and value of the first line carrying `label`
fn find_label<'a>(lines: &[&'a str], label: &str) -> Option<(usize, &'a str)> {
    lines
        .iter()
        .enumerate()
        .find_map(|(i, line)| label_value(*line, label).map(|v| (i, v)))
}

fn is_affirmative(value: &str) -> bool {
    let word = value
        .trim_matches(|c: char| c.is_ascii_punctuation() || c.is_whitespace())
        .to_ascii_lowercase();
    word == "yes" || word == "true"
}

fn clean_tool_name(value: &str) -> &str {
    value
        .trim()
        .trim_matches(|c: char| c == '"' || c == '\'' || c == '`')
        .trim()
}

/// Parse a JSON object into query arguments
///
/// Scalars are rendered as strings, nested values as their JSON text.
/// Returns `None` unless the text is a JSON object.
pub fn parse_arguments(text: &str) -> Option<ToolArguments> {
    let cleaned = text.trim().trim_matches('`').trim();
    match serde_json::from_str::<Value>(cleaned).ok()? {
        Value::Object(map) => Some(
            map.iter()
                .map(|(key, value)| (key.clone(), scalar_to_param(value)))
                .collect(),
        ),
        _ => None,
    }
}

/// Arguments starting on line `start`, allowing an object that spills over
/// onto following lines until the next label
fn collect_arguments(lines: &[&str], start: usize, first: &str) -> Option<ToolArguments> {
    if let Some(args) = parse_arguments(first) {
        return Some(args);
    }
    if !first.trim_start_matches('`').starts_with('{') {
        return None;
    }

    let mut buffer = first.to_string();
    for line in lines.iter().skip(start + 1) {
        if LABELS.iter().any(|label| label_value(line, label).is_some()) {
            break;
        }
        buffer.push('\n');
        buffer.push_str(line);
        if let Some(args) = parse_arguments(&buffer) {
            return Some(args);
        }
    }
    None
}

/// Read a decision reply for `server`
///
/// Yields at most one call.
pub fn parse_tool_decision(response: &str, server: &ServerDescriptor) -> ToolDecision {
    let lines: Vec<&str> = response.lines().collect();

    let affirmative = find_label(&lines, USE_TOOLS)
        .map(|(_, value)| is_affirmative(value))
        .unwrap_or(false);
    if !affirmative {
        return ToolDecision::no_tool();
    }

    let tool_name = match find_label(&lines, TOOL_NAME).map(|(_, v)| clean_tool_name(v)) {
        Some(name) if !name.is_empty() => name,
        _ => return ToolDecision::no_tool(),
    };

    let arguments = match find_label(&lines, ARGUMENTS) {
        Some((index, value)) => match collect_arguments(&lines, index, value) {
            Some(args) => args,
            None => return ToolDecision::no_tool(),
        },
        None => return ToolDecision::no_tool(),
    };

    ToolDecision::single(ToolCall::new(
        server.base_url.clone(),
        server.id.clone(),
        tool_name,
        arguments,
    ))
}

/// The `REASON:` text, for logging
pub fn decision_reason(response: &str) -> Option<String> {
    let lines: Vec<&str> = response.lines().collect();
    find_label(&lines, REASON).map(|(_, v)| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::builtin_servers;

    fn weather() -> ServerDescriptor {
        builtin_servers().remove(0)
    }

    #[test]
    fn test_affirmative_decision() {
        let reply = "USE_TOOLS: YES\nTOOL_NAME: get_forecast\nARGUMENTS: {\"city\":\"Chiba\"}\nREASON: weather";
        let decision = parse_tool_decision(reply, &weather());

        assert!(decision.use_tool);
        assert_eq!(decision.calls.len(), 1);
        let call = &decision.calls[0];
        assert_eq!(call.tool_name, "get_forecast");
        assert_eq!(call.get_arg("city"), Some("Chiba"));
        assert_eq!(call.server_id, "weather_service");
        assert_eq!(call.server_url, "http://localhost:5010");
    }

    #[test]
    fn test_missing_tool_name_is_no_tool() {
        let reply = "USE_TOOLS: YES\nARGUMENTS: {}";
        assert!(!parse_tool_decision(reply, &weather()).use_tool);

        let reply = "USE_TOOLS: YES\nTOOL_NAME:   \nARGUMENTS: {}";
        assert!(!parse_tool_decision(reply, &weather()).use_tool);
    }

    #[test]
    fn test_negative_or_absent_flag() {
        let reply = "USE_TOOLS: NO\nTOOL_NAME: get_forecast\nARGUMENTS: {}";
        assert!(!parse_tool_decision(reply, &weather()).use_tool);
        assert!(!parse_tool_decision("I think you should check the forecast.", &weather()).use_tool);
        assert!(!parse_tool_decision("", &weather()).use_tool);
    }

    #[test]
    fn test_lenient_label_matching() {
        let reply = "  use_tools: yes.\n  tool_name: `get_alerts`\n  arguments: {\"state\": \"CA\", \"limit\": 3, \"active\": true}";
        let decision = parse_tool_decision(reply, &weather());

        assert!(decision.use_tool);
        let call = &decision.calls[0];
        assert_eq!(call.tool_name, "get_alerts");
        assert_eq!(call.get_arg("limit"), Some("3"));
        assert_eq!(call.get_arg("active"), Some("true"));
        assert_eq!(call.get_arg("state"), Some("CA"));
    }

    #[test]
    fn test_true_is_affirmative() {
        let reply = "USE_TOOLS: true\nTOOL_NAME: \"get_forecast\"\nARGUMENTS: {}";
        let decision = parse_tool_decision(reply, &weather());
        assert!(decision.use_tool);
        assert_eq!(decision.calls[0].tool_name, "get_forecast");
        assert!(decision.calls[0].arguments.is_empty());
    }

    #[test]
    fn test_bad_arguments_are_no_tool() {
        for args in ["not json", "[1, 2]", "\"city\"", ""] {
            let reply = format!("USE_TOOLS: YES\nTOOL_NAME: get_forecast\nARGUMENTS: {}", args);
            assert!(!parse_tool_decision(&reply, &weather()).use_tool, "args: {}", args);
        }
        let reply = "USE_TOOLS: YES\nTOOL_NAME: get_forecast";
        assert!(!parse_tool_decision(reply, &weather()).use_tool);
    }

    #[test]
    fn test_multiline_arguments() {
        let reply = "USE_TOOLS: YES\nTOOL_NAME: get_forecast\nARGUMENTS: {\n  \"city\": \"Chiba\"\n}\nREASON: needs data";
        let decision = parse_tool_decision(reply, &weather());
        assert!(decision.use_tool);
        assert_eq!(decision.calls[0].get_arg("city"), Some("Chiba"));
    }

    #[test]
    fn test_first_matching_line_wins() {
        let reply = "USE_TOOLS: NO\nUSE_TOOLS: YES\nTOOL_NAME: get_forecast\nARGUMENTS: {}";
        assert!(!parse_tool_decision(reply, &weather()).use_tool);
    }

    #[test]
    fn test_reason() {
        assert_eq!(
            decision_reason("USE_TOOLS: NO\nREASON: small talk").as_deref(),
            Some("small talk")
        );
        assert!(decision_reason("USE_TOOLS: NO").is_none());
    }
}
