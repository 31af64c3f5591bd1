//! Bounded conversation history for multi-turn providers

use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Maximum number of turns kept (10 user/assistant exchanges)
pub const MAX_HISTORY_TURNS: usize = 20;

/// Speaker of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

impl std::fmt::Display for TurnRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TurnRole::User => write!(f, "user"),
            TurnRole::Assistant => write!(f, "assistant"),
        }
    }
}

/// One entry in the conversation history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: TurnRole,
    pub text: String,
    /// Unix time in milliseconds
    pub timestamp: u64,
}

impl ConversationTurn {
    pub fn new(role: TurnRole, text: impl Into<String>) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self {
            role,
            text: text.into(),
            timestamp,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(TurnRole::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(TurnRole::Assistant, text)
    }
}

/// Ordered, bounded turn list
///
/// When an append pushes the length past [`MAX_HISTORY_TURNS`], the oldest
/// user+assistant pair is dropped so the history never starts mid-exchange.
#[derive(Debug, Clone, Default)]
pub struct ConversationHistory {
    turns: VecDeque<ConversationTurn>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: ConversationTurn) {
        self.turns.push_back(turn);
        while self.turns.len() > MAX_HISTORY_TURNS {
            self.turns.pop_front();
            self.turns.pop_front();
        }
    }

    /// Record a completed exchange
    pub fn record_exchange(&mut self, user: impl Into<String>, assistant: impl Into<String>) {
        self.push(ConversationTurn::user(user));
        self.push(ConversationTurn::assistant(assistant));
    }

    /// The last `count` turns, oldest first
    pub fn recent(&self, count: usize) -> impl Iterator<Item = &ConversationTurn> {
        let skip = self.turns.len().saturating_sub(count);
        self.turns.iter().skip(skip)
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConversationTurn> {
        self.turns.iter()
    }
}
