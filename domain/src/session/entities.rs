//! Chat session domain entities

use serde::{Deserialize, Serialize};

/// Role of a message sent to the model service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A message in a model request (Entity)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// One side of a completed exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", content = "text", rename_all = "lowercase")]
pub enum ConversationTurn {
    User(String),
    Assistant(String),
}

impl ConversationTurn {
    pub fn text(&self) -> &str {
        match self {
            ConversationTurn::User(t) | ConversationTurn::Assistant(t) => t,
        }
    }

    pub fn to_message(&self) -> Message {
        match self {
            ConversationTurn::User(t) => Message::user(t.clone()),
            ConversationTurn::Assistant(t) => Message::assistant(t.clone()),
        }
    }
}

/// Append-only record of completed exchanges in one chat session.
///
/// Grows by exactly one `User` turn followed by one `Assistant` turn per
/// exchange; there is no way to push a single turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationHistory {
    turns: Vec<ConversationTurn>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Record a completed exchange.
    pub fn append_exchange(&mut self, query: impl Into<String>, answer: impl Into<String>) {
        self.turns.push(ConversationTurn::User(query.into()));
        self.turns.push(ConversationTurn::Assistant(answer.into()));
    }

    /// Drop every recorded exchange (session reset).
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Text of the most recent assistant turn, if any.
    pub fn last_assistant(&self) -> Option<&str> {
        self.turns.iter().rev().find_map(|t| match t {
            ConversationTurn::Assistant(text) => Some(text.as_str()),
            ConversationTurn::User(_) => None,
        })
    }

    pub fn to_messages(&self) -> Vec<Message> {
        turns_to_messages(&self.turns)
    }
}

/// Map a read-only view of history onto model messages.
pub fn turns_to_messages(turns: &[ConversationTurn]) -> Vec<Message> {
    turns.iter().map(ConversationTurn::to_message).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_exchange_adds_two_turns_in_order() {
        let mut history = ConversationHistory::new();
        history.append_exchange("When is the next PyHC meeting?", "It is on Monday.");
        assert_eq!(history.len(), 2);
        assert_eq!(
            history.turns(),
            &[
                ConversationTurn::User("When is the next PyHC meeting?".into()),
                ConversationTurn::Assistant("It is on Monday.".into()),
            ]
        );
        assert_eq!(history.last_assistant(), Some("It is on Monday."));
    }

    #[test]
    fn test_to_messages_maps_roles() {
        let mut history = ConversationHistory::new();
        history.append_exchange("q", "a");
        let messages = history.to_messages();
        assert_eq!(messages[0], Message::user("q"));
        assert_eq!(messages[1], Message::assistant("a"));
    }

    #[test]
    fn test_clear() {
        let mut history = ConversationHistory::new();
        history.append_exchange("q", "a");
        history.clear();
        assert!(history.is_empty());
        assert!(history.last_assistant().is_none());
    }

    #[test]
    fn test_turn_serialization() {
        let json = serde_json::to_value(ConversationTurn::User("hi".into())).unwrap();
        assert_eq!(json, serde_json::json!({"role": "user", "text": "hi"}));
    }
}
