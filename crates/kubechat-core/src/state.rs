//! UI-agnostic conversation types
//!
//! This module contains the data structures shared by every front end: the
//! message itself, who sent it, and the append-only log it is rendered into.

use serde::{Deserialize, Serialize};

/// A single rendered chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub sender: Sender,
}

impl Message {
    pub fn new(text: impl Into<String>, sender: Sender) -> Self {
        Self {
            text: text.into(),
            sender,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, Sender::User)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(text, Sender::Assistant)
    }
}

/// Who a message came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

impl Sender {
    /// Class shared by every message element.
    pub const BASE_CLASS: &'static str = "message";

    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Assistant => "assistant",
        }
    }

    /// Sender-specific style class.
    pub fn style_class(&self) -> &'static str {
        match self {
            Sender::User => "user-message",
            Sender::Assistant => "assistant-message",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Sender::User => "You:",
            Sender::Assistant => "Assistant:",
        }
    }
}

/// Ordered, append-only record of displayed messages.
///
/// Insertion order is display order. There is no way to remove, reorder or
/// edit an entry once pushed.
#[derive(Debug, Clone, Default)]
pub struct ConversationLog {
    messages: Vec<Message>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn as_slice(&self) -> &[Message] {
        &self.messages
    }
}

impl<'a> IntoIterator for &'a ConversationLog {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_keeps_insertion_order() {
        let mut log = ConversationLog::new();
        log.push(Message::assistant("one"));
        log.push(Message::user("two"));
        log.push(Message::assistant("three"));

        let texts: Vec<&str> = log.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
        assert_eq!(log.last(), Some(&Message::assistant("three")));
    }

    #[test]
    fn test_log_accepts_empty_text() {
        let mut log = ConversationLog::new();
        log.push(Message::user(""));
        assert_eq!(log.len(), 1);
        assert_eq!(log.as_slice()[0].text, "");
    }

    #[test]
    fn test_style_classes() {
        assert_eq!(Sender::User.style_class(), "user-message");
        assert_eq!(Sender::Assistant.style_class(), "assistant-message");
        assert_eq!(Sender::BASE_CLASS, "message");
        assert_eq!(Sender::User.as_str(), "user");
        assert_eq!(Sender::Assistant.as_str(), "assistant");
    }

    #[test]
    fn test_sender_serializes_lowercase() {
        let json = serde_json::to_string(&Message::user("hi")).unwrap();
        assert_eq!(json, r#"{"text":"hi","sender":"user"}"#);
    }
}
