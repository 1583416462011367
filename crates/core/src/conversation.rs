//! Conversation messages and the per-session context buffer.

use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Display for Role {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => formatter.write_str("user"),
            Role::Assistant => formatter.write_str("assistant"),
        }
    }
}

/// A single turn of the conversation. Fields are private so a message cannot
/// change once it has been created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationMessage {
    role: Role,
    content: String,
}

impl ConversationMessage {
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

    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }
}

impl Display for ConversationMessage {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self.role {
            Role::User => "Human",
            Role::Assistant => "Assistant",
        };
        write!(formatter, "{label}: {}", self.content)
    }
}

/// Ordered, append-only record of the turns of one session.
#[derive(Debug, Clone, Default)]
pub struct ContextBuffer {
    messages: Vec<ConversationMessage>,
}

impl ContextBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: ConversationMessage) {
        self.messages.push(message);
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(ConversationMessage::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.push(ConversationMessage::assistant(content));
    }

    #[must_use]
    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    #[must_use]
    pub fn last(&self) -> Option<&ConversationMessage> {
        self.messages.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl FromIterator<ConversationMessage> for ContextBuffer {
    fn from_iter<T: IntoIterator<Item = ConversationMessage>>(iter: T) -> Self {
        Self {
            messages: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_keeps_insertion_order() {
        let mut buffer = ContextBuffer::new();
        buffer.push_user("first");
        buffer.push_assistant("second");
        buffer.push_user("third");

        let contents: Vec<&str> = buffer.messages().iter().map(|m| m.content()).collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
        assert_eq!(buffer.last().map(ConversationMessage::role), Some(Role::User));
        assert_eq!(buffer.len(), 3);
    }

    #[test]
    fn test_message_display_is_turn_labelled() {
        assert_eq!(
            ConversationMessage::user("how do I list files").to_string(),
            "Human: how do I list files"
        );
        assert_eq!(
            ConversationMessage::assistant("ls").to_string(),
            "Assistant: ls"
        );
    }
}
