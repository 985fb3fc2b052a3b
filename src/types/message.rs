use routegraph_macros::State;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents different types of messages in the system
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Human,
    AI,
    System,
}

/// Represents a message in the system
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub message_type: MessageType,
    pub content: String,
}

impl Message {
    /// Creates a new human message
    pub fn human(content: impl Into<String>) -> Self {
        Self {
            message_type: MessageType::Human,
            content: content.into(),
        }
    }

    /// Creates a new AI message
    pub fn ai(content: impl Into<String>) -> Self {
        Self {
            message_type: MessageType::AI,
            content: content.into(),
        }
    }

    /// Creates a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            message_type: MessageType::System,
            content: content.into(),
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let role = match self.message_type {
            MessageType::Human => "human",
            MessageType::AI => "ai",
            MessageType::System => "system",
        };
        write!(f, "{}: {}", role, self.content)
    }
}

/// Represents the state of messages in a conversation
#[derive(State, Debug, Clone, Default, PartialEq)]
pub struct MessagesState {
    #[update(append)]
    pub messages: Vec<Message>,
}

impl MessagesState {
    /// Creates a new empty message state
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a state holding a single human message
    pub fn from_human(content: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::human(content)],
        }
    }

    /// Adds a message to the state
    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Gets the last message in the state
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GraphState;

    #[test]
    fn test_message_creation() {
        let human_msg = Message::human("Hello");
        assert_eq!(human_msg.message_type, MessageType::Human);

        let ai_msg = Message::ai("Hi there");
        assert_eq!(ai_msg.message_type, MessageType::AI);

        let system_msg = Message::system("System prompt");
        assert_eq!(system_msg.message_type, MessageType::System);
        assert_eq!(system_msg.to_string(), "system: System prompt");
    }

    #[test]
    fn test_message_state() {
        let mut state = MessagesState::new();
        assert_eq!(state.messages.len(), 0);

        state.add_message(Message::human("Hello"));
        assert_eq!(state.messages.len(), 1);

        let last_msg = state.last_message().unwrap();
        assert_eq!(last_msg.message_type, MessageType::Human);
    }

    #[test]
    fn test_messages_update_appends() {
        let mut state = MessagesState::from_human("Hello");
        state.apply(MessagesStateUpdate::Messages(vec![Message::ai("Hi")]));

        assert_eq!(
            state.messages,
            vec![Message::human("Hello"), Message::ai("Hi")]
        );
    }

    #[test]
    fn test_message_serialization() {
        let json = serde_json::to_value(Message::ai("ok")).unwrap();
        assert_eq!(json["message_type"], "ai");
        assert_eq!(json["content"], "ok");
    }
}
