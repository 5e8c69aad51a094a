use serde::{Deserialize, Serialize};

/// Who wrote a message.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// User role.
    User,

    /// Assistant role.
    Assistant,
}

/// A single turn sent to the provider.
///
/// The chat endpoint only ever sends one user turn per request, so content is
/// always a plain string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageParam {
    /// The content of the message.
    pub content: String,

    /// The role of the message.
    pub role: MessageRole,
}

impl MessageParam {
    /// Create a user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            role: MessageRole::User,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, to_value};

    #[test]
    fn user_turn_wire_form() {
        let message = MessageParam::user("Hello, Claude!");
        assert_eq!(
            to_value(&message).unwrap(),
            json!({
                "content": "Hello, Claude!",
                "role": "user"
            })
        );
    }

    #[test]
    fn roles_are_lowercase() {
        assert_eq!(to_value(MessageRole::Assistant).unwrap(), json!("assistant"));
        assert_eq!(to_value(MessageRole::User).unwrap(), json!("user"));
    }
}
