#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// Append-only record of the chat, replayed in full on every persona call.
///
/// Turns are only ever added in user/assistant pairs through
/// [`ConversationHistory::record_exchange`], so a failed model call leaves
/// no partial entry behind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
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

    pub fn record_exchange(&mut self, user_message: impl Into<String>, reply: impl Into<String>) {
        self.turns.push(ConversationTurn::user(user_message));
        self.turns.push(ConversationTurn::assistant(reply));
    }
}

#[cfg(test)]
mod tests {
    use super::{ConversationHistory, ConversationTurn, Role};

    #[test]
    fn record_exchange_appends_user_then_assistant() {
        let mut history = ConversationHistory::new();
        history.record_exchange("hi", "hello there");
        history.record_exchange("User question: boots?", "Try the trail boots!");

        assert_eq!(history.len(), 4);
        assert_eq!(history.turns()[0], ConversationTurn::user("hi"));
        assert_eq!(history.turns()[1].role, Role::Assistant);
        assert_eq!(history.turns()[2].content, "User question: boots?");
        assert_eq!(history.turns()[3].content, "Try the trail boots!");
    }

    #[test]
    fn roles_render_as_wire_names() {
        assert_eq!(Role::System.as_str(), "system");
        assert_eq!(Role::User.as_str(), "user");
        assert_eq!(Role::Assistant.as_str(), "assistant");
    }
}
