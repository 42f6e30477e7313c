use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::SourceCitation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    role: Role,
    text: String,
    sources: Vec<SourceCitation>,
    created_at: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn user(text: String) -> Self {
        Self {
            role: Role::User,
            text,
            sources: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn assistant(text: String, sources: Vec<SourceCitation>) -> Self {
        Self {
            role: Role::Assistant,
            text,
            sources,
            created_at: Utc::now(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sources(&self) -> &[SourceCitation] {
        &self.sources
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Append-only message history for one chat session.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversation {
    id: Uuid,
    turns: Vec<ConversationTurn>,
    created_at: DateTime<Utc>,
    last_active: DateTime<Utc>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4())
    }

    pub fn with_id(id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id,
            turns: Vec::new(),
            created_at: now,
            last_active: now,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_active(&self) -> DateTime<Utc> {
        self.last_active
    }

    pub fn touch(&mut self) {
        self.last_active = Utc::now();
    }

    pub fn push(&mut self, turn: ConversationTurn) {
        self.last_active = turn.created_at.max(self.last_active);
        self.turns.push(turn);
    }

    pub fn questions_asked(&self) -> usize {
        self.turns.iter().filter(|t| t.role == Role::User).count()
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turns_append_in_order() {
        let mut conversation = Conversation::new();
        conversation.push(ConversationTurn::user("What is a PCBU?".to_string()));
        conversation.push(ConversationTurn::assistant("A PCBU is...".to_string(), vec![]));

        assert_eq!(conversation.turns().len(), 2);
        assert_eq!(conversation.turns()[0].role(), Role::User);
        assert_eq!(conversation.turns()[1].role(), Role::Assistant);
        assert_eq!(conversation.questions_asked(), 1);
    }

    #[test]
    fn test_push_moves_last_active_forward() {
        let mut conversation = Conversation::new();
        let started = conversation.last_active();

        conversation.push(ConversationTurn::user("hello".to_string()));

        assert!(conversation.last_active() >= started);
        assert_eq!(conversation.created_at(), started);
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&Role::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
    }
}
