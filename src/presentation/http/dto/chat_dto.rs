use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::use_cases::ChatReply;
use crate::domain::entities::{Conversation, ConversationTurn, Role, SourceCitation};

/// Characters of source text shown under an answer in the web UI.
pub const SOURCE_PREVIEW_CHARS: usize = 200;

#[derive(Debug, Deserialize)]
pub struct ChatRequestDto {
    pub session_id: Option<Uuid>,
    #[serde(default)]
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct SourceDto {
    pub rank: usize,
    pub chunk_id: usize,
    pub page: u32,
    pub similarity_score: f32,
    pub preview: String,
}

impl From<&SourceCitation> for SourceDto {
    fn from(citation: &SourceCitation) -> Self {
        Self {
            rank: citation.rank,
            chunk_id: citation.chunk_id,
            page: citation.page_number,
            similarity_score: citation.similarity_score,
            preview: citation.preview(SOURCE_PREVIEW_CHARS),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageDto {
    pub role: Role,
    pub text: String,
    pub sources: Vec<SourceDto>,
    pub created_at: DateTime<Utc>,
}

impl From<&ConversationTurn> for MessageDto {
    fn from(turn: &ConversationTurn) -> Self {
        Self {
            role: turn.role(),
            text: turn.text().to_string(),
            sources: turn.sources().iter().map(SourceDto::from).collect(),
            created_at: turn.created_at(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatResponseDto {
    pub session_id: Uuid,
    pub message: MessageDto,
}

impl From<ChatReply> for ChatResponseDto {
    fn from(reply: ChatReply) -> Self {
        Self {
            session_id: reply.session_id,
            message: MessageDto::from(&reply.turn),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ConversationDto {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub questions_asked: usize,
    pub messages: Vec<MessageDto>,
}

impl From<&Conversation> for ConversationDto {
    fn from(conversation: &Conversation) -> Self {
        Self {
            session_id: conversation.id(),
            created_at: conversation.created_at(),
            questions_asked: conversation.questions_asked(),
            messages: conversation.turns().iter().map(MessageDto::from).collect(),
        }
    }
}
