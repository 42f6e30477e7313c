use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::domain::entities::{Conversation, ConversationTurn};
use crate::domain::repositories::{ConversationRepository, ConversationRepositoryError};

/// Process-local session store; everything is lost on restart.
///
/// Holds at most `max_sessions` conversations. Sessions idle for longer than
/// `idle_ttl` are dropped when a new session is created, and if the store is
/// still full the least recently active session is evicted.
pub struct InMemoryConversationRepository {
    sessions: RwLock<HashMap<Uuid, Conversation>>,
    max_sessions: usize,
    idle_ttl: Duration,
}

impl InMemoryConversationRepository {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_sessions: config.max_sessions.max(1),
            idle_ttl: Duration::minutes(config.idle_minutes as i64),
        }
    }

    fn make_room(&self, sessions: &mut HashMap<Uuid, Conversation>) {
        let cutoff = Utc::now() - self.idle_ttl;
        let before = sessions.len();
        sessions.retain(|_, conversation| conversation.last_active() > cutoff);
        if sessions.len() < before {
            debug!("Expired {} idle sessions", before - sessions.len());
        }

        while sessions.len() >= self.max_sessions {
            let oldest = sessions
                .values()
                .min_by_key(|conversation| conversation.last_active())
                .map(|conversation| conversation.id());
            match oldest {
                Some(id) => {
                    sessions.remove(&id);
                    debug!("Evicted session {}", id);
                }
                None => break,
            }
        }
    }
}

impl Default for InMemoryConversationRepository {
    fn default() -> Self {
        Self::new(&SessionConfig::default())
    }
}

#[async_trait]
impl ConversationRepository for InMemoryConversationRepository {
    async fn get_or_create(&self, id: Option<Uuid>) -> Uuid {
        let mut sessions = self.sessions.write().await;
        if let Some(conversation) = id.and_then(|id| sessions.get_mut(&id)) {
            conversation.touch();
            return conversation.id();
        }

        self.make_room(&mut sessions);

        let conversation = Conversation::new();
        let new_id = conversation.id();
        sessions.insert(new_id, conversation);
        debug!("Created session {}", new_id);
        new_id
    }

    async fn append(
        &self,
        id: Uuid,
        turn: ConversationTurn,
    ) -> Result<(), ConversationRepositoryError> {
        let mut sessions = self.sessions.write().await;
        let conversation = sessions
            .get_mut(&id)
            .ok_or(ConversationRepositoryError::NotFound(id))?;
        conversation.push(turn);
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Option<Conversation> {
        self.sessions.read().await.get(&id).cloned()
    }

    async fn remove(&self, id: Uuid) -> Result<(), ConversationRepositoryError> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .map(|_| debug!("Removed session {}", id))
            .ok_or(ConversationRepositoryError::NotFound(id))
    }

    async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limited(max_sessions: usize) -> InMemoryConversationRepository {
        InMemoryConversationRepository::new(&SessionConfig {
            max_sessions,
            idle_minutes: 60,
        })
    }

    #[tokio::test]
    async fn test_unknown_id_creates_new_session() {
        let repo = InMemoryConversationRepository::default();
        let stale = Uuid::new_v4();

        let id = repo.get_or_create(Some(stale)).await;

        assert_ne!(id, stale);
        assert_eq!(repo.get_or_create(Some(id)).await, id);
        assert_eq!(repo.count().await, 1);
    }

    #[tokio::test]
    async fn test_append_and_remove() {
        let repo = InMemoryConversationRepository::default();
        let id = repo.get_or_create(None).await;

        repo.append(id, ConversationTurn::user("Who is a worker?".into()))
            .await
            .unwrap();
        repo.append(id, ConversationTurn::assistant("A worker is...".into(), vec![]))
            .await
            .unwrap();
        assert_eq!(repo.find(id).await.unwrap().turns().len(), 2);

        repo.remove(id).await.unwrap();
        assert!(repo.find(id).await.is_none());
        assert_eq!(repo.count().await, 0);
        assert!(matches!(
            repo.remove(id).await,
            Err(ConversationRepositoryError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_append_to_missing_session() {
        let repo = InMemoryConversationRepository::default();
        let result = repo
            .append(Uuid::new_v4(), ConversationTurn::user("hi".into()))
            .await;
        assert!(matches!(result, Err(ConversationRepositoryError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_session_count_is_capped() {
        let repo = limited(10);

        for _ in 0..1000 {
            repo.get_or_create(None).await;
        }

        assert_eq!(repo.count().await, 10);
    }

    #[tokio::test]
    async fn test_eviction_drops_least_recently_active() {
        let repo = limited(2);
        let first = repo.get_or_create(None).await;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = repo.get_or_create(None).await;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        repo.append(first, ConversationTurn::user("still here".into()))
            .await
            .unwrap();
        let third = repo.get_or_create(None).await;

        assert!(repo.find(first).await.is_some());
        assert!(repo.find(second).await.is_none());
        assert!(repo.find(third).await.is_some());
    }

    #[tokio::test]
    async fn test_idle_sessions_expire() {
        let repo = InMemoryConversationRepository::new(&SessionConfig {
            max_sessions: 100,
            idle_minutes: 0,
        });
        let idle = repo.get_or_create(None).await;

        let fresh = repo.get_or_create(None).await;

        assert!(repo.find(idle).await.is_none());
        assert!(repo.find(fresh).await.is_some());
    }
}
