//! Process-local repository. Contents are lost on restart.

use std::collections::BTreeMap;

use parking_lot::Mutex;
use tracing::debug;

use foodsight_core::Result;

use crate::repository::{conversation_not_found, validate_title, ConversationRepository};
use crate::types::{Conversation, Message, MonotonicClock, NewMessage};

#[derive(Default)]
struct Inner {
    conversations: BTreeMap<i64, Conversation>,
    messages: BTreeMap<i64, Message>,
    next_conversation_id: i64,
    next_message_id: i64,
    clock: MonotonicClock,
}

/// In-memory store. One lock covers the maps, both id counters and the
/// clock, so every write is a single critical section.
#[derive(Default)]
pub struct MemoryRepository {
    inner: Mutex<Inner>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConversationRepository for MemoryRepository {
    fn backend(&self) -> &'static str {
        "memory"
    }

    fn create_conversation(&self, title: &str) -> Result<Conversation> {
        let title = validate_title(title)?;
        let mut inner = self.inner.lock();
        inner.next_conversation_id += 1;
        let now = inner.clock.next();
        let conversation = Conversation {
            id: inner.next_conversation_id,
            title,
            created_at: now,
            updated_at: now,
        };
        inner
            .conversations
            .insert(conversation.id, conversation.clone());
        debug!(id = conversation.id, "Conversation created");
        Ok(conversation)
    }

    fn get_conversations(&self) -> Result<Vec<Conversation>> {
        let inner = self.inner.lock();
        let mut list: Vec<Conversation> = inner.conversations.values().cloned().collect();
        list.sort_by(|a, b| (b.updated_at, b.id).cmp(&(a.updated_at, a.id)));
        Ok(list)
    }

    fn get_conversation(&self, id: i64) -> Result<Option<Conversation>> {
        Ok(self.inner.lock().conversations.get(&id).cloned())
    }

    fn delete_conversation(&self, id: i64) -> Result<bool> {
        let mut inner = self.inner.lock();
        if inner.conversations.remove(&id).is_none() {
            return Ok(false);
        }
        inner.messages.retain(|_, m| m.conversation_id != id);
        debug!(id, "Conversation deleted");
        Ok(true)
    }

    fn get_messages(&self, conversation_id: i64) -> Result<Vec<Message>> {
        let inner = self.inner.lock();
        if !inner.conversations.contains_key(&conversation_id) {
            return Err(conversation_not_found(conversation_id));
        }
        let mut list: Vec<Message> = inner
            .messages
            .values()
            .filter(|m| m.conversation_id == conversation_id)
            .cloned()
            .collect();
        list.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        Ok(list)
    }

    fn create_message(&self, message: NewMessage) -> Result<Message> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        let Some(conversation) = inner.conversations.get_mut(&message.conversation_id) else {
            return Err(conversation_not_found(message.conversation_id));
        };
        let now = inner.clock.next();
        conversation.updated_at = now;

        inner.next_message_id += 1;
        let stored = Message {
            id: inner.next_message_id,
            conversation_id: message.conversation_id,
            role: message.role,
            content: message.content,
            created_at: now,
        };
        inner.messages.insert(stored.id, stored.clone());
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::conformance;
    use crate::types::Role;
    use std::sync::Arc;

    #[test]
    fn test_conformance() {
        conformance::run_all(&MemoryRepository::new());
    }

    #[test]
    fn test_concurrent_writers_get_unique_ids() {
        let repo = Arc::new(MemoryRepository::new());
        let conversation = repo.create_conversation("shared").unwrap();

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let repo = Arc::clone(&repo);
                std::thread::spawn(move || {
                    (0..50)
                        .map(|i| {
                            repo.create_message(NewMessage {
                                conversation_id: conversation.id,
                                role: Role::User,
                                content: format!("{}-{}", t, i),
                            })
                            .unwrap()
                            .id
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut ids: Vec<i64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 400);
        assert_eq!(repo.get_messages(conversation.id).unwrap().len(), 400);
    }
}
