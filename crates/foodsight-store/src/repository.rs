//! The storage interface shared by every backend.

use foodsight_core::{Error, Result};

use crate::types::{Conversation, Message, NewMessage};

/// Conversation and message persistence.
///
/// Ids are positive and increase monotonically per record type. Creating a
/// message bumps its conversation's `updated_at`.
pub trait ConversationRepository: Send + Sync {
    /// Short backend name for logs and health output.
    fn backend(&self) -> &'static str;

    fn create_conversation(&self, title: &str) -> Result<Conversation>;

    /// All conversations, most recently updated first (ties: higher id first).
    fn get_conversations(&self) -> Result<Vec<Conversation>>;

    fn get_conversation(&self, id: i64) -> Result<Option<Conversation>>;

    /// Delete a conversation and its messages. `false` when it did not exist.
    fn delete_conversation(&self, id: i64) -> Result<bool>;

    /// Messages of one conversation, oldest first (ties: lower id first).
    /// `NotFound` when the conversation does not exist.
    fn get_messages(&self, conversation_id: i64) -> Result<Vec<Message>>;

    /// `NotFound` when the conversation does not exist.
    fn create_message(&self, message: NewMessage) -> Result<Message>;
}

pub(crate) fn validate_title(title: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(Error::Validation("title must not be empty".into()));
    }
    Ok(title.to_string())
}

pub(crate) fn conversation_not_found(id: i64) -> Error {
    Error::NotFound(format!("conversation {}", id))
}

/// Behavior every backend must share; run from each backend's tests.
#[cfg(test)]
pub(crate) mod conformance {
    use super::*;
    use crate::types::Role;

    fn message(conversation_id: i64, role: Role, content: &str) -> NewMessage {
        NewMessage {
            conversation_id,
            role,
            content: content.into(),
        }
    }

    pub(crate) fn run_all(repo: &dyn ConversationRepository) {
        create_and_list(repo);
        message_ordering_and_bump(repo);
        unknown_conversation(repo);
        cascade_delete(repo);
        blank_title(repo);
    }

    fn create_and_list(repo: &dyn ConversationRepository) {
        let a = repo.create_conversation("Ventas del mes").unwrap();
        let b = repo.create_conversation("  Inventario  ").unwrap();
        assert!(b.id > a.id);
        assert_eq!(b.title, "Inventario");
        assert_eq!(a.created_at, a.updated_at);

        let fetched = repo.get_conversation(a.id).unwrap().unwrap();
        assert_eq!(fetched, a);

        let ids: Vec<i64> = repo.get_conversations().unwrap().iter().map(|c| c.id).collect();
        let pos_a = ids.iter().position(|id| *id == a.id).unwrap();
        let pos_b = ids.iter().position(|id| *id == b.id).unwrap();
        assert!(pos_b < pos_a, "newer conversation must come first");
    }

    fn message_ordering_and_bump(repo: &dyn ConversationRepository) {
        let older = repo.create_conversation("older").unwrap();
        let newer = repo.create_conversation("newer").unwrap();

        let m1 = repo.create_message(message(older.id, Role::User, "¿Cómo van las ventas?")).unwrap();
        let m2 = repo.create_message(message(older.id, Role::Assistant, "Bien.")).unwrap();
        let m3 = repo.create_message(message(older.id, Role::User, "¿Y el inventario?")).unwrap();
        assert!(m1.id < m2.id && m2.id < m3.id);
        assert_eq!(m2.conversation_id, older.id);

        let messages = repo.get_messages(older.id).unwrap();
        let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["¿Cómo van las ventas?", "Bien.", "¿Y el inventario?"]);
        assert!(messages
            .windows(2)
            .all(|w| (w[0].created_at, w[0].id) < (w[1].created_at, w[1].id)));

        let bumped = repo.get_conversation(older.id).unwrap().unwrap();
        assert!(bumped.updated_at > older.updated_at);
        assert!(bumped.updated_at >= m3.created_at);
        assert_eq!(bumped.created_at, older.created_at);

        let first = repo.get_conversations().unwrap()[0].clone();
        assert_eq!(first.id, older.id, "bumped conversation must sort first");
        assert!(repo.get_messages(newer.id).unwrap().is_empty());
    }

    fn unknown_conversation(repo: &dyn ConversationRepository) {
        let missing = 9_999_999;
        assert!(repo.get_conversation(missing).unwrap().is_none());
        assert!(matches!(repo.get_messages(missing), Err(Error::NotFound(_))));
        assert!(matches!(
            repo.create_message(message(missing, Role::User, "hola")),
            Err(Error::NotFound(_))
        ));
        assert!(!repo.delete_conversation(missing).unwrap());
    }

    fn cascade_delete(repo: &dyn ConversationRepository) {
        let c = repo.create_conversation("to delete").unwrap();
        let keep = repo.create_conversation("to keep").unwrap();
        repo.create_message(message(c.id, Role::User, "a")).unwrap();
        repo.create_message(message(keep.id, Role::User, "b")).unwrap();

        assert!(repo.delete_conversation(c.id).unwrap());
        assert!(repo.get_conversation(c.id).unwrap().is_none());
        assert!(matches!(repo.get_messages(c.id), Err(Error::NotFound(_))));
        assert_eq!(repo.get_messages(keep.id).unwrap().len(), 1);
        assert!(!repo.delete_conversation(c.id).unwrap());

        // Ids are never reused after a delete.
        let next = repo.create_conversation("after delete").unwrap();
        assert!(next.id > keep.id);
    }

    fn blank_title(repo: &dyn ConversationRepository) {
        assert!(matches!(repo.create_conversation("   "), Err(Error::Validation(_))));
    }
}
