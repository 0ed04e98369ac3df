//! Conversation and message records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "user" => Some(Role::User),
            "assistant" => Some(Role::Assistant),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: i64,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: i64,
    pub conversation_id: i64,
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Input for [`crate::ConversationRepository::create_message`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessage {
    pub conversation_id: i64,
    pub role: Role,
    pub content: String,
}

/// Hands out strictly increasing millisecond timestamps so that ordering by
/// time always agrees with the order of writes.
#[derive(Debug, Default)]
pub(crate) struct MonotonicClock {
    last_millis: i64,
}

impl MonotonicClock {
    pub(crate) fn next_millis(&mut self) -> i64 {
        let now = Utc::now().timestamp_millis();
        self.last_millis = now.max(self.last_millis + 1);
        self.last_millis
    }

    pub(crate) fn next(&mut self) -> DateTime<Utc> {
        from_millis(self.next_millis())
    }
}

pub(crate) fn from_millis(millis: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(millis).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_is_strictly_increasing() {
        let mut clock = MonotonicClock::default();
        let stamps: Vec<i64> = (0..1_000).map(|_| clock.next_millis()).collect();
        assert!(stamps.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_wire_names() {
        let message = Message {
            id: 3,
            conversation_id: 1,
            role: Role::Assistant,
            content: "Hola".into(),
            created_at: from_millis(1_700_000_000_000),
        };
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["conversationId"], 1);
        assert_eq!(json["role"], "assistant");
        assert!(json["createdAt"].as_str().unwrap().starts_with("2023-11-14T"));

        let parsed: NewMessage =
            serde_json::from_str(r#"{"conversationId":1,"role":"user","content":"hi"}"#).unwrap();
        assert_eq!(parsed.role, Role::User);
        assert!(serde_json::from_str::<NewMessage>(
            r#"{"conversationId":1,"role":"system","content":"hi"}"#
        )
        .is_err());
    }
}
