use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::chats::repo::Message;

/// A message as one side of the conversation sees it: `sender` is "me"
/// or "them" relative to the caller, never a raw user id.
#[derive(Debug, Serialize)]
pub struct MessageView {
    pub id: i64,
    pub text: String,
    pub sender: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

impl MessageView {
    pub fn tagged(message: Message, caller_id: i64) -> Self {
        let sender = if message.sender_id == caller_id {
            "me"
        } else {
            "them"
        };
        Self {
            id: message.id,
            text: message.text,
            sender: sender.to_string(),
            timestamp: message.created_at,
        }
    }
}

/// Splits a caller's full message history into one ordered list per
/// counterpart. Input order is preserved, so rows fetched oldest-first
/// stay oldest-first within each conversation.
pub fn group_by_partner(caller_id: i64, messages: Vec<Message>) -> BTreeMap<i64, Vec<MessageView>> {
    let mut conversations: BTreeMap<i64, Vec<MessageView>> = BTreeMap::new();
    for message in messages {
        let partner = if message.sender_id == caller_id {
            message.receiver_id
        } else {
            message.sender_id
        };
        conversations
            .entry(partner)
            .or_default()
            .push(MessageView::tagged(message, caller_id));
    }
    conversations
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    #[serde(default)]
    pub text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn message(id: i64, sender_id: i64, receiver_id: i64, text: &str) -> Message {
        Message {
            id,
            sender_id,
            receiver_id,
            text: text.into(),
            created_at: datetime!(2024-05-01 12:00 UTC) + time::Duration::minutes(id),
        }
    }

    #[test]
    fn tags_are_relative_to_caller() {
        let rows = vec![message(1, 1, 2, "hi"), message(2, 2, 1, "hello")];

        let as_alice: Vec<_> = rows
            .iter()
            .cloned()
            .map(|m| MessageView::tagged(m, 1))
            .collect();
        assert_eq!(as_alice[0].sender, "me");
        assert_eq!(as_alice[1].sender, "them");

        let as_bob: Vec<_> = rows
            .into_iter()
            .map(|m| MessageView::tagged(m, 2))
            .collect();
        assert_eq!(as_bob[0].sender, "them");
        assert_eq!(as_bob[1].sender, "me");
    }

    #[test]
    fn groups_by_counterpart_preserving_order() {
        let rows = vec![
            message(1, 1, 2, "hi bob"),
            message(2, 3, 1, "hi from carol"),
            message(3, 2, 1, "hello alice"),
        ];
        let grouped = group_by_partner(1, rows);

        assert_eq!(grouped.len(), 2);
        let with_bob = &grouped[&2];
        assert_eq!(with_bob.len(), 2);
        assert_eq!(with_bob[0].text, "hi bob");
        assert_eq!(with_bob[0].sender, "me");
        assert_eq!(with_bob[1].text, "hello alice");
        assert_eq!(with_bob[1].sender, "them");

        let with_carol = &grouped[&3];
        assert_eq!(with_carol.len(), 1);
        assert_eq!(with_carol[0].sender, "them");
    }

    #[test]
    fn serializes_with_rfc3339_timestamp() {
        let view = MessageView::tagged(message(1, 1, 2, "hi"), 1);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["sender"], "me");
        assert_eq!(json["timestamp"], "2024-05-01T12:01:00Z");
    }
}
