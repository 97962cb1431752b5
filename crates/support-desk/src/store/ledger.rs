//! Message ledger
//!
//! Messages are grouped by owning client id. A group is created on first
//! append and only ever grows; `get` returns it in insertion order while
//! `get_all` sorts the flattened ledger by `created_at`, newest first.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::error::Result;
use crate::ids::{self, CollisionPolicy, IdGenerator, IdPrefix};
use crate::models::{Message, NewMessage, Reaction};

#[derive(Default)]
struct Groups {
    by_client: HashMap<String, Vec<Message>>,
    /// Every message id across all groups
    ids: HashSet<String>,
}

pub struct MessageLedger {
    groups: RwLock<Groups>,
    ids: Arc<dyn IdGenerator>,
    collision: CollisionPolicy,
}

impl MessageLedger {
    pub fn new(ids: Arc<dyn IdGenerator>, collision: CollisionPolicy) -> Self {
        Self {
            groups: RwLock::new(Groups::default()),
            ids,
            collision,
        }
    }

    /// Messages for one client in the order they were appended
    pub fn get(&self, client_id: &str) -> Vec<Message> {
        self.groups
            .read()
            .by_client
            .get(client_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Every message, newest `created_at` first.
    ///
    /// The sort is stable: equal timestamps keep their group order.
    pub fn get_all(&self) -> Vec<Message> {
        let mut messages: Vec<Message> = self
            .groups
            .read()
            .by_client
            .values()
            .flat_map(|group| group.iter().cloned())
            .collect();
        messages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        messages
    }

    /// Append a message to its client's group
    pub fn append(&self, message: Message) {
        Self::push(&mut self.groups.write(), message);
    }

    /// Allocate an id for `input`, append it and return the stored message
    pub fn send(&self, input: NewMessage) -> Result<Message> {
        let mut groups = self.groups.write();
        let id = ids::allocate(self.ids.as_ref(), IdPrefix::Message, self.collision, |id| {
            groups.ids.contains(id)
        })?;
        let message = Message::from_input(id, input);
        Self::push(&mut groups, message.clone());
        Ok(message)
    }

    fn push(groups: &mut Groups, message: Message) {
        groups.ids.insert(message.id.clone());
        debug!(
            "[Ledger] Appended {} to {} ({:?})",
            message.id, message.client_id, message.sender
        );
        groups
            .by_client
            .entry(message.client_id.clone())
            .or_default()
            .push(message);
    }

    /// Change the reaction on one message
    pub fn set_reaction(
        &self,
        client_id: &str,
        message_id: &str,
        reaction: Reaction,
    ) -> Option<Message> {
        let mut groups = self.groups.write();
        let message = groups
            .by_client
            .get_mut(client_id)?
            .iter_mut()
            .find(|m| m.id == message_id)?;
        message.like = reaction;
        debug!("[Ledger] {} reaction set to {:?}", message_id, reaction);
        Some(message.clone())
    }

    /// Total number of messages
    pub fn len(&self) -> usize {
        self.groups.read().by_client.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut groups = self.groups.write();
        let count: usize = groups.by_client.values().map(Vec::len).sum();
        *groups = Groups::default();
        info!("[Ledger] Cleared {} messages", count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{ScriptedIdGenerator, SequentialIdGenerator};
    use crate::models::Sender;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn ledger() -> MessageLedger {
        MessageLedger::new(
            Arc::new(SequentialIdGenerator::new()),
            CollisionPolicy::default(),
        )
    }

    fn t(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, minute, 0).unwrap()
    }

    #[test]
    fn test_unknown_client_has_no_messages() {
        let ledger = ledger();
        assert!(ledger.get("C1-99998").is_empty());
        assert!(ledger.get_all().is_empty());
    }

    #[test]
    fn test_send_round_trip() {
        let ledger = ledger();
        let sent = ledger
            .send(NewMessage::new("C1-74999", "ping", t(0), Sender::Client))
            .unwrap();

        assert_eq!(sent.id, "M1-10000");
        assert_eq!(sent.like, Reaction::Neutral);

        let group = ledger.get("C1-74999");
        assert_eq!(group.last(), Some(&sent));
    }

    #[test]
    fn test_get_keeps_insertion_order() {
        let ledger = ledger();
        ledger
            .send(NewMessage::new("C1-74999", "late", t(30), Sender::Client))
            .unwrap();
        ledger
            .send(NewMessage::new("C1-74999", "early", t(5), Sender::Agent))
            .unwrap();

        let contents: Vec<_> = ledger
            .get("C1-74999")
            .into_iter()
            .map(|m| m.content)
            .collect();
        assert_eq!(contents, vec!["late", "early"]);
    }

    #[test]
    fn test_get_all_sorts_newest_first_across_groups() {
        let ledger = ledger();
        ledger
            .send(NewMessage::new("C1-74999", "a", t(10), Sender::Client))
            .unwrap();
        ledger
            .send(NewMessage::new("C1-81678", "b", t(20), Sender::Client))
            .unwrap();
        ledger
            .send(NewMessage::new("C1-74999", "c", t(15), Sender::Agent))
            .unwrap();

        let contents: Vec<_> = ledger.get_all().into_iter().map(|m| m.content).collect();
        assert_eq!(contents, vec!["b", "c", "a"]);
        assert_eq!(ledger.len(), 3);
    }

    #[test]
    fn test_orphan_messages_are_kept() {
        let ledger = ledger();
        ledger
            .send(NewMessage::new("C1-00001", "anyone?", t(0), Sender::Client))
            .unwrap();
        assert_eq!(ledger.get("C1-00001").len(), 1);
    }

    #[test]
    fn test_set_reaction_updates_in_place() {
        let ledger = ledger();
        let sent = ledger
            .send(NewMessage::new("C1-74999", "thanks!", t(0), Sender::Agent))
            .unwrap();

        let updated = ledger
            .set_reaction("C1-74999", &sent.id, Reaction::Liked)
            .unwrap();
        assert_eq!(updated.like, Reaction::Liked);
        assert_eq!(ledger.get("C1-74999")[0].like, Reaction::Liked);

        assert!(ledger
            .set_reaction("C1-81678", &sent.id, Reaction::Disliked)
            .is_none());
        assert!(ledger
            .set_reaction("C1-74999", "M1-00000", Reaction::Disliked)
            .is_none());
    }

    #[test]
    fn test_message_id_collision_retries() {
        let ledger = MessageLedger::new(
            Arc::new(ScriptedIdGenerator::new(["M1-33333", "M1-33333", "M1-44444"])),
            CollisionPolicy::default(),
        );
        let now = Utc::now();
        let first = ledger
            .send(NewMessage::new("C1-74999", "one", now, Sender::Client))
            .unwrap();
        let second = ledger
            .send(NewMessage::new(
                "C1-81678",
                "two",
                now + Duration::seconds(1),
                Sender::Client,
            ))
            .unwrap();
        assert_eq!(first.id, "M1-33333");
        assert_eq!(second.id, "M1-44444");
    }

    #[test]
    fn test_clear_drops_groups_and_ids() {
        let ledger = MessageLedger::new(
            Arc::new(ScriptedIdGenerator::new(["M1-33333", "M1-33333"])),
            CollisionPolicy::Retry { max_attempts: 1 },
        );
        ledger
            .send(NewMessage::new("C1-74999", "one", t(0), Sender::Client))
            .unwrap();
        ledger.clear();
        assert!(ledger.is_empty());
        // the id is free again once the ledger is cleared
        let again = ledger
            .send(NewMessage::new("C1-74999", "two", t(1), Sender::Client))
            .unwrap();
        assert_eq!(again.id, "M1-33333");
    }
}
