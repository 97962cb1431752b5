//! Client directory
//!
//! Sole owner of the client records. Lookups that miss return `None`;
//! nothing here fails except id allocation under a retry policy.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::error::Result;
use crate::ids::{self, CollisionPolicy, IdGenerator, IdPrefix};
use crate::models::Client;

pub struct ClientDirectory {
    clients: RwLock<HashMap<String, Client>>,
    ids: Arc<dyn IdGenerator>,
    collision: CollisionPolicy,
}

impl ClientDirectory {
    pub fn new(ids: Arc<dyn IdGenerator>, collision: CollisionPolicy) -> Self {
        Self {
            clients: RwLock::new(HashMap::new()),
            ids,
            collision,
        }
    }

    /// Look up a client by id
    pub fn get(&self, id: &str) -> Option<Client> {
        self.clients.read().get(id).cloned()
    }

    /// All clients, most recent registration first.
    ///
    /// Equal `member_since` values fall back to id order, so the result is
    /// the same on every call for the same contents.
    pub fn list(&self) -> Vec<Client> {
        let mut clients: Vec<Client> = self.clients.read().values().cloned().collect();
        clients.sort_by(|a, b| {
            b.member_since
                .cmp(&a.member_since)
                .then_with(|| a.id.cmp(&b.id))
        });
        clients
    }

    /// Allocate and insert a blank client on the basic plan
    pub fn create_empty(&self) -> Result<Client> {
        self.create_empty_at(Utc::now())
    }

    pub fn create_empty_at(&self, member_since: DateTime<Utc>) -> Result<Client> {
        let mut clients = self.clients.write();
        let id = ids::allocate(self.ids.as_ref(), IdPrefix::Client, self.collision, |id| {
            clients.contains_key(id)
        })?;
        let client = Client::empty(id, member_since);
        clients.insert(client.id.clone(), client.clone());
        debug!("[Directory] Created client {}", client.id);
        Ok(client)
    }

    /// Insert or replace the record keyed by `client.id`.
    ///
    /// `member_since` is fixed at creation: replacing an existing record
    /// keeps the stored value.
    pub fn upsert(&self, mut client: Client) {
        let mut clients = self.clients.write();
        if let Some(existing) = clients.get(&client.id) {
            client.member_since = existing.member_since;
            debug!("[Directory] Replaced client {}", client.id);
        } else {
            debug!("[Directory] Inserted client {}", client.id);
        }
        clients.insert(client.id.clone(), client);
    }

    pub fn len(&self) -> usize {
        self.clients.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.read().is_empty()
    }

    /// Drop every record
    pub fn clear(&self) {
        let mut clients = self.clients.write();
        let count = clients.len();
        clients.clear();
        info!("[Directory] Cleared {} clients", count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeskError;
    use crate::ids::{ScriptedIdGenerator, SequentialIdGenerator};
    use crate::models::Plan;
    use chrono::{Duration, TimeZone};

    fn directory() -> ClientDirectory {
        ClientDirectory::new(
            Arc::new(SequentialIdGenerator::new()),
            CollisionPolicy::default(),
        )
    }

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_list_orders_by_member_since_desc() {
        let dir = directory();
        dir.upsert(Client::empty("C1-81678", at(2022, 10, 20)));
        dir.upsert(Client::empty("C1-74999", at(2023, 2, 23)));

        let ids: Vec<_> = dir.list().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["C1-74999", "C1-81678"]);
    }

    #[test]
    fn test_newest_client_lists_first() {
        let dir = directory();
        dir.upsert(Client::empty("C1-81678", at(2022, 10, 20)));
        dir.upsert(Client::empty("C1-74999", at(2023, 2, 23)));

        let latest = dir.list()[0].member_since;
        dir.upsert(Client::empty("C1-20000", latest + Duration::days(1)));
        assert_eq!(dir.list()[0].id, "C1-20000");

        let list = dir.list();
        assert!(list
            .windows(2)
            .all(|pair| pair[0].member_since >= pair[1].member_since));
    }

    #[test]
    fn test_ties_are_stable() {
        let dir = directory();
        let same = at(2024, 1, 1);
        for id in ["C1-30000", "C1-10000", "C1-20000"] {
            dir.upsert(Client::empty(id, same));
        }
        let first: Vec<_> = dir.list().into_iter().map(|c| c.id).collect();
        for _ in 0..10 {
            let again: Vec<_> = dir.list().into_iter().map(|c| c.id).collect();
            assert_eq!(first, again);
        }
        assert_eq!(first, vec!["C1-10000", "C1-20000", "C1-30000"]);
    }

    #[test]
    fn test_missing_client_is_absent_without_side_effects() {
        let dir = directory();
        dir.upsert(Client::empty("C1-74999", at(2023, 2, 23)));
        for _ in 0..3 {
            assert!(dir.get("C1-00000").is_none());
        }
        assert_eq!(dir.len(), 1);
    }

    #[test]
    fn test_create_empty_defaults() {
        let dir = directory();
        let before = Utc::now();
        let client = dir.create_empty().unwrap();

        assert_eq!(client.id, "C1-10000");
        assert!(client.name.is_empty() && client.email.is_empty());
        assert!(client.phone.is_empty() && client.address.is_empty());
        assert_eq!(client.current_plan, Plan::Basic);
        assert!(client.member_since >= before);
        assert_eq!(dir.get(&client.id), Some(client));
    }

    #[test]
    fn test_upsert_replaces_but_keeps_member_since() {
        let dir = directory();
        let original = Client::empty("C1-74999", at(2023, 2, 23));
        dir.upsert(original.clone());

        let edited = original
            .clone()
            .with_name("Ada")
            .with_plan(Plan::Pro)
            .with_email("ada@example.com");
        let mut tampered = edited.clone();
        tampered.member_since = at(2030, 1, 1);
        dir.upsert(tampered);

        let stored = dir.get("C1-74999").unwrap();
        assert_eq!(stored.name, "Ada");
        assert_eq!(stored.current_plan, Plan::Pro);
        assert_eq!(stored.member_since, original.member_since);
        assert_eq!(dir.len(), 1);
    }

    #[test]
    fn test_collision_overwrites_under_legacy_policy() {
        let dir = ClientDirectory::new(
            Arc::new(ScriptedIdGenerator::new(["C1-42424", "C1-42424"])),
            CollisionPolicy::Overwrite,
        );
        let first = dir.create_empty_at(at(2024, 1, 1)).unwrap();
        let second = dir.create_empty_at(at(2024, 6, 1)).unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(dir.len(), 1);
        assert_eq!(dir.get("C1-42424").unwrap().member_since, at(2024, 6, 1));
    }

    #[test]
    fn test_collision_retries_under_default_policy() {
        let dir = ClientDirectory::new(
            Arc::new(ScriptedIdGenerator::new(["C1-42424", "C1-42424", "C1-50000"])),
            CollisionPolicy::Retry { max_attempts: 4 },
        );
        let first = dir.create_empty().unwrap();
        let second = dir.create_empty().unwrap();

        assert_eq!(first.id, "C1-42424");
        assert_eq!(second.id, "C1-50000");
        assert_eq!(dir.len(), 2);
    }

    #[test]
    fn test_collision_fails_when_retries_run_out() {
        let dir = ClientDirectory::new(
            Arc::new(ScriptedIdGenerator::new(["C1-42424"; 4])),
            CollisionPolicy::Retry { max_attempts: 3 },
        );
        dir.create_empty().unwrap();
        let err = dir.create_empty().unwrap_err();
        assert!(matches!(err, DeskError::IdSpaceExhausted { .. }));
        assert_eq!(dir.len(), 1);
    }

    #[test]
    fn test_clear_empties_directory() {
        let dir = directory();
        dir.create_empty().unwrap();
        dir.clear();
        assert!(dir.is_empty());
        assert!(dir.list().is_empty());
    }
}
