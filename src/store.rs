//! Primary and secondary indexes over [`PeerRecord`]s.
//!
//! Grounded on `peer_list.rs`'s `PeerList`, generalized from "one list
//! per category" to the single primary/secondary map pair `spec.md` §3
//! describes (one record per identity key, with an RTC peer-id index on
//! the side).

use std::collections::HashMap;
use std::hash::Hash;

use indexmap::IndexMap;

use crate::record::PeerRecord;

/// `identity_key → record` plus the `peer_id → identity_key` index RTC
/// peers are also reachable through.
pub struct AddressStore<K, C> {
    by_key: IndexMap<K, PeerRecord<K, C>>,
    by_peer_id: HashMap<K, K>,
    connecting_count: u32,
}

impl<K: Clone + Eq + Hash, C: Clone + PartialEq> AddressStore<K, C> {
    pub fn new() -> Self {
        Self {
            by_key: IndexMap::new(),
            by_peer_id: HashMap::new(),
            connecting_count: 0,
        }
    }

    pub fn get(&self, key: &K) -> Option<&PeerRecord<K, C>> {
        self.by_key.get(key)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut PeerRecord<K, C>> {
        self.by_key.get_mut(key)
    }

    pub fn get_by_peer_id(&self, peer_id: &K) -> Option<&PeerRecord<K, C>> {
        self.by_peer_id.get(peer_id).and_then(|key| self.get(key))
    }

    pub fn get_by_peer_id_mut(&mut self, peer_id: &K) -> Option<&mut PeerRecord<K, C>> {
        let key = self.by_peer_id.get(peer_id)?.clone();
        self.get_mut(&key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.by_key.contains_key(key)
    }

    pub fn insert(&mut self, key: K, record: PeerRecord<K, C>) {
        self.by_key.insert(key, record);
    }

    /// Removes the record for `key`, dropping any peer-id index pointing
    /// at it. Does not touch `connecting_count`; callers decrement it
    /// themselves when the removed record was `Connecting`, matching
    /// `spec.md` §9's coupling note.
    pub fn remove(&mut self, key: &K) -> Option<PeerRecord<K, C>> {
        let record = self.by_key.shift_remove(key)?;
        if let Some(peer_id) = &record.address.peer_id {
            self.by_peer_id.remove(peer_id);
        }
        Some(record)
    }

    pub fn put_peer_id(&mut self, peer_id: K, key: K) {
        self.by_peer_id.insert(peer_id, key);
    }

    pub fn remove_peer_id(&mut self, peer_id: &K) {
        self.by_peer_id.remove(peer_id);
    }

    /// Linear iteration in insertion order, the order `query` reports
    /// results in.
    pub fn values(&self) -> impl Iterator<Item = &PeerRecord<K, C>> {
        self.by_key.values()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut PeerRecord<K, C>> {
        self.by_key.values_mut()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&K, &mut PeerRecord<K, C>)> {
        self.by_key.iter_mut()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.by_key.keys()
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    pub fn connecting_count(&self) -> u32 {
        self.connecting_count
    }

    pub fn inc_connecting(&mut self) {
        self.connecting_count += 1;
    }

    pub fn dec_connecting(&mut self) {
        self.connecting_count = self.connecting_count.saturating_sub(1);
    }
}

impl<K: Clone + Eq + Hash, C: Clone + PartialEq> Default for AddressStore<K, C> {
    fn default() -> Self {
        Self::new()
    }
}
