//! Bookkeeping of bulbs that already have a hub device.

use std::collections::HashMap;

use crate::types::{Bulb, BulbAddress};

/// A bulb that has been turned into a hub device.
#[derive(Debug)]
pub struct RegistryEntry<D> {
    pub bulb: Bulb,
    pub device: D,
}

/// Tracks which bulbs have a hub device, keyed by hardware address.
///
/// Owned by the dispatcher and only touched from its task, so there is no
/// internal locking. Entries are never removed: a bulb that disappears from
/// the network keeps its device until the driver is dropped.
#[derive(Debug)]
pub struct BulbRegistry<D> {
    entries: HashMap<BulbAddress, RegistryEntry<D>>,
}

impl<D> Default for BulbRegistry<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> BulbRegistry<D> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn is_known(&self, address: &BulbAddress) -> bool {
        self.entries.contains_key(address)
    }

    /// Record a bulb and its device.
    ///
    /// Returns `false` and leaves the existing entry untouched if the address
    /// was already recorded.
    pub fn record(&mut self, bulb: Bulb, device: D) -> bool {
        if self.is_known(bulb.address()) {
            return false;
        }
        self.entries.insert(
            bulb.address().clone(),
            RegistryEntry { bulb, device },
        );
        true
    }

    pub fn get(&self, address: &BulbAddress) -> Option<&RegistryEntry<D>> {
        self.entries.get(address)
    }

    pub fn get_mut(&mut self, address: &BulbAddress) -> Option<&mut RegistryEntry<D>> {
        self.entries.get_mut(address)
    }

    pub fn addresses(&self) -> impl Iterator<Item = &BulbAddress> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
