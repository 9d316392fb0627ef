use crate::error::Result;
use crate::table::{probe_slots, PROBE_TABLE_SIZES};

/// An open-addressing hash table with linear probing over string keys.
///
/// Capacity follows the shared prime schedule; a rehash to the next prime
/// runs whenever the load factor would exceed one half, so probes stay
/// short. Deletion reinserts the probe cluster following the removed entry
/// instead of leaving tombstones.
pub struct LinearProbeTable<V> {
    slots: Vec<Option<(String, V)>>,
    size_index: usize,
    count: usize,
}

impl<V> LinearProbeTable<V> {
    pub fn new() -> Self {
        LinearProbeTable {
            slots: (0..PROBE_TABLE_SIZES[0]).map(|_| None).collect(),
            size_index: 0,
            count: 0,
        }
    }

    /// Current slot capacity, as opposed to the number of entries.
    pub fn table_size(&self) -> usize {
        self.slots.len()
    }

    /// Number of entries. O(1).
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Upserts `value` under `key`, returning the previous value if the key
    /// was already present.
    pub fn insert(&mut self, key: &str, value: V) -> Result<Option<V>> {
        let pos = probe_slots(&self.slots, key, true)?;
        let previous = match self.slots[pos].take() {
            Some((_, old)) => Some(old),
            None => {
                self.count += 1;
                None
            }
        };
        self.slots[pos] = Some((key.to_string(), value));
        if self.count * 2 > self.table_size() {
            self.rehash()?;
        }
        Ok(previous)
    }

    pub fn get(&self, key: &str) -> Result<&V> {
        let pos = probe_slots(&self.slots, key, false)?;
        match &self.slots[pos] {
            Some((_, value)) => Ok(value),
            None => unreachable!("lookup probe resolves to an occupied slot"),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        probe_slots(&self.slots, key, false).is_ok()
    }

    /// Removes `key` and returns its value.
    ///
    /// The entries probing past the removed slot are taken out and
    /// reinserted so that no lookup ever stops early at the hole.
    pub fn delete(&mut self, key: &str) -> Result<V> {
        let pos = probe_slots(&self.slots, key, false)?;
        let Some((_, value)) = self.slots[pos].take() else {
            unreachable!("lookup probe resolves to an occupied slot")
        };
        self.count -= 1;

        let mut cursor = (pos + 1) % self.table_size();
        while let Some((cluster_key, cluster_value)) = self.slots[cursor].take() {
            let new_pos = probe_slots(&self.slots, &cluster_key, true)?;
            self.slots[new_pos] = Some((cluster_key, cluster_value));
            cursor = (cursor + 1) % self.table_size();
        }
        Ok(value)
    }

    /// Keys in slot order.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.slots.iter().filter_map(|slot| slot.as_ref().map(|(k, _)| k))
    }

    /// Values in slot order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.slots.iter().filter_map(|slot| slot.as_ref().map(|(_, v)| v))
    }

    /// `(key, value)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &V)> {
        self.slots
            .iter()
            .filter_map(|slot| slot.as_ref().map(|(k, v)| (k, v)))
    }

    /// Grows to the next prime capacity and reinserts every entry.
    ///
    /// Once the schedule is exhausted the table keeps its capacity; inserts
    /// then fail with `CapacityExhausted` only when genuinely full.
    fn rehash(&mut self) -> Result<()> {
        if self.size_index + 1 >= PROBE_TABLE_SIZES.len() {
            return Ok(());
        }
        self.size_index += 1;
        let old_slots = std::mem::replace(
            &mut self.slots,
            (0..PROBE_TABLE_SIZES[self.size_index]).map(|_| None).collect(),
        );
        for (key, value) in old_slots.into_iter().flatten() {
            let pos = probe_slots(&self.slots, &key, true)?;
            self.slots[pos] = Some((key, value));
        }
        Ok(())
    }
}

impl<V> Default for LinearProbeTable<V> {
    fn default() -> Self {
        Self::new()
    }
}
