use crate::error::Result;
use crate::table::linear_probe::LinearProbeTable;
use crate::table::{probe_slots, PROBE_TABLE_SIZES};

/// A composite table indexing values by a pair of string keys.
///
/// The outer level is a linear-probing table keyed by the first key; each
/// occupied entry owns an inner [`LinearProbeTable`] keyed by the second
/// key. Both levels share the probing and hashing primitives, so beyond the
/// two-level bookkeeping every operation is pure delegation.
pub struct DoubleKeyTable<V> {
    slots: Vec<Option<(String, LinearProbeTable<V>)>>,
    size_index: usize,
    /// Total number of `(key1, key2)` pairs across all inner tables.
    count: usize,
}

impl<V> DoubleKeyTable<V> {
    pub fn new() -> Self {
        DoubleKeyTable {
            slots: (0..PROBE_TABLE_SIZES[0]).map(|_| None).collect(),
            size_index: 0,
            count: 0,
        }
    }

    /// Current outer slot capacity.
    pub fn table_size(&self) -> usize {
        self.slots.len()
    }

    /// Number of `(key1, key2)` pairs. O(1).
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Upserts `value` under `(key1, key2)`, returning the previous value
    /// if that pair was already present.
    pub fn insert(&mut self, key1: &str, key2: &str, value: V) -> Result<Option<V>> {
        let pos = probe_slots(&self.slots, key1, true)?;
        let previous = match &mut self.slots[pos] {
            Some((_, inner)) => inner.insert(key2, value)?,
            slot @ None => {
                let mut inner = LinearProbeTable::new();
                inner.insert(key2, value)?;
                *slot = Some((key1.to_string(), inner));
                None
            }
        };
        if previous.is_none() {
            self.count += 1;
        }
        if self.occupied_slots() * 2 > self.table_size() {
            self.rehash()?;
        }
        Ok(previous)
    }

    pub fn get(&self, key1: &str, key2: &str) -> Result<&V> {
        self.inner(key1)?.get(key2)
    }

    pub fn contains(&self, key1: &str, key2: &str) -> bool {
        self.get(key1, key2).is_ok()
    }

    /// Removes `(key1, key2)` and returns its value.
    ///
    /// Deleting the last pair under `key1` removes the outer entry and
    /// reinserts the outer probe cluster following it.
    pub fn delete(&mut self, key1: &str, key2: &str) -> Result<V> {
        let pos = probe_slots(&self.slots, key1, false)?;
        let Some((_, inner)) = &mut self.slots[pos] else {
            unreachable!("lookup probe resolves to an occupied slot")
        };
        let value = inner.delete(key2)?;
        self.count -= 1;

        if inner.is_empty() {
            self.slots[pos] = None;
            let mut cursor = (pos + 1) % self.table_size();
            while let Some((cluster_key, cluster_inner)) = self.slots[cursor].take() {
                let new_pos = probe_slots(&self.slots, &cluster_key, true)?;
                self.slots[new_pos] = Some((cluster_key, cluster_inner));
                cursor = (cursor + 1) % self.table_size();
            }
        }
        Ok(value)
    }

    /// All first-level keys, in outer slot order.
    pub fn first_keys(&self) -> impl Iterator<Item = &String> {
        self.slots.iter().filter_map(|slot| slot.as_ref().map(|(k, _)| k))
    }

    /// All second-level keys stored under `key1`.
    pub fn keys_for(&self, key1: &str) -> Result<impl Iterator<Item = &String>> {
        Ok(self.inner(key1)?.keys())
    }

    /// All values across every inner table, in slot order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.slots
            .iter()
            .filter_map(|slot| slot.as_ref())
            .flat_map(|(_, inner)| inner.values())
    }

    /// All values stored under `key1`.
    pub fn values_for(&self, key1: &str) -> Result<impl Iterator<Item = &V>> {
        Ok(self.inner(key1)?.values())
    }

    fn inner(&self, key1: &str) -> Result<&LinearProbeTable<V>> {
        let pos = probe_slots(&self.slots, key1, false)?;
        match &self.slots[pos] {
            Some((_, inner)) => Ok(inner),
            None => unreachable!("lookup probe resolves to an occupied slot"),
        }
    }

    fn occupied_slots(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Grows the outer table to the next prime capacity.
    fn rehash(&mut self) -> Result<()> {
        if self.size_index + 1 >= PROBE_TABLE_SIZES.len() {
            return Ok(());
        }
        self.size_index += 1;
        let old_slots = std::mem::replace(
            &mut self.slots,
            (0..PROBE_TABLE_SIZES[self.size_index]).map(|_| None).collect(),
        );
        for (key, inner) in old_slots.into_iter().flatten() {
            let pos = probe_slots(&self.slots, &key, true)?;
            self.slots[pos] = Some((key, inner));
        }
        Ok(())
    }
}

impl<V> Default for DoubleKeyTable<V> {
    fn default() -> Self {
        Self::new()
    }
}
