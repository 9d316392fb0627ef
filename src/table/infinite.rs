use std::mem;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::event;
use crate::obs::logger::{LoggerAndTracer, NoOpLogger};
use crate::obs::metrics::{Counter, MetricRegistry};

/// Number of slots per table: 26 symbol buckets plus the overflow bucket.
const TABLE_SIZE: usize = 27;

/// Bucket taken by a key already exhausted at the current level.
const OVERFLOW_SLOT: usize = TABLE_SIZE - 1;

/// One addressable position within a table.
///
/// Exactly one of the three states is observable at a time. A leaf stores
/// the full key, not just the suffix below its level, so that lookups can
/// re-validate it and collapses can promote it without reconstruction.
enum Slot<V> {
    Empty,
    Leaf { key: String, value: V },
    Child(Box<Table<V>>),
}

/// A fixed-capacity level of the trie.
///
/// `level` is the number of key bytes consumed by ancestor tables, and
/// `count` the number of leaves transitively reachable beneath this table.
struct Table<V> {
    slots: Box<[Slot<V>; TABLE_SIZE]>,
    level: usize,
    count: usize,
}

impl<V> Table<V> {
    fn new(level: usize) -> Self {
        Table {
            slots: Box::new(std::array::from_fn(|_| Slot::Empty)),
            level,
            count: 0,
        }
    }

    /// Extracts the one remaining leaf of a singleton table.
    ///
    /// Only called with `count == 1`. The survivor is necessarily a direct
    /// leaf: a child slot would itself have to hold at least two leaves.
    fn take_remaining_leaf(&mut self) -> Slot<V> {
        for slot in self.slots.iter_mut() {
            if matches!(slot, Slot::Leaf { .. }) {
                return mem::replace(slot, Slot::Empty);
            }
        }
        unreachable!("singleton table holds its leaf directly")
    }
}

/// Slot index for `key` at the given level.
///
/// Depends only on the key byte at offset `level`; a key shorter than the
/// level maps to the overflow bucket. This makes the location path of a key
/// a pure function of the key itself.
fn slot_index(key: &str, level: usize) -> usize {
    match key.as_bytes().get(level) {
        Some(&byte) => byte as usize % (TABLE_SIZE - 1),
        None => OVERFLOW_SLOT,
    }
}

/// Verifies that two distinct colliding keys diverge at some deeper level.
///
/// Beyond the longer key every level maps both to the overflow bucket, so if
/// no level up to that point separates them, no amount of splitting ever
/// will. Checked before any structural mutation so a failed insert leaves
/// the table exactly as it was.
fn ensure_distinguishable(a: &str, b: &str, level: usize) -> Result<()> {
    let deepest = a.len().max(b.len());
    for l in (level + 1)..=deepest {
        if slot_index(a, l) != slot_index(b, l) {
            return Ok(());
        }
    }
    Err(Error::CapacityExhausted(format!(
        "keys {:?} and {:?} fall into the same bucket at every level",
        a, b
    )))
}

#[derive(Debug, PartialEq)]
enum InsertOutcome {
    Inserted,
    Updated,
}

struct TableObs {
    logger: Arc<dyn LoggerAndTracer>,
    splits: Arc<Counter>,
    collapses: Arc<Counter>,
}

/// An adaptive trie-backed associative table.
///
/// Collisions never force a resize: when two keys land in the same slot the
/// leaf is split into a nested sub-table keyed by the next byte, cascading
/// while the keys keep sharing bytes. Deleting down to a single remaining
/// leaf collapses the sub-table back into its parent slot. Access cost is
/// bounded by the key length, and `len` is O(1).
///
/// Keys are treated as ordered byte sequences. Two distinct keys that agree
/// modulo the bucket count at every level (including the overflow bucket for
/// exhausted keys) cannot be told apart by any split and are rejected with
/// [`Error::CapacityExhausted`].
pub struct InfiniteTable<V> {
    root: Table<V>,
    obs: TableObs,
}

impl<V> InfiniteTable<V> {
    /// Creates an empty table with no logging or metrics attached.
    pub fn new() -> Self {
        InfiniteTable {
            root: Table::new(0),
            obs: TableObs {
                logger: Arc::new(NoOpLogger),
                splits: Counter::new(),
                collapses: Counter::new(),
            },
        }
    }

    /// Creates an empty table that traces structural changes to `logger` and
    /// registers `infinite_table.splits` / `infinite_table.collapses`
    /// counters in `metrics`.
    pub fn with_observability(
        logger: Arc<dyn LoggerAndTracer>,
        metrics: &mut MetricRegistry,
    ) -> Self {
        let splits = Counter::new();
        let collapses = Counter::new();
        metrics.register_counter("infinite_table.splits", splits.clone());
        metrics.register_counter("infinite_table.collapses", collapses.clone());
        InfiniteTable {
            root: Table::new(0),
            obs: TableObs {
                logger,
                splits,
                collapses,
            },
        }
    }

    /// Upserts `value` under `key`.
    ///
    /// Inserting a brand-new key increments the count of every table on the
    /// descent path; overwriting an existing key changes no count and no
    /// topology. Fails only on an unrepresentable collision, in which case
    /// the table is left untouched.
    pub fn insert(&mut self, key: &str, value: V) -> Result<()> {
        Self::insert_into(&mut self.root, key.to_string(), value, &self.obs)?;
        Ok(())
    }

    fn insert_into(
        table: &mut Table<V>,
        key: String,
        value: V,
        obs: &TableObs,
    ) -> Result<InsertOutcome> {
        let idx = slot_index(&key, table.level);
        let outcome = match &mut table.slots[idx] {
            Slot::Empty => {
                table.slots[idx] = Slot::Leaf { key, value };
                InsertOutcome::Inserted
            }
            Slot::Leaf { key: stored, value: stored_value } if *stored == key => {
                *stored_value = value;
                InsertOutcome::Updated
            }
            Slot::Leaf { key: stored, .. } => {
                ensure_distinguishable(&key, stored, table.level)?;
                let Slot::Leaf { key: displaced_key, value: displaced_value } =
                    mem::replace(&mut table.slots[idx], Slot::Empty)
                else {
                    unreachable!("slot was just matched as a leaf")
                };
                let mut child = Table::new(table.level + 1);
                Self::insert_into(&mut child, displaced_key, displaced_value, obs)?;
                Self::insert_into(&mut child, key, value, obs)?;
                event!(obs.logger, "event: split, level={}, slot={}", table.level, idx);
                obs.splits.inc();
                table.slots[idx] = Slot::Child(Box::new(child));
                InsertOutcome::Inserted
            }
            Slot::Child(child) => Self::insert_into(child, key, value, obs)?,
        };
        if outcome == InsertOutcome::Inserted {
            table.count += 1;
        }
        Ok(outcome)
    }

    /// Returns the location path of `key`: the slot indices leading from the
    /// root table down to the leaf holding it.
    ///
    /// Side-effect free and recomputed from scratch on every call; the level
    /// used at each step is the descended table's own, never shared state.
    pub fn locate(&self, key: &str) -> Result<Vec<usize>> {
        let mut path = Vec::new();
        let mut current = &self.root;
        loop {
            let idx = slot_index(key, current.level);
            match &current.slots[idx] {
                Slot::Empty => return Err(Error::KeyNotFound(key.to_string())),
                Slot::Leaf { key: stored, .. } => {
                    return if stored == key {
                        path.push(idx);
                        Ok(path)
                    } else {
                        Err(Error::KeyNotFound(key.to_string()))
                    };
                }
                Slot::Child(child) => {
                    path.push(idx);
                    current = child;
                }
            }
        }
    }

    /// Returns a reference to the value stored under `key`.
    pub fn get(&self, key: &str) -> Result<&V> {
        let path = self.locate(key)?;
        match self.slot_at(&path) {
            Slot::Leaf { value, .. } => Ok(value),
            _ => unreachable!("location path ends at a leaf"),
        }
    }

    /// Returns a mutable reference to the value stored under `key`.
    pub fn get_mut(&mut self, key: &str) -> Result<&mut V> {
        let path = self.locate(key)?;
        let Some((&leaf_idx, descent)) = path.split_last() else {
            unreachable!("location path is never empty")
        };
        let mut current = &mut self.root;
        for &idx in descent {
            match &mut current.slots[idx] {
                Slot::Child(child) => current = child,
                _ => unreachable!("location path steps through child tables"),
            }
        }
        match &mut current.slots[leaf_idx] {
            Slot::Leaf { value, .. } => Ok(value),
            _ => unreachable!("location path ends at a leaf"),
        }
    }

    /// Walks a location path down to its final slot.
    fn slot_at(&self, path: &[usize]) -> &Slot<V> {
        let Some((&leaf_idx, descent)) = path.split_last() else {
            unreachable!("location path is never empty")
        };
        let mut current = &self.root;
        for &idx in descent {
            match &current.slots[idx] {
                Slot::Child(child) => current = child,
                _ => unreachable!("location path steps through child tables"),
            }
        }
        &current.slots[leaf_idx]
    }

    /// Returns `true` if `key` is present. Never fails.
    pub fn contains(&self, key: &str) -> bool {
        self.locate(key).is_ok()
    }

    /// Removes `key` and returns its value.
    ///
    /// Decrements the count of every table on the path, then collapses
    /// upward: a sub-table left with exactly one leaf is replaced by that
    /// leaf in its parent slot, and one left with none is emptied. The root
    /// is never collapsed.
    pub fn delete(&mut self, key: &str) -> Result<V> {
        Self::remove_from(&mut self.root, key, &self.obs)
    }

    fn remove_from(table: &mut Table<V>, key: &str, obs: &TableObs) -> Result<V> {
        let idx = slot_index(key, table.level);
        match &mut table.slots[idx] {
            Slot::Empty => Err(Error::KeyNotFound(key.to_string())),
            Slot::Leaf { key: stored, .. } if stored.as_str() != key => {
                Err(Error::KeyNotFound(key.to_string()))
            }
            Slot::Leaf { .. } => {
                let Slot::Leaf { value, .. } = mem::replace(&mut table.slots[idx], Slot::Empty)
                else {
                    unreachable!("slot was just matched as a leaf")
                };
                table.count -= 1;
                Ok(value)
            }
            Slot::Child(child) => {
                let value = Self::remove_from(child, key, obs)?;
                table.count -= 1;
                if child.count == 1 {
                    let leaf = child.take_remaining_leaf();
                    event!(obs.logger, "event: collapse, level={}, slot={}", table.level, idx);
                    obs.collapses.inc();
                    table.slots[idx] = leaf;
                } else if child.count == 0 {
                    table.slots[idx] = Slot::Empty;
                }
                Ok(value)
            }
        }
    }

    /// Number of entries. O(1).
    pub fn len(&self) -> usize {
        self.root.count
    }

    pub fn is_empty(&self) -> bool {
        self.root.count == 0
    }

    /// Iterates over all `(key, value)` pairs in depth-first slot order:
    /// ascending slot index at each table, descending into sub-tables as
    /// they are encountered.
    ///
    /// The iterator is lazy and restartable: every call to `iter` walks the
    /// structure from scratch and holds no state shared with other
    /// traversals.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            stack: vec![self.root.slots.iter()],
        }
    }
}

impl<V> Default for InfiniteTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Depth-first iterator over the leaves of an [`InfiniteTable`].
pub struct Iter<'a, V> {
    stack: Vec<std::slice::Iter<'a, Slot<V>>>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(top) = self.stack.last_mut() {
            match top.next() {
                Some(Slot::Empty) => continue,
                Some(Slot::Leaf { key, value }) => return Some((key.as_str(), value)),
                Some(Slot::Child(child)) => self.stack.push(child.slots.iter()),
                None => {
                    self.stack.pop();
                }
            }
        }
        None
    }
}

impl<'a, V> IntoIterator for &'a InfiniteTable<V> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::obs::logger;

    fn bucket(byte: u8) -> usize {
        byte as usize % (TABLE_SIZE - 1)
    }

    #[test]
    fn test_insert_and_get_round_trip() {
        let mut table = InfiniteTable::new();
        table.insert("lin", 1).unwrap();
        table.insert("leg", 2).unwrap();
        table.insert("mine", 3).unwrap();

        assert_eq!(table.get("lin"), Ok(&1));
        assert_eq!(table.get("leg"), Ok(&2));
        assert_eq!(table.get("mine"), Ok(&3));
        assert_eq!(table.len(), 3);
        assert!(matches!(table.get("linen"), Err(Error::KeyNotFound(_))));
    }

    #[test]
    fn test_overwrite_keeps_len_and_returns_latest() {
        let mut table = InfiniteTable::new();
        table.insert("summit", 1).unwrap();
        table.insert("summit", 2).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.get("summit"), Ok(&2));
    }

    #[test]
    fn test_collision_splits_along_shared_prefix() {
        let mut table = InfiniteTable::new();
        table.insert("dog", 1).unwrap();
        table.insert("dot", 2).unwrap();
        table.insert("cat", 3).unwrap();

        // "dog" and "dot" share two leading bytes, so the split cascades to
        // the level of their first differing byte.
        assert_eq!(
            table.locate("dog"),
            Ok(vec![bucket(b'd'), bucket(b'o'), bucket(b'g')])
        );
        assert_eq!(
            table.locate("dot"),
            Ok(vec![bucket(b'd'), bucket(b'o'), bucket(b't')])
        );
        assert_eq!(table.locate("cat"), Ok(vec![bucket(b'c')]));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_prefix_key_routes_to_overflow_bucket() {
        let mut table = InfiniteTable::new();
        table.insert("ab", 1).unwrap();
        table.insert("abc", 2).unwrap();

        // "ab" is exhausted at level 2 and lands in the overflow bucket.
        assert_eq!(
            table.locate("ab"),
            Ok(vec![bucket(b'a'), bucket(b'b'), OVERFLOW_SLOT])
        );
        assert_eq!(
            table.locate("abc"),
            Ok(vec![bucket(b'a'), bucket(b'b'), bucket(b'c')])
        );
        assert_eq!(table.get("ab"), Ok(&1));
        assert_eq!(table.get("abc"), Ok(&2));
    }

    #[test]
    fn test_delete_collapses_singleton_chain() {
        let mut table = InfiniteTable::new();
        table.insert("cat", 1).unwrap();
        table.insert("car", 2).unwrap();
        assert_eq!(table.locate("cat"), Ok(vec![bucket(b'c'), bucket(b'a'), bucket(b't')]));

        assert_eq!(table.delete("cat"), Ok(1));

        // The split chain collapses all the way back: "car" sits directly in
        // the root again, as if "cat" had never been inserted.
        assert_eq!(table.locate("car"), Ok(vec![bucket(b'c')]));
        assert_eq!(table.get("car"), Ok(&2));
        assert!(!table.contains("cat"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_collapse_stops_at_table_with_two_leaves() {
        let mut table = InfiniteTable::new();
        table.insert("dog", 1).unwrap();
        table.insert("dot", 2).unwrap();
        table.insert("dare", 3).unwrap();

        // Level-1 table under 'd' holds "dare" and the level-2 table with
        // "dog"/"dot". Deleting "dot" collapses level 2 only.
        assert_eq!(table.delete("dot"), Ok(2));
        assert_eq!(table.locate("dog"), Ok(vec![bucket(b'd'), bucket(b'o')]));
        assert_eq!(table.locate("dare"), Ok(vec![bucket(b'd'), bucket(b'a')]));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_delete_last_leaf_in_root() {
        let mut table = InfiniteTable::new();
        table.insert("peak", 7).unwrap();
        assert_eq!(table.delete("peak"), Ok(7));
        assert!(table.is_empty());
        assert_eq!(table.iter().count(), 0);
    }

    #[test]
    fn test_delete_missing_key_leaves_len_unchanged() {
        let mut table = InfiniteTable::new();
        table.insert("ridge", 1).unwrap();

        assert!(matches!(table.delete("ravine"), Err(Error::KeyNotFound(_))));
        assert!(matches!(table.delete("ridges"), Err(Error::KeyNotFound(_))));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("ridge"), Ok(&1));
    }

    #[test]
    fn test_capacity_exhausted_leaves_table_untouched() {
        let mut table = InfiniteTable::new();
        // b'a' == 97 and b'{' == 123 agree modulo 26 and both exhaust at
        // level 1, so no split can ever separate them.
        table.insert("a", 1).unwrap();
        assert!(matches!(
            table.insert("{", 2),
            Err(Error::CapacityExhausted(_))
        ));

        assert_eq!(table.len(), 1);
        assert_eq!(table.get("a"), Ok(&1));
        assert!(!table.contains("{"));
        assert_eq!(table.locate("a"), Ok(vec![bucket(b'a')]));
    }

    #[test]
    fn test_iteration_yields_exactly_live_entries() {
        let mut table = InfiniteTable::new();
        for (key, value) in [("dog", 1), ("dot", 2), ("cat", 3), ("catch", 4), ("do", 5)] {
            table.insert(key, value).unwrap();
        }
        table.delete("dot").unwrap();
        table.delete("catch").unwrap();

        let mut seen: Vec<(String, i32)> = table
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect();
        seen.sort();
        assert_eq!(
            seen,
            vec![
                ("cat".to_string(), 3),
                ("do".to_string(), 5),
                ("dog".to_string(), 1),
            ]
        );
        assert_eq!(table.len(), seen.len());

        // Restartable: a second traversal sees the same entries.
        assert_eq!(table.iter().count(), 3);
    }

    #[test]
    fn test_get_mut_updates_in_place() {
        let mut table = InfiniteTable::new();
        table.insert("dog", 1).unwrap();
        table.insert("dot", 2).unwrap();

        *table.get_mut("dog").unwrap() += 10;
        assert_eq!(table.get("dog"), Ok(&11));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_split_and_collapse_counters() {
        let mut registry = MetricRegistry::new();
        let mut table = InfiniteTable::with_observability(logger::test_instance(), &mut registry);

        table.insert("dog", 1).unwrap();
        table.insert("dot", 2).unwrap();
        let splits = registry.get_counter("infinite_table.splits").unwrap();
        // Shared 'd' and 'o' levels: two cascaded splits.
        assert_eq!(splits.get(), 2);

        table.delete("dot").unwrap();
        let collapses = registry.get_counter("infinite_table.collapses").unwrap();
        assert_eq!(collapses.get(), 2);
    }
}
