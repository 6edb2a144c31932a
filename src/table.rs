use std::{fmt, mem};

use crate::{
    entry::{Entry, OccupiedEntry, VacantEntry},
    error::{Result, TableError},
    iter::{Iter, IterMut, Keys, Values, ValuesMut},
    probe::Probe,
    slot::{Slot, SlotKind},
};

/// A fixed-capacity hash table using open addressing with a pluggable
/// probe sequence and tombstone deletion
///
/// The capacity is chosen at construction and never changes. Inserts are
/// refused once every slot holds a live binding, regardless of how many
/// tombstones exist.
#[derive(Clone)]
pub struct ProbingTable<K, V, P> {
    slots: Box<[Slot<K, V>]>,
    probe: P,
    len: usize,
}

/// Outcome of walking a key's probe sequence
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Probed {
    /// Key lives at this index
    Found(usize),
    /// Hit an empty slot: the key cannot be further along
    Absent,
    /// Ran out of attempts without a terminating slot
    Exhausted,
}

/// Where an insert of a given key should write
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum InsertSlot {
    /// Overwrite the live binding at this index
    Existing(usize),
    /// Write a new binding at this empty or tombstone index
    Vacant(usize),
}

impl<K, V, P> ProbingTable<K, V, P> {
    /// Returns the number of live bindings
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the table holds no live bindings
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the fixed number of slots
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if further inserts will be refused
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Fraction of slots holding live bindings
    #[inline]
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.capacity() as f64
    }

    /// Number of tombstone slots (O(capacity) scan)
    pub fn tombstones(&self) -> usize {
        self.slots.iter().filter(|s| s.is_tombstone()).count()
    }

    /// Returns a reference to the probe function
    #[inline]
    pub fn probe(&self) -> &P {
        &self.probe
    }

    /// Returns the slot at `index`, or `None` if out of range
    #[inline]
    pub fn slot(&self, index: usize) -> Option<&Slot<K, V>> {
        self.slots.get(index)
    }

    /// Returns the state of the slot at `index`
    #[inline]
    pub fn slot_kind(&self, index: usize) -> Option<SlotKind> {
        self.slots.get(index).map(Slot::kind)
    }

    /// Removes every binding and tombstone, resetting all slots to empty
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = Slot::Empty;
        }
        self.len = 0;
        log::debug!("cleared probing table of capacity {}", self.capacity());
    }

    /// Iterate over live bindings in slot order
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self.slots.iter(), self.len)
    }

    /// Iterate over live bindings with mutable values
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut::new(self.slots.iter_mut(), self.len)
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.iter())
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self.iter())
    }

    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut::new(self.iter_mut())
    }

    pub(crate) fn into_slots(self) -> (Box<[Slot<K, V>]>, usize) {
        (self.slots, self.len)
    }

    /// Value at an index known to be occupied
    pub(crate) fn value_at(&self, index: usize) -> Option<&V> {
        self.slots[index].value()
    }

    pub(crate) fn value_at_mut(&mut self, index: usize) -> Option<&mut V> {
        self.slots[index].value_mut()
    }

    pub(crate) fn key_at(&self, index: usize) -> Option<&K> {
        self.slots[index].key()
    }

    /// Write a binding at `index`, growing the live count if the slot was
    /// not already live
    pub(crate) fn occupy(&mut self, index: usize, key: K, value: V) -> Option<&mut V> {
        if self.slots[index].fill(key, value) {
            self.len += 1;
        }
        self.slots[index].value_mut()
    }

    /// Tombstone the binding at `index`
    pub(crate) fn vacate(&mut self, index: usize) -> Option<(K, V)> {
        let removed = self.slots[index].bury();
        if removed.is_some() {
            self.len -= 1;
            log::trace!("tombstoned slot {index}");
        }
        removed
    }
}

impl<K, V, P> ProbingTable<K, V, P>
where
    K: Eq,
    P: Probe<K>,
{
    /// Create an empty table with `capacity` slots
    ///
    /// # Panics
    /// Panics if `capacity` is zero
    pub fn new(capacity: usize, probe: P) -> Self {
        assert!(capacity > 0, "capacity must be positive");
        let slots = std::iter::repeat_with(|| Slot::Empty)
            .take(capacity)
            .collect::<Vec<_>>()
            .into_boxed_slice();

        log::debug!("created probing table with capacity {capacity}");

        Self {
            slots,
            probe,
            len: 0,
        }
    }

    /// Create an empty table, rejecting a zero capacity
    pub fn try_new(capacity: usize, probe: P) -> Result<Self> {
        if capacity == 0 {
            return Err(TableError::ZeroCapacity);
        }
        Ok(Self::new(capacity, probe))
    }

    /// Slot index for a probe attempt, always within bounds
    #[inline]
    fn slot_index(&self, key: &K, attempt: usize) -> usize {
        let capacity = self.capacity();
        self.probe.index(capacity, key, attempt) % capacity
    }

    /// Walk the probe sequence for `key` from attempt `start` up to
    /// `capacity` attempts. Occupied slots with other keys and tombstones
    /// are stepped over; an empty slot ends the walk.
    fn probe_from(&self, key: &K, start: usize) -> Probed {
        for attempt in start..self.capacity() {
            let index = self.slot_index(key, attempt);
            match &self.slots[index] {
                Slot::Empty => return Probed::Absent,
                Slot::Occupied(k, _) if k == key => return Probed::Found(index),
                Slot::Occupied(..) | Slot::Tombstone => {}
            }
        }
        Probed::Exhausted
    }

    /// Index of the live binding for `key`
    pub(crate) fn find(&self, key: &K) -> Option<usize> {
        match self.probe_from(key, 0) {
            Probed::Found(index) => Some(index),
            Probed::Absent => None,
            Probed::Exhausted => {
                log::trace!("probe sequence exhausted during lookup");
                None
            }
        }
    }

    /// Resolve where an insert of `key` must write.
    ///
    /// An empty slot or a slot already holding `key` is taken directly. On a
    /// tombstone the rest of the sequence is searched, starting at the same
    /// attempt, for a live binding of `key`; the tombstone is reused only if
    /// none exists.
    pub(crate) fn find_insert_slot(&self, key: &K) -> Result<InsertSlot> {
        let capacity = self.capacity();
        if self.len == capacity {
            log::warn!("insert refused: table full ({capacity} slots)");
            return Err(TableError::TableFull { capacity });
        }

        for attempt in 0..capacity {
            let index = self.slot_index(key, attempt);
            match &self.slots[index] {
                Slot::Empty => return Ok(InsertSlot::Vacant(index)),
                Slot::Occupied(k, _) if k == key => return Ok(InsertSlot::Existing(index)),
                Slot::Tombstone => {
                    return Ok(match self.probe_from(key, attempt) {
                        Probed::Found(live) => InsertSlot::Existing(live),
                        Probed::Absent | Probed::Exhausted => InsertSlot::Vacant(index),
                    });
                }
                Slot::Occupied(..) => {}
            }
        }

        log::error!(
            "probe sequence exhausted after {capacity} attempts with {} of {capacity} slots live",
            self.len
        );
        Err(TableError::ProbeExhausted { capacity })
    }

    /// Returns a reference to the value bound to `key`
    #[inline]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.find(key).and_then(|index| self.slots[index].value())
    }

    /// Returns a mutable reference to the value bound to `key`
    #[inline]
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let index = self.find(key)?;
        self.slots[index].value_mut()
    }

    /// Returns the stored key and value for `key`
    #[inline]
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.find(key).and_then(|index| self.slots[index].key_value())
    }

    /// Returns `true` if the table holds a binding for `key`
    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Inserts a key-value pair into the table
    ///
    /// If the table did not have this key present, `Ok(None)` is returned.
    /// If the table did have this key present, the value is updated, and the
    /// old value is returned. The stored key is not replaced.
    ///
    /// Fails with `TableFull` when every slot is live, even if `key` is
    /// already present, and with `ProbeExhausted` when the probe function
    /// never reaches a usable slot. The table is unchanged on failure.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<Option<V>> {
        match self.find_insert_slot(&key)? {
            InsertSlot::Existing(index) => {
                log::trace!("overwriting slot {index}");
                Ok(self.slots[index]
                    .value_mut()
                    .map(|old| mem::replace(old, value)))
            }
            InsertSlot::Vacant(index) => {
                log::trace!("inserting into slot {index}");
                self.occupy(index, key, value);
                Ok(None)
            }
        }
    }

    /// Inserts a key-value pair, overwriting any existing binding for `key`
    ///
    /// Returns `false` if the table refused the insert.
    #[inline]
    pub fn insert(&mut self, key: K, value: V) -> bool {
        self.try_insert(key, value).is_ok()
    }

    /// Removes a key from the table, returning the value if the key was
    /// present. The slot becomes a tombstone.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes a key from the table, returning the stored key and value
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let index = self.find(key)?;
        self.vacate(index)
    }

    /// Removes a key from the table, returning `true` if it existed
    #[inline]
    pub fn delete(&mut self, key: &K) -> bool {
        self.remove_entry(key).is_some()
    }

    /// Keeps only the bindings for which `f` returns `true`; the rest are
    /// tombstoned
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        for index in 0..self.capacity() {
            let keep = match self.slots[index].key_value_mut() {
                Some((k, v)) => f(k, v),
                None => true,
            };
            if !keep {
                self.vacate(index);
            }
        }
    }

    /// Gets the entry for `key` for in-place manipulation
    ///
    /// A present key always yields `Entry::Occupied`, even in a full table.
    /// An absent key yields `Entry::Vacant` holding the slot an insert would
    /// use, or the error an insert would fail with.
    pub fn entry(&mut self, key: K) -> Result<Entry<'_, K, V, P>> {
        if let Some(index) = self.find(&key) {
            return Ok(Entry::Occupied(OccupiedEntry::new(self, index)));
        }
        match self.find_insert_slot(&key)? {
            InsertSlot::Existing(index) => Ok(Entry::Occupied(OccupiedEntry::new(self, index))),
            InsertSlot::Vacant(index) => Ok(Entry::Vacant(VacantEntry::new(self, key, index))),
        }
    }
}

impl<K, V, P> fmt::Debug for ProbingTable<K, V, P>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        hash::{Identity, Modulo},
        probe::{linear_probe, quadratic_probe, Linear, Quadratic},
    };

    fn mod5_table() -> ProbingTable<u64, &'static str, Quadratic<Modulo>> {
        ProbingTable::new(5, quadratic_probe(Modulo::new(5)))
    }

    fn live_slots<K, V, P>(table: &ProbingTable<K, V, P>) -> usize {
        (0..table.capacity())
            .filter(|&i| table.slot_kind(i) == Some(SlotKind::Occupied))
            .count()
    }

    #[test]
    fn test_new() {
        let table: ProbingTable<u64, u64, _> = ProbingTable::new(8, linear_probe(Identity));
        assert!(table.is_empty());
        assert_eq!(table.len(), 0);
        assert_eq!(table.capacity(), 8);
        assert_eq!(table.tombstones(), 0);
        assert!((0..8).all(|i| table.slot_kind(i) == Some(SlotKind::Empty)));
    }

    #[test]
    #[should_panic(expected = "capacity must be positive")]
    fn test_new_zero_capacity() {
        let _: ProbingTable<u64, u64, _> = ProbingTable::new(0, linear_probe(Identity));
    }

    #[test]
    fn test_try_new_zero_capacity() {
        let result: Result<ProbingTable<u64, u64, _>> =
            ProbingTable::try_new(0, linear_probe(Identity));
        assert!(matches!(result, Err(TableError::ZeroCapacity)));
    }

    #[test]
    fn test_insert_and_get() {
        let mut table = ProbingTable::new(16, quadratic_probe(Identity));

        assert!(table.insert(1u64, 100u64));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(&1), Some(&100));
        assert_eq!(table.get(&2), None);
        assert!(table.contains_key(&1));
    }

    #[test]
    fn test_insert_update() {
        let mut table = ProbingTable::new(16, quadratic_probe(Identity));

        assert_eq!(table.try_insert(1u64, 100u64).unwrap(), None);
        assert_eq!(table.try_insert(1u64, 200u64).unwrap(), Some(100));

        assert_eq!(table.len(), 1);
        assert_eq!(table.get(&1), Some(&200));
    }

    #[test]
    fn test_remove() {
        let mut table = ProbingTable::new(16, quadratic_probe(Identity));

        table.insert(1u64, 100u64);
        assert_eq!(table.remove(&1), Some(100));

        assert!(table.is_empty());
        assert!(!table.contains_key(&1));
        assert_eq!(table.tombstones(), 1);
        assert_eq!(table.remove(&1), None);
    }

    #[test]
    fn test_delete() {
        let mut table = ProbingTable::new(4, linear_probe(Identity));
        table.insert(3u32, "three");

        assert!(table.delete(&3));
        assert!(!table.delete(&3));
        assert!(!table.delete(&9));
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn test_tombstone_does_not_block_chain() {
        let mut table = mod5_table();

        // 0 and 5 share home slot 0
        table.insert(0, "a");
        table.insert(5, "b");
        assert_eq!(table.slot(1).and_then(Slot::key), Some(&5));

        assert!(table.delete(&0));
        assert_eq!(table.slot_kind(0), Some(SlotKind::Tombstone));
        assert_eq!(table.get(&5), Some(&"b"));
    }

    #[test]
    fn test_collision_scenario() {
        let mut table = mod5_table();

        assert!(table.insert(0, "zero"));
        assert!(table.insert(5, "five"));
        assert!(table.insert(10, "ten"));

        assert_eq!(table.slot(0).and_then(Slot::key), Some(&0));
        assert_eq!(table.slot(1).and_then(Slot::key), Some(&5));
        assert_eq!(table.slot(4).and_then(Slot::key), Some(&10));

        assert_eq!(table.get(&10), Some(&"ten"));
        assert!(table.delete(&5));
        assert_eq!(table.get(&10), Some(&"ten"));

        // 15 reuses the tombstone at slot 1
        assert!(table.insert(15, "fifteen"));
        assert_eq!(table.slot(1).and_then(Slot::key), Some(&15));
        assert_eq!(table.len(), 3);
        assert_eq!(table.tombstones(), 0);
        assert_eq!(live_slots(&table), table.len());
    }

    #[test]
    fn test_tombstone_with_key_ahead_overwrites() {
        let mut table = mod5_table();
        table.insert(0, "zero");
        table.insert(5, "five");
        table.insert(10, "ten");
        table.delete(&5);

        // 10 lives past the tombstone at slot 1; no duplicate is created
        assert_eq!(table.try_insert(10, "TEN").unwrap(), Some("ten"));
        assert_eq!(table.slot_kind(1), Some(SlotKind::Tombstone));
        assert_eq!(table.slot(4).and_then(Slot::value), Some(&"TEN"));
        assert_eq!(table.len(), 2);
        assert_eq!(live_slots(&table), 2);
    }

    #[test]
    fn test_probe_exhausted() {
        let mut table = mod5_table();
        table.insert(0, "zero");
        table.insert(5, "five");
        table.insert(10, "ten");

        // quadratic probing from home 0 only reaches slots 0, 1 and 4
        let err = table.try_insert(15, "fifteen").unwrap_err();
        assert!(matches!(err, TableError::ProbeExhausted { capacity: 5 }));
        assert!(!table.insert(15, "fifteen"));
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(&15), None);
    }

    #[test]
    fn test_malformed_probe() {
        let stuck = |_: usize, _: &u64, _: usize| 0usize;
        let mut table = ProbingTable::new(3, stuck);

        assert!(table.insert(1, ()));
        assert!(matches!(
            table.try_insert(2, ()),
            Err(TableError::ProbeExhausted { capacity: 3 })
        ));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_full() {
        let mut table: ProbingTable<u64, u64, Linear<Identity>> =
            ProbingTable::new(4, linear_probe(Identity));

        for i in 0..4 {
            assert!(table.insert(i * 7, i));
        }
        assert!(table.is_full());

        let err = table.try_insert(100, 100).unwrap_err();
        assert!(matches!(err, TableError::TableFull { capacity: 4 }));
        assert_eq!(table.len(), 4);
        assert_eq!(table.get(&100), None);

        // a full table refuses overwrites too
        assert!(!table.insert(0, 42));
        assert_eq!(table.get(&0), Some(&0));
    }

    #[test]
    fn test_full_ignores_tombstones() {
        let mut table = ProbingTable::new(3, linear_probe(Identity));
        for i in 0..3u64 {
            table.insert(i, i);
        }
        table.delete(&1);
        assert!(!table.is_full());
        assert!(table.insert(9, 9));
        assert!(table.is_full());
        assert!(!table.insert(10, 10));
    }

    #[test]
    fn test_all_tombstones() {
        let mut table = ProbingTable::new(3, linear_probe(Identity));
        for i in 0..3u64 {
            table.insert(i, i);
        }
        for i in 0..3u64 {
            assert!(table.delete(&i));
        }
        assert_eq!(table.tombstones(), 3);

        // every attempt lands on a tombstone and the walk still ends
        assert_eq!(table.get(&9), None);
        assert!(!table.contains_key(&9));
        assert!(!table.delete(&9));

        assert!(table.insert(9, 9));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(&9), Some(&9));
        assert_eq!(table.slot_kind(0), Some(SlotKind::Occupied));
        assert_eq!(table.tombstones(), 2);
    }

    #[test]
    fn test_clear() {
        let mut table = ProbingTable::new(32, quadratic_probe(Identity));

        for i in 0u64..20 {
            table.insert(i, i * 10);
        }
        table.delete(&3);

        assert_eq!(table.len(), 19);
        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.tombstones(), 0);
        assert_eq!(table.get(&4), None);
    }

    #[test]
    fn test_retain() {
        let mut table = ProbingTable::new(32, linear_probe(Identity));
        for i in 0u64..10 {
            table.insert(i, i);
        }

        table.retain(|k, v| {
            *v *= 2;
            k % 2 == 0
        });

        assert_eq!(table.len(), 5);
        assert_eq!(table.get(&4), Some(&8));
        assert_eq!(table.get(&5), None);
        assert_eq!(table.tombstones(), 5);
        assert_eq!(live_slots(&table), 5);
    }

    #[test]
    fn test_get_mut() {
        let mut table = ProbingTable::new(8, linear_probe(Identity));
        table.insert(2u64, String::from("draft"));

        if let Some(title) = table.get_mut(&2) {
            title.push_str(" v2");
        }
        assert_eq!(table.get(&2).map(String::as_str), Some("draft v2"));
        assert_eq!(table.get_key_value(&2).map(|(k, _)| *k), Some(2));
    }

    #[test]
    fn test_closure_hash() {
        let mut table = ProbingTable::new(43, quadratic_probe(|k: &u64| k % 100));

        for id in [100_001u64, 100_101, 100_201] {
            assert!(table.insert(id, id));
        }
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(&100_101), Some(&100_101));
    }

    #[test]
    fn test_string_keys() {
        use crate::hash::Hashed;

        let mut table = ProbingTable::new(16, linear_probe(Hashed::new()));

        table.insert("hello".to_string(), 1);
        table.insert("world".to_string(), 2);

        assert!(table.contains_key(&"hello".to_string()));
        assert!(table.contains_key(&"world".to_string()));
        assert!(!table.contains_key(&"foo".to_string()));
    }

    #[test]
    fn test_debug() {
        let mut table = ProbingTable::new(4, linear_probe(Identity));
        table.insert(1u8, 'a');
        assert_eq!(format!("{table:?}"), "{1: 'a'}");
    }
}
