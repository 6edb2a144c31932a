//! Entry API for `ProbingTable`

use crate::table::ProbingTable;

/// A view into a single entry in a `ProbingTable`, which may either be vacant or occupied
pub enum Entry<'a, K, V, P> {
    Occupied(OccupiedEntry<'a, K, V, P>),
    Vacant(VacantEntry<'a, K, V, P>),
}

/// A view into an occupied entry in a `ProbingTable`
pub struct OccupiedEntry<'a, K, V, P> {
    table: &'a mut ProbingTable<K, V, P>,
    index: usize,
}

/// A view into a vacant entry in a `ProbingTable`
///
/// The insertion slot is already resolved, so inserting cannot fail.
pub struct VacantEntry<'a, K, V, P> {
    table: &'a mut ProbingTable<K, V, P>,
    key: K,
    index: usize,
}

impl<'a, K, V, P> Entry<'a, K, V, P> {
    /// Returns a reference to this entry's key
    pub fn key(&self) -> &K {
        match self {
            Entry::Occupied(entry) => entry.key(),
            Entry::Vacant(entry) => entry.key(),
        }
    }

    /// Ensures a value is in the entry by inserting the default if empty,
    /// and returns a mutable reference to the value in the entry.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Ensures a value is in the entry by inserting the result of the
    /// default function if empty, and returns a mutable reference to
    /// the value in the entry
    pub fn or_insert_with<F: FnOnce() -> V>(self, default: F) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Like `or_insert_with`, but the function receives the key
    pub fn or_insert_with_key<F: FnOnce(&K) -> V>(self, default: F) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let value = default(entry.key());
                entry.insert(value)
            }
        }
    }

    /// Provides in-place mutable access to an occupied entry before any
    /// potential inserts into the table
    pub fn and_modify<F: FnOnce(&mut V)>(mut self, f: F) -> Self {
        if let Entry::Occupied(entry) = &mut self {
            f(entry.get_mut());
        }
        self
    }
}

impl<'a, K, V, P> Entry<'a, K, V, P>
where
    V: Default,
{
    pub fn or_default(self) -> &'a mut V {
        self.or_insert_with(V::default)
    }
}

impl<'a, K, V, P> OccupiedEntry<'a, K, V, P> {
    pub(crate) fn new(table: &'a mut ProbingTable<K, V, P>, index: usize) -> Self {
        debug_assert!(table.key_at(index).is_some(), "occupied entry over a dead slot");
        Self { table, index }
    }

    /// Slot index holding this entry
    pub fn index(&self) -> usize {
        self.index
    }

    /// Gets a reference to the key in the entry
    pub fn key(&self) -> &K {
        match self.table.key_at(self.index) {
            Some(key) => key,
            None => unreachable!("occupied entry over a dead slot"),
        }
    }

    /// Gets a reference to the value in the entry
    pub fn get(&self) -> &V {
        match self.table.value_at(self.index) {
            Some(value) => value,
            None => unreachable!("occupied entry over a dead slot"),
        }
    }

    /// Gets a mutable reference to the value in the entry
    pub fn get_mut(&mut self) -> &mut V {
        match self.table.value_at_mut(self.index) {
            Some(value) => value,
            None => unreachable!("occupied entry over a dead slot"),
        }
    }

    /// Converts the entry into a mutable reference to its value
    pub fn into_mut(self) -> &'a mut V {
        let Self { table, index } = self;
        match table.value_at_mut(index) {
            Some(value) => value,
            None => unreachable!("occupied entry over a dead slot"),
        }
    }

    /// Sets the value of the entry, and returns the entry's old value
    pub fn insert(&mut self, value: V) -> V {
        std::mem::replace(self.get_mut(), value)
    }

    /// Takes the value out of the entry, leaving a tombstone
    pub fn remove(self) -> V {
        self.remove_entry().1
    }

    /// Takes the key and value out of the entry, leaving a tombstone
    pub fn remove_entry(self) -> (K, V) {
        match self.table.vacate(self.index) {
            Some(kv) => kv,
            None => unreachable!("occupied entry over a dead slot"),
        }
    }
}

impl<'a, K, V, P> VacantEntry<'a, K, V, P> {
    pub(crate) fn new(table: &'a mut ProbingTable<K, V, P>, key: K, index: usize) -> Self {
        Self { table, key, index }
    }

    /// Gets a reference to the key that would be used when inserting
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Takes ownership of the key
    pub fn into_key(self) -> K {
        self.key
    }

    /// Slot index the entry will be written to
    pub fn index(&self) -> usize {
        self.index
    }

    /// Sets the value of the entry, and returns a mutable reference to it
    pub fn insert(self, value: V) -> &'a mut V {
        let Self { table, key, index } = self;
        log::trace!("inserting into slot {index} via entry");
        match table.occupy(index, key, value) {
            Some(value) => value,
            None => unreachable!("slot not live after insert"),
        }
    }
}
