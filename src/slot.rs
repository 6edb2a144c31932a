//! Slot state for the table's backing array.
//!
//! Every position is in exactly one of three states:
//! - `Empty`: never written, terminates a probe walk
//! - `Occupied`: holds a live binding
//! - `Tombstone`: held a binding that was removed; probe walks step over it

use std::mem;

/// A single position in the table
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Slot<K, V> {
    Empty,
    Tombstone,
    Occupied(K, V),
}

/// Payload-free view of a slot's state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SlotKind {
    Empty,
    Tombstone,
    Occupied,
}

impl<K, V> Default for Slot<K, V> {
    fn default() -> Self {
        Slot::Empty
    }
}

impl<K, V> Slot<K, V> {
    #[inline]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }

    #[inline]
    pub const fn is_tombstone(&self) -> bool {
        matches!(self, Slot::Tombstone)
    }

    #[inline]
    pub const fn is_occupied(&self) -> bool {
        matches!(self, Slot::Occupied(..))
    }

    #[inline]
    pub const fn kind(&self) -> SlotKind {
        match self {
            Slot::Empty => SlotKind::Empty,
            Slot::Tombstone => SlotKind::Tombstone,
            Slot::Occupied(..) => SlotKind::Occupied,
        }
    }

    /// Key of an occupied slot
    #[inline]
    pub fn key(&self) -> Option<&K> {
        match self {
            Slot::Occupied(k, _) => Some(k),
            _ => None,
        }
    }

    /// Value of an occupied slot
    #[inline]
    pub fn value(&self) -> Option<&V> {
        match self {
            Slot::Occupied(_, v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn value_mut(&mut self) -> Option<&mut V> {
        match self {
            Slot::Occupied(_, v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn key_value(&self) -> Option<(&K, &V)> {
        match self {
            Slot::Occupied(k, v) => Some((k, v)),
            _ => None,
        }
    }

    #[inline]
    pub fn key_value_mut(&mut self) -> Option<(&K, &mut V)> {
        match self {
            Slot::Occupied(k, v) => Some((k, v)),
            _ => None,
        }
    }

    /// Write a binding into this slot.
    ///
    /// Returns `true` if the slot did not previously hold a live binding,
    /// i.e. the table's live count must grow.
    #[inline]
    pub(crate) fn fill(&mut self, key: K, value: V) -> bool {
        let was_live = self.is_occupied();
        *self = Slot::Occupied(key, value);
        !was_live
    }

    /// Turn an occupied slot into a tombstone, returning the binding.
    ///
    /// Empty and tombstone slots are left untouched.
    #[inline]
    pub(crate) fn bury(&mut self) -> Option<(K, V)> {
        if !self.is_occupied() {
            return None;
        }
        match mem::replace(self, Slot::Tombstone) {
            Slot::Occupied(k, v) => Some((k, v)),
            _ => None,
        }
    }

    /// Consume the slot, returning its binding if occupied
    #[inline]
    pub(crate) fn into_key_value(self) -> Option<(K, V)> {
        match self {
            Slot::Occupied(k, v) => Some((k, v)),
            _ => None,
        }
    }
}

impl<K: Eq, V> Slot<K, V> {
    /// Returns `true` if this slot is occupied by `key`
    #[inline]
    pub fn matches(&self, key: &K) -> bool {
        matches!(self, Slot::Occupied(k, _) if k == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        let slot: Slot<u64, u64> = Slot::default();
        assert!(slot.is_empty());
        assert_eq!(slot.kind(), SlotKind::Empty);
        assert_eq!(slot.key(), None);
    }

    #[test]
    fn test_fill() {
        let mut slot = Slot::Empty;
        assert!(slot.fill(1u64, 10u64));
        assert_eq!(slot.key_value(), Some((&1, &10)));

        // overwrite of a live binding does not grow the count
        assert!(!slot.fill(1, 20));
        assert_eq!(slot.value(), Some(&20));

        let mut slot = Slot::Tombstone;
        assert!(slot.fill(2u64, 30u64));
        assert!(slot.is_occupied());
    }

    #[test]
    fn test_bury() {
        let mut slot = Slot::Occupied(7u64, "seven");
        assert_eq!(slot.bury(), Some((7, "seven")));
        assert!(slot.is_tombstone());

        // burying twice is a no-op
        assert_eq!(slot.bury(), None);
        assert!(slot.is_tombstone());

        let mut empty: Slot<u64, &str> = Slot::Empty;
        assert_eq!(empty.bury(), None);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_matches() {
        let slot = Slot::Occupied(3u64, ());
        assert!(slot.matches(&3));
        assert!(!slot.matches(&4));
        assert!(!Slot::<u64, ()>::Tombstone.matches(&3));
    }

    #[test]
    fn test_value_mut() {
        let mut slot = Slot::Occupied(1u64, 1u64);
        if let Some(v) = slot.value_mut() {
            *v += 41;
        }
        assert_eq!(slot.into_key_value(), Some((1, 42)));
    }
}
