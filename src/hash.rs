//! Hash functions feeding the probe sequence
//!
//! A hash function maps a key to an integer. It only needs good dispersion
//! for the caller's key distribution; it is not required to be hard to
//! invert or predict.

use std::hash::{BuildHasher, Hash, RandomState};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TableError};

/// Maps a key to a 64-bit hash
pub trait KeyHash<K: ?Sized> {
    fn hash_key(&self, key: &K) -> u64;
}

impl<K: ?Sized, F> KeyHash<K> for F
where
    F: Fn(&K) -> u64,
{
    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        self(key)
    }
}

/// Fixed-width integer keys
///
/// Signed values are reinterpreted through their two's complement bit
/// pattern, so `-1i64` maps to `u64::MAX`.
pub trait IntKey: Copy + Eq {
    fn to_u64(self) -> u64;
}

macro_rules! impl_int_key {
    ($($unsigned:ty),* ; $($signed:ty => $as_unsigned:ty),*) => {
        $(
            impl IntKey for $unsigned {
                #[inline]
                fn to_u64(self) -> u64 {
                    self as u64
                }
            }
        )*
        $(
            impl IntKey for $signed {
                #[inline]
                fn to_u64(self) -> u64 {
                    self as $as_unsigned as u64
                }
            }
        )*
    };
}

impl_int_key!(u8, u16, u32, u64, usize; i8 => u8, i16 => u16, i32 => u32, i64 => u64, isize => usize);

/// Identity hash: the key is its own hash
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Identity;

impl<K: IntKey> KeyHash<K> for Identity {
    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        key.to_u64()
    }
}

/// Modulo hash: `key mod m`
///
/// The modulus is never zero; deserializing `0` is rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u64")]
pub struct Modulo(u64);

impl Modulo {
    /// Modulus used by the task store
    pub const DEFAULT_MODULUS: u64 = 100;

    /// # Panics
    /// Panics if `modulus` is zero
    pub fn new(modulus: u64) -> Self {
        assert!(modulus > 0, "modulus must be positive");
        Self(modulus)
    }

    /// Like `new`, but rejects a zero modulus with an error
    pub fn try_new(modulus: u64) -> Result<Self> {
        if modulus == 0 {
            return Err(TableError::configuration("hash modulus must be greater than 0"));
        }
        Ok(Self(modulus))
    }

    #[inline]
    pub fn modulus(&self) -> u64 {
        self.0
    }
}

impl TryFrom<u64> for Modulo {
    type Error = TableError;

    fn try_from(modulus: u64) -> Result<Self> {
        Self::try_new(modulus)
    }
}

impl Default for Modulo {
    fn default() -> Self {
        Self(Self::DEFAULT_MODULUS)
    }
}

impl<K: IntKey> KeyHash<K> for Modulo {
    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        key.to_u64() % self.0
    }
}

/// Hashes any `Hash` key through a `BuildHasher`
#[derive(Clone, Debug, Default)]
pub struct Hashed<S = RandomState> {
    hash_builder: S,
}

impl Hashed<RandomState> {
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }
}

impl<S> Hashed<S> {
    pub fn with_hasher(hash_builder: S) -> Self {
        Self { hash_builder }
    }

    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }
}

impl<K, S> KeyHash<K> for Hashed<S>
where
    K: Hash + ?Sized,
    S: BuildHasher,
{
    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        self.hash_builder.hash_one(key)
    }
}

/// Serializable choice of integer hash, used by `TableConfig`
///
/// The variants are plain data, so `Modulo { modulus: 0 }` can be built
/// directly. `validate` reports it; hashing treats a zero modulus as no
/// reduction, the same as `Identity`, and never panics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HashKind {
    Identity,
    Modulo { modulus: u64 },
}

impl Default for HashKind {
    fn default() -> Self {
        HashKind::Modulo {
            modulus: Modulo::DEFAULT_MODULUS,
        }
    }
}

impl HashKind {
    pub fn validate(&self) -> Result<()> {
        match *self {
            HashKind::Modulo { modulus } => Modulo::try_new(modulus).map(|_| ()),
            HashKind::Identity => Ok(()),
        }
    }
}

impl<K: IntKey> KeyHash<K> for HashKind {
    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        match *self {
            HashKind::Identity | HashKind::Modulo { modulus: 0 } => key.to_u64(),
            HashKind::Modulo { modulus } => key.to_u64() % modulus,
        }
    }
}
