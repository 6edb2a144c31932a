//! Probe sequences for open addressing
//!
//! A probe function maps `(capacity, key, attempt)` to a slot index. It must
//! be pure and deterministic. The table reduces every result modulo its
//! capacity, so implementations may return any `usize`.
//!
//! - `Linear`: `hash + i`, visits every slot within `capacity` attempts
//! - `Quadratic`: `hash + i²`, visits every slot only for some capacities;
//!   a table using it can run out of reachable slots before it is full

use serde::{Deserialize, Serialize};

use crate::hash::KeyHash;

/// Computes the slot index to examine on a given probe attempt
pub trait Probe<K: ?Sized> {
    /// `attempt` starts at 0 for the home slot
    fn index(&self, capacity: usize, key: &K, attempt: usize) -> usize;
}

impl<K: ?Sized, F> Probe<K> for F
where
    F: Fn(usize, &K, usize) -> usize,
{
    #[inline]
    fn index(&self, capacity: usize, key: &K, attempt: usize) -> usize {
        self(capacity, key, attempt)
    }
}

/// Reduce `hash + offset` modulo `capacity` without overflowing
#[inline]
fn offset_index(hash: u64, offset: u64, capacity: usize) -> usize {
    let cap = capacity.max(1) as u64;
    ((hash % cap + offset % cap) % cap) as usize
}

/// `attempt² mod capacity`, exact for every `attempt`
#[inline]
fn square_offset(attempt: usize, capacity: usize) -> u64 {
    let cap = capacity.max(1) as u128;
    let i = attempt as u128 % cap;
    (i * i % cap) as u64
}

/// Quadratic probing: `(hash(key) + i*i) mod capacity`
#[derive(Clone, Copy, Debug, Default)]
pub struct Quadratic<H> {
    hash: H,
}

impl<H> Quadratic<H> {
    pub fn new(hash: H) -> Self {
        Self { hash }
    }

    pub fn hash_fn(&self) -> &H {
        &self.hash
    }
}

impl<K: ?Sized, H: KeyHash<K>> Probe<K> for Quadratic<H> {
    #[inline]
    fn index(&self, capacity: usize, key: &K, attempt: usize) -> usize {
        offset_index(self.hash.hash_key(key), square_offset(attempt, capacity), capacity)
    }
}

/// Linear probing: `(hash(key) + i) mod capacity`
#[derive(Clone, Copy, Debug, Default)]
pub struct Linear<H> {
    hash: H,
}

impl<H> Linear<H> {
    pub fn new(hash: H) -> Self {
        Self { hash }
    }

    pub fn hash_fn(&self) -> &H {
        &self.hash
    }
}

impl<K: ?Sized, H: KeyHash<K>> Probe<K> for Linear<H> {
    #[inline]
    fn index(&self, capacity: usize, key: &K, attempt: usize) -> usize {
        offset_index(self.hash.hash_key(key), attempt as u64, capacity)
    }
}

/// Build a quadratic probe function from a hash function
pub fn quadratic_probe<H>(hash: H) -> Quadratic<H> {
    Quadratic::new(hash)
}

/// Build a linear probe function from a hash function
pub fn linear_probe<H>(hash: H) -> Linear<H> {
    Linear::new(hash)
}

/// Probe strategy selectable at runtime
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeStrategy {
    Linear,
    #[default]
    Quadratic,
}

impl std::str::FromStr for ProbeStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(ProbeStrategy::Linear),
            "quadratic" => Ok(ProbeStrategy::Quadratic),
            other => Err(format!("unknown probe strategy '{other}'")),
        }
    }
}

/// A probe whose strategy is chosen at runtime
#[derive(Clone, Copy, Debug)]
pub struct StrategyProbe<H> {
    strategy: ProbeStrategy,
    hash: H,
}

impl<H> StrategyProbe<H> {
    pub fn new(strategy: ProbeStrategy, hash: H) -> Self {
        Self { strategy, hash }
    }

    pub fn strategy(&self) -> ProbeStrategy {
        self.strategy
    }
}

impl<K: ?Sized, H: KeyHash<K>> Probe<K> for StrategyProbe<H> {
    #[inline]
    fn index(&self, capacity: usize, key: &K, attempt: usize) -> usize {
        let hash = self.hash.hash_key(key);
        match self.strategy {
            ProbeStrategy::Linear => offset_index(hash, attempt as u64, capacity),
            ProbeStrategy::Quadratic => offset_index(hash, square_offset(attempt, capacity), capacity),
        }
    }
}
