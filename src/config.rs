//! Configuration for building tables with integer keys
//!
//! A `TableConfig` fixes the capacity, the probe strategy and the hash
//! function. It can be loaded from JSON files or from environment
//! variables:
//!
//! - `{PREFIX}CAPACITY`: number of slots
//! - `{PREFIX}STRATEGY`: `linear` or `quadratic`
//! - `{PREFIX}HASH_MODULUS`: modulus for the modulo hash, `0` for identity
//!
//! The default prefix is `PROBETABLE_`.

use std::{env, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, TableError},
    hash::{HashKind, IntKey},
    probe::{ProbeStrategy, StrategyProbe},
    table::ProbingTable,
};

/// Default environment variable prefix
pub const ENV_PREFIX: &str = "PROBETABLE_";

/// Slot count used by the task store
pub const DEFAULT_CAPACITY: usize = 43;

/// Settings for a `ProbingTable` over integer keys
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Number of slots, fixed for the table's lifetime
    pub capacity: usize,
    pub strategy: ProbeStrategy,
    pub hash: HashKind,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            strategy: ProbeStrategy::Quadratic,
            hash: HashKind::default(),
        }
    }
}

/// Look up and parse a variable, keeping `default` when unset or malformed
fn parse_var<T, F>(lookup: &F, var_name: &str, default: T) -> T
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var_name) {
        Some(raw) => match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                log::warn!("ignoring malformed {var_name}={raw:?}");
                default
            }
        },
        None => default,
    }
}

impl TableConfig {
    pub fn new(capacity: usize, strategy: ProbeStrategy, hash: HashKind) -> Self {
        Self {
            capacity,
            strategy,
            hash,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(TableError::configuration("capacity must be greater than 0"));
        }
        self.hash.validate()
    }

    pub fn from_env() -> Result<Self> {
        Self::from_env_with_prefix(ENV_PREFIX)
    }

    pub fn from_env_with_prefix(prefix: &str) -> Result<Self> {
        Self::from_lookup(prefix, |name| env::var(name).ok())
    }

    /// Read `{prefix}CAPACITY`, `{prefix}STRATEGY` and `{prefix}HASH_MODULUS`
    /// through `lookup` instead of the process environment
    pub fn from_lookup<F>(prefix: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        config.capacity = parse_var(&lookup, &format!("{prefix}CAPACITY"), config.capacity);
        config.strategy = parse_var(&lookup, &format!("{prefix}STRATEGY"), config.strategy);

        let default_modulus = match config.hash {
            HashKind::Modulo { modulus } => modulus,
            HashKind::Identity => 0,
        };
        config.hash = match parse_var(&lookup, &format!("{prefix}HASH_MODULUS"), default_modulus) {
            0 => HashKind::Identity,
            modulus => HashKind::Modulo { modulus },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| TableError::configuration(format!("failed to serialize table config: {e}")))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| TableError::configuration(format!("failed to parse table config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Build an empty table from this configuration
    pub fn build<K, V>(&self) -> Result<ProbingTable<K, V, StrategyProbe<HashKind>>>
    where
        K: IntKey,
    {
        self.validate()?;
        ProbingTable::try_new(self.capacity, StrategyProbe::new(self.strategy, self.hash))
    }
}
