//! Fixed-capacity open-addressing hash table.
//!
//! `ProbingTable` stores bindings in a single slot array whose length never
//! changes. Collisions are resolved by a caller-supplied probe function and
//! deletions leave tombstones so that probe chains stay intact.
//!
//! ```
//! use probetable::{quadratic_probe, Modulo, ProbingTable};
//!
//! let mut tasks = ProbingTable::new(43, quadratic_probe(Modulo::default()));
//! assert!(tasks.insert(1_700_000_000_001u64, "write report"));
//! assert_eq!(tasks.get(&1_700_000_000_001), Some(&"write report"));
//! assert!(tasks.delete(&1_700_000_000_001));
//! assert!(tasks.is_empty());
//! ```

pub mod config;
pub mod entry;
pub mod error;
pub mod hash;
pub mod iter;
pub mod probe;
pub mod slot;
pub mod table;

pub use config::TableConfig;
pub use entry::{Entry, OccupiedEntry, VacantEntry};
pub use error::{Result, TableError};
pub use hash::{HashKind, Hashed, Identity, IntKey, KeyHash, Modulo};
pub use probe::{
    linear_probe, quadratic_probe, Linear, Probe, ProbeStrategy, Quadratic, StrategyProbe,
};
pub use slot::{Slot, SlotKind};
pub use table::ProbingTable;
