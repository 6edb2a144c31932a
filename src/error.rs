//! Error types for `ProbingTable`

use thiserror::Error;

/// Errors reported by table construction, insertion and configuration.
///
/// A missing key is never an error: lookups and removals return `None`.
#[derive(Error, Debug)]
pub enum TableError {
    /// A table was requested with zero slots
    #[error("capacity must be greater than 0")]
    ZeroCapacity,

    /// Every slot holds a live binding
    #[error("table is full: {capacity} of {capacity} slots occupied")]
    TableFull {
        /// Fixed capacity of the table
        capacity: usize,
    },

    /// The probe function ran `capacity` attempts without reaching an
    /// empty, tombstone or matching slot. Points at a probe function that
    /// does not enumerate a free residue for this key.
    #[error("probe sequence exhausted after {capacity} attempts")]
    ProbeExhausted {
        /// Number of attempts made (equal to the table capacity)
        capacity: usize,
    },

    /// Invalid or unreadable configuration
    #[error("invalid configuration: {message}")]
    Configuration {
        /// What was wrong
        message: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TableError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        TableError::Configuration {
            message: message.into(),
        }
    }

    /// Returns `true` if the error is recoverable by removing entries or
    /// choosing a larger table
    pub fn is_capacity_error(&self) -> bool {
        matches!(self, TableError::TableFull { .. })
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, TableError>;
