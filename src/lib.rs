//! # Partially Persistent Documents via Node Copying
//!
//! A nested list document that is updated in place while every past
//! version stays queryable, at amortized O(1) cost per update and per
//! slot read.
//!
//! ## Core Algorithm
//!
//! 1. **Records**: each list is an immutable base vector plus a delta log
//!    of at most `MAX_DELTAS` (version, slot, value) entries
//! 2. **Snapshot reads**: a slot at version `t` is the base value
//!    overlaid with the log entries stamped `<= t`
//! 3. **Rebalance**: a full log freezes the record and replaces it with a
//!    fresh copy; each holder (found via backlinks) gets a forwarding delta,
//!    which may cascade upward
//! 4. **Root**: an uncapped version → top-record map terminates the cascade
//!
//! Each rebalance retires `MAX_DELTAS` deltas, so rebalances never exceed
//! appended deltas / `MAX_DELTAS`: amortized O(1) new records per update.
//!
//! ## Usage Example
//!
//! ```
//! use partial_persistence::{PartialPersistence, Value};
//!
//! let document: Value<i64> = "[1, 2, [3, 4]]".parse()?;
//! let mut persistence = PartialPersistence::wrap(document);
//! persistence.set(&[], 0, Value::Scalar(8))?;
//! persistence.set(&[2], 1, Value::Scalar(9))?;
//!
//! assert_eq!(persistence.unwrap(0)?.to_string(), "[1, 2, [3, 4]]");
//! assert_eq!(persistence.unwrap(2)?.to_string(), "[8, 2, [3, 9]]");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]

pub mod value;       // Plain nested documents
pub mod record;      // Versioned records, delta logs, backlinks
pub mod root;        // Uncapped top-level history
pub(crate) mod store; // Arena and rebalance cascade
pub mod persistence; // Public facade and snapshots
pub mod stats;       // Update cost accounting
pub mod inspect;     // Structure dumps for debugging/visualization

// Re-exports for convenience
pub use persistence::{PartialPersistence, Snapshot};
pub use record::{Backlink, Delta, Holder, Record, RecordId, Slot};
pub use stats::StoreStats;
pub use value::{ParseValueError, Value};

use std::fmt;

use thiserror::Error;

/// Version stamp. Version 0 is the wrapped document.
pub type Version = u64;

/// Delta log length used when no configuration is given.
pub const DEFAULT_MAX_DELTAS: usize = 8;

/// Configuration parameters for a persistent document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistenceConfig {
    /// Log length at which a record is rebalanced (`MAX_DELTAS`).
    ///
    /// Smaller values rebalance more often; larger values make each
    /// snapshot read scan a longer log.
    pub max_deltas: usize,
}

impl PersistenceConfig {
    /// Configuration with an explicit rebalance threshold.
    pub fn with_max_deltas(max_deltas: usize) -> Result<Self, PersistenceError> {
        if max_deltas == 0 {
            return Err(PersistenceError::InvalidConfiguration(
                "max deltas must be > 0".to_string(),
            ));
        }
        Ok(Self { max_deltas })
    }
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            max_deltas: DEFAULT_MAX_DELTAS,
        }
    }
}

/// Why a path step could not be taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescentFailure {
    /// The slot holds a scalar, not a list.
    NotAContainer,

    /// The index is past the end of the list.
    OutOfRange {
        /// Slot count of the addressed list.
        len: usize,
    },
}

impl fmt::Display for DescentFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescentFailure::NotAContainer => write!(f, "slot holds a scalar"),
            DescentFailure::OutOfRange { len } => write!(f, "list has {} slots", len),
        }
    }
}

/// Errors raised by updates and queries
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// A path step or the final index could not be resolved.
    #[error("cannot descend at depth {depth} into index {index}: {reason}")]
    PathDescent {
        /// Number of steps already taken; `path.len()` for the final index.
        depth: usize,
        /// Index that was attempted.
        index: usize,
        /// What went wrong.
        reason: DescentFailure,
    },

    /// The root only has slot 0.
    #[error("root update must target index 0, got {index}")]
    InvalidRootUpdate {
        /// Index that was attempted.
        index: usize,
    },

    /// Query for a version that does not exist yet.
    #[error("version {requested} is outside the recorded range 0..={now}")]
    TimeRange {
        /// Version asked for.
        requested: Version,
        /// Newest version at the time of the query.
        now: Version,
    },

    /// Invalid configuration
    #[error("invalid persistence configuration: {0}")]
    InvalidConfiguration(String),
}

impl PersistenceError {
    pub(crate) fn not_a_container(depth: usize, index: usize) -> Self {
        PersistenceError::PathDescent {
            depth,
            index,
            reason: DescentFailure::NotAContainer,
        }
    }

    pub(crate) fn out_of_range(depth: usize, index: usize, len: usize) -> Self {
        PersistenceError::PathDescent {
            depth,
            index,
            reason: DescentFailure::OutOfRange { len },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        assert_eq!(PersistenceConfig::default().max_deltas, DEFAULT_MAX_DELTAS);
        assert_eq!(PersistenceConfig::with_max_deltas(3).unwrap().max_deltas, 3);
        assert!(matches!(
            PersistenceConfig::with_max_deltas(0),
            Err(PersistenceError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_error_messages() {
        let err = PersistenceError::out_of_range(1, 4, 2);
        assert_eq!(
            err.to_string(),
            "cannot descend at depth 1 into index 4: list has 2 slots"
        );
        let err = PersistenceError::TimeRange {
            requested: 9,
            now: 3,
        };
        assert_eq!(
            err.to_string(),
            "version 9 is outside the recorded range 0..=3"
        );
    }
}
