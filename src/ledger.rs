//! Ledger event source: the ordered log of committed leaves.
//!
//! The ledger emits one `Commit(commitment, leafIndex, timestamp)` event per
//! successful append. The accumulator consumes that log strictly as an
//! ordered snapshot: array order is append order and indices must be dense.

use crate::accumulator::{Accumulator, MembershipWitness};
use crate::field::FieldElement;
use crate::hash::HashOracle;
use crate::utils::current_unix_timestamp;
use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// One append event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitEvent {
    pub commitment: FieldElement,
    pub leaf_index: u32,
    pub timestamp: u64,
}

/// Anything that can produce the ordered commit log.
pub trait LedgerEventSource {
    /// All commit events, in append order.
    fn events(&self) -> Result<Vec<CommitEvent>>;
}

/// Reads the full log and returns its commitments as a leaf sequence.
///
/// # Errors
/// Fails if the source fails or if the event indices are not exactly
/// `0, 1, 2, ...` in array order.
pub fn snapshot<S: LedgerEventSource + ?Sized>(source: &S) -> Result<Vec<FieldElement>> {
    let events = source.events().context("Failed to read ledger events")?;
    check_dense(&events)?;
    let leaves: Vec<FieldElement> = events.iter().map(|event| event.commitment).collect();
    debug!("Ledger snapshot holds {} leaves", leaves.len());
    Ok(leaves)
}

fn check_dense(events: &[CommitEvent]) -> Result<()> {
    for (position, event) in events.iter().enumerate() {
        if usize::try_from(event.leaf_index).ok() != Some(position) {
            return Err(anyhow::anyhow!(
                "Ledger log out of order: event at position {} has leafIndex {}",
                position,
                event.leaf_index
            ));
        }
    }
    Ok(())
}

/// Snapshots `source` and computes the root and path for `target`.
///
/// # Errors
/// Fails on a bad log, an oversized snapshot, or a missing target.
pub fn root_and_path_from_events<H, S>(
    accumulator: &Accumulator<H>,
    source: &S,
    target: &FieldElement,
) -> Result<MembershipWitness>
where
    H: HashOracle,
    S: LedgerEventSource + ?Sized,
{
    let leaves = snapshot(source)?;
    accumulator
        .root_and_path(&leaves, target)
        .context("Failed to compute Merkle root and path from ledger events")
}

/// An append-only log kept in memory.
///
/// Like the on-chain tree it stands in for, a log built with a capacity
/// refuses appends once it holds that many commitments.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventLog {
    events: Vec<CommitEvent>,
    capacity: Option<u64>,
}

impl InMemoryEventLog {
    /// An unbounded log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A log that accepts at most `capacity` commitments, normally
    /// [`Accumulator::capacity`].
    #[must_use]
    pub fn with_capacity(capacity: u64) -> Self {
        Self {
            events: Vec::new(),
            capacity: Some(capacity),
        }
    }

    /// Resumes an unbounded log from an existing source, e.g. a
    /// [`JsonEventLog`].
    ///
    /// # Errors
    /// Fails if the source fails or its indices are not dense.
    pub fn from_source<S: LedgerEventSource + ?Sized>(source: &S) -> Result<Self> {
        let events = source.events()?;
        check_dense(&events)?;
        Ok(Self {
            events,
            capacity: None,
        })
    }

    /// Resumes a bounded log.
    ///
    /// # Errors
    /// Fails as [`InMemoryEventLog::from_source`] does, or if the source
    /// already holds more than `capacity` events.
    pub fn from_source_with_capacity<S: LedgerEventSource + ?Sized>(
        source: &S,
        capacity: u64,
    ) -> Result<Self> {
        let mut log = Self::from_source(source)?;
        if log.events.len() as u64 > capacity {
            return Err(anyhow::anyhow!(
                "Ledger log holds {} events, more than the tree capacity {}",
                log.events.len(),
                capacity
            ));
        }
        log.capacity = Some(capacity);
        Ok(log)
    }

    #[must_use]
    pub fn capacity(&self) -> Option<u64> {
        self.capacity
    }

    /// Appends a commitment, assigning the next leaf index and the current time.
    ///
    /// The log is left unchanged on error.
    ///
    /// # Errors
    /// Fails if the log is at capacity, already holds `u32::MAX + 1` events,
    /// or the clock is unavailable.
    pub fn append(&mut self, commitment: FieldElement) -> Result<&CommitEvent> {
        if let Some(capacity) = self.capacity {
            if self.events.len() as u64 >= capacity {
                return Err(anyhow::anyhow!(
                    "Tree is full: capacity {} commitments reached",
                    capacity
                ));
            }
        }
        let leaf_index =
            u32::try_from(self.events.len()).context("Ledger log exceeds u32 leaf indices")?;
        self.events.push(CommitEvent {
            commitment,
            leaf_index,
            timestamp: current_unix_timestamp()?,
        });
        self.events
            .last()
            .context("Ledger log unexpectedly empty after append")
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Writes the log as a JSON array readable by [`JsonEventLog`].
    ///
    /// # Errors
    /// Fails on serialization or I/O errors.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.events)
            .context("Failed to serialize ledger events")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write ledger events: {}", path.display()))
    }
}

impl LedgerEventSource for InMemoryEventLog {
    fn events(&self) -> Result<Vec<CommitEvent>> {
        Ok(self.events.clone())
    }
}

/// A log exported to disk as a JSON array of [`CommitEvent`]s.
#[derive(Debug, Clone)]
pub struct JsonEventLog {
    path: PathBuf,
    max_file_size: u64,
}

impl JsonEventLog {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, max_file_size: u64) -> Self {
        Self {
            path: path.into(),
            max_file_size,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LedgerEventSource for JsonEventLog {
    fn events(&self) -> Result<Vec<CommitEvent>> {
        let metadata = fs::metadata(&self.path).with_context(|| {
            format!("Failed to read events file metadata: {}", self.path.display())
        })?;
        if metadata.len() > self.max_file_size {
            return Err(anyhow::anyhow!(
                "Events file too large: {} bytes (max {} bytes). Raise [ledger] max_file_size if this log is expected.",
                metadata.len(),
                self.max_file_size
            ));
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read events file: {}", self.path.display()))?;
        let events: Vec<CommitEvent> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse events file: {}", self.path.display()))?;
        debug!("Loaded {} events from {}", events.len(), self.path.display());
        Ok(events)
    }
}
