//! Stable identities for computation definitions.

use std::sync::atomic::{AtomicU64, Ordering};

/// An opaque, stable identity for a [`ComputationDefinition`].
///
/// `OutputKey`'s identity is `(providerPath, DefinitionId)`: two output
/// keys compare equal iff their provider paths and definition identities
/// are equal, independent of the live definition object. Assigned once,
/// at registration time, and never reused.
///
/// [`ComputationDefinition`]: https://docs.rs/sc-scene (defined downstream, in `sc-scene`)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DefinitionId(u64);

impl DefinitionId {
    /// Constructs a `DefinitionId` from a raw value.
    ///
    /// Only [`DefinitionIdGenerator`] should normally call this; exposed so
    /// that built-in definitions can be assigned well-known, low-numbered
    /// ids before any plugin registration occurs.
    pub const fn from_raw(raw: u64) -> Self {
        DefinitionId(raw)
    }

    /// Returns the raw numeric value, for debugging/logging.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Hands out strictly increasing, process-lifetime-stable [`DefinitionId`]s.
#[derive(Debug, Default)]
pub struct DefinitionIdGenerator {
    next: AtomicU64,
}

impl DefinitionIdGenerator {
    /// Creates a generator whose first id is `start`.
    pub const fn starting_at(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
        }
    }

    /// Returns the next, never-before-returned id.
    pub fn next_id(&self) -> DefinitionId {
        DefinitionId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}
