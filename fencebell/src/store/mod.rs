//! Snapshot-swap store for geofence records.
//!
//! Holds the latest full record set delivered by the sync feed. Replacement
//! is wholesale and atomic: an evaluation pass clones an `Arc` snapshot up
//! front and is never exposed to a half-applied update, even while the feed
//! and the location stream run as independent producers.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::geofence::GeofenceRecord;

/// Shared, read-mostly set of geofence records.
///
/// Handles are cheap to clone; all clones observe the same record set.
/// The store performs no validation and no merging: identity questions
/// (such as duplicate ids) are the feed's responsibility and resolve as
/// last-write-wins wherever records are keyed by id downstream.
#[derive(Debug, Clone)]
pub struct GeofenceStore {
    records: Arc<RwLock<Arc<[GeofenceRecord]>>>,
}

impl GeofenceStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Arc::new([]))),
        }
    }

    /// Replace the full record set.
    ///
    /// Readers holding a previous snapshot keep it; snapshots taken after
    /// this call see the replacement in its entirety. Replaying an
    /// identical set is harmless.
    pub fn replace_all(&self, records: Vec<GeofenceRecord>) {
        let snapshot: Arc<[GeofenceRecord]> = records.into();
        let count = snapshot.len();

        *self.records.write() = snapshot;
        debug!(records = count, "Geofence record set replaced");
    }

    /// Take an immutable snapshot for one evaluation pass.
    ///
    /// Records appear in the order the feed delivered them.
    pub fn snapshot(&self) -> Arc<[GeofenceRecord]> {
        Arc::clone(&self.records.read())
    }

    /// Number of records currently held.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether the store currently holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl Default for GeofenceStore {
    fn default() -> Self {
        Self::new()
    }
}
