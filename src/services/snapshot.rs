use crate::models::PropertyRecord;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// Sequence number handed out when a fetch starts.
///
/// A completed fetch is applied only if its ticket is newer than the last
/// applied one, so an older request that resolves late never overwrites
/// newer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

impl FetchTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// Monotonic ticket source
#[derive(Debug, Default)]
pub struct FetchSequence {
    next: AtomicU64,
}

impl FetchSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tickets start at 1; sequence 0 means "nothing applied yet"
    pub fn next_ticket(&self) -> FetchTicket {
        FetchTicket(self.next.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

/// Immutable point-in-time copy of the available listings
#[derive(Debug, Clone)]
pub struct ListingSnapshot {
    pub sequence: u64,
    pub listings: Vec<PropertyRecord>,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl ListingSnapshot {
    pub fn empty() -> Self {
        Self {
            sequence: 0,
            listings: Vec::new(),
            fetched_at: None,
        }
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

/// Holds the current snapshot; replacement swaps the `Arc` atomically
#[derive(Debug)]
pub struct SnapshotStore {
    current: RwLock<Arc<ListingSnapshot>>,
    sequence: FetchSequence,
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(ListingSnapshot::empty())),
            sequence: FetchSequence::new(),
        }
    }

    /// Current snapshot. Readers keep their `Arc` for the whole recomputation.
    pub fn current(&self) -> Arc<ListingSnapshot> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&*guard)
    }

    pub fn begin_fetch(&self) -> FetchTicket {
        self.sequence.next_ticket()
    }

    /// Replace the snapshot with a completed fetch.
    ///
    /// Returns the new snapshot, or `None` when a newer fetch was already applied.
    pub fn apply(
        &self,
        ticket: FetchTicket,
        listings: Vec<PropertyRecord>,
    ) -> Option<Arc<ListingSnapshot>> {
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());

        if ticket.sequence() <= guard.sequence {
            tracing::debug!(
                "Discarding stale listing fetch #{} (current #{})",
                ticket.sequence(),
                guard.sequence
            );
            return None;
        }

        let snapshot = Arc::new(ListingSnapshot {
            sequence: ticket.sequence(),
            listings: dedupe_by_id(listings),
            fetched_at: Some(Utc::now()),
        });
        *guard = Arc::clone(&snapshot);

        Some(snapshot)
    }
}

/// Keep the first listing for each id
fn dedupe_by_id(listings: Vec<PropertyRecord>) -> Vec<PropertyRecord> {
    let mut seen = HashSet::with_capacity(listings.len());
    listings
        .into_iter()
        .filter(|listing| {
            let fresh = seen.insert(listing.id.clone());
            if !fresh {
                tracing::warn!("Dropping duplicate listing id {} from snapshot", listing.id);
            }
            fresh
        })
        .collect()
}
