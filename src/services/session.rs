use crate::models::{PreferenceProfile, UpdatePreferencesRequest};
use crate::services::appwrite::{AppwriteClient, AppwriteError};
use crate::services::snapshot::{FetchSequence, FetchTicket, ListingSnapshot, SnapshotStore};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Change notifications published by a [`Session`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SnapshotReplaced { sequence: u64, listing_count: usize },
    ProfileUpdated { buyer_id: String },
}

/// Outcome of a listing refresh
#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    /// False when a newer refresh completed first
    pub applied: bool,
    pub snapshot: Arc<ListingSnapshot>,
}

#[derive(Debug, Default)]
struct ProfileSlot {
    in_flight: usize,
    applied: u64,
    latest: Option<PreferenceProfile>,
}

/// Sequences preference fetches per buyer.
///
/// A buyer is tracked only while at least one fetch for them is in flight, so
/// the registry never serves a profile on its own and does not grow with the
/// number of buyers seen.
#[derive(Debug, Default)]
pub struct ProfileRegistry {
    slots: Mutex<HashMap<String, ProfileSlot>>,
    sequence: FetchSequence,
}

/// Result of applying a completed profile fetch
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileApply {
    Applied,
    /// A newer fetch for the same buyer finished first; carries its profile
    Superseded(PreferenceProfile),
}

impl ProfileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fetch for `buyer_id`. The buyer stays tracked until the
    /// returned handle is dropped.
    pub fn begin_fetch(&self, buyer_id: &str) -> PendingProfile<'_> {
        let ticket = self.sequence.next_ticket();

        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        slots.entry(buyer_id.to_string()).or_default().in_flight += 1;

        PendingProfile {
            registry: self,
            buyer_id: buyer_id.to_string(),
            ticket,
        }
    }

    /// Buyers with a fetch currently in flight
    pub fn tracked(&self) -> usize {
        self.slots.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn apply(&self, buyer_id: &str, ticket: FetchTicket, profile: &PreferenceProfile) -> ProfileApply {
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        let slot = slots.entry(buyer_id.to_string()).or_default();

        if slot.applied >= ticket.sequence() {
            tracing::debug!(
                "Discarding stale profile fetch #{} for buyer {} (current #{})",
                ticket.sequence(),
                buyer_id,
                slot.applied
            );
            if let Some(latest) = &slot.latest {
                return ProfileApply::Superseded(latest.clone());
            }
        }

        slot.applied = ticket.sequence();
        slot.latest = Some(profile.clone());
        ProfileApply::Applied
    }

    fn release(&self, buyer_id: &str) {
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(slot) = slots.get_mut(buyer_id) {
            slot.in_flight = slot.in_flight.saturating_sub(1);
            if slot.in_flight == 0 {
                slots.remove(buyer_id);
            }
        }
    }
}

/// An in-flight profile fetch. Dropping it, applied or not, releases the buyer.
#[derive(Debug)]
pub struct PendingProfile<'a> {
    registry: &'a ProfileRegistry,
    buyer_id: String,
    ticket: FetchTicket,
}

impl PendingProfile<'_> {
    pub fn ticket(&self) -> FetchTicket {
        self.ticket
    }

    /// Apply the fetched profile unless a newer fetch already landed
    pub fn apply(self, profile: &PreferenceProfile) -> ProfileApply {
        self.registry.apply(&self.buyer_id, self.ticket, profile)
    }
}

impl Drop for PendingProfile<'_> {
    fn drop(&mut self) {
        self.registry.release(&self.buyer_id);
    }
}

/// Process state shared by every request handler.
///
/// Constructed once at startup and injected into the handlers. Snapshot and
/// profile changes are published to subscribers through [`Session::subscribe`].
pub struct Session {
    store: Arc<AppwriteClient>,
    snapshots: SnapshotStore,
    profiles: ProfileRegistry,
    events: broadcast::Sender<SessionEvent>,
    page_size: usize,
}

impl Session {
    pub fn new(store: Arc<AppwriteClient>, page_size: usize) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Self {
            store,
            snapshots: SnapshotStore::new(),
            profiles: ProfileRegistry::new(),
            events,
            page_size,
        }
    }

    /// Receive snapshot and profile change notifications
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    fn publish(&self, event: SessionEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    /// The snapshot currently served to readers
    pub fn snapshot(&self) -> Arc<ListingSnapshot> {
        self.snapshots.current()
    }

    /// Re-fetch available listings and replace the snapshot.
    ///
    /// On failure the previous snapshot stays in place.
    pub async fn refresh_listings(&self) -> Result<RefreshOutcome, AppwriteError> {
        let ticket = self.snapshots.begin_fetch();

        let listings = self
            .store
            .fetch_available_listings(self.page_size)
            .await
            .map_err(|e| {
                tracing::error!("Listing refresh #{} failed: {}", ticket.sequence(), e);
                e
            })?;

        match self.snapshots.apply(ticket, listings) {
            Some(snapshot) => {
                tracing::info!(
                    "Applied listing snapshot #{} ({} listings)",
                    snapshot.sequence,
                    snapshot.len()
                );
                self.publish(SessionEvent::SnapshotReplaced {
                    sequence: snapshot.sequence,
                    listing_count: snapshot.len(),
                });
                Ok(RefreshOutcome {
                    applied: true,
                    snapshot,
                })
            }
            None => Ok(RefreshOutcome {
                applied: false,
                snapshot: self.snapshots.current(),
            }),
        }
    }

    /// Read a buyer's profile from the store.
    ///
    /// Every call goes to the store. When overlapping reads for the same buyer
    /// complete out of order, the newest one wins.
    pub async fn load_profile(&self, buyer_id: &str) -> Result<PreferenceProfile, AppwriteError> {
        let pending = self.profiles.begin_fetch(buyer_id);

        let profile = self.store.get_preferences(buyer_id).await.map_err(|e| {
            tracing::error!("Failed to fetch preferences for {}: {}", buyer_id, e);
            e
        })?;

        match pending.apply(&profile) {
            ProfileApply::Applied => Ok(profile),
            ProfileApply::Superseded(newer) => Ok(newer),
        }
    }

    /// Persist an explicit settings save and publish the change
    pub async fn save_profile(
        &self,
        buyer_id: &str,
        update: &UpdatePreferencesRequest,
    ) -> Result<PreferenceProfile, AppwriteError> {
        let pending = self.profiles.begin_fetch(buyer_id);
        let profile = self.store.update_preferences(buyer_id, update).await?;

        if pending.apply(&profile) == ProfileApply::Applied {
            self.publish(SessionEvent::ProfileUpdated {
                buyer_id: buyer_id.to_string(),
            });
        }

        Ok(profile)
    }
}
