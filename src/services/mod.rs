// Service exports
pub mod appwrite;
pub mod session;
pub mod snapshot;

pub use appwrite::{AppwriteClient, AppwriteCollections, AppwriteError};
pub use session::{PendingProfile, ProfileApply, ProfileRegistry, RefreshOutcome, Session, SessionEvent};
pub use snapshot::{FetchSequence, FetchTicket, ListingSnapshot, SnapshotStore};
