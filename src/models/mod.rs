// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    BedroomCount, ConstraintError, FilterConstraints, FilterFacets, ListingKind, ListingStatus,
    PreferenceProfile, PropertyRecord, ScoredProperty, ScoringWeights, SortMode,
};
pub use requests::{FilterRequest, RecommendRequest, SearchListingsRequest, UpdatePreferencesRequest};
pub use responses::{ErrorResponse, HealthResponse, ListingsResponse, RefreshResponse};
