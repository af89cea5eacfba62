//! Estate Match - property matching and filtering service for the estate marketplace
//!
//! This library provides the listing engine behind the buyer dashboard and
//! explore views: a filter predicate set, preference scoring, sort strategies
//! and the projection that composes them over an in-memory listing snapshot.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{filter_listings, sort_listings, Matcher, ProjectionResult};
pub use models::{FilterConstraints, PreferenceProfile, PropertyRecord, ScoredProperty, ScoringWeights, SortMode};
pub use services::{Session, SessionEvent};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let matcher = Matcher::default();
        let result = matcher.project(&[], &FilterConstraints::default(), SortMode::Newest, None);
        assert!(result.listings.is_empty());
    }
}
