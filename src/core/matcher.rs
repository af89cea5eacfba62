use crate::models::{FilterConstraints, PreferenceProfile, PropertyRecord, ScoredProperty, ScoringWeights, SortMode};
use crate::core::{
    filters::ListingFilter,
    scoring::{calculate_relevance_score, Jitter, RandomJitter},
    sorting::sort_listings,
};
use std::sync::Arc;

/// Default size of the recommended set
pub const DEFAULT_RECOMMENDED_LIMIT: usize = 5;

/// Result of a projection over a snapshot
#[derive(Debug)]
pub struct ProjectionResult {
    pub listings: Vec<ScoredProperty>,
    /// Listings in the snapshot before filtering
    pub total_candidates: usize,
    /// Listings that passed the filter, before any top-N cut
    pub total_matched: usize,
}

/// Listing matching engine - composes filter, scoring and sort
///
/// # Pipeline Stages
/// 1. Filter predicate set (logical AND of all constraints)
/// 2. Relevance scoring (recommended view only)
/// 3. Sort strategy
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: ScoringWeights,
    recommended_limit: usize,
    jitter: Arc<dyn Jitter>,
}

impl Matcher {
    pub fn new(weights: ScoringWeights, recommended_limit: usize, jitter: Arc<dyn Jitter>) -> Self {
        Self {
            weights,
            recommended_limit,
            jitter,
        }
    }

    pub fn with_default_weights() -> Self {
        Self::new(
            ScoringWeights::default(),
            DEFAULT_RECOMMENDED_LIMIT,
            Arc::new(RandomJitter),
        )
    }

    pub fn weights(&self) -> ScoringWeights {
        self.weights
    }

    pub fn recommended_limit(&self) -> usize {
        self.recommended_limit
    }

    fn filter_and_score(
        &self,
        snapshot: &[PropertyRecord],
        constraints: &FilterConstraints,
        profile: Option<&PreferenceProfile>,
    ) -> Vec<ScoredProperty> {
        let filter = ListingFilter::new(constraints);

        snapshot
            .iter()
            .filter(|property| filter.matches(property))
            .map(|property| {
                let score = profile.map(|p| {
                    calculate_relevance_score(property, p, &self.weights, self.jitter.as_ref())
                });
                ScoredProperty {
                    property: property.clone(),
                    score,
                }
            })
            .collect()
    }

    /// Filter and order a snapshot for the explore view
    ///
    /// Listings are scored only when `sort` is `Recommended` and a profile is
    /// supplied. Without a profile the recommended order is the snapshot order.
    pub fn project(
        &self,
        snapshot: &[PropertyRecord],
        constraints: &FilterConstraints,
        sort: SortMode,
        profile: Option<&PreferenceProfile>,
    ) -> ProjectionResult {
        let profile = match sort {
            SortMode::Recommended => profile,
            _ => None,
        };

        let mut listings = self.filter_and_score(snapshot, constraints, profile);
        let total_matched = listings.len();

        sort_listings(&mut listings, sort);

        tracing::trace!(
            "Projected {} of {} listings (sort: {:?})",
            total_matched,
            snapshot.len(),
            sort
        );

        ProjectionResult {
            listings,
            total_candidates: snapshot.len(),
            total_matched,
        }
    }

    /// Top-N listings for a buyer, by descending relevance
    pub fn recommend(
        &self,
        snapshot: &[PropertyRecord],
        constraints: &FilterConstraints,
        profile: &PreferenceProfile,
    ) -> ProjectionResult {
        let mut listings = self.filter_and_score(snapshot, constraints, Some(profile));
        let total_matched = listings.len();

        sort_listings(&mut listings, SortMode::Recommended);
        listings.truncate(self.recommended_limit);

        ProjectionResult {
            listings,
            total_candidates: snapshot.len(),
            total_matched,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}
