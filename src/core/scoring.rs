use crate::models::{PreferenceProfile, PropertyRecord, ScoringWeights};
use rand::Rng;
use std::fmt::Debug;

/// Source of the tie-breaking jitter added to every relevance score.
///
/// Samples must lie in `[0, 1)` so jitter never outweighs a matched signal.
pub trait Jitter: Send + Sync + Debug {
    fn sample(&self) -> f64;
}

/// Uniform jitter from the thread-local RNG. Not reproducible between runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomJitter;

impl Jitter for RandomJitter {
    fn sample(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Constant jitter, for deterministic ranking
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedJitter(pub f64);

impl Jitter for FixedJitter {
    fn sample(&self) -> f64 {
        self.0
    }
}

/// City signal: the preferred city occurs in the listing's city (case-insensitive)
#[inline]
pub fn city_matches(property: &PropertyRecord, profile: &PreferenceProfile) -> bool {
    let preferred = profile.preferred_city.trim();
    !preferred.is_empty()
        && property
            .city
            .to_lowercase()
            .contains(&preferred.to_lowercase())
}

/// Type signal: exact equality with the preferred property type
#[inline]
pub fn property_type_matches(property: &PropertyRecord, profile: &PreferenceProfile) -> bool {
    !profile.preferred_property_type.is_empty()
        && property.property_type == profile.preferred_property_type
}

/// Weighted sum of the preference signals, without jitter
#[inline]
pub fn signal_score(
    property: &PropertyRecord,
    profile: &PreferenceProfile,
    weights: &ScoringWeights,
) -> f64 {
    let mut score = 0.0;

    if city_matches(property, profile) {
        score += weights.city;
    }

    if property_type_matches(property, profile) {
        score += weights.property_type;
    }

    score
}

/// Relevance of a listing for a buyer
///
/// score = city_weight * [city matches] + type_weight * [type matches] + jitter
///
/// With the default weights (5, 3) the result lies in `[0, 9)`.
pub fn calculate_relevance_score(
    property: &PropertyRecord,
    profile: &PreferenceProfile,
    weights: &ScoringWeights,
    jitter: &dyn Jitter,
) -> f64 {
    signal_score(property, profile, weights) + jitter.sample()
}
