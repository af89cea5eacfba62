use crate::models::{ScoredProperty, SortMode};
use std::cmp::Ordering;

/// Descending by score; unscored listings compare as zero
#[inline]
fn by_score_desc(a: &ScoredProperty, b: &ScoredProperty) -> Ordering {
    let a_score = a.score.unwrap_or(0.0);
    let b_score = b.score.unwrap_or(0.0);
    b_score.partial_cmp(&a_score).unwrap_or(Ordering::Equal)
}

/// Order listings in place. The sort is stable, so ties keep their input order.
pub fn sort_listings(listings: &mut [ScoredProperty], mode: SortMode) {
    match mode {
        SortMode::Recommended => listings.sort_by(by_score_desc),
        SortMode::PriceAsc => listings.sort_by(|a, b| a.property.price.cmp(&b.property.price)),
        SortMode::PriceDesc => listings.sort_by(|a, b| b.property.price.cmp(&a.property.price)),
        SortMode::Newest => {
            listings.sort_by(|a, b| b.property.created_at.cmp(&a.property.created_at))
        }
    }
}
