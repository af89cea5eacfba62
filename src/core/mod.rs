// Core algorithm exports
pub mod facets;
pub mod filters;
pub mod matcher;
pub mod scoring;
pub mod sorting;

pub use facets::summarize_facets;
pub use filters::{filter_listings, ListingFilter};
pub use matcher::{Matcher, ProjectionResult, DEFAULT_RECOMMENDED_LIMIT};
pub use scoring::{calculate_relevance_score, FixedJitter, Jitter, RandomJitter};
pub use sorting::sort_listings;
