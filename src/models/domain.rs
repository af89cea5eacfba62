use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Whether a listing is offered for sale or for rent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingKind {
    Sale,
    Rent,
}

/// Publication status of a listing. Only `Available` listings reach a snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    #[default]
    Available,
    Pending,
    Sold,
    Rented,
}

/// Property listing as stored in the listing collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub id: String,
    pub title: String,
    /// Whole Naira
    pub price: u64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(rename = "listingKind")]
    pub listing_kind: ListingKind,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(rename = "propertyType", default)]
    pub property_type: String,
    #[serde(default)]
    pub bedrooms: u32,
    #[serde(default)]
    pub bathrooms: u32,
    #[serde(rename = "sizeSqm", default)]
    pub size_sqm: Option<f64>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub status: ListingStatus,
    #[serde(rename = "landlordId", default, skip_serializing_if = "Option::is_none")]
    pub landlord_id: Option<String>,
    /// Legacy precomputed relevance. Ranking always scores on the fly.
    #[serde(rename = "matchScore", default, skip_serializing_if = "Option::is_none")]
    pub match_score: Option<f64>,
}

impl PropertyRecord {
    /// Composed "city, state" string used by free-text search
    pub fn location(&self) -> String {
        format!("{}, {}", self.city, self.state)
    }

    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

fn default_currency() -> String {
    "NGN".to_string()
}

/// A buyer's stored preferences, used to score the recommended view
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreferenceProfile {
    #[serde(rename = "buyerId", default)]
    pub buyer_id: String,
    #[serde(rename = "preferredCity", default)]
    pub preferred_city: String,
    #[serde(rename = "preferredPropertyType", default)]
    pub preferred_property_type: String,
    #[serde(default)]
    pub budget: Option<u64>,
    #[serde(rename = "bedroomPreference", default)]
    pub bedroom_preference: Option<String>,
}

/// Errors raised while turning raw filter input into constraints
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstraintError {
    #[error("Invalid bedroom count: {0:?} (expected Studio, N or N+)")]
    InvalidBedrooms(String),

    #[error("Minimum price {min} exceeds maximum price {max}")]
    InvertedPriceRange { min: u64, max: u64 },
}

/// Bedroom constraint: an exact count or an "N+" lower bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BedroomCount {
    Exact(u32),
    AtLeast(u32),
}

impl BedroomCount {
    /// Parse user input, treating blank input as unset.
    ///
    /// "Studio" is an exact count of zero.
    pub fn parse(input: &str) -> Result<Option<Self>, ConstraintError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        trimmed.parse().map(Some)
    }

    #[inline]
    pub fn matches(&self, bedrooms: u32) -> bool {
        match *self {
            BedroomCount::Exact(n) => bedrooms == n,
            BedroomCount::AtLeast(n) => bedrooms >= n,
        }
    }
}

impl FromStr for BedroomCount {
    type Err = ConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("studio") {
            return Ok(BedroomCount::Exact(0));
        }

        let invalid = || ConstraintError::InvalidBedrooms(s.to_string());
        match trimmed.strip_suffix('+') {
            Some(lower) => lower
                .trim()
                .parse()
                .map(BedroomCount::AtLeast)
                .map_err(|_| invalid()),
            None => trimmed.parse().map(BedroomCount::Exact).map_err(|_| invalid()),
        }
    }
}

impl fmt::Display for BedroomCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BedroomCount::Exact(0) => write!(f, "Studio"),
            BedroomCount::Exact(n) => write!(f, "{}", n),
            BedroomCount::AtLeast(n) => write!(f, "{}+", n),
        }
    }
}

impl Serialize for BedroomCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BedroomCount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Buyer-specified constraints. Unset fields never reject a listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterConstraints {
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    pub property_types: Vec<String>,
    pub bedrooms: Option<BedroomCount>,
    pub amenities: Vec<String>,
    pub query: Option<String>,
}

/// Ordering applied to a filtered collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortMode {
    /// Relevance score, descending
    #[default]
    Recommended,
    PriceAsc,
    PriceDesc,
    /// `createdAt`, descending
    Newest,
}

/// Listing with its relevance score for the current buyer, if one was computed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredProperty {
    #[serde(flatten)]
    pub property: PropertyRecord,
    #[serde(rename = "relevance", skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl ScoredProperty {
    pub fn unscored(property: PropertyRecord) -> Self {
        Self { property, score: None }
    }
}

/// Scoring weights for the two preference signals
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub city: f64,
    pub property_type: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            city: 5.0,
            property_type: 3.0,
        }
    }
}

/// Distinct values present in a snapshot, for populating filter controls
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterFacets {
    #[serde(rename = "propertyTypes")]
    pub property_types: Vec<String>,
    pub amenities: Vec<String>,
    #[serde(rename = "minPrice")]
    pub min_price: Option<u64>,
    #[serde(rename = "maxPrice")]
    pub max_price: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bedroom_parse() {
        assert_eq!(BedroomCount::parse("Studio").unwrap(), Some(BedroomCount::Exact(0)));
        assert_eq!(BedroomCount::parse("3").unwrap(), Some(BedroomCount::Exact(3)));
        assert_eq!(BedroomCount::parse(" 5+ ").unwrap(), Some(BedroomCount::AtLeast(5)));
        assert_eq!(BedroomCount::parse("").unwrap(), None);
        assert!(BedroomCount::parse("many").is_err());
        assert!(BedroomCount::parse("+").is_err());
    }

    #[test]
    fn test_bedroom_matches() {
        assert!(BedroomCount::AtLeast(4).matches(4));
        assert!(BedroomCount::AtLeast(4).matches(7));
        assert!(!BedroomCount::AtLeast(4).matches(3));
        assert!(BedroomCount::Exact(2).matches(2));
        assert!(!BedroomCount::Exact(2).matches(3));
    }

    #[test]
    fn test_bedroom_display() {
        assert_eq!(BedroomCount::Exact(0).to_string(), "Studio");
        assert_eq!(BedroomCount::AtLeast(5).to_string(), "5+");
    }

    #[test]
    fn test_record_defaults_for_missing_fields() {
        let json = serde_json::json!({
            "id": "p1",
            "title": "Duplex in Lekki",
            "price": 2500000,
            "listingKind": "sale",
            "createdAt": "2024-05-01T10:00:00Z"
        });

        let record: PropertyRecord = serde_json::from_value(json).unwrap();

        assert_eq!(record.currency, "NGN");
        assert!(record.amenities.is_empty());
        assert!(record.size_sqm.is_none());
        assert_eq!(record.status, ListingStatus::Available);
        assert_eq!(record.cover_image(), None);
    }

    #[test]
    fn test_sort_mode_wire_names() {
        let mode: SortMode = serde_json::from_str("\"priceDesc\"").unwrap();
        assert_eq!(mode, SortMode::PriceDesc);
        assert_eq!(SortMode::default(), SortMode::Recommended);
    }
}
