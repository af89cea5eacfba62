use crate::models::{BedroomCount, FilterConstraints, PropertyRecord};

/// Case-insensitive substring test. `needle` must already be lowercase.
#[inline]
pub fn fuzzy_contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Check a listing against an optional price range (unset bounds are open)
#[inline]
pub fn matches_price(property: &PropertyRecord, min_price: Option<u64>, max_price: Option<u64>) -> bool {
    if let Some(min) = min_price {
        if property.price < min {
            return false;
        }
    }

    if let Some(max) = max_price {
        if property.price > max {
            return false;
        }
    }

    true
}

/// Check a listing against the requested bedroom count
#[inline]
pub fn matches_bedrooms(property: &PropertyRecord, bedrooms: Option<BedroomCount>) -> bool {
    bedrooms.map_or(true, |count| count.matches(property.bedrooms))
}

/// Split requested property types into lowercase alternatives.
///
/// "Flat / Apartment" yields `["flat", "apartment"]`.
pub fn property_type_terms(requested: &[String]) -> Vec<String> {
    requested
        .iter()
        .flat_map(|t| t.split('/'))
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// A listing passes if any term occurs in its title or property type.
/// An empty term list accepts every listing.
#[inline]
pub fn matches_property_types(property: &PropertyRecord, terms: &[String]) -> bool {
    if terms.is_empty() {
        return true;
    }

    let title = property.title.to_lowercase();
    let kind = property.property_type.to_lowercase();

    terms
        .iter()
        .any(|term| title.contains(term.as_str()) || kind.contains(term.as_str()))
}

/// Every requested amenity must occur in at least one of the listing's amenities.
#[inline]
pub fn matches_amenities(property: &PropertyRecord, requested: &[String]) -> bool {
    if requested.is_empty() {
        return true;
    }

    let available: Vec<String> = property
        .amenities
        .iter()
        .map(|a| a.to_lowercase())
        .collect();

    requested
        .iter()
        .all(|wanted| available.iter().any(|a| a.contains(wanted.as_str())))
}

/// Free-text match against the title or the "city, state" location
#[inline]
pub fn matches_query(property: &PropertyRecord, query: Option<&str>) -> bool {
    match query {
        None => true,
        Some(q) if q.is_empty() => true,
        Some(q) => fuzzy_contains(&property.title, q) || fuzzy_contains(&property.location(), q),
    }
}

/// Constraints with their text needles lowercased once per recomputation
#[derive(Debug, Clone, Default)]
pub struct ListingFilter {
    min_price: Option<u64>,
    max_price: Option<u64>,
    type_terms: Vec<String>,
    bedrooms: Option<BedroomCount>,
    amenities: Vec<String>,
    query: Option<String>,
}

impl ListingFilter {
    pub fn new(constraints: &FilterConstraints) -> Self {
        let amenities = constraints
            .amenities
            .iter()
            .map(|a| a.trim().to_lowercase())
            .filter(|a| !a.is_empty())
            .collect();

        let query = constraints
            .query
            .as_deref()
            .map(|q| q.trim().to_lowercase())
            .filter(|q| !q.is_empty());

        Self {
            min_price: constraints.min_price,
            max_price: constraints.max_price,
            type_terms: property_type_terms(&constraints.property_types),
            bedrooms: constraints.bedrooms,
            amenities,
            query,
        }
    }

    /// True when every constraint is unset
    pub fn is_unconstrained(&self) -> bool {
        self.min_price.is_none()
            && self.max_price.is_none()
            && self.type_terms.is_empty()
            && self.bedrooms.is_none()
            && self.amenities.is_empty()
            && self.query.is_none()
    }

    /// Logical AND of every predicate
    #[inline]
    pub fn matches(&self, property: &PropertyRecord) -> bool {
        matches_price(property, self.min_price, self.max_price)
            && matches_bedrooms(property, self.bedrooms)
            && matches_property_types(property, &self.type_terms)
            && matches_amenities(property, &self.amenities)
            && matches_query(property, self.query.as_deref())
    }
}

/// Reduce a collection to the listings satisfying all constraints, keeping input order
pub fn filter_listings<'a>(
    listings: &'a [PropertyRecord],
    constraints: &FilterConstraints,
) -> Vec<&'a PropertyRecord> {
    let filter = ListingFilter::new(constraints);
    listings.iter().filter(|p| filter.matches(p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ListingKind;
    use chrono::Utc;

    fn create_test_property(title: &str, property_type: &str, price: u64, bedrooms: u32) -> PropertyRecord {
        PropertyRecord {
            id: title.to_string(),
            title: title.to_string(),
            price,
            currency: "NGN".to_string(),
            listing_kind: ListingKind::Sale,
            city: "Lagos".to_string(),
            state: "Lagos".to_string(),
            property_type: property_type.to_string(),
            bedrooms,
            bathrooms: 1,
            size_sqm: None,
            amenities: vec!["Swimming Pool".to_string(), "24/7 Power".to_string()],
            images: vec![],
            created_at: Utc::now(),
            status: Default::default(),
            landlord_id: None,
            match_score: None,
        }
    }

    #[test]
    fn test_price_bounds_inclusive() {
        let property = create_test_property("Terrace", "House", 1_000_000, 3);

        assert!(matches_price(&property, Some(1_000_000), Some(1_000_000)));
        assert!(matches_price(&property, None, None));
        assert!(!matches_price(&property, Some(1_000_001), None));
        assert!(!matches_price(&property, None, Some(999_999)));
    }

    #[test]
    fn test_property_type_matches_title_or_type() {
        let flat = create_test_property("Serviced flat in Yaba", "Apartment", 1, 2);
        let house = create_test_property("Detached duplex", "House", 1, 4);
        let terms = property_type_terms(&["Flat / Apartment".to_string()]);

        assert_eq!(terms, vec!["flat", "apartment"]);
        assert!(matches_property_types(&flat, &terms));
        assert!(!matches_property_types(&house, &terms));
        assert!(matches_property_types(&house, &[]));
    }

    #[test]
    fn test_amenities_require_every_request() {
        let property = create_test_property("Terrace", "House", 1, 3);

        assert!(matches_amenities(&property, &["pool".to_string()]));
        assert!(matches_amenities(&property, &["pool".to_string(), "power".to_string()]));
        assert!(!matches_amenities(&property, &["pool".to_string(), "gym".to_string()]));
    }

    #[test]
    fn test_missing_amenities_reject_any_request() {
        let mut property = create_test_property("Terrace", "House", 1, 3);
        property.amenities.clear();

        assert!(matches_amenities(&property, &[]));
        assert!(!matches_amenities(&property, &["pool".to_string()]));
    }

    #[test]
    fn test_query_matches_location() {
        let property = create_test_property("Lekki Phase 1 terrace", "House", 1, 3);

        assert!(matches_query(&property, Some("lekki")));
        assert!(matches_query(&property, Some("lagos, lagos")));
        assert!(!matches_query(&property, Some("abuja")));
        assert!(matches_query(&property, None));
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let property = create_test_property("Lekki Phase 1 terrace", "House", 1, 3);
        let constraints = FilterConstraints {
            amenities: vec!["SWIMMING".to_string()],
            query: Some("LEKKI".to_string()),
            property_types: vec!["house".to_string()],
            ..Default::default()
        };

        assert!(ListingFilter::new(&constraints).matches(&property));
    }

    #[test]
    fn test_unconstrained_filter() {
        let filter = ListingFilter::new(&FilterConstraints::default());
        assert!(filter.is_unconstrained());
        assert!(filter.matches(&create_test_property("Anything", "Land", 0, 0)));
    }
}
