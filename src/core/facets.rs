use crate::models::{FilterFacets, PropertyRecord};
use std::collections::{BTreeMap, BTreeSet};

/// Summarise the distinct filter values present in a snapshot.
///
/// Amenities are deduplicated case-insensitively; the first spelling seen wins.
pub fn summarize_facets(listings: &[PropertyRecord]) -> FilterFacets {
    let mut property_types = BTreeSet::new();
    let mut amenities: BTreeMap<String, String> = BTreeMap::new();

    for property in listings {
        let kind = property.property_type.trim();
        if !kind.is_empty() {
            property_types.insert(kind.to_string());
        }

        for amenity in &property.amenities {
            let trimmed = amenity.trim();
            if trimmed.is_empty() {
                continue;
            }
            amenities
                .entry(trimmed.to_lowercase())
                .or_insert_with(|| trimmed.to_string());
        }
    }

    FilterFacets {
        property_types: property_types.into_iter().collect(),
        amenities: amenities.into_values().collect(),
        min_price: listings.iter().map(|p| p.price).min(),
        max_price: listings.iter().map(|p| p.price).max(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ListingKind;
    use chrono::Utc;

    fn create_listing(property_type: &str, price: u64, amenities: &[&str]) -> PropertyRecord {
        PropertyRecord {
            id: format!("{}-{}", property_type, price),
            title: "Listing".to_string(),
            price,
            currency: "NGN".to_string(),
            listing_kind: ListingKind::Rent,
            city: "Port Harcourt".to_string(),
            state: "Rivers".to_string(),
            property_type: property_type.to_string(),
            bedrooms: 1,
            bathrooms: 1,
            size_sqm: None,
            amenities: amenities.iter().map(|a| a.to_string()).collect(),
            images: vec![],
            created_at: Utc::now(),
            status: Default::default(),
            landlord_id: None,
            match_score: None,
        }
    }

    #[test]
    fn test_facets() {
        let listings = vec![
            create_listing("House", 4_500_000, &["Parking", "Gym"]),
            create_listing("Apartment", 800_000, &["parking"]),
            create_listing("House", 35_000_000, &[]),
        ];

        let facets = summarize_facets(&listings);

        assert_eq!(facets.property_types, vec!["Apartment", "House"]);
        assert_eq!(facets.amenities, vec!["Gym", "Parking"]);
        assert_eq!(facets.min_price, Some(800_000));
        assert_eq!(facets.max_price, Some(35_000_000));
    }

    #[test]
    fn test_empty_snapshot() {
        assert_eq!(summarize_facets(&[]), FilterFacets::default());
    }
}
