use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::{BedroomCount, ConstraintError, FilterConstraints, SortMode};

/// Raw filter input as sent by the explore and dashboard views
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct FilterRequest {
    #[serde(rename = "minPrice", default)]
    pub min_price: Option<u64>,
    #[serde(rename = "maxPrice", default)]
    pub max_price: Option<u64>,
    #[serde(rename = "propertyTypes", default)]
    pub property_types: Vec<String>,
    #[serde(default)]
    pub bedrooms: Option<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[validate(length(max = 200))]
    #[serde(default)]
    pub query: Option<String>,
}

impl TryFrom<FilterRequest> for FilterConstraints {
    type Error = ConstraintError;

    fn try_from(req: FilterRequest) -> Result<Self, Self::Error> {
        if let (Some(min), Some(max)) = (req.min_price, req.max_price) {
            if min > max {
                return Err(ConstraintError::InvertedPriceRange { min, max });
            }
        }

        let bedrooms = match req.bedrooms.as_deref() {
            Some(raw) => BedroomCount::parse(raw)?,
            None => None,
        };

        let query = req
            .query
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty());

        Ok(FilterConstraints {
            min_price: req.min_price,
            max_price: req.max_price,
            property_types: non_blank(req.property_types),
            bedrooms,
            amenities: non_blank(req.amenities),
            query,
        })
    }
}

fn non_blank(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

/// Request to filter and sort the current listing snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SearchListingsRequest {
    #[validate(nested)]
    #[serde(default)]
    pub filters: FilterRequest,
    #[serde(default)]
    pub sort: SortMode,
    /// Buyer whose profile scores the recommended sort mode
    #[serde(alias = "buyer_id", rename = "buyerId", default)]
    pub buyer_id: Option<String>,
}

/// Request for a buyer's top recommendations
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecommendRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "buyer_id", rename = "buyerId")]
    pub buyer_id: String,
    #[validate(nested)]
    #[serde(default)]
    pub filters: FilterRequest,
}

/// Explicit settings save for a buyer's preference profile
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdatePreferencesRequest {
    #[validate(length(max = 100))]
    #[serde(rename = "preferredCity", default)]
    pub preferred_city: Option<String>,
    #[validate(length(max = 100))]
    #[serde(rename = "preferredPropertyType", default)]
    pub preferred_property_type: Option<String>,
    #[serde(default)]
    pub budget: Option<u64>,
    #[serde(rename = "bedroomPreference", default)]
    pub bedroom_preference: Option<String>,
}

impl UpdatePreferencesRequest {
    /// Reject bedroom preferences that the filter could not interpret
    pub fn check_bedrooms(&self) -> Result<(), ConstraintError> {
        if let Some(raw) = &self.bedroom_preference {
            BedroomCount::parse(raw)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_request_is_unconstrained() {
        let constraints = FilterConstraints::try_from(FilterRequest::default()).unwrap();
        assert_eq!(constraints, FilterConstraints::default());
    }

    #[test]
    fn test_blank_values_dropped() {
        let req = FilterRequest {
            property_types: vec!["  ".to_string(), "House".to_string()],
            amenities: vec!["".to_string()],
            query: Some("   ".to_string()),
            bedrooms: Some("".to_string()),
            ..Default::default()
        };

        let constraints = FilterConstraints::try_from(req).unwrap();

        assert_eq!(constraints.property_types, vec!["House"]);
        assert!(constraints.amenities.is_empty());
        assert!(constraints.query.is_none());
        assert!(constraints.bedrooms.is_none());
    }

    #[test]
    fn test_inverted_price_range_rejected() {
        let req = FilterRequest {
            min_price: Some(5_000_000),
            max_price: Some(1_000_000),
            ..Default::default()
        };

        assert_eq!(
            FilterConstraints::try_from(req),
            Err(ConstraintError::InvertedPriceRange { min: 5_000_000, max: 1_000_000 })
        );
    }

    #[test]
    fn test_bad_bedrooms_rejected() {
        let req = FilterRequest {
            bedrooms: Some("lots".to_string()),
            ..Default::default()
        };
        assert!(FilterConstraints::try_from(req).is_err());

        let update = UpdatePreferencesRequest {
            bedroom_preference: Some("4+".to_string()),
            ..Default::default()
        };
        assert!(update.check_bedrooms().is_ok());
    }

    #[test]
    fn test_search_request_defaults() {
        let req: SearchListingsRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.sort, SortMode::Recommended);
        assert!(req.buyer_id.is_none());
        assert!(req.validate().is_ok());
    }
}
