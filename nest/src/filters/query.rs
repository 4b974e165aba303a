use serde::{Deserialize, Serialize};

use super::normalizers::{non_blank, parse_numeric_bound};
use crate::{
    errors::RepoError,
    property::{Category, Purpose},
};

/// Raw listing search parameters exactly as they arrive on the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub location: Option<String>,
    pub category: Option<String>,
    pub purpose: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub budget: Option<String>,
    pub keywords: Option<String>,
}

/// Typed listing search parameters, the input of [`super::compile_filters`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingFilters {
    pub location: Option<String>,
    pub category: Option<Category>,
    pub purpose: Option<Purpose>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub budget: Option<f64>,
    pub keywords: Option<String>,
}

impl SearchQuery {
    /// Parse the raw bag into typed filters.
    ///
    /// Blank values count as absent. Unknown categories or purposes and non-numeric
    /// prices are rejected with [`RepoError::InvalidRequest`].
    pub fn into_filters(self) -> Result<ListingFilters, RepoError> {
        let category = non_blank(self.category).map(|raw| raw.parse::<Category>()).transpose()?;
        let purpose = non_blank(self.purpose)
            .map(|raw| Purpose::from_query(&raw))
            .transpose()?;

        Ok(ListingFilters {
            location: non_blank(self.location),
            category,
            purpose,
            min_price: parse_numeric_bound("minPrice", self.min_price.as_deref())?,
            max_price: parse_numeric_bound("maxPrice", self.max_price.as_deref())?,
            budget: parse_numeric_bound("budget", self.budget.as_deref())?,
            keywords: non_blank(self.keywords),
        })
    }
}

impl ListingFilters {
    pub fn is_empty(&self) -> bool {
        *self == ListingFilters::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_yields_empty_filters() {
        let filters = SearchQuery::default().into_filters().unwrap();
        assert!(filters.is_empty());
    }

    #[test]
    fn blank_values_are_absent() {
        let query = SearchQuery {
            location: Some("".to_string()),
            category: Some("  ".to_string()),
            purpose: Some("".to_string()),
            min_price: Some("".to_string()),
            keywords: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(query.into_filters().unwrap().is_empty());
    }

    #[test]
    fn parses_every_field() {
        let query = SearchQuery {
            location: Some(" Roorkee ".to_string()),
            category: Some("Flat".to_string()),
            purpose: Some("buy".to_string()),
            min_price: Some("500".to_string()),
            max_price: Some("900.5".to_string()),
            budget: Some("1000".to_string()),
            keywords: Some("2bhk  furnished".to_string()),
        };
        let filters = query.into_filters().unwrap();
        assert_eq!(filters.location.as_deref(), Some("Roorkee"));
        assert_eq!(filters.category, Some(Category::Flat));
        assert_eq!(filters.purpose, Some(Purpose::Sale));
        assert_eq!(filters.min_price, Some(500.0));
        assert_eq!(filters.max_price, Some(900.5));
        assert_eq!(filters.budget, Some(1000.0));
        assert_eq!(filters.keywords.as_deref(), Some("2bhk  furnished"));
    }

    #[test]
    fn unknown_category_is_rejected() {
        let query = SearchQuery {
            category: Some("castle".to_string()),
            ..Default::default()
        };
        let err = query.into_filters().expect_err("unknown category");
        assert!(matches!(err, RepoError::InvalidRequest { message } if message.contains("category")));
    }

    #[test]
    fn unknown_purpose_is_rejected_instead_of_defaulting_to_rent() {
        let query = SearchQuery {
            purpose: Some("lease".to_string()),
            ..Default::default()
        };
        let err = query.into_filters().expect_err("unknown purpose");
        assert!(matches!(err, RepoError::InvalidRequest { message } if message.contains("purpose")));
    }

    #[test]
    fn malformed_price_is_rejected() {
        let query = SearchQuery {
            max_price: Some("lots".to_string()),
            ..Default::default()
        };
        let err = query.into_filters().expect_err("bad max price");
        assert!(matches!(err, RepoError::InvalidRequest { message } if message.contains("maxPrice")));
    }

    #[test]
    fn deserializes_camel_case_keys() {
        let query: SearchQuery =
            serde_json::from_str(r#"{"minPrice":"10","maxPrice":"20","budget":"30"}"#).unwrap();
        assert_eq!(query.min_price.as_deref(), Some("10"));
        assert_eq!(query.max_price.as_deref(), Some("20"));
        assert_eq!(query.budget.as_deref(), Some("30"));
    }
}
