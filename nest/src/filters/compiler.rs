use super::{normalizers::tokenize_keywords, price::PriceBand, query::ListingFilters};
use crate::{property::fields, search::FilterCondition};

/// Compile typed listing filters into a predicate.
///
/// Every field contributes at most one clause and the clauses are ANDed, so the result
/// is always [`FilterCondition::And`]. With no filters it is the empty conjunction, which
/// matches every listing. Keyword tokens are ORed: a listing matches when any token
/// appears in its title or its description.
pub fn compile_filters(filters: &ListingFilters) -> FilterCondition {
    let mut clauses = Vec::new();

    if let Some(location) = filters.location.as_deref().filter(|l| !l.is_empty()) {
        clauses.push(FilterCondition::tag_eq(fields::LOCATION, location));
    }

    if let Some(category) = filters.category {
        clauses.push(FilterCondition::tag_eq(fields::CATEGORY, category.as_str()));
    }

    if let Some(purpose) = filters.purpose {
        clauses.push(FilterCondition::tag_eq(fields::PURPOSE, purpose.as_str()));
    }

    let band = PriceBand::new(filters.budget, filters.min_price, filters.max_price);
    if !band.is_unbounded() {
        let (lower, upper) = band.resolve();
        clauses.push(FilterCondition::numeric_range(fields::PRICE, lower, upper));
    }

    if let Some(keywords) = filters.keywords.as_deref()
        && let Some(group) = keyword_clause(keywords)
    {
        clauses.push(group);
    }

    FilterCondition::And(clauses)
}

fn keyword_clause(keywords: &str) -> Option<FilterCondition> {
    let tokens = tokenize_keywords(keywords);
    if tokens.is_empty() {
        return None;
    }

    Some(FilterCondition::or(tokens.into_iter().map(|token| {
        FilterCondition::or([
            FilterCondition::text_contains(fields::TITLE, token.clone()),
            FilterCondition::text_contains(fields::DESCRIPTION, token),
        ])
    })))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::property::{Category, Property, Purpose};

    fn property(location: &str, category: Category, price: f64, title: &str) -> Property {
        Property {
            id: format!("{}-{}", location, price),
            title: title.to_string(),
            description: String::new(),
            category,
            purpose: Purpose::Rent,
            price,
            location: location.to_string(),
            images: Vec::new(),
            dealer_id: "550e8400-e29b-41d4-a716-446655440000".to_string(),
            is_active: true,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
        }
    }

    fn priced(price: f64) -> Property {
        property("Roorkee", Category::Flat, price, "Flat")
    }

    #[test]
    fn no_filters_match_everything() {
        let predicate = compile_filters(&ListingFilters::default());
        assert_eq!(predicate, FilterCondition::And(Vec::new()));
        assert!(predicate.is_match_all());
        assert!(predicate.matches(&priced(1.0)));
        assert!(predicate.matches(&property("Shimla", Category::Villa, 9e7, "")));
    }

    #[test]
    fn budget_alone_builds_tenth_to_full_band() {
        let predicate = compile_filters(&ListingFilters {
            budget: Some(1000.0),
            ..Default::default()
        });
        assert_eq!(
            predicate,
            FilterCondition::And(vec![FilterCondition::numeric_range("price", Some(100.0), Some(1000.0))])
        );
        assert!(predicate.matches(&priced(100.0)));
        assert!(predicate.matches(&priced(1000.0)));
        assert!(!predicate.matches(&priced(99.0)));
        assert!(!predicate.matches(&priced(1001.0)));
    }

    #[test]
    fn min_price_overrides_budget_floor() {
        let predicate = compile_filters(&ListingFilters {
            budget: Some(1000.0),
            min_price: Some(500.0),
            ..Default::default()
        });
        assert!(predicate.matches(&priced(500.0)));
        assert!(predicate.matches(&priced(1000.0)));
        assert!(!predicate.matches(&priced(400.0)));
        assert!(!predicate.matches(&priced(1001.0)));
    }

    #[test]
    fn max_price_alone_leaves_lower_open() {
        let predicate = compile_filters(&ListingFilters {
            max_price: Some(800.0),
            ..Default::default()
        });
        assert_eq!(
            predicate,
            FilterCondition::And(vec![FilterCondition::numeric_range("price", None, Some(800.0))])
        );
        assert!(predicate.matches(&priced(1.0)));
        assert!(!predicate.matches(&priced(800.5)));
    }

    #[test]
    fn purpose_compares_against_stored_value() {
        let buy = compile_filters(&ListingFilters {
            purpose: Some(Purpose::Sale),
            ..Default::default()
        });
        assert_eq!(buy, FilterCondition::And(vec![FilterCondition::tag_eq("purpose", "sale")]));

        let rent = compile_filters(&ListingFilters {
            purpose: Some(Purpose::Rent),
            ..Default::default()
        });
        assert_eq!(rent, FilterCondition::And(vec![FilterCondition::tag_eq("purpose", "rent")]));
    }

    #[test]
    fn keywords_match_any_token_in_either_field() {
        let predicate = compile_filters(&ListingFilters {
            keywords: Some("2bhk  furnished".to_string()),
            ..Default::default()
        });

        let expected = FilterCondition::And(vec![FilterCondition::Or(vec![
            FilterCondition::or([
                FilterCondition::text_contains("title", "2bhk"),
                FilterCondition::text_contains("description", "2bhk"),
            ]),
            FilterCondition::or([
                FilterCondition::text_contains("title", "furnished"),
                FilterCondition::text_contains("description", "furnished"),
            ]),
        ])]);
        assert_eq!(predicate, expected);

        assert!(predicate.matches(&property("Roorkee", Category::Flat, 9000.0, "Furnished flat")));

        let mut described = property("Roorkee", Category::Flat, 9000.0, "Corner unit");
        described.description = "Spacious 2BHK with balcony".to_string();
        assert!(predicate.matches(&described));

        assert!(!predicate.matches(&property("Roorkee", Category::Flat, 9000.0, "Bare shell")));
    }

    #[test]
    fn whitespace_keywords_add_no_clause() {
        let predicate = compile_filters(&ListingFilters {
            keywords: Some("    ".to_string()),
            ..Default::default()
        });
        assert_eq!(predicate, FilterCondition::And(Vec::new()));
    }

    #[test]
    fn location_and_category_are_conjoined() {
        let predicate = compile_filters(&ListingFilters {
            location: Some("Roorkee".to_string()),
            category: Some(Category::Flat),
            ..Default::default()
        });
        let flat = property("Roorkee", Category::Flat, 9000.0, "A");
        let house = property("Roorkee", Category::House, 9000.0, "B");
        assert!(predicate.matches(&flat));
        assert!(!predicate.matches(&house));
    }

    #[test]
    fn clause_order_follows_field_order() {
        let predicate = compile_filters(&ListingFilters {
            location: Some("Haridwar".to_string()),
            category: Some(Category::Plot),
            purpose: Some(Purpose::Sale),
            budget: Some(5_000_000.0),
            keywords: Some("ganga".to_string()),
            ..Default::default()
        });
        assert_eq!(
            predicate.to_query_clause(),
            "@location:{Haridwar} @category:{plot} @purpose:{sale} @price:[500000 5000000] \
             (@title:*ganga* | @description:*ganga*)"
        );
    }

    #[test]
    fn compiling_twice_is_structurally_equal() {
        let filters = ListingFilters {
            location: Some("Mussoorie".to_string()),
            budget: Some(2500.0),
            keywords: Some("hill view".to_string()),
            ..Default::default()
        };
        assert_eq!(compile_filters(&filters), compile_filters(&filters));
    }
}
