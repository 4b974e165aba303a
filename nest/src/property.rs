//! Listing records and the value types that describe them.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    errors::{RepoError, ValidationError, ValidationIssue, ValidationResult},
    search::{
        Document,
        index::{FieldKind, IndexField, WHOLE_VALUE_SEPARATOR},
    },
    validators::{is_valid_image_ref, is_valid_uuid},
};

/// Indexed field names shared by the filter compiler, the evaluator and the Redis index.
pub mod fields {
    pub const LOCATION: &str = "location";
    pub const CATEGORY: &str = "category";
    pub const PURPOSE: &str = "purpose";
    pub const PRICE: &str = "price";
    pub const TITLE: &str = "title";
    pub const DESCRIPTION: &str = "description";
    pub const CREATED_AT: &str = "created_at_ts";
}

/// RediSearch schema for stored listings. Tags hold one exact value each, so a location
/// such as `Civil Lines, Roorkee` is matched whole and with its case.
pub static PROPERTY_INDEX_SCHEMA: &[IndexField] = &[
    tag("$.location", fields::LOCATION),
    tag("$.category", fields::CATEGORY),
    tag("$.purpose", fields::PURPOSE),
    IndexField {
        path: "$.price",
        name: fields::PRICE,
        kind: FieldKind::Numeric,
        sortable: true,
        separator: None,
        case_sensitive: false,
    },
    text("$.title", fields::TITLE),
    text("$.description", fields::DESCRIPTION),
    IndexField {
        path: "$.createdAtTs",
        name: fields::CREATED_AT,
        kind: FieldKind::Numeric,
        sortable: true,
        separator: None,
        case_sensitive: false,
    },
];

const fn tag(path: &'static str, name: &'static str) -> IndexField {
    IndexField {
        path,
        name,
        kind: FieldKind::Tag,
        sortable: false,
        separator: Some(WHOLE_VALUE_SEPARATOR),
        case_sensitive: true,
    }
}

const fn text(path: &'static str, name: &'static str) -> IndexField {
    IndexField {
        path,
        name,
        kind: FieldKind::Text,
        sortable: false,
        separator: None,
        case_sensitive: false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Flat,
    House,
    Plot,
    Pg,
    Farmhouse,
    Villa,
    Office,
    Shop,
    Other,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Flat,
        Category::House,
        Category::Plot,
        Category::Pg,
        Category::Farmhouse,
        Category::Villa,
        Category::Office,
        Category::Shop,
        Category::Other,
    ];

    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Category::Flat => "flat",
            Category::House => "house",
            Category::Plot => "plot",
            Category::Pg => "pg",
            Category::Farmhouse => "farmhouse",
            Category::Villa => "villa",
            Category::Office => "office",
            Category::Shop => "shop",
            Category::Other => "other",
        }
    }
}

impl FromStr for Category {
    type Err = RepoError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Category::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| RepoError::invalid(format!("Unsupported category: {}", trimmed)))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Listing intent as stored. Searchers say "buy", listings say "sale".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Purpose {
    #[serde(alias = "buy")]
    Sale,
    Rent,
}

impl Purpose {
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Purpose::Sale => "sale",
            Purpose::Rent => "rent",
        }
    }

    /// Parse the user-facing value (`buy` or `rent`). `sale` is accepted as an alias of `buy`.
    pub fn from_query(value: &str) -> Result<Self, RepoError> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("buy") || trimmed.eq_ignore_ascii_case("sale") {
            Ok(Purpose::Sale)
        } else if trimmed.eq_ignore_ascii_case("rent") {
            Ok(Purpose::Rent)
        } else {
            Err(RepoError::invalid(format!("Unsupported purpose: {}", trimmed)))
        }
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_active() -> bool {
    true
}

/// A real-estate listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    pub purpose: Purpose,
    pub price: f64,
    pub location: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(rename = "dealer_id")]
    pub dealer_id: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Document for Property {
    fn tag_value(&self, field: &str) -> Option<&str> {
        match field {
            fields::LOCATION => Some(&self.location),
            fields::CATEGORY => Some(self.category.as_str()),
            fields::PURPOSE => Some(self.purpose.as_str()),
            _ => None,
        }
    }

    fn numeric_value(&self, field: &str) -> Option<f64> {
        match field {
            fields::PRICE => Some(self.price),
            fields::CREATED_AT => Some(self.created_at.timestamp_millis() as f64),
            _ => None,
        }
    }

    fn text_value(&self, field: &str) -> Option<&str> {
        match field {
            fields::TITLE => Some(&self.title),
            fields::DESCRIPTION => Some(&self.description),
            _ => None,
        }
    }
}

/// Payload for a new listing. Category and purpose are already typed by deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProperty {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: Category,
    pub purpose: Purpose,
    pub location: String,
    pub price: f64,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(rename = "dealer_id")]
    pub dealer_id: String,
}

impl NewProperty {
    pub fn validate(&self) -> ValidationResult<()> {
        let mut issues = Vec::new();

        if self.title.trim().is_empty() {
            issues.push(ValidationIssue::new("title", "required", "title is required"));
        }
        if self.location.trim().is_empty() {
            issues.push(ValidationIssue::new("location", "required", "location is required"));
        } else if self.location.chars().any(char::is_control) {
            issues.push(ValidationIssue::new(
                "location",
                "control_char",
                "location must not contain control characters",
            ));
        }
        if let Some(issue) = price_issue(self.price) {
            issues.push(issue);
        }
        if !is_valid_uuid(&self.dealer_id) {
            issues.push(ValidationIssue::new("dealer_id", "uuid", "dealer_id must be a UUID"));
        }
        for (idx, image) in self.images.iter().enumerate() {
            if !is_valid_image_ref(image) {
                issues.push(ValidationIssue::new(
                    format!("images[{}]", idx),
                    "image_ref",
                    "image must be an absolute URL or an upload path",
                ));
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(issues))
        }
    }

    /// Validate and turn the payload into a stored record.
    pub fn into_property(self, id: String, created_at: DateTime<Utc>) -> ValidationResult<Property> {
        self.validate()?;
        Ok(Property {
            id,
            title: self.title.trim().to_string(),
            description: self.description.unwrap_or_default(),
            category: self.category,
            purpose: self.purpose,
            price: self.price,
            location: self.location.trim().to_string(),
            images: self.images,
            dealer_id: self.dealer_id,
            is_active: true,
            created_at,
        })
    }
}

/// Partial update. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyPatch {
    #[serde(default)]
    pub purpose: Option<Purpose>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl PropertyPatch {
    pub fn is_empty(&self) -> bool {
        self.purpose.is_none() && self.price.is_none() && self.is_active.is_none()
    }

    pub fn apply(&self, property: &mut Property) -> ValidationResult<()> {
        if let Some(price) = self.price
            && let Some(issue) = price_issue(price)
        {
            return Err(ValidationError::new([issue]));
        }

        if let Some(purpose) = self.purpose {
            property.purpose = purpose;
        }
        if let Some(price) = self.price {
            property.price = price;
        }
        if let Some(active) = self.is_active {
            property.is_active = active;
        }
        Ok(())
    }
}

fn price_issue(price: f64) -> Option<ValidationIssue> {
    if !price.is_finite() || price <= 0.0 {
        Some(ValidationIssue::new("price", "range", "price must be a positive number"))
    } else {
        None
    }
}
