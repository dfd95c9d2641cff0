use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::errors::{ValidationError, ValidationResult};
use crate::models::{ListingType, PropertyType};

/// Field a result set is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortKey {
    #[default]
    CreatedAt,
    RentPrice,
    SalePrice,
}

wire_enum!(SortKey, "sortBy", {
    CreatedAt => "createdAt",
    RentPrice => "rentPrice",
    SalePrice => "salePrice",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

wire_enum!(SortOrder, "sortOrder", {
    Asc => "asc",
    Desc => "desc",
});

impl SortOrder {
    /// Orient an ascending comparison.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

/// Validated filter, sort and pagination settings for one query.
///
/// Built directly with the setters, or parsed from caller input through
/// [`RawCriteria`] / [`Criteria::from_json`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Criteria {
    /// Case-insensitive substring over title, address and city
    pub search: Option<String>,
    pub listing_type: Option<ListingType>,
    pub property_type: Option<PropertyType>,
    /// Exact city match, case-insensitive
    pub city: Option<String>,
    pub featured: Option<bool>,
    /// Inclusive lower bound on the authoritative price
    pub price_min: Option<f64>,
    /// Inclusive upper bound on the authoritative price
    pub price_max: Option<f64>,
    pub sort_by: SortKey,
    pub sort_order: SortOrder,
    /// Page size; `None` falls back to the configured default
    pub limit: Option<usize>,
    pub offset: usize,
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = non_blank(Some(text.into()));
        self
    }

    pub fn listing_type(mut self, listing_type: ListingType) -> Self {
        self.listing_type = Some(listing_type);
        self
    }

    pub fn property_type(mut self, property_type: PropertyType) -> Self {
        self.property_type = Some(property_type);
        self
    }

    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = non_blank(Some(city.into()));
        self
    }

    pub fn featured(mut self, featured: bool) -> Self {
        self.featured = Some(featured);
        self
    }

    pub fn price_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.price_min = min;
        self.price_max = max;
        self
    }

    pub fn sort(mut self, sort_by: SortKey, sort_order: SortOrder) -> Self {
        self.sort_by = sort_by;
        self.sort_order = sort_order;
        self
    }

    pub fn page(mut self, offset: usize, limit: usize) -> Self {
        self.offset = offset;
        self.limit = Some(limit);
        self
    }

    /// Parse criteria from a JSON object using the camelCase option keys.
    pub fn from_json(json: &str) -> ValidationResult<Self> {
        let raw: RawCriteria =
            serde_json::from_str(json).map_err(|e| ValidationError::Malformed(e.to_string()))?;
        Criteria::try_from(raw)
    }
}

/// Criteria as they arrive from a caller: enum values still as text,
/// pagination still signed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawCriteria {
    pub search: Option<String>,
    pub listing_type: Option<String>,
    pub property_type: Option<String>,
    pub city: Option<String>,
    pub featured: Option<bool>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl TryFrom<RawCriteria> for Criteria {
    type Error = ValidationError;

    fn try_from(raw: RawCriteria) -> ValidationResult<Self> {
        Ok(Criteria {
            search: non_blank(raw.search),
            listing_type: raw
                .listing_type
                .as_deref()
                .map(str::parse::<ListingType>)
                .transpose()?,
            property_type: raw
                .property_type
                .as_deref()
                .map(str::parse::<PropertyType>)
                .transpose()?,
            city: non_blank(raw.city),
            featured: raw.featured,
            price_min: finite("priceMin", raw.price_min)?,
            price_max: finite("priceMax", raw.price_max)?,
            sort_by: raw
                .sort_by
                .as_deref()
                .map(str::parse::<SortKey>)
                .transpose()?
                .unwrap_or_default(),
            sort_order: raw
                .sort_order
                .as_deref()
                .map(str::parse::<SortOrder>)
                .transpose()?
                .unwrap_or_default(),
            limit: raw.limit.map(|v| non_negative("limit", v)).transpose()?,
            offset: raw
                .offset
                .map(|v| non_negative("offset", v))
                .transpose()?
                .unwrap_or(0),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn finite(field: &'static str, value: Option<f64>) -> ValidationResult<Option<f64>> {
    match value {
        Some(v) if !v.is_finite() => Err(ValidationError::InvalidNumber { field, value: v }),
        other => Ok(other),
    }
}

fn non_negative(field: &'static str, value: i64) -> ValidationResult<usize> {
    usize::try_from(value).map_err(|_| ValidationError::NegativePagination { field, value })
}
