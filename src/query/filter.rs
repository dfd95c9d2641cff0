use crate::models::Property;

use super::Criteria;

/// Conjunction of the active predicates in a [`Criteria`].
///
/// Text needles are lowercased once up front instead of per record.
pub(crate) struct Filter<'a> {
    criteria: &'a Criteria,
    search: Option<String>,
    city: Option<String>,
}

impl<'a> Filter<'a> {
    pub(crate) fn new(criteria: &'a Criteria) -> Self {
        Self {
            criteria,
            search: criteria.search.as_deref().map(str::to_lowercase),
            city: criteria.city.as_deref().map(str::to_lowercase),
        }
    }

    pub(crate) fn matches(&self, property: &Property) -> bool {
        let c = self.criteria;

        if let Some(listing_type) = c.listing_type {
            if property.listing_type() != listing_type {
                return false;
            }
        }
        if let Some(property_type) = c.property_type {
            if property.property_type != property_type {
                return false;
            }
        }
        if let Some(featured) = c.featured {
            if property.featured != featured {
                return false;
            }
        }
        if let Some(city) = &self.city {
            if property.location.city.trim().to_lowercase() != *city {
                return false;
            }
        }

        let price = property.authoritative_price();
        if c.price_min.is_some_and(|min| price < min) {
            return false;
        }
        if c.price_max.is_some_and(|max| price > max) {
            return false;
        }

        match &self.search {
            Some(needle) => matches_text(property, needle),
            None => true,
        }
    }
}

fn matches_text(property: &Property, needle: &str) -> bool {
    let contains = |haystack: &str| haystack.to_lowercase().contains(needle);

    contains(&property.title)
        || contains(&property.location.city)
        || property.location.address.as_deref().is_some_and(contains)
}
