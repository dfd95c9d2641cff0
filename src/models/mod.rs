use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{QueryConfig, DEFAULT_CURRENCY};
use crate::errors::InvariantError;

#[cfg(test)]
pub(crate) mod fixtures;

/// Whether a listing is offered for rent or for sale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingType {
    Rent,
    Sale,
}

wire_enum!(ListingType, "listingType", {
    Rent => "rent",
    Sale => "sale",
});

/// Kind of property being listed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Apartment,
    House,
    Condo,
    Villa,
    Townhouse,
    Studio,
    Land,
    Commercial,
}

wire_enum!(PropertyType, "propertyType", {
    Apartment => "apartment",
    House => "house",
    Condo => "condo",
    Villa => "villa",
    Townhouse => "townhouse",
    Studio => "studio",
    Land => "land",
    Commercial => "commercial",
});

/// Unit that `area_size` is measured in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaUnit {
    Sqft,
    Sqm,
    Acres,
    Hectares,
}

wire_enum!(AreaUnit, "areaUnit", {
    Sqft => "sqft",
    Sqm => "sqm",
    Acres => "acres",
    Hectares => "hectares",
});

/// Location information for a property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neighborhood: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl Location {
    /// Map position, only when both halves are known.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

/// Commercial terms of a listing.
///
/// The listing type is the tag, so a record always carries exactly the price
/// field that matches it. A plain `price` key is accepted for either variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "listingType", rename_all = "lowercase")]
pub enum Pricing {
    #[serde(rename_all = "camelCase")]
    Rent {
        #[serde(alias = "price")]
        rent_price: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        security_deposit: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        maintenance_fee: Option<f64>,
    },
    #[serde(rename_all = "camelCase")]
    Sale {
        #[serde(alias = "price")]
        sale_price: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        original_price: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        price_negotiable: Option<bool>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mortgage_available: Option<bool>,
    },
}

impl Pricing {
    pub fn listing_type(&self) -> ListingType {
        match self {
            Pricing::Rent { .. } => ListingType::Rent,
            Pricing::Sale { .. } => ListingType::Sale,
        }
    }

    /// The price that governs filtering and sorting.
    pub fn authoritative_price(&self) -> f64 {
        match self {
            Pricing::Rent { rent_price, .. } => *rent_price,
            Pricing::Sale { sale_price, .. } => *sale_price,
        }
    }
}

/// Core property data model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub property_type: PropertyType,
    #[serde(flatten)]
    pub pricing: Pricing,
    /// ISO code; unset on the wire means the configured default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(flatten)]
    pub location: Location,
    pub bedrooms: u32,
    pub bathrooms: f64,
    pub area_size: f64,
    pub area_unit: AreaUnit,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
}

impl Property {
    pub fn listing_type(&self) -> ListingType {
        self.pricing.listing_type()
    }

    pub fn authoritative_price(&self) -> f64 {
        self.pricing.authoritative_price()
    }

    /// Monthly rent, for rentals only
    pub fn rent_price(&self) -> Option<f64> {
        match self.pricing {
            Pricing::Rent { rent_price, .. } => Some(rent_price),
            Pricing::Sale { .. } => None,
        }
    }

    /// Asking price, for sales only
    pub fn sale_price(&self) -> Option<f64> {
        match self.pricing {
            Pricing::Sale { sale_price, .. } => Some(sale_price),
            Pricing::Rent { .. } => None,
        }
    }

    /// Currency code, falling back to the built-in default when unset.
    pub fn currency(&self) -> &str {
        self.currency.as_deref().unwrap_or(DEFAULT_CURRENCY)
    }

    /// Fill fields the source left unset from `config`.
    pub fn apply_defaults(&mut self, config: &QueryConfig) {
        if self.currency.is_none() {
            self.currency = Some(config.default_currency.clone());
        }
    }

    /// Whether the listing was created within `window` of `now`.
    ///
    /// Timestamps ahead of `now` count as new.
    pub fn is_new(&self, now: DateTime<Utc>, window: Duration) -> bool {
        now.signed_duration_since(self.created_at) <= window
    }

    /// Listings without an image are kept out of cards and map previews.
    pub fn is_displayable(&self) -> bool {
        !self.images.is_empty()
    }

    /// Check the numeric invariants of a materialized record.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let fail = |field: &'static str, reason: &str| {
            Err(InvariantError::Field {
                id: self.id.clone(),
                field,
                reason: reason.to_string(),
            })
        };

        if self.id.trim().is_empty() {
            return fail("id", "must not be empty");
        }
        if self.location.city.trim().is_empty() {
            return fail("city", "must not be empty");
        }

        let price = self.authoritative_price();
        if !price.is_finite() || price < 0.0 {
            return fail("price", "must be a non-negative number");
        }

        let optional_amounts = match &self.pricing {
            Pricing::Rent {
                security_deposit,
                maintenance_fee,
                ..
            } => vec![
                ("securityDeposit", *security_deposit),
                ("maintenanceFee", *maintenance_fee),
            ],
            Pricing::Sale { original_price, .. } => vec![("originalPrice", *original_price)],
        };
        for (field, amount) in optional_amounts {
            if let Some(amount) = amount {
                if !amount.is_finite() || amount < 0.0 {
                    return fail(field, "must be a non-negative number");
                }
            }
        }

        if !self.bathrooms.is_finite() || self.bathrooms < 0.0 {
            return fail("bathrooms", "must be a non-negative number");
        }
        if (self.bathrooms * 2.0).fract() != 0.0 {
            return fail("bathrooms", "must be a whole or half number");
        }
        if !self.area_size.is_finite() || self.area_size <= 0.0 {
            return fail("areaSize", "must be a positive number");
        }

        Ok(())
    }
}

/// Ensure no two records in a collection share an id.
pub fn check_unique_ids(records: &[Property]) -> Result<(), InvariantError> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        if !seen.insert(record.id.as_str()) {
            return Err(InvariantError::DuplicateId(record.id.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::fixtures::{at, rental, sale};
    use super::*;
    use crate::errors::ValidationError;
    use serde_json::json;

    #[test]
    fn test_deserializes_rental_from_camel_case_json() {
        let value = json!({
            "id": "r-1",
            "title": "Sunny flat near the lake",
            "propertyType": "apartment",
            "listingType": "rent",
            "rentPrice": 25000,
            "securityDeposit": 50000,
            "city": "Dhaka",
            "neighborhood": "Gulshan",
            "bedrooms": 2,
            "bathrooms": 1.5,
            "areaSize": 1100,
            "areaUnit": "sqft",
            "createdAt": "2024-05-01T10:00:00Z",
            "images": ["https://img.example/1.jpg"]
        });

        let property: Property = serde_json::from_value(value).unwrap();

        assert_eq!(property.listing_type(), ListingType::Rent);
        assert_eq!(property.rent_price(), Some(25000.0));
        assert_eq!(property.sale_price(), None);
        assert_eq!(property.currency, None);
        assert_eq!(property.currency(), DEFAULT_CURRENCY);
        assert_eq!(property.location.neighborhood.as_deref(), Some("Gulshan"));
        assert!(!property.featured);
        assert!(property.check_invariants().is_ok());
    }

    #[test]
    fn test_generic_price_key_is_the_authoritative_price() {
        let value = json!({
            "id": "s-1",
            "title": "Family house",
            "propertyType": "house",
            "listingType": "sale",
            "price": 9500000,
            "city": "Chattogram",
            "bedrooms": 4,
            "bathrooms": 3,
            "areaSize": 2400,
            "areaUnit": "sqft",
            "createdAt": "2024-05-01T10:00:00Z"
        });

        let property: Property = serde_json::from_value(value).unwrap();

        assert_eq!(property.sale_price(), Some(9_500_000.0));
        assert_eq!(property.authoritative_price(), 9_500_000.0);
    }

    #[test]
    fn test_missing_currency_takes_the_configured_default() {
        let config = QueryConfig::from_lookup(|key| {
            (key == crate::config::ENV_DEFAULT_CURRENCY).then(|| "USD".to_string())
        })
        .unwrap();
        let value = json!({
            "id": "s-2",
            "title": "Riverside plot",
            "propertyType": "land",
            "listingType": "sale",
            "salePrice": 1200000,
            "city": "Rajshahi",
            "bedrooms": 0,
            "bathrooms": 0,
            "areaSize": 0.25,
            "areaUnit": "acres",
            "createdAt": "2024-05-01T10:00:00Z"
        });

        let mut property: Property = serde_json::from_value(value).unwrap();
        property.apply_defaults(&config);
        assert_eq!(property.currency(), "USD");

        let mut priced_in_eur = property.clone();
        priced_in_eur.currency = Some("EUR".to_string());
        priced_in_eur.apply_defaults(&config);
        assert_eq!(priced_in_eur.currency(), "EUR");
    }

    #[test]
    fn test_unknown_listing_type_is_rejected() {
        let value = json!({
            "id": "x",
            "title": "Lease",
            "propertyType": "house",
            "listingType": "lease",
            "price": 10,
            "city": "Dhaka",
            "bedrooms": 1,
            "bathrooms": 1,
            "areaSize": 10,
            "areaUnit": "sqm",
            "createdAt": "2024-05-01T10:00:00Z"
        });

        assert!(serde_json::from_value::<Property>(value).is_err());
    }

    #[test]
    fn test_wire_names_parse_strictly() {
        assert_eq!("villa".parse::<PropertyType>().unwrap(), PropertyType::Villa);
        assert_eq!("hectares".parse::<AreaUnit>().unwrap(), AreaUnit::Hectares);
        assert_eq!(
            "Rent".parse::<ListingType>(),
            Err(ValidationError::UnknownValue {
                field: "listingType",
                value: "Rent".to_string(),
            })
        );
        for kind in PropertyType::ALL {
            assert_eq!(kind.as_str().parse::<PropertyType>().unwrap(), *kind);
        }
    }

    #[test]
    fn test_is_new_uses_the_window() {
        let now = at(2024, 6, 30);
        let window = Duration::days(30);

        assert!(rental("a", 100.0, at(2024, 6, 15)).is_new(now, window));
        assert!(rental("b", 100.0, at(2024, 5, 31)).is_new(now, window));
        assert!(!rental("c", 100.0, at(2024, 5, 1)).is_new(now, window));
        assert!(rental("d", 100.0, at(2024, 7, 2)).is_new(now, window));
    }

    #[test]
    fn test_coordinates_need_both_halves() {
        let mut property = sale("a", 100.0, at(2024, 1, 1));
        property.location.latitude = Some(23.78);
        assert_eq!(property.location.coordinates(), None);

        property.location.longitude = Some(90.41);
        assert_eq!(property.location.coordinates(), Some((23.78, 90.41)));
    }

    #[test]
    fn test_invariant_violations() {
        let mut property = rental("bad", 100.0, at(2024, 1, 1));
        property.area_size = 0.0;
        assert!(matches!(
            property.check_invariants(),
            Err(InvariantError::Field { field: "areaSize", .. })
        ));

        let mut property = rental("bad", 100.0, at(2024, 1, 1));
        property.bathrooms = 1.25;
        assert!(matches!(
            property.check_invariants(),
            Err(InvariantError::Field { field: "bathrooms", .. })
        ));

        let property = sale("bad", -1.0, at(2024, 1, 1));
        assert!(matches!(
            property.check_invariants(),
            Err(InvariantError::Field { field: "price", .. })
        ));
    }

    #[test]
    fn test_duplicate_ids_are_detected() {
        let records = vec![
            rental("a", 1.0, at(2024, 1, 1)),
            sale("b", 1.0, at(2024, 1, 1)),
            sale("a", 2.0, at(2024, 1, 2)),
        ];

        assert_eq!(
            check_unique_ids(&records),
            Err(InvariantError::DuplicateId("a".to_string()))
        );
        assert!(check_unique_ids(&records[..2]).is_ok());
    }
}
