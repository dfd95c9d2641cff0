//! Property submission form validation.
//!
//! The form arrives as loosely typed fields. Validation reports every
//! rejected field at once and, on success, yields a [`Property`] that
//! satisfies the record invariants.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::QueryConfig;
use crate::errors::{FieldError, SubmissionError};
use crate::models::{AreaUnit, ListingType, Location, Pricing, Property, PropertyType};

/// Raw fields of the "list a property" form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PropertySubmission {
    pub title: String,
    pub description: Option<String>,
    pub listing_type: Option<String>,
    pub property_type: Option<String>,

    pub city: String,
    pub neighborhood: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    pub price: Option<f64>,
    pub currency: Option<String>,
    // Rentals only
    pub security_deposit: Option<f64>,
    pub maintenance_fee: Option<f64>,
    // Sales only
    pub original_price: Option<f64>,
    pub price_negotiable: Option<bool>,
    pub mortgage_available: Option<bool>,

    pub bedrooms: Option<i64>,
    pub bathrooms: Option<f64>,
    pub area_size: Option<f64>,
    pub area_unit: Option<String>,

    pub featured: bool,
    pub images: Vec<String>,
    pub features: Vec<String>,
}

impl PropertySubmission {
    /// Validate the form and build the record it describes.
    ///
    /// `id` and `created_at` are assigned by the caller; the currency falls
    /// back to `config.default_currency`.
    pub fn validate(
        self,
        id: impl Into<String>,
        created_at: DateTime<Utc>,
        config: &QueryConfig,
    ) -> Result<Property, SubmissionError> {
        let mut errors = Vec::new();

        let title = required_text(&mut errors, "title", &self.title);
        let city = required_text(&mut errors, "city", &self.city);

        let listing_type: Option<ListingType> =
            parse_choice(&mut errors, "listingType", self.listing_type.as_deref());
        let property_type: Option<PropertyType> =
            parse_choice(&mut errors, "propertyType", self.property_type.as_deref());
        let area_unit: Option<AreaUnit> =
            parse_choice(&mut errors, "areaUnit", self.area_unit.as_deref());

        let price = match self.price {
            None => {
                errors.push(FieldError::new("price", "is required"));
                None
            }
            Some(p) => non_negative(&mut errors, "price", p),
        };
        for (field, amount) in [
            ("securityDeposit", self.security_deposit),
            ("maintenanceFee", self.maintenance_fee),
            ("originalPrice", self.original_price),
        ] {
            if let Some(amount) = amount {
                non_negative(&mut errors, field, amount);
            }
        }

        match listing_type {
            Some(ListingType::Rent) => {
                for (field, present) in [
                    ("originalPrice", self.original_price.is_some()),
                    ("priceNegotiable", self.price_negotiable.is_some()),
                    ("mortgageAvailable", self.mortgage_available.is_some()),
                ] {
                    if present {
                        errors.push(FieldError::new(field, "only applies to sale listings"));
                    }
                }
            }
            Some(ListingType::Sale) => {
                for (field, present) in [
                    ("securityDeposit", self.security_deposit.is_some()),
                    ("maintenanceFee", self.maintenance_fee.is_some()),
                ] {
                    if present {
                        errors.push(FieldError::new(field, "only applies to rental listings"));
                    }
                }
            }
            None => {}
        }

        let currency = match self.currency.as_deref().map(str::trim) {
            None | Some("") => Some(config.default_currency.clone()),
            Some(code) if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) => {
                Some(code.to_ascii_uppercase())
            }
            Some(_) => {
                errors.push(FieldError::new("currency", "must be a three-letter ISO code"));
                None
            }
        };

        let bedrooms = match self.bedrooms {
            None => {
                errors.push(FieldError::new("bedrooms", "is required"));
                None
            }
            Some(n) => match u32::try_from(n) {
                Ok(n) => Some(n),
                Err(_) => {
                    errors.push(FieldError::new("bedrooms", "must be a whole number of at least 0"));
                    None
                }
            },
        };

        let bathrooms = match self.bathrooms {
            None => {
                errors.push(FieldError::new("bathrooms", "is required"));
                None
            }
            Some(b) if b.is_finite() && b >= 0.0 && (b * 2.0).fract() == 0.0 => Some(b),
            Some(_) => {
                errors.push(FieldError::new(
                    "bathrooms",
                    "must be at least 0 in steps of 0.5",
                ));
                None
            }
        };

        let area_size = match self.area_size {
            None => {
                errors.push(FieldError::new("areaSize", "is required"));
                None
            }
            Some(a) if a.is_finite() && a > 0.0 => Some(a),
            Some(_) => {
                errors.push(FieldError::new("areaSize", "must be greater than 0"));
                None
            }
        };

        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => {
                if !(-90.0..=90.0).contains(&lat) {
                    errors.push(FieldError::new("latitude", "must be between -90 and 90"));
                }
                if !(-180.0..=180.0).contains(&lon) {
                    errors.push(FieldError::new("longitude", "must be between -180 and 180"));
                }
            }
            (Some(_), None) => {
                errors.push(FieldError::new("longitude", "is required when latitude is set"))
            }
            (None, Some(_)) => {
                errors.push(FieldError::new("latitude", "is required when longitude is set"))
            }
            (None, None) => {}
        }

        let images: Vec<String> = self
            .images
            .into_iter()
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .collect();
        if images.is_empty() {
            errors.push(FieldError::new("images", "at least one image is required"));
        }

        let (
            Some(title),
            Some(city),
            Some(listing_type),
            Some(property_type),
            Some(area_unit),
            Some(price),
            Some(currency),
            Some(bedrooms),
            Some(bathrooms),
            Some(area_size),
        ) = (
            title,
            city,
            listing_type,
            property_type,
            area_unit,
            price,
            currency,
            bedrooms,
            bathrooms,
            area_size,
        )
        else {
            return Err(reject(errors));
        };
        if !errors.is_empty() {
            return Err(reject(errors));
        }

        let pricing = match listing_type {
            ListingType::Rent => Pricing::Rent {
                rent_price: price,
                security_deposit: self.security_deposit,
                maintenance_fee: self.maintenance_fee,
            },
            ListingType::Sale => Pricing::Sale {
                sale_price: price,
                original_price: self.original_price,
                price_negotiable: self.price_negotiable,
                mortgage_available: self.mortgage_available,
            },
        };

        Ok(Property {
            id: id.into(),
            title,
            description: trimmed(self.description),
            property_type,
            pricing,
            currency: Some(currency),
            location: Location {
                city,
                neighborhood: trimmed(self.neighborhood),
                address: trimmed(self.address),
                latitude: self.latitude,
                longitude: self.longitude,
            },
            bedrooms,
            bathrooms,
            area_size,
            area_unit,
            created_at,
            featured: self.featured,
            images,
            features: self.features,
        })
    }
}

fn reject(errors: Vec<FieldError>) -> SubmissionError {
    debug!(fields = errors.len(), "submission rejected");
    SubmissionError { errors }
}

fn required_text(errors: &mut Vec<FieldError>, field: &'static str, value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        errors.push(FieldError::new(field, "is required"));
        None
    } else {
        Some(value.to_string())
    }
}

fn parse_choice<T>(errors: &mut Vec<FieldError>, field: &'static str, value: Option<&str>) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value.map(str::trim) {
        None | Some("") => {
            errors.push(FieldError::new(field, "is required"));
            None
        }
        Some(raw) => match raw.parse() {
            Ok(v) => Some(v),
            Err(e) => {
                errors.push(FieldError::new(field, e.to_string()));
                None
            }
        },
    }
}

fn non_negative(errors: &mut Vec<FieldError>, field: &'static str, value: f64) -> Option<f64> {
    if value.is_finite() && value >= 0.0 {
        Some(value)
    } else {
        errors.push(FieldError::new(field, "must be a number of at least 0"));
        None
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::at;

    fn rental_form() -> PropertySubmission {
        PropertySubmission {
            title: "  Two bed flat in Banani ".to_string(),
            listing_type: Some("rent".to_string()),
            property_type: Some("apartment".to_string()),
            city: "Dhaka".to_string(),
            neighborhood: Some("Banani".to_string()),
            price: Some(45000.0),
            security_deposit: Some(90000.0),
            bedrooms: Some(2),
            bathrooms: Some(2.5),
            area_size: Some(1250.0),
            area_unit: Some("sqft".to_string()),
            images: vec!["https://img.example/banani.jpg".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_rental_becomes_a_property() {
        let created = at(2024, 8, 1);
        let property = rental_form()
            .validate("prop-1", created, &QueryConfig::default())
            .unwrap();

        assert_eq!(property.id, "prop-1");
        assert_eq!(property.title, "Two bed flat in Banani");
        assert_eq!(property.listing_type(), ListingType::Rent);
        assert_eq!(property.rent_price(), Some(45000.0));
        assert_eq!(property.currency(), "BDT");
        assert_eq!(property.created_at, created);
        assert!(property.check_invariants().is_ok());
        assert!(property.is_displayable());
    }

    #[test]
    fn test_currency_is_normalized_or_defaulted() {
        let config = QueryConfig {
            default_currency: "USD".to_string(),
            ..QueryConfig::default()
        };

        let property = rental_form().validate("a", at(2024, 1, 1), &config).unwrap();
        assert_eq!(property.currency(), "USD");

        let form = PropertySubmission {
            currency: Some("eur".to_string()),
            ..rental_form()
        };
        let property = form.validate("a", at(2024, 1, 1), &config).unwrap();
        assert_eq!(property.currency(), "EUR");
    }

    #[test]
    fn test_every_bad_field_is_reported() {
        let form = PropertySubmission {
            title: " ".to_string(),
            listing_type: Some("lease".to_string()),
            price: Some(-5.0),
            bedrooms: Some(-1),
            bathrooms: Some(1.3),
            area_size: Some(0.0),
            latitude: Some(23.8),
            images: vec!["   ".to_string()],
            ..rental_form()
        };

        let err = form
            .validate("a", at(2024, 1, 1), &QueryConfig::default())
            .unwrap_err();

        for field in [
            "title",
            "listingType",
            "price",
            "bedrooms",
            "bathrooms",
            "areaSize",
            "longitude",
            "images",
        ] {
            assert!(err.has_field(field), "missing error for {field}: {err:?}");
        }
        assert!(!err.has_field("city"));
    }

    #[test]
    fn test_terms_must_match_listing_type() {
        let form = PropertySubmission {
            mortgage_available: Some(true),
            ..rental_form()
        };
        let err = form
            .validate("a", at(2024, 1, 1), &QueryConfig::default())
            .unwrap_err();
        assert_eq!(err.errors.len(), 1);
        assert!(err.has_field("mortgageAvailable"));

        let form = PropertySubmission {
            listing_type: Some("sale".to_string()),
            price_negotiable: Some(true),
            ..rental_form()
        };
        let err = form
            .validate("a", at(2024, 1, 1), &QueryConfig::default())
            .unwrap_err();
        assert!(err.has_field("securityDeposit"));
    }

    #[test]
    fn test_sale_submission_from_json() {
        let form: PropertySubmission = serde_json::from_str(
            r#"{
                "title": "Lake side villa",
                "listingType": "sale",
                "propertyType": "villa",
                "city": "Sylhet",
                "latitude": 24.89,
                "longitude": 91.87,
                "price": 25000000,
                "originalPrice": 27000000,
                "priceNegotiable": true,
                "bedrooms": 5,
                "bathrooms": 4,
                "areaSize": 0.5,
                "areaUnit": "acres",
                "featured": true,
                "images": ["https://img.example/villa.jpg"]
            }"#,
        )
        .unwrap();

        let property = form
            .validate("villa-1", at(2024, 2, 2), &QueryConfig::default())
            .unwrap();

        assert_eq!(property.sale_price(), Some(25_000_000.0));
        assert_eq!(property.location.coordinates(), Some((24.89, 91.87)));
        assert_eq!(property.area_unit, AreaUnit::Acres);
        assert!(property.featured);
    }
}
