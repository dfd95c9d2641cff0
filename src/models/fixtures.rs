//! Record builders shared by unit tests.

use chrono::{DateTime, TimeZone, Utc};

use super::{AreaUnit, Location, Pricing, Property, PropertyType};

pub fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

fn base(id: &str, pricing: Pricing, created_at: DateTime<Utc>) -> Property {
    Property {
        id: id.to_string(),
        title: format!("Listing {id}"),
        description: None,
        property_type: PropertyType::Apartment,
        pricing,
        currency: Some("BDT".to_string()),
        location: Location {
            city: "Dhaka".to_string(),
            neighborhood: None,
            address: None,
            latitude: None,
            longitude: None,
        },
        bedrooms: 2,
        bathrooms: 1.0,
        area_size: 900.0,
        area_unit: AreaUnit::Sqft,
        created_at,
        featured: false,
        images: vec![format!("https://img.example/{id}.jpg")],
        features: Vec::new(),
    }
}

pub fn rental(id: &str, price: f64, created_at: DateTime<Utc>) -> Property {
    base(
        id,
        Pricing::Rent {
            rent_price: price,
            security_deposit: None,
            maintenance_fee: None,
        },
        created_at,
    )
}

pub fn sale(id: &str, price: f64, created_at: DateTime<Utc>) -> Property {
    base(
        id,
        Pricing::Sale {
            sale_price: price,
            original_price: None,
            price_negotiable: None,
            mortgage_available: None,
        },
        created_at,
    )
}
